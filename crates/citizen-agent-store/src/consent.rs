//! In-memory consent store.
//!
//! Grants are kept in insertion order so listings are stable. All data is
//! lost when the store is dropped.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use citizen_agent_core::clock::advance;
use citizen_agent_core::{
    select_page, Clock, ConsentGrant, ConsentId, ConsentStatus, ConsentUpdate, NewConsent, Page,
    PageRequest, SystemClock,
};

use crate::error::{Result, StoreError};

/// Owns the consent grants of one agent.
///
/// Thread-safe via RwLock: every mutation holds the write lock for the
/// whole operation.
pub struct ConsentStore {
    grants: RwLock<Vec<ConsentGrant>>,
    custodian_id: String,
    clock: Arc<dyn Clock>,
}

impl ConsentStore {
    /// Create an empty store stamping grants with `custodian_id`.
    pub fn new(custodian_id: impl Into<String>) -> Self {
        Self::with_clock(custodian_id, Arc::new(SystemClock))
    }

    /// Create an empty store with a custom time source.
    pub fn with_clock(custodian_id: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            grants: RwLock::new(Vec::new()),
            custodian_id: custodian_id.into(),
            clock,
        }
    }

    /// Validate `input`, apply defaults, and append a new grant.
    pub fn create(&self, input: NewConsent) -> Result<ConsentGrant> {
        input.validate()?;

        let mut grants = self.write()?;
        let consent_id = fresh_id(&grants);
        let grant = input.into_grant(consent_id, self.custodian_id.as_str(), self.clock.now());
        grants.push(grant.clone());
        Ok(grant)
    }

    /// Get a grant by ID.
    pub fn get(&self, consent_id: &ConsentId) -> Result<ConsentGrant> {
        self.read()?
            .iter()
            .find(|g| &g.consent_id == consent_id)
            .cloned()
            .ok_or(StoreError::ConsentNotFound(*consent_id))
    }

    /// List grants, optionally only those with the given status.
    pub fn list(
        &self,
        status: Option<ConsentStatus>,
        request: PageRequest,
    ) -> Result<Page<ConsentGrant>> {
        let grants = self.read()?;
        Ok(match status {
            Some(status) => select_page(grants.as_slice(), request, |g| g.status == status),
            None => select_page(grants.as_slice(), request, |_| true),
        })
    }

    /// Overwrite every field supplied in `update` and stamp `updated_at`.
    ///
    /// Status is written as given; there are no forbidden transitions.
    pub fn update(&self, consent_id: &ConsentId, update: ConsentUpdate) -> Result<ConsentGrant> {
        self.modify(consent_id, |grant| grant.apply(update))
    }

    /// Set status to revoked. Revoking a revoked grant succeeds.
    pub fn revoke(&self, consent_id: &ConsentId) -> Result<ConsentGrant> {
        self.modify(consent_id, |grant| grant.status = ConsentStatus::Revoked)
    }

    /// Permanently remove a grant.
    ///
    /// Log entries and notifications that reference it are left as is.
    pub fn delete(&self, consent_id: &ConsentId) -> Result<()> {
        let mut grants = self.write()?;
        let index = grants
            .iter()
            .position(|g| &g.consent_id == consent_id)
            .ok_or(StoreError::ConsentNotFound(*consent_id))?;
        grants.remove(index);
        Ok(())
    }

    /// Number of grants held.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.is_empty())
    }

    fn modify<F>(&self, consent_id: &ConsentId, change: F) -> Result<ConsentGrant>
    where
        F: FnOnce(&mut ConsentGrant),
    {
        let mut grants = self.write()?;
        let grant = grants
            .iter_mut()
            .find(|g| &g.consent_id == consent_id)
            .ok_or(StoreError::ConsentNotFound(*consent_id))?;

        change(&mut *grant);
        grant.updated_at = advance(grant.updated_at, self.clock.now());
        Ok(grant.clone())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<ConsentGrant>>> {
        self.grants
            .read()
            .map_err(|_| StoreError::LockPoisoned("consent"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<ConsentGrant>>> {
        self.grants
            .write()
            .map_err(|_| StoreError::LockPoisoned("consent"))
    }
}

/// Generate an ID not held by any current grant.
fn fresh_id(grants: &[ConsentGrant]) -> ConsentId {
    loop {
        let id = ConsentId::generate();
        if !grants.iter().any(|g| g.consent_id == id) {
            return id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    use chrono::{Duration, TimeZone, Utc};
    use citizen_agent_core::{Timestamp, ValidationError};

    const CUSTODIAN: &str = "did:mock:local-agent-123";

    /// Clock that moves forward one second per reading.
    struct TickingClock(Mutex<Timestamp>);

    impl TickingClock {
        fn new() -> Arc<Self> {
            Arc::new(Self(Mutex::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())))
        }
    }

    impl Clock for TickingClock {
        fn now(&self) -> Timestamp {
            let mut now = self.0.lock().unwrap();
            *now += Duration::seconds(1);
            *now
        }
    }

    fn heart_rate() -> NewConsent {
        NewConsent::new(
            "sp1",
            "Health Portal X",
            vec!["health.heartrate".to_string()],
            "dashboard",
        )
    }

    fn first_page() -> PageRequest {
        PageRequest::new(1, 10).unwrap()
    }

    #[test]
    fn test_create_applies_defaults() {
        let store = ConsentStore::new(CUSTODIAN);
        let grant = store.create(heart_rate()).unwrap();

        assert_eq!(grant.status, ConsentStatus::Active);
        assert!(grant.granted_data_types.is_empty());
        assert_eq!(grant.created_at, grant.updated_at);
        assert_eq!(grant.data_custodian_id, CUSTODIAN);
    }

    #[test]
    fn test_create_rejects_missing_fields() {
        let store = ConsentStore::new(CUSTODIAN);
        let mut input = heart_rate();
        input.data_types.clear();

        let err = store.create(input).unwrap_err();
        assert_eq!(err, StoreError::Validation(ValidationError::EmptyList("dataTypes")));
        assert_eq!(store.len().unwrap(), 0);
    }

    #[test]
    fn test_create_then_get_roundtrip() {
        let store = ConsentStore::new(CUSTODIAN);
        let created = store
            .create(heart_rate().with_status(ConsentStatus::Pending))
            .unwrap();

        let fetched = store.get(&created.consent_id).unwrap();
        assert_eq!(created, fetched);
    }

    #[test]
    fn test_get_unknown() {
        let store = ConsentStore::new(CUSTODIAN);
        let id = ConsentId::generate();
        assert_eq!(store.get(&id), Err(StoreError::ConsentNotFound(id)));
    }

    #[test]
    fn test_ids_unique() {
        let store = ConsentStore::new(CUSTODIAN);
        let ids: HashSet<_> = (0..50)
            .map(|_| store.create(heart_rate()).unwrap().consent_id)
            .collect();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn test_list_filters_by_status() {
        let store = ConsentStore::new(CUSTODIAN);
        store.create(heart_rate()).unwrap();
        let revoked = store
            .create(heart_rate().with_status(ConsentStatus::Revoked))
            .unwrap();

        let page = store.list(Some(ConsentStatus::Revoked), first_page()).unwrap();
        assert_eq!(page.total_items, 1);
        assert_eq!(page.items, vec![revoked]);

        let all = store.list(None, first_page()).unwrap();
        assert_eq!(all.total_items, 2);
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let store = ConsentStore::new(CUSTODIAN);
        let ids: Vec<_> = (0..5)
            .map(|i| {
                store
                    .create(NewConsent::new(
                        format!("sp{i}"),
                        "Provider",
                        vec!["profile".into()],
                        "p",
                    ))
                    .unwrap()
                    .consent_id
            })
            .collect();

        let page = store.list(None, PageRequest::new(2, 2).unwrap()).unwrap();
        let listed: Vec<_> = page.items.iter().map(|g| g.consent_id).collect();
        assert_eq!(listed, ids[2..4].to_vec());
        assert_eq!(page.total_pages(), 3);
    }

    #[test]
    fn test_update_overwrites_and_stamps() {
        let store = ConsentStore::with_clock(CUSTODIAN, TickingClock::new());
        let created = store.create(heart_rate()).unwrap();

        let updated = store
            .update(
                &created.consent_id,
                ConsentUpdate {
                    purpose: Some("research".into()),
                    status: Some(ConsentStatus::Expired),
                    granted_data_types: Some(vec!["health.heartrate".into()]),
                    ..ConsentUpdate::default()
                },
            )
            .unwrap();

        assert_eq!(updated.purpose, "research");
        assert_eq!(updated.status, ConsentStatus::Expired);
        assert_eq!(updated.data_types, created.data_types);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
        assert_eq!(store.get(&created.consent_id).unwrap(), updated);
    }

    #[test]
    fn test_update_overwrites_data_types_and_expiry() {
        let store = ConsentStore::new(CUSTODIAN);
        let created = store.create(heart_rate()).unwrap();
        let expiry = Utc.with_ymd_and_hms(2030, 6, 1, 12, 0, 0).unwrap();

        let updated = store
            .update(
                &created.consent_id,
                ConsentUpdate {
                    data_types: Some(vec!["profile.name".into(), "profile.email".into()]),
                    expires_at: Some(expiry),
                    ..ConsentUpdate::default()
                },
            )
            .unwrap();

        assert_eq!(
            updated.data_types,
            vec!["profile.name".to_string(), "profile.email".to_string()]
        );
        assert_eq!(updated.expires_at, Some(expiry));
        assert_eq!(updated.purpose, created.purpose);
        assert_eq!(updated.status, created.status);
        assert_eq!(store.get(&created.consent_id).unwrap(), updated);
    }

    #[test]
    fn test_update_blank_purpose_keeps_existing() {
        let store = ConsentStore::new(CUSTODIAN);
        let created = store.create(heart_rate()).unwrap();

        let updated = store
            .update(
                &created.consent_id,
                ConsentUpdate {
                    purpose: Some(String::new()),
                    status: Some(ConsentStatus::Pending),
                    ..ConsentUpdate::default()
                },
            )
            .unwrap();

        assert_eq!(updated.purpose, "dashboard");
        assert_eq!(updated.status, ConsentStatus::Pending);
        assert!(NewConsent::new(
            updated.service_provider_id.clone(),
            updated.service_provider_name.clone(),
            updated.data_types.clone(),
            updated.purpose.clone(),
        )
        .validate()
        .is_ok());
    }

    #[test]
    fn test_update_has_no_transition_guard() {
        let store = ConsentStore::new(CUSTODIAN);
        let created = store.create(heart_rate()).unwrap();
        store.revoke(&created.consent_id).unwrap();

        let reactivated = store
            .update(&created.consent_id, ConsentUpdate::status(ConsentStatus::Active))
            .unwrap();
        assert_eq!(reactivated.status, ConsentStatus::Active);
    }

    #[test]
    fn test_update_unknown() {
        let store = ConsentStore::new(CUSTODIAN);
        let id = ConsentId::generate();
        assert_eq!(
            store.update(&id, ConsentUpdate::default()),
            Err(StoreError::ConsentNotFound(id))
        );
    }

    #[test]
    fn test_revoke_idempotent() {
        let store = ConsentStore::with_clock(CUSTODIAN, TickingClock::new());
        let created = store.create(heart_rate()).unwrap();

        let once = store.revoke(&created.consent_id).unwrap();
        let twice = store.revoke(&created.consent_id).unwrap();

        assert_eq!(once.status, ConsentStatus::Revoked);
        assert_eq!(twice.status, ConsentStatus::Revoked);
        assert!(twice.updated_at >= once.updated_at);
    }

    #[test]
    fn test_expiry_in_past_does_not_change_status() {
        let store = ConsentStore::new(CUSTODIAN);
        let created = store
            .create(heart_rate().with_expiry(Utc::now() - Duration::days(1)))
            .unwrap();

        assert_eq!(store.get(&created.consent_id).unwrap().status, ConsentStatus::Active);
    }

    #[test]
    fn test_delete() {
        let store = ConsentStore::new(CUSTODIAN);
        let keep = store.create(heart_rate()).unwrap();
        let gone = store.create(heart_rate()).unwrap();

        store.delete(&gone.consent_id).unwrap();
        assert_eq!(store.get(&gone.consent_id), Err(StoreError::ConsentNotFound(gone.consent_id)));
        assert_eq!(store.get(&keep.consent_id).unwrap(), keep);
        assert_eq!(
            store.delete(&gone.consent_id),
            Err(StoreError::ConsentNotFound(gone.consent_id))
        );
    }

    #[test]
    fn test_delete_unknown_leaves_store_unchanged() {
        let store = ConsentStore::new(CUSTODIAN);
        store.create(heart_rate()).unwrap();
        let before = store.list(None, first_page()).unwrap();

        assert!(store.delete(&ConsentId::generate()).unwrap_err().is_not_found());
        assert_eq!(store.list(None, first_page()).unwrap(), before);
    }

    #[test]
    fn test_updated_at_never_moves_backwards() {
        /// Clock that runs backwards.
        struct Rewinding(Mutex<Timestamp>);
        impl Clock for Rewinding {
            fn now(&self) -> Timestamp {
                let mut now = self.0.lock().unwrap();
                *now -= Duration::minutes(1);
                *now
            }
        }

        let clock = Arc::new(Rewinding(Mutex::new(Utc::now())));
        let store = ConsentStore::with_clock(CUSTODIAN, clock);
        let created = store.create(heart_rate()).unwrap();
        let revoked = store.revoke(&created.consent_id).unwrap();

        assert!(revoked.updated_at >= revoked.created_at);
        assert_eq!(revoked.updated_at, created.updated_at);
    }

    #[test]
    fn test_concurrent_creates() {
        let store = Arc::new(ConsentStore::new(CUSTODIAN));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        store.create(heart_rate()).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len().unwrap(), 100);
    }
}
