//! End-to-end scenarios through the Agent API.

use std::collections::HashSet;

use citizen_agent::response::{self, CREATED, OK};
use citizen_agent::{
    AccessAction, Agent, AgentConfig, ConsentStatus, ConsentUpdate, ErrorCode, NewAccessLogEntry,
    NewConsent, NewNotification, NotificationKind, PageRequest,
};
use proptest::prelude::*;

fn agent() -> Agent {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
    Agent::new(AgentConfig::default()).unwrap()
}

fn consent(provider: &str) -> NewConsent {
    NewConsent::new(
        provider,
        "Health Portal X",
        vec!["health.heartrate".to_string()],
        "dashboard",
    )
}

fn page(n: u32, size: u32) -> PageRequest {
    PageRequest::new(n, size).unwrap()
}

#[test]
fn create_applies_defaults() {
    let agent = agent();
    let grant = agent.create_consent(consent("sp1")).unwrap();

    assert_eq!(grant.status, ConsentStatus::Active);
    assert!(grant.granted_data_types.is_empty());
    assert_eq!(grant.created_at, grant.updated_at);
    assert_eq!(grant.data_custodian_id, "did:mock:local-agent-123");
}

#[test]
fn create_then_get_is_identical() {
    let agent = agent();
    let grant = agent
        .create_consent(
            consent("sp2")
                .with_status(ConsentStatus::Pending)
                .with_granted(vec!["health.heartrate".into()]),
        )
        .unwrap();

    let fetched = agent.get_consent(&grant.consent_id.to_string()).unwrap();
    assert_eq!(fetched, grant);
}

#[test]
fn list_filters_by_revoked() {
    let agent = agent();
    agent.create_consent(consent("sp1")).unwrap();
    let revoked = agent
        .create_consent(consent("sp2").with_status(ConsentStatus::Revoked))
        .unwrap();

    let result = agent.list_consents(Some("revoked"), page(1, 10)).unwrap();
    assert_eq!(result.items, vec![revoked]);
    assert_eq!(result.total_items, 1);

    let envelope = response::respond_page(Ok(result));
    assert_eq!(envelope.pagination.unwrap().total_items, 1);
}

#[test]
fn unknown_or_empty_status_filter_renders_ok() {
    let agent = agent();
    agent.create_consent(consent("sp1")).unwrap();
    agent
        .create_consent(consent("sp2").with_status(ConsentStatus::Pending))
        .unwrap();

    let rendered = response::render_page(agent.list_consents(Some("archived"), page(1, 10)));
    assert_eq!(rendered.status, OK);
    let body: serde_json::Value = serde_json::from_str(rendered.body.as_deref().unwrap()).unwrap();
    assert_eq!(body["data"], serde_json::json!([]));
    assert_eq!(body["pagination"]["totalItems"], 0);

    let unfiltered = agent.list_consents(Some(""), page(1, 10)).unwrap();
    assert_eq!(unfiltered.total_items, 2);
}

#[test]
fn delete_unknown_is_not_found_and_changes_nothing() {
    let agent = agent();
    agent.create_consent(consent("sp1")).unwrap();
    let before = agent.list_consents(None, page(1, 10)).unwrap();

    let err = agent
        .delete_consent("00000000-0000-4000-8000-000000000000")
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(agent.list_consents(None, page(1, 10)).unwrap(), before);
}

#[test]
fn mark_read_twice_succeeds() {
    let agent = agent();
    let n = agent
        .create_notification(NewNotification::new(
            NotificationKind::SecurityAlert,
            "Failed Login Attempt",
            "An unsuccessful login attempt was made to your account.",
        ))
        .unwrap();
    let id = n.notification_id.to_string();

    let first = agent.mark_notification_read(&id).unwrap();
    let second = agent.mark_notification_read(&id).unwrap();
    assert!(first.is_read && second.is_read);
}

#[test]
fn revoke_twice_reaches_same_state() {
    let agent = agent();
    let grant = agent.create_consent(consent("sp1")).unwrap();
    let id = grant.consent_id.to_string();

    let once = agent.revoke_consent(&id).unwrap();
    let twice = agent.revoke_consent(&id).unwrap();

    assert_eq!(once.status, ConsentStatus::Revoked);
    assert_eq!(twice.status, ConsentStatus::Revoked);
    assert!(twice.updated_at >= once.updated_at);
    assert!(once.updated_at >= grant.updated_at);
}

#[test]
fn updated_at_is_monotonic_across_mutations() {
    let agent = agent();
    let grant = agent.create_consent(consent("sp1")).unwrap();
    let id = grant.consent_id.to_string();

    let mut last = grant.updated_at;
    for status in [
        ConsentStatus::Pending,
        ConsentStatus::Active,
        ConsentStatus::Expired,
        ConsentStatus::Active,
    ] {
        let updated = agent
            .update_consent(&id, ConsentUpdate::status(status))
            .unwrap();
        assert_eq!(updated.status, status);
        assert!(updated.updated_at >= last);
        assert!(updated.updated_at >= updated.created_at);
        last = updated.updated_at;
    }
}

#[test]
fn deleting_consent_leaves_dangling_references() {
    let agent = agent();
    let grant = agent.create_consent(consent("sp1")).unwrap();

    let entry = agent
        .record_access(
            NewAccessLogEntry::new(
                "sp1",
                "Health Portal X",
                "health.heartrate",
                AccessAction::Read,
                true,
            )
            .with_consent(grant.consent_id),
        )
        .unwrap();
    let n = agent
        .create_notification(
            NewNotification::new(NotificationKind::DataAccess, "Data Accessed", "Heart rate read.")
                .related_to(grant.consent_id),
        )
        .unwrap();

    agent.delete_consent(&grant.consent_id.to_string()).unwrap();

    let exported = agent.export_access_logs().unwrap();
    assert_eq!(exported, vec![entry]);
    assert_eq!(exported[0].consent_id, Some(grant.consent_id));

    let notifications = agent.list_notifications(false, page(1, 10)).unwrap();
    assert_eq!(notifications.items, vec![n.clone()]);

    let dangling = n.related_entity_id.unwrap();
    assert_eq!(agent.get_consent(&dangling).unwrap_err().code(), ErrorCode::NotFound);
}

#[test]
fn validation_failure_renders_bad_request() {
    let agent = agent();
    let mut input = consent("sp1");
    input.purpose.clear();

    let rendered = response::render(agent.create_consent(input), CREATED);
    assert_eq!(rendered.status, 400);
    assert!(rendered.body.unwrap().contains("BAD_REQUEST"));
}

#[test]
fn transport_flow_renders_status_codes() {
    let agent = agent();

    let rendered = response::render(agent.create_consent(consent("sp1")), CREATED);
    assert_eq!(rendered.status, CREATED);
    let body: serde_json::Value = serde_json::from_str(rendered.body.as_deref().unwrap()).unwrap();
    let id = body["data"]["consentId"].as_str().unwrap().to_string();

    let request = agent.page_request(Some("1"), None).unwrap();
    assert_eq!(response::render_page(agent.list_consents(None, request)).status, OK);

    assert_eq!(response::render_empty(agent.delete_consent(&id)).status, 204);
    assert_eq!(response::render(agent.get_consent(&id), OK).status, 404);

    let bad_page = agent.page_request(Some("zero"), None);
    assert_eq!(bad_page.unwrap_err().code(), ErrorCode::BadRequest);
}

#[test]
fn unread_filter_and_pagination() {
    let agent = agent();
    for i in 0..15 {
        let mut input =
            NewNotification::new(NotificationKind::SystemUpdate, format!("Update {i}"), "New.");
        if i % 3 == 0 {
            input = input.read();
        }
        agent.create_notification(input).unwrap();
    }

    let unread = agent.list_notifications(true, page(1, 4)).unwrap();
    assert_eq!(unread.total_items, 10);
    assert_eq!(unread.total_pages(), 3);
    assert!(unread.items.iter().all(|n| !n.is_read));
    assert_eq!(unread.items[0].title, "Update 1");
}

proptest! {
    #[test]
    fn identifiers_are_pairwise_distinct(count in 1usize..40) {
        let agent = agent();
        let mut consent_ids = HashSet::new();
        let mut log_ids = HashSet::new();
        let mut notification_ids = HashSet::new();

        for i in 0..count {
            let provider = format!("sp{i}");
            consent_ids.insert(agent.create_consent(consent(&provider)).unwrap().consent_id);
            log_ids.insert(
                agent
                    .record_access(NewAccessLogEntry::new(
                        provider.as_str(),
                        "Provider",
                        "profile",
                        AccessAction::Read,
                        true,
                    ))
                    .unwrap()
                    .log_id,
            );
            notification_ids.insert(
                agent
                    .create_notification(NewNotification::new(
                        NotificationKind::DataAccess,
                        "t",
                        "m",
                    ))
                    .unwrap()
                    .notification_id,
            );
        }

        prop_assert_eq!(consent_ids.len(), count);
        prop_assert_eq!(log_ids.len(), count);
        prop_assert_eq!(notification_ids.len(), count);
    }

    #[test]
    fn consent_pages_partition_filtered_set(
        statuses in prop::collection::vec(0usize..4, 0..60),
        page_size in 1u32..12,
        filter in 0usize..4,
    ) {
        let agent = agent();
        let mut expected = Vec::new();
        for (i, s) in statuses.iter().enumerate() {
            let status = ConsentStatus::ALL[*s];
            let grant = agent
                .create_consent(consent(&format!("sp{i}")).with_status(status))
                .unwrap();
            if *s == filter {
                expected.push(grant.consent_id);
            }
        }

        let wanted = ConsentStatus::ALL[filter].as_str();
        let first = agent.list_consents(Some(wanted), page(1, page_size)).unwrap();
        prop_assert_eq!(first.total_items, expected.len() as u64);

        let mut seen = Vec::new();
        for n in 1..=first.total_pages() {
            let slice = agent.list_consents(Some(wanted), page(n as u32, page_size)).unwrap();
            seen.extend(slice.items.into_iter().map(|g| g.consent_id));
        }
        prop_assert_eq!(seen, expected);
    }
}
