//! Proptest generators for property-based testing.

use proptest::prelude::*;

use citizen_agent_core::{
    AccessAction, ConsentStatus, NewAccessLogEntry, NewConsent, NewNotification, NotificationKind,
};

/// Generate a ConsentStatus.
pub fn consent_status() -> impl Strategy<Value = ConsentStatus> {
    prop_oneof![
        Just(ConsentStatus::Pending),
        Just(ConsentStatus::Active),
        Just(ConsentStatus::Revoked),
        Just(ConsentStatus::Expired),
    ]
}

/// Generate an AccessAction.
pub fn access_action() -> impl Strategy<Value = AccessAction> {
    prop_oneof![
        Just(AccessAction::Read),
        Just(AccessAction::Write),
        Just(AccessAction::Update),
        Just(AccessAction::Delete),
    ]
}

/// Generate a NotificationKind.
pub fn notification_kind() -> impl Strategy<Value = NotificationKind> {
    prop_oneof![
        Just(NotificationKind::ConsentRequest),
        Just(NotificationKind::DataAccess),
        Just(NotificationKind::SecurityAlert),
        Just(NotificationKind::SystemUpdate),
    ]
}

/// Generate a service provider DID.
pub fn provider_id() -> impl Strategy<Value = String> {
    "did:example:[a-z0-9]{1,12}"
}

/// Generate a dotted data category such as `health.heartrate`.
pub fn data_type() -> impl Strategy<Value = String> {
    "(profile|health|finance)\\.[a-z]{3,12}"
}

/// Generate a non-blank line of text.
pub fn text() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 ]{0,40}"
}

/// Generate a valid consent input. Granted types are drawn from the
/// requested ones.
pub fn new_consent() -> impl Strategy<Value = NewConsent> {
    (
        provider_id(),
        text(),
        prop::collection::vec(data_type(), 1..5),
        text(),
        prop::option::of(consent_status()),
        any::<prop::sample::Index>(),
    )
        .prop_map(|(provider, name, data_types, purpose, status, split)| {
            let granted = data_types[..split.index(data_types.len() + 1)].to_vec();
            NewConsent {
                status,
                granted_data_types: Some(granted),
                ..NewConsent::new(provider, name, data_types, purpose)
            }
        })
}

/// Generate a valid access-log input without a consent link.
pub fn new_access_log_entry() -> impl Strategy<Value = NewAccessLogEntry> {
    (
        provider_id(),
        text(),
        data_type(),
        access_action(),
        any::<bool>(),
        prop::option::of(text()),
    )
        .prop_map(|(provider, name, data_type, action, success, details)| NewAccessLogEntry {
            details,
            ..NewAccessLogEntry::new(provider, name, data_type, action, success)
        })
}

/// Generate a valid notification input, read or unread.
pub fn new_notification() -> impl Strategy<Value = NewNotification> {
    (notification_kind(), text(), text(), any::<bool>()).prop_map(
        |(kind, title, message, read)| {
            let input = NewNotification::new(kind, title, message);
            if read {
                input.read()
            } else {
                input
            }
        },
    )
}
