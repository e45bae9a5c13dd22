//! Classification of raw change records into client events
//!
//! Each category kind has its own rule, looked up through [`classifier`].
//! A rule sees only one record's old/new pair.

use serde_json::Value;

use super::CategoryKind;
use crate::protocol::OutboundMessage;
use crate::types::ChangeRecord;

/// Semantic event derived from one change record
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEvent {
    Added(Value),
    Edited(Value),
    Removed(Value),
}

/// Classification rule for one category kind
pub type Classifier = fn(&ChangeRecord) -> Option<ChangeEvent>;

/// Rule table keyed by category kind
pub fn classifier(kind: CategoryKind) -> Classifier {
    match kind {
        CategoryKind::Channel => classify_channel,
        CategoryKind::User => classify_user,
        CategoryKind::Message => classify_message,
    }
}

/// Classify `change` under `kind`
pub fn classify(change: &ChangeRecord, kind: CategoryKind) -> Option<ChangeEvent> {
    classifier(kind)(change)
}

/// Channels only announce additions
fn classify_channel(change: &ChangeRecord) -> Option<ChangeEvent> {
    match (&change.old, &change.new) {
        (None, Some(new)) => Some(ChangeEvent::Added(new.clone())),
        _ => None,
    }
}

fn classify_user(change: &ChangeRecord) -> Option<ChangeEvent> {
    match (&change.old, &change.new) {
        (None, Some(new)) => Some(ChangeEvent::Added(new.clone())),
        (Some(_), Some(new)) => Some(ChangeEvent::Edited(new.clone())),
        (Some(old), None) => Some(ChangeEvent::Removed(old.clone())),
        (None, None) => None,
    }
}

/// Messages are append-only: every record is reported as an addition,
/// including edits and removals (a removal carries a null document)
fn classify_message(change: &ChangeRecord) -> Option<ChangeEvent> {
    Some(ChangeEvent::Added(change.new.clone().unwrap_or(Value::Null)))
}

impl ChangeEvent {
    /// Outbound message announcing this event to a subscriber of `kind`
    pub fn into_message(self, kind: CategoryKind) -> OutboundMessage {
        match (kind, self) {
            (CategoryKind::Channel, ChangeEvent::Added(doc)) => OutboundMessage::ChannelAdded(doc),
            (CategoryKind::User, ChangeEvent::Added(doc)) => OutboundMessage::UserAdded(doc),
            (CategoryKind::User, ChangeEvent::Edited(doc)) => OutboundMessage::UserEdited(doc),
            (CategoryKind::User, ChangeEvent::Removed(doc)) => OutboundMessage::UserRemoved(doc),
            (CategoryKind::Message, ChangeEvent::Added(doc)) => OutboundMessage::MessageAdded(doc),
            // The classifiers never produce other combinations
            (CategoryKind::Channel, event) => OutboundMessage::ChannelAdded(event.into_document()),
            (CategoryKind::Message, event) => OutboundMessage::MessageAdded(event.into_document()),
        }
    }

    pub fn into_document(self) -> Value {
        match self {
            ChangeEvent::Added(doc) | ChangeEvent::Edited(doc) | ChangeEvent::Removed(doc) => doc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn d1() -> Value {
        json!({"id": "1", "name": "before"})
    }

    fn d2() -> Value {
        json!({"id": "1", "name": "after"})
    }

    #[test]
    fn test_user_transitions() {
        let kind = CategoryKind::User;
        assert_eq!(
            classify(&ChangeRecord::inserted(d1()), kind),
            Some(ChangeEvent::Added(d1()))
        );
        assert_eq!(
            classify(&ChangeRecord::updated(d1(), d2()), kind),
            Some(ChangeEvent::Edited(d2()))
        );
        assert_eq!(
            classify(&ChangeRecord::deleted(d1()), kind),
            Some(ChangeEvent::Removed(d1()))
        );
        assert_eq!(classify(&ChangeRecord::default(), kind), None);
    }

    #[test]
    fn test_channel_only_reports_additions() {
        let kind = CategoryKind::Channel;
        assert_eq!(
            classify(&ChangeRecord::inserted(d1()), kind),
            Some(ChangeEvent::Added(d1()))
        );
        assert_eq!(classify(&ChangeRecord::updated(d1(), d2()), kind), None);
        assert_eq!(classify(&ChangeRecord::deleted(d1()), kind), None);
    }

    #[test]
    fn test_message_always_added() {
        let kind = CategoryKind::Message;
        assert_eq!(
            classify(&ChangeRecord::inserted(d1()), kind),
            Some(ChangeEvent::Added(d1()))
        );
        assert_eq!(
            classify(&ChangeRecord::updated(d1(), d2()), kind),
            Some(ChangeEvent::Added(d2()))
        );
        assert_eq!(
            classify(&ChangeRecord::deleted(d1()), kind),
            Some(ChangeEvent::Added(Value::Null))
        );
    }

    #[test]
    fn test_events_map_to_wire_types() {
        let cases = [
            (CategoryKind::Channel, ChangeEvent::Added(d1()), "channel add"),
            (CategoryKind::User, ChangeEvent::Added(d1()), "user add"),
            (CategoryKind::User, ChangeEvent::Edited(d1()), "user edit"),
            (CategoryKind::User, ChangeEvent::Removed(d1()), "user remove"),
            (CategoryKind::Message, ChangeEvent::Added(d1()), "message add"),
        ];
        for (kind, event, expected) in cases {
            assert_eq!(event.into_message(kind).kind(), expected);
        }
    }
}
