//! Change feed queries

use std::cmp::Ordering;
use std::fmt;

use chrono::DateTime;
use serde_json::Value;

use crate::types::ChangeRecord;

/// Tables known to the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Channel,
    User,
    Message,
}

impl Table {
    pub const ALL: [Table; 3] = [Table::Channel, Table::User, Table::Message];

    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Channel => "channel",
            Table::User => "user",
            Table::Message => "message",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a change feed should watch
#[derive(Debug, Clone, PartialEq)]
pub struct FeedQuery {
    pub table: Table,
    /// Only documents whose field equals the value
    pub filter: Option<(String, Value)>,
    /// Order the initial documents by this field, newest first
    pub order_by_desc: Option<String>,
    /// Replay existing documents as inserts before live changes
    pub include_initial: bool,
}

impl FeedQuery {
    pub fn table(table: Table) -> Self {
        Self {
            table,
            filter: None,
            order_by_desc: None,
            include_initial: false,
        }
    }

    pub fn filter_eq(mut self, field: impl Into<String>, value: Value) -> Self {
        self.filter = Some((field.into(), value));
        self
    }

    pub fn order_by_desc(mut self, field: impl Into<String>) -> Self {
        self.order_by_desc = Some(field.into());
        self
    }

    pub fn include_initial(mut self) -> Self {
        self.include_initial = true;
        self
    }

    /// Whether a document passes the filter
    pub fn matches(&self, document: &Value) -> bool {
        match &self.filter {
            Some((field, value)) => document.get(field) == Some(value),
            None => true,
        }
    }

    /// Restrict a change to this query's view of the table
    ///
    /// A side that does not pass the filter is reported as absent, so a
    /// document moving out of the view reads as a removal and one moving in
    /// reads as an insert. Returns `None` when neither side is visible.
    pub fn project(&self, change: &ChangeRecord) -> Option<ChangeRecord> {
        let old = change.old.clone().filter(|doc| self.matches(doc));
        let new = change.new.clone().filter(|doc| self.matches(doc));
        if old.is_none() && new.is_none() {
            return None;
        }
        Some(ChangeRecord { old, new })
    }

    /// Sort initial documents according to `order_by_desc`
    pub fn sort(&self, documents: &mut [Value]) {
        if let Some(field) = &self.order_by_desc {
            documents.sort_by(|a, b| compare_fields(b.get(field), a.get(field)));
        }
    }
}

/// Compare two field values: timestamps chronologically, numbers
/// numerically, other strings lexically; missing values sort first
fn compare_fields(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::String(a)), Some(Value::String(b))) => {
            match (DateTime::parse_from_rfc3339(a), DateTime::parse_from_rfc3339(b)) {
                (Ok(a), Ok(b)) => a.cmp(&b),
                _ => a.cmp(b),
            }
        }
        (Some(Value::Number(a)), Some(Value::Number(b))) => {
            let (a, b) = (a.as_f64().unwrap_or(0.0), b.as_f64().unwrap_or(0.0));
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_project_hides_filtered_sides() {
        let query = FeedQuery::table(Table::Message).filter_eq("channelId", json!("c1"));

        let moved_out = ChangeRecord::updated(
            json!({"id": "m1", "channelId": "c1"}),
            json!({"id": "m1", "channelId": "c2"}),
        );
        let projected = query.project(&moved_out).unwrap();
        assert!(projected.old.is_some());
        assert!(projected.new.is_none());

        let elsewhere = ChangeRecord::inserted(json!({"id": "m2", "channelId": "c2"}));
        assert!(query.project(&elsewhere).is_none());
    }

    #[test]
    fn test_sort_newest_first_across_precisions() {
        let query = FeedQuery::table(Table::Message).order_by_desc("createdAt");
        let mut docs = vec![
            json!({"id": "a", "createdAt": "2024-01-01T00:00:00.123456Z"}),
            json!({"id": "b", "createdAt": "2024-01-01T00:00:00.5Z"}),
            json!({"id": "c", "createdAt": "2023-12-31T23:59:59Z"}),
        ];
        query.sort(&mut docs);

        let ids: Vec<&str> = docs.iter().map(|d| d["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_no_filter_matches_everything() {
        let query = FeedQuery::table(Table::User);
        assert!(query.matches(&json!({"name": "x"})));
    }
}
