//! Subscription categories

use serde_json::json;

use crate::store::{FeedQuery, Table};

/// A topic a client can subscribe to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    Channel,
    User,
    Message { channel_id: String },
}

/// A category without its parameters; the subscription registry key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryKind {
    Channel,
    User,
    Message,
}

impl Category {
    pub fn kind(&self) -> CategoryKind {
        match self {
            Category::Channel => CategoryKind::Channel,
            Category::User => CategoryKind::User,
            Category::Message { .. } => CategoryKind::Message,
        }
    }

    /// Change feed query serving this category
    pub fn query(&self) -> FeedQuery {
        match self {
            Category::Channel => FeedQuery::table(Table::Channel).include_initial(),
            Category::User => FeedQuery::table(Table::User).include_initial(),
            Category::Message { channel_id } => FeedQuery::table(Table::Message)
                .filter_eq("channelId", json!(channel_id))
                .order_by_desc("createdAt")
                .include_initial(),
        }
    }
}

impl CategoryKind {
    /// Topic prefix used in command names, e.g. `"message"` in `"message subscribe"`
    pub fn topic(&self) -> &'static str {
        match self {
            CategoryKind::Channel => "channel",
            CategoryKind::User => "user",
            CategoryKind::Message => "message",
        }
    }
}
