//! Utility types and helpers
//!
//! This module contains the cancellation token shared by subscriptions and
//! change feeds.

pub mod cancel;

pub use cancel::CancelToken;
