//! API module for HTTP and WebSocket endpoints
//!
//! This module exposes the gateway over WebSocket (`/ws`) plus a health check.

pub mod http;
pub mod websocket;
