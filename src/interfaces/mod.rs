//! Inbound adapters: REST handlers and the presence WebSocket

pub mod http;
pub mod ws;
