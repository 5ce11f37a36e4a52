//! WebSocket transport: wire protocol, upgrade handler, session registry

pub mod handler;
pub mod protocol;
pub mod sessions;
