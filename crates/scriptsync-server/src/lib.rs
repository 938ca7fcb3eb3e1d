//! Scriptsync Server - HTTP endpoint for the script snapshot
//!
//! Exposes a single route, `GET /scripts`, returning the current
//! [`ScriptMap`](scriptsync_core::ScriptMap) as a JSON object. Any origin may
//! read it; everything else is a bare 404.
//!
//! The server does not log requests. Consumers poll every few seconds and
//! per-request lines would drown out the change log.

mod handlers;
mod server;

pub use server::{router, ScriptServer, ServerConfig, ServerError, SCRIPTS_PATH};
