mod config;
mod engine;
mod error;
mod online;

pub use config::{DEFAULT_PORT, SessionConfig};
pub use engine::ReplicationEngine;
pub use error::SessionError;
pub use online::OnlineSession;
