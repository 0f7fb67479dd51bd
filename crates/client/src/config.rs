use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use dingdong::SessionConfig;
use dingdong::court::DEFAULT_END_SCORE;
use serde::{Deserialize, Serialize};

pub const MAX_END_SCORE: i32 = 99;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub session: SessionConfig,
    pub end_score: i32,
    pub tick_rate: u32,
    /// Terminals without key release events report a key as held this long
    /// after its last press or repeat.
    pub key_hold_ms: u64,
    pub sound_on: bool,
    pub default_address: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            end_score: DEFAULT_END_SCORE,
            tick_rate: 60,
            key_hold_ms: 180,
            sound_on: true,
            default_address: "127.0.0.1".to_string(),
        }
    }
}

impl ClientConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = ron::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate.max(1) as f64)
    }

    pub fn key_hold(&self) -> Duration {
        Duration::from_millis(self.key_hold_ms)
    }
}
