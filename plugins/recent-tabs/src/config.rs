use serde_json::Value;
use tabrs_host_utils::decode::{self, Object};
use tracing::warn;

use crate::machines::history::HistoryLimit;

pub const DEFAULT_STORAGE_KEY: &str = "recentTabs";
pub const DEFAULT_SWITCH_COMMAND: &str = "switch-tabs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    pub history_limit: HistoryLimit,
    pub storage_key: String,
    pub switch_command: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            history_limit: HistoryLimit::default(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            switch_command: DEFAULT_SWITCH_COMMAND.to_string(),
        }
    }
}

impl TrackerConfig {
    fn parse_history_limit(config: &Object) -> Option<HistoryLimit> {
        let raw = match decode::optional_u64(config, "history_limit") {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(error = %err, "config:ignored_history_limit");
                return None;
            }
        };
        let limit = usize::try_from(raw).ok().and_then(HistoryLimit::try_new);
        if limit.is_none() {
            warn!(
                value = raw,
                min = HistoryLimit::MIN,
                "config:history_limit_out_of_range"
            );
        }
        limit
    }

    fn parse_name(config: &Object, key: &str) -> Option<String> {
        match decode::optional_nonempty_string(config, key) {
            Ok(value) => value.map(String::from),
            Err(err) => {
                warn!(key, error = %err, "config:ignored_name");
                None
            }
        }
    }

    /// Build a config from an optional JSON object, keeping the default for
    /// every field that is absent or invalid.
    pub fn from_value(config: Option<&Value>) -> Self {
        let defaults = Self::default();
        let Some(config) = config else {
            return defaults;
        };
        let Some(config) = config.as_object() else {
            warn!("config:expected_object");
            return defaults;
        };
        Self {
            history_limit: Self::parse_history_limit(config).unwrap_or(defaults.history_limit),
            storage_key: Self::parse_name(config, "storage_key").unwrap_or(defaults.storage_key),
            switch_command: Self::parse_name(config, "switch_command")
                .unwrap_or(defaults.switch_command),
        }
    }
}
