use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::Value;
use tabrs_recent_tabs::integrations::memory::{BrowserAction, MemoryBrowser, MemoryStore, pump};
use tabrs_recent_tabs::{BrowserEvent, DispatchOutcome, RecentTabs, Runtime, TrackerConfig};
use tabrs_support::{TabId, WindowId};
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    #[serde(default)]
    pub config: Option<Value>,
    pub windows: Vec<ScriptWindow>,
    /// Value already present under the storage key before startup.
    #[serde(default)]
    pub stored: Option<Value>,
    #[serde(default)]
    pub actions: Vec<BrowserAction>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptWindow {
    pub id: WindowId,
    pub tabs: Vec<TabId>,
    #[serde(default)]
    pub active: Option<TabId>,
    #[serde(default)]
    pub focused: bool,
}

#[derive(Debug)]
pub struct Replay {
    pub handled: Vec<(BrowserEvent, DispatchOutcome)>,
    pub table: Value,
}

pub fn run(script: Script) -> Result<Replay> {
    let config = TrackerConfig::from_value(script.config.as_ref());
    let storage_key = config.storage_key.clone();

    let mut store = MemoryStore::default();
    if let Some(stored) = script.stored {
        store.insert_raw(&storage_key, stored);
    }
    let browser = script
        .windows
        .into_iter()
        .fold(MemoryBrowser::default(), |browser, window| {
            browser.with_window(window.id, window.tabs, window.active, window.focused)
        });

    let mut runtime = Runtime::new(RecentTabs::new(store, browser, config));
    let started = runtime.dispatch(BrowserEvent::Started);
    if started == DispatchOutcome::Failed {
        bail!("startup failed");
    }
    let mut handled = vec![(BrowserEvent::Started, started)];

    for (step, action) in script.actions.into_iter().enumerate() {
        debug!(step, ?action, "replay:action");
        if !runtime.tracker_mut().host_mut().perform(action) {
            warn!(step, "replay:action_not_applied");
        }
        handled.extend(pump(&mut runtime));
    }

    let table = runtime
        .tracker()
        .store()
        .value(&storage_key)
        .cloned()
        .context("no table was written")?;
    Ok(Replay { handled, table })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn replays_switch_and_close() -> Result<()> {
        let script: Script = serde_json::from_value(json!({
            "windows": [{ "id": 1, "tabs": [1, 2, 3], "active": 1, "focused": true }],
            "actions": [
                { "action": "activate", "tab": 2 },
                { "action": "command", "name": "switch-tabs" },
                { "action": "close_tab", "tab": 1 }
            ]
        }))?;
        let replay = run(script)?;
        assert_eq!(replay.table, json!({ "1": [2] }));
        assert!(
            replay
                .handled
                .iter()
                .all(|(_, outcome)| *outcome != DispatchOutcome::Failed)
        );
        Ok(())
    }

    #[test]
    fn stored_value_is_replaced_at_startup() -> Result<()> {
        let script: Script = serde_json::from_value(json!({
            "config": { "storage_key": "mru" },
            "stored": { "9": [90, 91] },
            "windows": [{ "id": 4, "tabs": [40], "active": 40 }]
        }))?;
        let replay = run(script)?;
        assert_eq!(replay.table, json!({ "4": [40] }));
        Ok(())
    }
}
