use tabrs_host_utils::{Result, decode};
use tracing::{debug, warn};

use crate::host::KeyValueStore;
use crate::machines::history::{HistoryLimit, HistoryTable, StoredTable};

/// Read the table stored under `key`.
///
/// A missing value is an empty table. A value that no longer decodes is
/// dropped with a warning so the next write replaces it.
pub(crate) fn load_table<S>(store: &S, key: &str, limit: HistoryLimit) -> Result<HistoryTable>
where
    S: KeyValueStore + ?Sized,
{
    let Some(value) = store.get(key)? else {
        return Ok(HistoryTable::new(limit));
    };
    match decode::deserialize::<StoredTable>(value) {
        Ok(stored) => Ok(HistoryTable::from_stored(stored, limit)),
        Err(err) => {
            warn!(key, error = %err, "store:discarded_undecodable_table");
            Ok(HistoryTable::new(limit))
        }
    }
}

pub(crate) fn save_table<S>(store: &mut S, key: &str, table: &HistoryTable) -> Result<()>
where
    S: KeyValueStore + ?Sized,
{
    let value = serde_json::to_value(table.as_stored())?;
    store.set(key, value)?;
    debug!(key, windows = table.as_stored().len(), "store:table_written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{load_table, save_table};
    use crate::integrations::memory::MemoryStore;
    use crate::machines::history::{HistoryEvent, HistoryLimit, HistoryTable};
    use serde_json::json;
    use tabrs_host_utils::state_machine::Machine;
    use tabrs_support::{TabId, WindowId};

    const KEY: &str = "recentTabs";

    fn win(id: i64) -> Result<WindowId, &'static str> {
        WindowId::try_from_i64(id).ok_or("expected valid window id")
    }

    fn tab(id: i64) -> Result<TabId, &'static str> {
        TabId::try_from_i64(id).ok_or("expected valid tab id")
    }

    #[test]
    fn missing_value_loads_empty_table() -> Result<(), &'static str> {
        let store = MemoryStore::default();
        let table =
            load_table(&store, KEY, HistoryLimit::default()).map_err(|_| "expected load")?;
        assert!(table.as_stored().is_empty());
        Ok(())
    }

    #[test]
    fn saved_table_uses_window_keyed_json() -> Result<(), &'static str> {
        let mut store = MemoryStore::default();
        let mut table = HistoryTable::default();
        let _ = table.reduce(HistoryEvent::TabActivated {
            win: win(1)?,
            tab: tab(3)?,
        });
        let _ = table.reduce(HistoryEvent::TabActivated {
            win: win(1)?,
            tab: tab(5)?,
        });
        let _ = table.reduce(HistoryEvent::TabActivated {
            win: win(2)?,
            tab: tab(8)?,
        });
        save_table(&mut store, KEY, &table).map_err(|_| "expected save")?;

        let raw = store.value(KEY).ok_or("expected stored value")?;
        let rendered = serde_json::to_string(raw).map_err(|_| "expected json")?;
        insta::assert_snapshot!(rendered, @r#"{"1":[5,3],"2":[8]}"#);
        Ok(())
    }

    #[test]
    fn load_normalizes_stored_lists() -> Result<(), &'static str> {
        let mut store = MemoryStore::default();
        store.insert_raw(KEY, json!({ "4": [1, 1, 2, 3, 4, 5] }));
        let table =
            load_table(&store, KEY, HistoryLimit::default()).map_err(|_| "expected load")?;
        let expected = [tab(1)?, tab(2)?, tab(3)?, tab(4)?];
        assert_eq!(table.history(win(4)?), expected.as_slice());
        Ok(())
    }

    #[test]
    fn undecodable_value_loads_empty_table() -> Result<(), &'static str> {
        let mut store = MemoryStore::default();
        store.insert_raw(KEY, json!({ "1": "not a list" }));
        let table =
            load_table(&store, KEY, HistoryLimit::default()).map_err(|_| "expected load")?;
        assert!(table.as_stored().is_empty());
        Ok(())
    }

    #[test]
    fn write_failure_is_reported() {
        let mut store = MemoryStore::default();
        store.fail_writes(true);
        let result = save_table(&mut store, KEY, &HistoryTable::default());
        assert!(matches!(
            result,
            Err(tabrs_host_utils::Error::Store { .. })
        ));
    }
}
