use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tabrs_support::{TabId, WindowId};

pub const DEFAULT_HISTORY_LIMIT: usize = 4;

/// Maximum number of tabs remembered per window.
///
/// Toggling needs the current tab plus at least one alternate, so the bound
/// never drops below two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryLimit(usize);

impl HistoryLimit {
    pub const MIN: usize = 2;

    pub const fn try_new(raw: usize) -> Option<Self> {
        if raw < Self::MIN {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub const fn raw(self) -> usize {
        self.0
    }
}

impl Default for HistoryLimit {
    fn default() -> Self {
        Self(DEFAULT_HISTORY_LIMIT)
    }
}

/// Tab ids of one window, most recently activated first.
///
/// Invariants: no id appears twice and the length never exceeds the table's
/// `HistoryLimit`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowHistory(Vec<TabId>);

impl WindowHistory {
    pub fn from_tabs<I>(tabs: I, limit: HistoryLimit) -> Self
    where
        I: IntoIterator<Item = TabId>,
    {
        let mut kept: Vec<TabId> = Vec::with_capacity(limit.raw());
        for tab in tabs {
            if kept.len() == limit.raw() {
                break;
            }
            if !kept.contains(&tab) {
                kept.push(tab);
            }
        }
        Self(kept)
    }

    pub fn as_slice(&self) -> &[TabId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn front(&self) -> Option<TabId> {
        self.0.first().copied()
    }

    /// Alternates to try when toggling: everything but the current tab, in
    /// recency order.
    pub fn switch_candidates(&self) -> impl Iterator<Item = TabId> + '_ {
        self.0.iter().skip(1).copied()
    }

    pub(super) fn promote(&mut self, tab: TabId, limit: HistoryLimit) -> bool {
        if self.front() == Some(tab) && self.0.len() <= limit.raw() {
            return false;
        }
        self.0.retain(|entry| *entry != tab);
        self.0.insert(0, tab);
        self.0.truncate(limit.raw());
        true
    }

    pub(super) fn remove(&mut self, tab: TabId) -> bool {
        let before = self.0.len();
        self.0.retain(|entry| *entry != tab);
        self.0.len() != before
    }

    pub(super) fn remove_all(&mut self, tabs: &[TabId]) -> bool {
        let before = self.0.len();
        self.0.retain(|entry| !tabs.contains(entry));
        self.0.len() != before
    }
}

/// Persisted form of the history table.
pub type StoredTable = BTreeMap<WindowId, WindowHistory>;

/// Window id to history mapping plus the bound applied to every entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryTable {
    pub(super) by_win: StoredTable,
    pub(super) limit: HistoryLimit,
}

impl HistoryTable {
    pub fn new(limit: HistoryLimit) -> Self {
        Self {
            by_win: StoredTable::new(),
            limit,
        }
    }

    /// Adopt a table read from the store, re-establishing the per-window
    /// invariants in case the stored value predates the current limit.
    pub fn from_stored(stored: StoredTable, limit: HistoryLimit) -> Self {
        let by_win = stored
            .into_iter()
            .map(|(win, history)| (win, WindowHistory::from_tabs(history.0, limit)))
            .collect();
        Self { by_win, limit }
    }

    pub const fn as_stored(&self) -> &StoredTable {
        &self.by_win
    }

    /// History of `win`; a window the table has never seen reads as empty.
    pub fn history(&self, win: WindowId) -> &[TabId] {
        self.by_win
            .get(&win)
            .map(WindowHistory::as_slice)
            .unwrap_or_default()
    }

    pub fn window(&self, win: WindowId) -> Option<&WindowHistory> {
        self.by_win.get(&win)
    }

    pub fn is_tracked(&self, win: WindowId) -> bool {
        self.by_win.contains_key(&win)
    }
}
