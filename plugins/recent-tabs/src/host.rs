//! Contracts for the browser and storage the tracker runs against.

use serde_json::Value;
use tabrs_host_utils::Result;
use tabrs_support::{TabId, TabIndex, WindowId};

/// Persistent map the history table is read from and written back to.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Value>>;

    fn set(&mut self, key: &str, value: Value) -> Result<()>;
}

/// Result of asking the browser to focus a tab by id.
///
/// `NotFound` is the ordinary answer for a tab that closed without the tracker
/// hearing about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Found,
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabSlot {
    pub tab: TabId,
    pub index: TabIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSnapshot {
    pub win: WindowId,
    pub tabs: Vec<TabSlot>,
    pub active: Option<TabId>,
}

pub trait TabHost {
    /// Every open window with its tabs, as enumerated at startup.
    fn windows(&self) -> Vec<WindowSnapshot>;

    /// Tabs currently open in `win`, in any order. Empty when the window is gone.
    fn tabs_in_window(&self, win: WindowId) -> Vec<TabSlot>;

    fn tab_index(&self, tab: TabId) -> Option<TabIndex>;

    fn focused_window(&self) -> Option<WindowId>;

    fn activate(&mut self, tab: TabId) -> Activation;
}
