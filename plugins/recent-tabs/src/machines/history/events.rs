use tabrs_host_utils::state_machine::Transition;
use tabrs_support::{TabId, WindowId};

/// A window as seen at startup: its id and the tab that was active, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSeed {
    pub win: WindowId,
    pub active: Option<TabId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEvent {
    Seeded { windows: Vec<WindowSeed> },
    TabActivated { win: WindowId, tab: TabId },
    TabRemoved { win: WindowId, tab: TabId },
    WindowRemoved { win: WindowId },
    StaleTabsPruned { win: WindowId, tabs: Vec<TabId> },
}

/// State changes that have to be written back to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryEffect {
    TableReplaced,
    WindowUpdated { win: WindowId },
    WindowCleared { win: WindowId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryCommand {
    /// The most recent tab of `win` went away; pick the tab that slid into its slot.
    RestoreFocus { win: WindowId, removed: TabId },
}

pub type HistoryTransition = Transition<HistoryEffect, HistoryCommand>;
