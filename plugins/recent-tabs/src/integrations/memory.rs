//! In-process browser and store used by tests and the replay tool.

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tabrs_host_utils::{Error, Result};
use tabrs_support::{TabId, TabIndex, WindowId};
use tracing::warn;

use crate::host::{Activation, KeyValueStore, TabHost, TabSlot, WindowSnapshot};
use crate::runtime::{BrowserEvent, DispatchOutcome, Runtime};

/// Upper bound on events handled by one [`pump`] call.
pub const MAX_PUMPED_EVENTS: usize = 256;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    values: BTreeMap<String, Value>,
    writes: usize,
    fail_writes: bool,
}

impl MemoryStore {
    /// Number of successful `set` calls.
    pub const fn writes(&self) -> usize {
        self.writes
    }

    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Place a value directly, bypassing the write counter.
    pub fn insert_raw(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }

    pub const fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        if self.fail_writes {
            return Err(Error::store(key, "writes are disabled"));
        }
        self.values.insert(key.to_string(), value);
        self.writes += 1;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct MemoryWindow {
    tabs: Vec<TabId>,
    active: Option<TabId>,
}

impl MemoryWindow {
    fn slots(&self) -> Vec<TabSlot> {
        self.tabs
            .iter()
            .enumerate()
            .map(|(index, tab)| TabSlot {
                tab: *tab,
                index: TabIndex::new(index),
            })
            .collect()
    }
}

/// Browser model with ordered tab strips and a focused window.
///
/// Mutations that a real browser would report are queued as [`BrowserEvent`]s,
/// including activations the tracker itself requests. Callers drain the queue
/// and feed it back to the runtime.
#[derive(Debug, Clone, Default)]
pub struct MemoryBrowser {
    windows: BTreeMap<WindowId, MemoryWindow>,
    focused: Option<WindowId>,
    pending: VecDeque<BrowserEvent>,
}

impl MemoryBrowser {
    /// Add a window without queueing any event.
    pub fn with_window(
        mut self,
        win: WindowId,
        tabs: Vec<TabId>,
        active: Option<TabId>,
        focused: bool,
    ) -> Self {
        self.windows.insert(win, MemoryWindow { tabs, active });
        if focused {
            self.focused = Some(win);
        }
        self
    }

    /// Open a window and focus it; queues an activation for `active`.
    pub fn open_window(&mut self, win: WindowId, tabs: Vec<TabId>, active: Option<TabId>) {
        self.windows.insert(win, MemoryWindow { tabs, active });
        self.focused = Some(win);
        if let Some(tab) = active {
            self.pending.push_back(BrowserEvent::TabActivated { win, tab });
        }
    }

    /// Append `tab` to the end of the strip of `win`. Does not activate it.
    pub fn open_tab(&mut self, win: WindowId, tab: TabId) -> bool {
        if self.window_of(tab).is_some() {
            return false;
        }
        let Some(window) = self.windows.get_mut(&win) else {
            return false;
        };
        window.tabs.push(tab);
        true
    }

    /// Remove `tab` without reporting it, as if the removal event was lost.
    pub fn forget_tab(&mut self, tab: TabId) -> bool {
        self.detach(tab).is_some()
    }

    pub fn close_tab(&mut self, tab: TabId) -> bool {
        let Some(win) = self.detach(tab) else {
            return false;
        };
        self.pending.push_back(BrowserEvent::TabRemoved {
            win,
            tab,
            window_closing: false,
        });
        true
    }

    /// Close `win`: one removal per tab flagged as part of the window closing,
    /// then the window removal itself.
    pub fn close_window(&mut self, win: WindowId) -> bool {
        let Some(window) = self.windows.remove(&win) else {
            return false;
        };
        for tab in window.tabs {
            self.pending.push_back(BrowserEvent::TabRemoved {
                win,
                tab,
                window_closing: true,
            });
        }
        self.pending.push_back(BrowserEvent::WindowRemoved { win });
        if self.focused == Some(win) {
            self.focused = self.windows.keys().next().copied();
        }
        true
    }

    pub fn focus(&mut self, win: WindowId) -> bool {
        if !self.windows.contains_key(&win) {
            return false;
        }
        self.focused = Some(win);
        true
    }

    pub fn trigger_command(&mut self, name: &str) {
        self.pending.push_back(BrowserEvent::CommandTriggered {
            name: name.to_string(),
        });
    }

    pub fn active_tab(&self, win: WindowId) -> Option<TabId> {
        self.windows.get(&win).and_then(|window| window.active)
    }

    pub fn next_event(&mut self) -> Option<BrowserEvent> {
        self.pending.pop_front()
    }

    pub fn drain_events(&mut self) -> Vec<BrowserEvent> {
        self.pending.drain(..).collect()
    }

    fn window_of(&self, tab: TabId) -> Option<WindowId> {
        self.windows
            .iter()
            .find(|(_, window)| window.tabs.contains(&tab))
            .map(|(win, _)| *win)
    }

    fn detach(&mut self, tab: TabId) -> Option<WindowId> {
        let win = self.window_of(tab)?;
        let window = self.windows.get_mut(&win)?;
        window.tabs.retain(|open| *open != tab);
        if window.active == Some(tab) {
            window.active = None;
        }
        Some(win)
    }

    pub fn perform(&mut self, action: BrowserAction) -> bool {
        match action {
            BrowserAction::OpenWindow { win, tabs, active } => {
                self.open_window(win, tabs, active);
                true
            }
            BrowserAction::OpenTab { win, tab } => self.open_tab(win, tab),
            BrowserAction::Activate { tab } => self.activate(tab) == Activation::Found,
            BrowserAction::CloseTab { tab } => self.close_tab(tab),
            BrowserAction::CloseWindow { win } => self.close_window(win),
            BrowserAction::ForgetTab { tab } => self.forget_tab(tab),
            BrowserAction::Focus { win } => self.focus(win),
            BrowserAction::Command { name } => {
                self.trigger_command(&name);
                true
            }
        }
    }
}

impl TabHost for MemoryBrowser {
    fn windows(&self) -> Vec<WindowSnapshot> {
        self.windows
            .iter()
            .map(|(win, window)| WindowSnapshot {
                win: *win,
                tabs: window.slots(),
                active: window.active,
            })
            .collect()
    }

    fn tabs_in_window(&self, win: WindowId) -> Vec<TabSlot> {
        self.windows
            .get(&win)
            .map(MemoryWindow::slots)
            .unwrap_or_default()
    }

    fn tab_index(&self, tab: TabId) -> Option<TabIndex> {
        self.windows.values().find_map(|window| {
            window
                .tabs
                .iter()
                .position(|open| *open == tab)
                .map(TabIndex::new)
        })
    }

    fn focused_window(&self) -> Option<WindowId> {
        self.focused
    }

    fn activate(&mut self, tab: TabId) -> Activation {
        let Some(win) = self.window_of(tab) else {
            return Activation::NotFound;
        };
        let Some(window) = self.windows.get_mut(&win) else {
            return Activation::NotFound;
        };
        if window.active != Some(tab) {
            window.active = Some(tab);
            self.pending.push_back(BrowserEvent::TabActivated { win, tab });
        }
        Activation::Found
    }
}

/// Scripted user action against a [`MemoryBrowser`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum BrowserAction {
    OpenWindow {
        win: WindowId,
        tabs: Vec<TabId>,
        #[serde(default)]
        active: Option<TabId>,
    },
    OpenTab {
        win: WindowId,
        tab: TabId,
    },
    Activate {
        tab: TabId,
    },
    CloseTab {
        tab: TabId,
    },
    CloseWindow {
        win: WindowId,
    },
    ForgetTab {
        tab: TabId,
    },
    Focus {
        win: WindowId,
    },
    Command {
        name: String,
    },
}

/// Dispatch queued browser events, including the ones raised while handling
/// earlier events, until the queue is empty.
pub fn pump(
    runtime: &mut Runtime<MemoryStore, MemoryBrowser>,
) -> Vec<(BrowserEvent, DispatchOutcome)> {
    let mut handled = Vec::new();
    loop {
        if handled.len() >= MAX_PUMPED_EVENTS {
            warn!(limit = MAX_PUMPED_EVENTS, "memory:pump_limit_reached");
            break;
        }
        let Some(event) = runtime.tracker_mut().host_mut().next_event() else {
            break;
        };
        let outcome = runtime.dispatch(event.clone());
        handled.push((event, outcome));
    }
    handled
}
