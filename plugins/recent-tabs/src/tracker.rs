//! Recent-tab tracker: applies history events against the stored table and
//! talks to the browser for activation and position lookups.
//!
//! Every operation is a full read-modify-write of the table. Nothing here
//! serializes writers that share the backing store, so two processes updating
//! the same key close together can lose one update.

use tabrs_host_utils::Result;
use tabrs_host_utils::state_machine::Machine;
use tabrs_support::{TabId, TabIndex, WindowId};
use tracing::{debug, info, warn};

use crate::config::TrackerConfig;
use crate::host::{Activation, KeyValueStore, TabHost, TabSlot, WindowSnapshot};
use crate::machines::history::{
    HistoryCommand, HistoryEffect, HistoryEvent, HistoryTable, HistoryTransition, WindowSeed,
};
use crate::store::{load_table, save_table};

/// Tab-strip position of the most recently activated tab.
///
/// Lives only as long as the running process and is only used to choose a
/// replacement when the active tab closes. Absent after a restart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveIndexHint(Option<TabIndex>);

impl ActiveIndexHint {
    pub const fn unknown() -> Self {
        Self(None)
    }

    pub const fn known(index: TabIndex) -> Self {
        Self(Some(index))
    }

    pub const fn get(self) -> Option<TabIndex> {
        self.0
    }
}

/// Result of a "switch to previous tab" request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    Switched(TabId),
    NotEnoughHistory,
    AllStale,
    NoCurrentWindow,
}

/// What happened after the most recent tab of a window was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replacement {
    /// The removed tab was not the front entry, or the window is closing.
    NotNeeded,
    NoHint,
    NoTarget,
    Activated(TabId),
    ActivationFailed(TabId),
}

pub struct RecentTabs<S, H> {
    store: S,
    host: H,
    config: TrackerConfig,
}

impl<S, H> RecentTabs<S, H>
where
    S: KeyValueStore,
    H: TabHost,
{
    pub const fn new(store: S, host: H, config: TrackerConfig) -> Self {
        Self {
            store,
            host,
            config,
        }
    }

    pub const fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub const fn host(&self) -> &H {
        &self.host
    }

    pub const fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_parts(self) -> (S, H) {
        (self.store, self.host)
    }

    pub fn load(&self) -> Result<HistoryTable> {
        load_table(
            &self.store,
            &self.config.storage_key,
            self.config.history_limit,
        )
    }

    /// Remembered tabs of `win`, most recent first; empty for unknown windows.
    pub fn history(&self, win: WindowId) -> Result<Vec<TabId>> {
        Ok(self.load()?.history(win).to_vec())
    }

    fn commit(
        &mut self,
        table: &mut HistoryTable,
        event: HistoryEvent,
    ) -> Result<HistoryTransition> {
        let transition = table.reduce(event);
        if !transition.has_effects() {
            return Ok(transition);
        }
        save_table(&mut self.store, &self.config.storage_key, table)?;
        for effect in &transition.effects {
            match effect {
                HistoryEffect::TableReplaced => {
                    debug!(windows = table.as_stored().len(), "history:table_replaced");
                }
                HistoryEffect::WindowUpdated { win } => {
                    debug!(%win, tabs = ?table.history(*win), "history:window_written");
                }
                HistoryEffect::WindowCleared { win } => {
                    debug!(%win, "history:window_cleared");
                }
            }
        }
        Ok(transition)
    }

    fn apply(&mut self, event: HistoryEvent) -> Result<HistoryTransition> {
        let mut table = self.load()?;
        self.commit(&mut table, event)
    }

    /// Reset the table so each window remembers only its active tab.
    pub fn initialize(&mut self, windows: &[WindowSnapshot]) -> Result<()> {
        let seeds = windows
            .iter()
            .map(|window| WindowSeed {
                win: window.win,
                active: window.active,
            })
            .collect();
        let mut table = HistoryTable::new(self.config.history_limit);
        let _ = self.commit(&mut table, HistoryEvent::Seeded { windows: seeds })?;
        info!(windows = windows.len(), "history:initialized");
        Ok(())
    }

    pub fn record_activation(
        &mut self,
        win: WindowId,
        tab: TabId,
        hint: &mut ActiveIndexHint,
    ) -> Result<()> {
        *hint = self
            .host
            .tab_index(tab)
            .map_or_else(ActiveIndexHint::unknown, ActiveIndexHint::known);
        let transition = self.apply(HistoryEvent::TabActivated { win, tab })?;
        debug!(
            %win,
            %tab,
            index = ?hint.get().map(TabIndex::raw),
            changed = transition.has_effects(),
            "history:activated"
        );
        Ok(())
    }

    pub fn record_removal(
        &mut self,
        win: WindowId,
        tab: TabId,
        window_closing: bool,
        hint: ActiveIndexHint,
    ) -> Result<Replacement> {
        if window_closing {
            return Ok(Replacement::NotNeeded);
        }
        let transition = self.apply(HistoryEvent::TabRemoved { win, tab })?;
        debug!(%win, %tab, changed = transition.has_effects(), "history:removed");
        match transition.command {
            Some(HistoryCommand::RestoreFocus { win, removed }) => {
                Ok(self.restore_focus(win, removed, hint))
            }
            None => Ok(Replacement::NotNeeded),
        }
    }

    /// Focus the tab that slid into the closed tab's position, the way the
    /// browser's own close-tab handling does, rather than the next history entry.
    fn restore_focus(
        &mut self,
        win: WindowId,
        removed: TabId,
        hint: ActiveIndexHint,
    ) -> Replacement {
        let Some(hint_index) = hint.get() else {
            debug!(%win, %removed, "history:replacement_without_hint");
            return Replacement::NoHint;
        };
        let mut remaining: Vec<TabSlot> = self
            .host
            .tabs_in_window(win)
            .into_iter()
            .filter(|slot| slot.tab != removed)
            .collect();
        remaining.sort_by_key(|slot| slot.index);
        // Position in the strip as it stands without the closed tab; the host
        // may still report the old indices.
        let target = hint_index
            .clamp_to_len(remaining.len())
            .and_then(|index| remaining.get(index.raw()));
        let Some(target) = target.copied() else {
            warn!(
                %win,
                hint = hint_index.raw(),
                tabs = remaining.len(),
                "history:no_replacement_tab"
            );
            return Replacement::NoTarget;
        };
        match self.host.activate(target.tab) {
            Activation::Found => {
                debug!(
                    %win,
                    tab = %target.tab,
                    index = target.index.raw(),
                    "history:replacement_activated"
                );
                Replacement::Activated(target.tab)
            }
            Activation::NotFound => {
                warn!(%win, tab = %target.tab, "history:replacement_missing");
                Replacement::ActivationFailed(target.tab)
            }
        }
    }

    pub fn remove_window(&mut self, win: WindowId) -> Result<()> {
        let transition = self.apply(HistoryEvent::WindowRemoved { win })?;
        debug!(%win, changed = transition.has_effects(), "history:window_removed");
        Ok(())
    }

    /// Activate the most recent remembered tab of `win` that still exists,
    /// dropping every stale entry tried on the way.
    pub fn resolve_switch_target(&mut self, win: WindowId) -> Result<SwitchOutcome> {
        let mut table = self.load()?;
        let candidates: Vec<TabId> = match table.window(win) {
            Some(history) if history.len() >= 2 => history.switch_candidates().collect(),
            _ => {
                debug!(%win, "switch:not_enough_history");
                return Ok(SwitchOutcome::NotEnoughHistory);
            }
        };

        let mut stale = Vec::new();
        for tab in candidates {
            match self.host.activate(tab) {
                Activation::Found => {
                    if !stale.is_empty() {
                        self.prune(&mut table, win, stale)?;
                    }
                    debug!(%win, %tab, "switch:activated");
                    return Ok(SwitchOutcome::Switched(tab));
                }
                Activation::NotFound => {
                    debug!(%win, %tab, "switch:stale_candidate");
                    stale.push(tab);
                }
            }
        }

        self.prune(&mut table, win, stale)?;
        info!(%win, "switch:all_stale");
        Ok(SwitchOutcome::AllStale)
    }

    fn prune(&mut self, table: &mut HistoryTable, win: WindowId, tabs: Vec<TabId>) -> Result<()> {
        let count = tabs.len();
        let _ = self.commit(table, HistoryEvent::StaleTabsPruned { win, tabs })?;
        debug!(%win, count, "switch:stale_pruned");
        Ok(())
    }

    /// Switch within the focused window.
    pub fn switch_in_focused_window(&mut self) -> Result<SwitchOutcome> {
        let Some(win) = self.host.focused_window() else {
            debug!("switch:no_current_window");
            return Ok(SwitchOutcome::NoCurrentWindow);
        };
        self.resolve_switch_target(win)
    }
}
