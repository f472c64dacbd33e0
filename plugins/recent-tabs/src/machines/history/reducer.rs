use tabrs_host_utils::state_machine::Machine;
use tabrs_support::{TabId, WindowId};

use super::events::{HistoryCommand, HistoryEffect, HistoryEvent, HistoryTransition, WindowSeed};
use super::state::{HistoryTable, StoredTable, WindowHistory};

impl HistoryTable {
    fn reduce_seeded(&mut self, windows: Vec<WindowSeed>) -> HistoryTransition {
        let limit = self.limit;
        self.by_win = windows
            .into_iter()
            .map(|seed| (seed.win, WindowHistory::from_tabs(seed.active, limit)))
            .collect::<StoredTable>();
        HistoryTransition::with_effect(HistoryEffect::TableReplaced)
    }

    fn reduce_tab_removed(&mut self, win: WindowId, tab: TabId) -> HistoryTransition {
        let Some(history) = self.by_win.get_mut(&win) else {
            return HistoryTransition::default();
        };
        // Decided before the removal so the front check sees the old order.
        let was_front = history.front() == Some(tab);
        if !history.remove(tab) {
            return HistoryTransition::default();
        }
        let mut transition = HistoryTransition::with_effect(HistoryEffect::WindowUpdated { win });
        if was_front {
            transition.set_command(HistoryCommand::RestoreFocus { win, removed: tab });
        }
        transition
    }
}

impl Machine for HistoryTable {
    type Event = HistoryEvent;
    type Effect = HistoryEffect;
    type Command = HistoryCommand;

    fn reduce(&mut self, event: HistoryEvent) -> HistoryTransition {
        match event {
            HistoryEvent::Seeded { windows } => self.reduce_seeded(windows),
            HistoryEvent::TabActivated { win, tab } => {
                let limit = self.limit;
                let history = self.by_win.entry(win).or_default();
                if history.promote(tab, limit) {
                    HistoryTransition::with_effect(HistoryEffect::WindowUpdated { win })
                } else {
                    HistoryTransition::default()
                }
            }
            HistoryEvent::TabRemoved { win, tab } => self.reduce_tab_removed(win, tab),
            HistoryEvent::WindowRemoved { win } => {
                if self.by_win.remove(&win).is_some() {
                    HistoryTransition::with_effect(HistoryEffect::WindowCleared { win })
                } else {
                    HistoryTransition::default()
                }
            }
            HistoryEvent::StaleTabsPruned { win, tabs } => {
                let changed = self
                    .by_win
                    .get_mut(&win)
                    .is_some_and(|history| history.remove_all(&tabs));
                if changed {
                    HistoryTransition::with_effect(HistoryEffect::WindowUpdated { win })
                } else {
                    HistoryTransition::default()
                }
            }
        }
    }
}
