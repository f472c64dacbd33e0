//! Routes browser events to the tracker.
//!
//! Each event is handled on its own: a failing or panicking handler is logged
//! and does not stop later events from being processed.

use serde::{Deserialize, Serialize};
use tabrs_host_utils::{Result, guard};
use tabrs_support::{TabId, WindowId};
use tracing::{debug, warn};

use crate::command::TrackerCommand;
use crate::host::{KeyValueStore, TabHost};
use crate::tracker::{ActiveIndexHint, RecentTabs, Replacement, SwitchOutcome};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BrowserEvent {
    /// The extension started or was reinstalled.
    Started,
    TabActivated {
        win: WindowId,
        tab: TabId,
    },
    TabRemoved {
        win: WindowId,
        tab: TabId,
        #[serde(default)]
        window_closing: bool,
    },
    WindowRemoved {
        win: WindowId,
    },
    CommandTriggered {
        name: String,
    },
}

impl BrowserEvent {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::TabActivated { .. } => "tab_activated",
            Self::TabRemoved { .. } => "tab_removed",
            Self::WindowRemoved { .. } => "window_removed",
            Self::CommandTriggered { .. } => "command_triggered",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Applied,
    Removed(Replacement),
    Switch(SwitchOutcome),
    /// A command this tracker does not handle.
    Ignored,
    Failed,
}

pub struct Runtime<S, H> {
    tracker: RecentTabs<S, H>,
    hint: ActiveIndexHint,
}

impl<S, H> Runtime<S, H>
where
    S: KeyValueStore,
    H: TabHost,
{
    pub const fn new(tracker: RecentTabs<S, H>) -> Self {
        Self {
            tracker,
            hint: ActiveIndexHint::unknown(),
        }
    }

    pub const fn tracker(&self) -> &RecentTabs<S, H> {
        &self.tracker
    }

    pub const fn tracker_mut(&mut self) -> &mut RecentTabs<S, H> {
        &mut self.tracker
    }

    pub const fn hint(&self) -> ActiveIndexHint {
        self.hint
    }

    pub fn into_tracker(self) -> RecentTabs<S, H> {
        self.tracker
    }

    pub fn dispatch(&mut self, event: BrowserEvent) -> DispatchOutcome {
        let label = event.label();
        guard::run_logged(label, DispatchOutcome::Failed, || {
            match self.handle(event) {
                Ok(outcome) => outcome,
                Err(err) => {
                    warn!(handler = label, error = %err, "runtime:handler_failed");
                    DispatchOutcome::Failed
                }
            }
        })
    }

    fn handle(&mut self, event: BrowserEvent) -> Result<DispatchOutcome> {
        match event {
            BrowserEvent::Started => {
                self.hint = ActiveIndexHint::unknown();
                let windows = self.tracker.host().windows();
                self.tracker.initialize(&windows)?;
                Ok(DispatchOutcome::Applied)
            }
            BrowserEvent::TabActivated { win, tab } => {
                self.tracker.record_activation(win, tab, &mut self.hint)?;
                Ok(DispatchOutcome::Applied)
            }
            BrowserEvent::TabRemoved {
                win,
                tab,
                window_closing,
            } => {
                let replacement =
                    self.tracker
                        .record_removal(win, tab, window_closing, self.hint)?;
                Ok(DispatchOutcome::Removed(replacement))
            }
            BrowserEvent::WindowRemoved { win } => {
                self.tracker.remove_window(win)?;
                Ok(DispatchOutcome::Applied)
            }
            BrowserEvent::CommandTriggered { name } => {
                match TrackerCommand::parse(&name, self.tracker.config()) {
                    Some(TrackerCommand::SwitchTabs) => Ok(DispatchOutcome::Switch(
                        self.tracker.switch_in_focused_window()?,
                    )),
                    None => {
                        debug!(command = %name, "runtime:unknown_command");
                        Ok(DispatchOutcome::Ignored)
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BrowserEvent, DispatchOutcome, Runtime};
    use crate::config::TrackerConfig;
    use crate::integrations::memory::{MemoryBrowser, MemoryStore};
    use crate::tracker::RecentTabs;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tabrs_support::{TabId, TabIndex, WindowId};

    fn win(id: i64) -> Result<WindowId, &'static str> {
        WindowId::try_from_i64(id).ok_or("expected valid window id")
    }

    fn tab(id: i64) -> Result<TabId, &'static str> {
        TabId::try_from_i64(id).ok_or("expected valid tab id")
    }

    fn runtime() -> Result<Runtime<MemoryStore, MemoryBrowser>, &'static str> {
        let tabs = vec![tab(1)?, tab(2)?];
        let browser = MemoryBrowser::default().with_window(win(1)?, tabs, Some(tab(1)?), true);
        Ok(Runtime::new(RecentTabs::new(
            MemoryStore::default(),
            browser,
            TrackerConfig::default(),
        )))
    }

    #[test]
    fn events_decode_from_tagged_json() -> Result<(), &'static str> {
        let event: BrowserEvent =
            serde_json::from_value(json!({ "event": "tab_removed", "win": 1, "tab": 4 }))
                .map_err(|_| "expected event")?;
        assert_eq!(
            event,
            BrowserEvent::TabRemoved {
                win: win(1)?,
                tab: tab(4)?,
                window_closing: false,
            }
        );
        let negative = json!({ "event": "tab_activated", "win": -1, "tab": 4 });
        assert!(serde_json::from_value::<BrowserEvent>(negative).is_err());
        Ok(())
    }

    #[test]
    fn activation_updates_hint() -> Result<(), &'static str> {
        let mut runtime = runtime()?;
        let outcome = runtime.dispatch(BrowserEvent::TabActivated {
            win: win(1)?,
            tab: tab(2)?,
        });
        assert_eq!(outcome, DispatchOutcome::Applied);
        assert_eq!(runtime.hint().get(), Some(TabIndex::new(1)));
        Ok(())
    }

    #[test]
    fn unknown_command_is_ignored() -> Result<(), &'static str> {
        let mut runtime = runtime()?;
        let outcome = runtime.dispatch(BrowserEvent::CommandTriggered {
            name: "open-settings".to_string(),
        });
        assert_eq!(outcome, DispatchOutcome::Ignored);
        Ok(())
    }

    #[test]
    fn handler_failure_does_not_stop_later_events() -> Result<(), &'static str> {
        let mut runtime = runtime()?;
        runtime.tracker_mut().store_mut().fail_writes(true);
        let failed = runtime.dispatch(BrowserEvent::TabActivated {
            win: win(1)?,
            tab: tab(2)?,
        });
        assert_eq!(failed, DispatchOutcome::Failed);

        runtime.tracker_mut().store_mut().fail_writes(false);
        let applied = runtime.dispatch(BrowserEvent::TabActivated {
            win: win(1)?,
            tab: tab(2)?,
        });
        assert_eq!(applied, DispatchOutcome::Applied);
        assert_eq!(
            runtime
                .tracker()
                .history(win(1)?)
                .map_err(|_| "expected history")?,
            vec![tab(2)?]
        );
        Ok(())
    }

    #[test]
    fn started_resets_hint_and_seeds_table() -> Result<(), &'static str> {
        let mut runtime = runtime()?;
        let _ = runtime.dispatch(BrowserEvent::TabActivated {
            win: win(1)?,
            tab: tab(2)?,
        });
        assert_eq!(runtime.dispatch(BrowserEvent::Started), DispatchOutcome::Applied);
        assert_eq!(runtime.hint().get(), None);
        assert_eq!(
            runtime
                .tracker()
                .history(win(1)?)
                .map_err(|_| "expected history")?,
            vec![tab(1)?]
        );
        Ok(())
    }
}
