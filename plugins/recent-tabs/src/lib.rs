//! Per-window history of recently activated browser tabs, with "switch to the
//! previous tab" toggling that heals itself when remembered tabs disappear.
//!
//! The history rules live in a pure reducer (`machines::history`). The
//! [`RecentTabs`] tracker drives it against a [`KeyValueStore`] and a
//! [`TabHost`], and [`Runtime`] turns host events into tracker calls.

mod command;
pub mod config;
pub mod host;
pub mod integrations;
mod machines;
pub mod runtime;
mod store;
pub mod tracker;

pub use command::TrackerCommand;
pub use config::TrackerConfig;
pub use host::{Activation, KeyValueStore, TabHost, TabSlot, WindowSnapshot};
pub use machines::history::{
    DEFAULT_HISTORY_LIMIT, HistoryCommand, HistoryEffect, HistoryEvent, HistoryLimit,
    HistoryTable, HistoryTransition, StoredTable, WindowHistory, WindowSeed,
};
pub use runtime::{BrowserEvent, DispatchOutcome, Runtime};
pub use tracker::{ActiveIndexHint, RecentTabs, Replacement, SwitchOutcome};
