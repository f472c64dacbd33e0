mod events;
mod reducer;
mod state;

pub use events::{HistoryCommand, HistoryEffect, HistoryEvent, HistoryTransition, WindowSeed};
pub use state::{DEFAULT_HISTORY_LIMIT, HistoryLimit, HistoryTable, StoredTable, WindowHistory};
