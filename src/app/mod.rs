pub mod app;
pub mod calc;
pub mod format;
pub mod harvest;
pub mod table;
pub mod ui;

pub use app::{App, Flow};
pub use harvest::{HarvestAction, HarvestState, HarvestSummary, SelectionState};
pub use table::{HoldingsView, SortDirection, SortKey};
