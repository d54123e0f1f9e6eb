//! Paginated multi-select picker.
//!
//! Organized along FP/Unix boundaries:
//! - `state`: pure data types (Picker, Action, Transition, Outcome)
//! - `update`: pure transitions
//! - `view`: pure rendering
//! - `run`: terminal effects and the event loop

pub mod run;
pub mod state;
pub mod update;
pub mod view;

pub use run::run;
pub use state::{Action, Outcome, Picker, Transition};
