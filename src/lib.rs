//! telesend: pick recipients from a paginated terminal checklist and send them a file.

pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod pagination;
pub mod report;
pub mod tui;
pub mod types;
