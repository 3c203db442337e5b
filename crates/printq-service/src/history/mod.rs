//! Job history and reprint.

pub mod service;

pub use service::HistoryService;
