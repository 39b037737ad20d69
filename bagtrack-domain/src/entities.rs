// Domain entities

pub mod config;
pub mod queries;
pub mod scan_event;
pub mod views;

pub use config::*;
pub use queries::*;
pub use scan_event::*;
pub use views::*;
