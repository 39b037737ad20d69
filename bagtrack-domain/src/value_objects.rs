// Domain value objects
pub mod storage_backend;
pub mod time_window;

pub use storage_backend::*;
pub use time_window::*;
