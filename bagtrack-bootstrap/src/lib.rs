pub mod context;
pub mod lifecycle;
pub mod logging;

pub use context::{open_scan_repository, AppContext};
pub use lifecycle::{build_app, run_standalone, serve};
