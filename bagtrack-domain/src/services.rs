// Read-side folds over the scan log

pub mod aggregation;

pub use aggregation::*;
