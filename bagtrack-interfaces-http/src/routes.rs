pub mod baggage;

pub use baggage::*;
