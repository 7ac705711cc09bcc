//! Tracing setup. Output goes to stderr so command output on stdout stays
//! machine-readable.

mod logger;
pub use logger::*;

pub use tracing::{debug, error, info, trace, warn};
