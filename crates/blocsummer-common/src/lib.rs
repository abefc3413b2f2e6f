//! # Blocsummer Common
//!
//! Shared types, utilities, and common functionality for Blocsummer Stats.
//!
//! This crate provides the domain model (categories, venues, ascent records,
//! daily snapshots), the workspace-wide error type, and the tracing setup
//! used by every other crate in the workspace.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::{BlocError, Result};
pub use logging::{init_logging, with_bootstrap_logging, LogFormat, LoggingConfig};
pub use types::*;
pub use utils::*;
