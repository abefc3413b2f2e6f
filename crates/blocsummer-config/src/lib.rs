//! # Blocsummer Config
//!
//! Type-safe configuration for Blocsummer Stats.
//!
//! Runtime settings (paths, schedule, logging, HTTP) come from an optional
//! TOML file plus environment overrides. The competition description (venues,
//! categories, boulder count, endpoints and markup markers) is fixed and
//! always taken from [`CompetitionConfig::default`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::*;
pub use schema::*;
pub use validator::*;
