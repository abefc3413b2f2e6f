//! # Blocsummer Scraper
//!
//! Fetches the competition ranking and every participant's ascent flags, and
//! keeps one JSON snapshot per calendar day on disk.
//!
//! The parsing strategy lives behind [`ParticipantSource`] and
//! [`AscentSource`]; [`BoulderTopClient`] is the marker-based implementation
//! for the live site.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod parse;
pub mod snapshot;
pub mod traits;

pub use client::*;
pub use snapshot::*;
pub use traits::*;
