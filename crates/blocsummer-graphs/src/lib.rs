//! # Blocsummer Graphs
//!
//! Per-boulder statistics and comparison charts for Blocsummer Stats.
//!
//! [`Aggregator`] turns a daily snapshot into one [`StatTable`] per venue,
//! [`VenueComparison`] pairs today's table with yesterday's, and
//! [`VenueComparisonGraph`] draws the nine panels with plotters.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregator;
pub mod comparison;
pub mod renderer;
pub mod types;

pub use aggregator::{Aggregator, StatRow, StatRowExt, StatTable};
pub use comparison::{PanelKind, PanelSeries, Slice, VenueComparison};
pub use renderer::{BitmapRenderer, ChartRenderer, ComparisonRenderer, VenueComparisonGraph};
pub use types::*;
