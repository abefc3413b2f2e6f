//! Today-versus-yesterday series for the nine panels of a venue chart.

use crate::aggregator::{slot_offset, StatRow, StatRowExt, StatTable};
use blocsummer_common::{Category, Venue};
use serde::{Deserialize, Serialize};

/// Participant subset shown by a row of panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Slice {
    /// Everybody.
    All,
    /// Male participants.
    Male,
    /// Female participants.
    Female,
}

impl Slice {
    /// Slices in row order.
    pub const ALL: [Self; 3] = [Self::All, Self::Male, Self::Female];

    /// First stat slot of the slice.
    pub const fn offset(self) -> usize {
        match self {
            Self::All => slot_offset(None),
            Self::Male => slot_offset(Some(Category::Male)),
            Self::Female => slot_offset(Some(Category::Female)),
        }
    }

    /// Row title.
    pub const fn title(self) -> &'static str {
        match self {
            Self::All => "alle",
            Self::Male => "männlich",
            Self::Female => "weiblich",
        }
    }
}

/// What a panel plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanelKind {
    /// Ascent counts, boulders sorted by today's count.
    Absolute,
    /// Ascents per hundred active participants, same order.
    Relative,
    /// Share of participants with at least N ascents, natural order.
    Reached,
}

impl PanelKind {
    /// Panels in column order.
    pub const ALL: [Self; 3] = [Self::Absolute, Self::Relative, Self::Reached];

    /// Column title.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Absolute => "absolut",
            Self::Relative => "relativ",
            Self::Reached => "Anzahl",
        }
    }

    /// Fixed y range, if the panel has one.
    pub const fn fixed_range(self) -> Option<(f64, f64)> {
        match self {
            Self::Reached => Some((0.0, 100.0)),
            _ => None,
        }
    }
}

/// Paired bar data of one panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelSeries {
    /// Column kind.
    pub kind: PanelKind,
    /// Row slice.
    pub slice: Slice,
    /// Boulder labels in plotting order.
    pub labels: Vec<String>,
    /// Today's values.
    pub today: Vec<f64>,
    /// Yesterday's values, same order.
    pub yesterday: Vec<f64>,
}

impl PanelSeries {
    /// Panel caption, e.g. `männlich absolut`.
    pub fn title(&self) -> String {
        format!("{} {}", self.slice.title(), self.kind.title())
    }

    /// Largest value of either day.
    pub fn max_value(&self) -> f64 {
        self.today
            .iter()
            .chain(&self.yesterday)
            .copied()
            .fold(0.0, f64::max)
    }
}

/// All nine panels of one venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueComparison {
    /// The venue, used as the chart title.
    pub venue: Venue,
    /// Panels row by row: all, male, female; each absolute, relative, reached.
    pub panels: Vec<PanelSeries>,
}

fn percent(part: u32, denominator: u32) -> f64 {
    f64::from(part) * 100.0 / f64::from(denominator.max(1))
}

fn value(kind: PanelKind, row: &StatRow, offset: usize) -> f64 {
    match kind {
        PanelKind::Absolute => f64::from(row.ascents(offset)),
        PanelKind::Relative => percent(row.ascents(offset), row.denominator(offset)),
        PanelKind::Reached => percent(row.reached(offset), row.denominator(offset)),
    }
}

impl VenueComparison {
    /// Builds the panels from both days' tables.
    ///
    /// Absolute and relative panels order boulders by today's ascent count,
    /// descending, ties in boulder order. Yesterday follows today's order.
    pub fn build(venue: Venue, today: &StatTable, yesterday: &StatTable) -> Self {
        let mut panels = Vec::with_capacity(PanelKind::ALL.len() * Slice::ALL.len());

        for slice in Slice::ALL {
            for kind in PanelKind::ALL {
                let offset = slice.offset();
                let mut order: Vec<usize> = today.rows().map(|(boulder, _)| boulder).collect();
                if kind != PanelKind::Reached {
                    // stable: equal counts keep boulder order
                    order.sort_by_key(|&b| {
                        std::cmp::Reverse(today.row(b).map_or(0, |row| row.ascents(offset)))
                    });
                }

                let series = |table: &StatTable| -> Vec<f64> {
                    order
                        .iter()
                        .map(|&b| table.row(b).map_or(0.0, |row| value(kind, row, offset)))
                        .collect()
                };

                panels.push(PanelSeries {
                    kind,
                    slice,
                    labels: order.iter().map(ToString::to_string).collect(),
                    today: series(today),
                    yesterday: series(yesterday),
                });
            }
        }

        Self { venue, panels }
    }

    /// Panel of the given row and column.
    pub fn panel(&self, kind: PanelKind, slice: Slice) -> Option<&PanelSeries> {
        self.panels
            .iter()
            .find(|panel| panel.kind == kind && panel.slice == slice)
    }
}
