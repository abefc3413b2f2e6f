//! Reduction of a daily snapshot into per-venue statistics tables.

use blocsummer_common::{ascent_count, Category, DailySnapshot, Venue};
use blocsummer_config::CompetitionConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of counters kept per boulder.
pub const STAT_SLOTS: usize = 9;

/// Counters of one boulder:
/// `[ascents, denominator, reached]` for all participants, then for male,
/// then for female participants.
pub type StatRow = [u32; STAT_SLOTS];

/// First slot of the all/male/female triple.
pub const fn slot_offset(category: Option<Category>) -> usize {
    match category {
        None => 0,
        Some(Category::Male) => 3,
        Some(Category::Female) => 6,
    }
}

const ASCENTS: usize = 0;
const DENOMINATOR: usize = 1;
const REACHED: usize = 2;

/// Statistics of one venue, one row per boulder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatTable {
    rows: Vec<StatRow>,
}

impl StatTable {
    /// A table of `boulder_count` zero rows.
    pub fn new(boulder_count: usize) -> Self {
        Self {
            rows: vec![[0; STAT_SLOTS]; boulder_count],
        }
    }

    /// Number of boulders.
    pub fn boulder_count(&self) -> usize {
        self.rows.len()
    }

    /// Row of the 1-based `boulder`, if in range.
    pub fn row(&self, boulder: usize) -> Option<&StatRow> {
        boulder.checked_sub(1).and_then(|i| self.rows.get(i))
    }

    /// Rows with their 1-based boulder numbers.
    pub fn rows(&self) -> impl Iterator<Item = (usize, &StatRow)> {
        self.rows.iter().enumerate().map(|(i, row)| (i + 1, row))
    }

    fn bump(&mut self, boulder: usize, category: Category, slot: usize) {
        if let Some(row) = boulder.checked_sub(1).and_then(|i| self.rows.get_mut(i)) {
            row[slot_offset(None) + slot] += 1;
            row[slot_offset(Some(category)) + slot] += 1;
        }
    }
}

/// Builds [`StatTable`]s from snapshots.
#[derive(Debug, Clone)]
pub struct Aggregator<'a> {
    competition: &'a CompetitionConfig,
}

impl<'a> Aggregator<'a> {
    /// Creates an aggregator for `competition`.
    pub const fn new(competition: &'a CompetitionConfig) -> Self {
        Self { competition }
    }

    /// One table per configured venue.
    ///
    /// Records without a single ascent are skipped. Every other record adds
    /// its ascents and its flag count to the venue its key routes to, and
    /// counts the participant in the `reached` slot of rows `1..=ascents`.
    pub fn aggregate(&self, snapshot: &DailySnapshot) -> BTreeMap<Venue, StatTable> {
        let boulders = self.competition.boulder_count;
        let mut tables: BTreeMap<Venue, StatTable> = self
            .competition
            .venues
            .iter()
            .map(|spec| (spec.venue, StatTable::new(boulders)))
            .collect();

        for (category, _, record) in snapshot.records() {
            for (key, flags) in record.iter() {
                let total = ascent_count(flags);
                if total == 0 {
                    continue;
                }

                let table = tables
                    .entry(self.competition.route_venue(key))
                    .or_insert_with(|| StatTable::new(boulders));

                for (i, &flag) in flags.iter().enumerate() {
                    if flag != 0 {
                        table.bump(i + 1, category, ASCENTS);
                    }
                    table.bump(i + 1, category, DENOMINATOR);
                }
                for n in 1..=total.min(boulders) {
                    table.bump(n, category, REACHED);
                }
            }
        }

        tables
    }
}

/// Slot accessors for readability at call sites.
pub trait StatRowExt {
    /// Ascent count of the slice starting at `offset`.
    fn ascents(&self, offset: usize) -> u32;
    /// Denominator of the slice starting at `offset`.
    fn denominator(&self, offset: usize) -> u32;
    /// Reached-at-least count of the slice starting at `offset`.
    fn reached(&self, offset: usize) -> u32;
}

impl StatRowExt for StatRow {
    fn ascents(&self, offset: usize) -> u32 {
        self[offset + ASCENTS]
    }

    fn denominator(&self, offset: usize) -> u32 {
        self[offset + DENOMINATOR]
    }

    fn reached(&self, offset: usize) -> u32 {
        self[offset + REACHED]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blocsummer_common::test_utils::snapshot_fixtures::{busy_day, flags, record, two_climbers};
    use blocsummer_common::{AscentRecord, ParticipantId};
    use proptest::prelude::*;

    fn competition() -> CompetitionConfig {
        CompetitionConfig::default()
    }

    #[test]
    fn test_two_climbers_example() {
        let competition = competition();
        let tables = Aggregator::new(&competition).aggregate(&two_climbers());
        let blockhouse = &tables[&Venue::Blockhouse];

        let first = blockhouse.row(1).unwrap();
        assert_eq!(first.ascents(0), 1);
        assert_eq!(first.ascents(3), 1);
        assert_eq!(first.ascents(6), 0);
        // The all-zero female record is skipped, denominators included.
        assert_eq!(first.denominator(0), 1);
        assert_eq!(first.denominator(6), 0);

        assert_eq!(blockhouse.row(2).unwrap().reached(0), 1);
        assert_eq!(blockhouse.row(3).unwrap().reached(0), 0);
        assert_eq!(blockhouse.row(2).unwrap().ascents(0), 0);
        assert_eq!(blockhouse.row(3).unwrap().ascents(0), 1);

        assert!(tables[&Venue::Newton].rows().all(|(_, row)| *row == [0; STAT_SLOTS]));
    }

    #[test]
    fn test_every_venue_gets_a_table() {
        let competition = competition();
        let tables = Aggregator::new(&competition).aggregate(&DailySnapshot::new());
        assert_eq!(tables.len(), 3);
        assert_eq!(tables[&Venue::Boulderclub].boulder_count(), 40);
        assert!(tables[&Venue::Boulderclub].row(0).is_none());
        assert!(tables[&Venue::Boulderclub].row(41).is_none());
    }

    #[test]
    fn test_category_slots_sum_to_overall() {
        let competition = competition();
        let tables = Aggregator::new(&competition).aggregate(&busy_day());

        for table in tables.values() {
            for (_, row) in table.rows() {
                for slot in 0..3 {
                    assert_eq!(row[slot], row[3 + slot] + row[6 + slot]);
                }
            }
        }

        let newton = &tables[&Venue::Newton];
        // male 1001 with one ascent, female 2002 with seven
        assert_eq!(newton.row(1).unwrap().reached(0), 2);
        assert_eq!(newton.row(2).unwrap().reached(0), 1);
        assert_eq!(newton.row(7).unwrap().reached(6), 1);
        assert_eq!(newton.row(8).unwrap().reached(0), 0);
        assert_eq!(newton.row(40).unwrap().ascents(6), 1);
    }

    #[test]
    fn test_substring_routing() {
        let competition = competition();
        let mut raw = AscentRecord::new();
        raw.insert_raw("the blocks", flags(&[1]));
        raw.insert_raw("Bouldering-Club", flags(&[2]));
        raw.insert_raw("somewhere else", flags(&[3]));

        let mut snapshot = DailySnapshot::new();
        snapshot.insert(Category::Male, ParticipantId::from("1"), raw);

        let tables = Aggregator::new(&competition).aggregate(&snapshot);
        assert_eq!(tables[&Venue::Blockhouse].row(1).unwrap().ascents(0), 1);
        // "Bouldering-Club" has no lowercase "bould" and falls through
        assert_eq!(tables[&Venue::Newton].row(2).unwrap().ascents(0), 1);
        assert_eq!(tables[&Venue::Newton].row(3).unwrap().ascents(0), 1);
        assert_eq!(tables[&Venue::Boulderclub].row(2).unwrap().ascents(0), 0);
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let competition = competition();
        let aggregator = Aggregator::new(&competition);
        let snapshot = busy_day();
        assert_eq!(aggregator.aggregate(&snapshot), aggregator.aggregate(&snapshot));
    }

    fn arb_snapshot() -> impl Strategy<Value = DailySnapshot> {
        let climbed = proptest::collection::btree_set(1usize..=40, 0..20);
        let venue = prop_oneof![
            Just(Venue::Blockhouse),
            Just(Venue::Boulderclub),
            Just(Venue::Newton)
        ];
        let participant = (any::<bool>(), venue, climbed);
        proptest::collection::vec(participant, 0..12).prop_map(|people| {
            let mut snapshot = DailySnapshot::new();
            for (i, (male, venue, climbed)) in people.into_iter().enumerate() {
                let category = if male { Category::Male } else { Category::Female };
                let boulders: Vec<usize> = climbed.into_iter().collect();
                snapshot.insert(
                    category,
                    ParticipantId(i.to_string()),
                    record(&[(venue, boulders.as_slice())]),
                );
            }
            snapshot
        })
    }

    proptest! {
        #[test]
        fn prop_reached_counts_never_increase(snapshot in arb_snapshot()) {
            let competition = competition();
            let tables = Aggregator::new(&competition).aggregate(&snapshot);
            for table in tables.values() {
                for offset in [0, 3, 6] {
                    let reached: Vec<u32> = table.rows().map(|(_, row)| row.reached(offset)).collect();
                    prop_assert!(reached.windows(2).all(|w| w[0] >= w[1]));
                }
            }
        }

        #[test]
        fn prop_denominator_counts_active_records(snapshot in arb_snapshot()) {
            let competition = competition();
            let tables = Aggregator::new(&competition).aggregate(&snapshot);
            let active = snapshot
                .records()
                .flat_map(|(_, _, record)| record.iter().map(|(_, flags)| ascent_count(flags)))
                .filter(|&total| total > 0)
                .count();
            let denominators: u32 = tables.values().map(|t| t.row(1).map_or(0, |r| r.denominator(0))).sum();
            prop_assert_eq!(denominators as usize, active);
        }
    }
}
