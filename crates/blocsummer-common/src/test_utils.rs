//! Test utilities and shared fixtures for the Blocsummer workspace.
//!
//! Available to other crates through the `testing` feature.

use crate::types::{AscentRecord, Category, DailySnapshot, ParticipantId, Venue};

/// Number of boulders per venue used by the fixtures.
pub const FIXTURE_BOULDERS: usize = 40;

/// Create a temporary directory that is removed on drop.
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Snapshot fixtures.
pub mod snapshot_fixtures {
    use super::*;

    /// A 40-flag sequence with the given 1-based boulders climbed.
    pub fn flags(climbed: &[usize]) -> Vec<u8> {
        let mut flags = vec![0; FIXTURE_BOULDERS];
        for &boulder in climbed {
            flags[boulder - 1] = 1;
        }
        flags
    }

    /// A record with flags for every venue; venues not listed are all zero.
    pub fn record(climbed: &[(Venue, &[usize])]) -> AscentRecord {
        let mut record = AscentRecord::new();
        for venue in Venue::ALL {
            let boulders = climbed
                .iter()
                .find(|(v, _)| *v == venue)
                .map_or(&[][..], |(_, boulders)| *boulders);
            record.insert(venue, flags(boulders));
        }
        record
    }

    /// One male climber with blockhouse boulders 1 and 3, one female climber
    /// with no ascents at all.
    pub fn two_climbers() -> DailySnapshot {
        let mut snapshot = DailySnapshot::new();
        snapshot.insert(
            Category::Male,
            ParticipantId::from("1001"),
            record(&[(Venue::Blockhouse, &[1, 3])]),
        );
        snapshot.insert(Category::Female, ParticipantId::from("2001"), record(&[]));
        snapshot
    }

    /// A larger mixed snapshot touching every venue and both categories.
    pub fn busy_day() -> DailySnapshot {
        let mut snapshot = DailySnapshot::new();
        snapshot.insert(
            Category::Male,
            ParticipantId::from("1001"),
            record(&[(Venue::Blockhouse, &[1, 2, 3, 4]), (Venue::Newton, &[10])]),
        );
        snapshot.insert(
            Category::Male,
            ParticipantId::from("1002"),
            record(&[(Venue::Boulderclub, &[1, 5, 40])]),
        );
        snapshot.insert(
            Category::Female,
            ParticipantId::from("2001"),
            record(&[(Venue::Blockhouse, &[2, 3]), (Venue::Boulderclub, &[1])]),
        );
        snapshot.insert(
            Category::Female,
            ParticipantId::from("2002"),
            record(&[(Venue::Newton, &[1, 2, 3, 10, 20, 30, 40])]),
        );
        snapshot
    }
}
