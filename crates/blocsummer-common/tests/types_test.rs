//! Tests for the snapshot data model in blocsummer-common crate.
//!
//! Covers:
//! - snapshot file shape and round-tripping through JSON
//! - venue and category naming
//! - date-stamped file names

use blocsummer_common::*;
use chrono::NaiveDate;
use proptest::prelude::*;

fn flags(climbed: &[usize]) -> Vec<u8> {
    let mut flags = vec![0; 40];
    for &boulder in climbed {
        flags[boulder - 1] = 1;
    }
    flags
}

fn record(climbed: &[(Venue, &[usize])]) -> AscentRecord {
    let mut record = AscentRecord::new();
    for venue in Venue::ALL {
        let boulders = climbed
            .iter()
            .find(|(v, _)| *v == venue)
            .map_or(&[][..], |(_, b)| *b);
        record.insert(venue, flags(boulders));
    }
    record
}

#[test]
fn test_snapshot_file_shape() {
    let mut snapshot = DailySnapshot::new();
    snapshot.ensure_category(Category::Female);
    snapshot.insert(
        Category::Male,
        ParticipantId::from("4711"),
        record(&[(Venue::Blockhouse, &[1, 3])]),
    );

    let json: serde_json::Value = serde_json::to_value(&snapshot).unwrap();
    let male = &json["male"]["4711"];
    assert_eq!(male["blockhouse"].as_array().unwrap().len(), 40);
    assert_eq!(male["blockhouse"][0], 1);
    assert_eq!(male["blockhouse"][1], 0);
    assert_eq!(male["boulderclub"][0], 0);
    assert!(json["female"].as_object().unwrap().is_empty());
}

#[test]
fn test_snapshot_survives_a_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(snapshot_file_name(NaiveDate::from_ymd_opt(2025, 7, 14).unwrap()));
    let mut snapshot = DailySnapshot::new();
    snapshot.insert(Category::Male, ParticipantId::from("1001"), record(&[(Venue::Newton, &[10])]));
    snapshot.insert(Category::Male, ParticipantId::from("1002"), record(&[]));
    snapshot.insert(
        Category::Female,
        ParticipantId::from("2001"),
        record(&[(Venue::Blockhouse, &[2, 3]), (Venue::Boulderclub, &[1])]),
    );

    std::fs::write(&path, serde_json::to_string(&snapshot).unwrap()).unwrap();
    let loaded: DailySnapshot =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

    assert_eq!(loaded, snapshot);
    assert_eq!(loaded.participant_count(), 3);
}

#[test]
fn test_unknown_venue_keys_are_kept_verbatim() {
    let raw = r#"{"male":{"1":{"blochouse":[1,0,1]}}}"#;
    let snapshot: DailySnapshot = serde_json::from_str(raw).unwrap();

    let (_, _, record) = snapshot.records().next().unwrap();
    let (key, flags) = record.iter().next().unwrap();
    assert_eq!(key, "blochouse");
    assert_eq!(ascent_count(flags), 2);
    assert!(record.flags(Venue::Blockhouse).is_none());
}

#[test]
fn test_venue_names() {
    for venue in Venue::ALL {
        assert_eq!(venue.slug().parse::<Venue>().unwrap(), venue);
        assert_eq!(
            serde_json::to_string(&venue).unwrap(),
            format!("\"{}\"", venue.slug())
        );
    }
    assert!("BLOC house".parse::<Venue>().is_err());
    assert_eq!(Category::Female.to_string(), "female");
}

#[test]
fn test_ascent_count() {
    assert_eq!(ascent_count(&flags(&[1, 40])), 2);
    assert_eq!(ascent_count(&[]), 0);
}

proptest! {
    #[test]
    fn prop_previous_day_is_one_day_earlier(days in 1i64..200_000) {
        let date = NaiveDate::from_ymd_opt(1, 1, 1).unwrap() + chrono::Duration::days(days);
        let before = previous_day(date);
        prop_assert_eq!(date.signed_duration_since(before).num_days(), 1);
        prop_assert_eq!(date_stamp(date).len(), 10);
        prop_assert!(chart_file_name(date, Venue::Newton).starts_with(&date_stamp(date)));
    }
}
