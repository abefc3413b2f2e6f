//! Marker-based extraction from the ranking fragment and profile pages.
//!
//! The site offers no structured API. Data is cut out of the markup at fixed
//! literal markers, so these functions only check that the markers they need
//! are present.

use blocsummer_common::{AscentRecord, BlocError, ParticipantId, Result};
use blocsummer_config::{CompetitionConfig, SourceConfig};
use serde_json::Value;

/// Pulls the HTML fragment out of the ranking endpoint's JSON body.
///
/// # Errors
///
/// Fails when the configured field is missing or not a string.
pub fn ranking_fragment<'a>(body: &'a Value, source: &SourceConfig) -> Result<&'a str> {
    body.get(&source.ranking_body_field)
        .and_then(Value::as_str)
        .ok_or_else(|| {
            BlocError::missing_marker(
                "Ranking response has no HTML fragment",
                source.ranking_body_field.clone(),
            )
        })
}

/// Extracts participant ids from the ranking fragment, in page order.
///
/// Every row after the row marker must contain the id marker; the token runs
/// up to the next `"` and only its last `-`-separated segment is kept.
///
/// # Errors
///
/// Fails on the first row without an id marker.
pub fn parse_participants(fragment: &str, source: &SourceConfig) -> Result<Vec<ParticipantId>> {
    fragment
        .split(source.participant_marker.as_str())
        .skip(1)
        .map(|row| {
            let (_, rest) = row
                .split_once(source.participant_id_marker.as_str())
                .ok_or_else(|| {
                    BlocError::missing_marker(
                        "Ranking row without participant id",
                        source.participant_id_marker.clone(),
                    )
                })?;
            let token = rest.split('"').next().unwrap_or_default();
            let id = token.rsplit('-').next().unwrap_or(token);
            Ok(ParticipantId(id.to_string()))
        })
        .collect()
}

/// Completion flags of one venue section of a profile page.
///
/// The section is the text between the first and second occurrence of
/// `label`. Icon fragments following `icon_prefix` map to 0 when they start
/// with `n` and to 1 otherwise. The result always has `boulder_count` entries;
/// a missing label yields all zeros and a short section is zero-padded.
pub fn parse_venue_flags(page: &str, label: &str, icon_prefix: &str, boulder_count: usize) -> Vec<u8> {
    let Some(section) = page.split(label).nth(1) else {
        return vec![0; boulder_count];
    };

    let section = section.to_lowercase();
    let prefix = icon_prefix.to_lowercase();
    let mut flags: Vec<u8> = section
        .split(prefix.as_str())
        .skip(1)
        .take(boulder_count)
        .map(|icon| u8::from(!icon.starts_with('n')))
        .collect();
    flags.resize(boulder_count, 0);
    flags
}

/// Builds the ascent record of one profile page for every configured venue.
pub fn parse_ascents(page: &str, competition: &CompetitionConfig) -> AscentRecord {
    let mut record = AscentRecord::new();
    for spec in &competition.venues {
        let flags = parse_venue_flags(
            page,
            &spec.page_label,
            &competition.source.icon_prefix,
            competition.boulder_count,
        );
        record.insert(spec.venue, flags);
    }
    record
}
