//! Domain types shared across the workspace.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::BlocError;

/// Competitor demographic grouping used for fetching and stat slicing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Male ranking class
    Male,
    /// Female ranking class
    Female,
}

impl Category {
    /// Every category, in fetch order.
    pub const ALL: [Self; 2] = [Self::Male, Self::Female];

    /// Lowercase name, as used in snapshot files.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the three climbing gyms tracked independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Venue {
    /// BLOC house
    Blockhouse,
    /// Boulderclub
    Boulderclub,
    /// Newton
    Newton,
}

impl Venue {
    /// Every venue, in page order.
    pub const ALL: [Self; 3] = [Self::Blockhouse, Self::Boulderclub, Self::Newton];

    /// Slug used as snapshot key and in chart file names.
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Blockhouse => "blockhouse",
            Self::Boulderclub => "boulderclub",
            Self::Newton => "newton",
        }
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Venue {
    type Err = BlocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|venue| venue.slug() == s)
            .ok_or_else(|| BlocError::parse(format!("Unknown venue: {s}")))
    }
}

/// Opaque competitor token scraped from the ranking markup.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub String);

impl ParticipantId {
    /// Borrow the raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Per-venue completion flags of a single participant.
///
/// Keys are venue names as found in the snapshot file. Fetched records always
/// use [`Venue::slug`] keys, but records loaded from disk are kept verbatim so
/// that venue routing stays a property of the aggregation step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AscentRecord(BTreeMap<String, Vec<u8>>);

impl AscentRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the flags of a venue, replacing previous flags.
    pub fn insert(&mut self, venue: Venue, flags: Vec<u8>) {
        self.0.insert(venue.slug().to_string(), flags);
    }

    /// Stores flags under an arbitrary venue key.
    pub fn insert_raw(&mut self, key: impl Into<String>, flags: Vec<u8>) {
        self.0.insert(key.into(), flags);
    }

    /// Flags of a venue, if present.
    pub fn flags(&self, venue: Venue) -> Option<&[u8]> {
        self.0.get(venue.slug()).map(Vec::as_slice)
    }

    /// Iterates over `(venue key, flags)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.0.iter().map(|(key, flags)| (key.as_str(), flags.as_slice()))
    }

    /// Number of venue entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the record has no venue entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Total number of set flags.
pub fn ascent_count(flags: &[u8]) -> usize {
    flags.iter().filter(|&&flag| flag != 0).count()
}

/// All ascent data of all participants on one calendar day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailySnapshot(BTreeMap<Category, BTreeMap<ParticipantId, AscentRecord>>);

impl DailySnapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a participant record; an existing record is replaced.
    pub fn insert(&mut self, category: Category, participant: ParticipantId, record: AscentRecord) {
        self.0.entry(category).or_default().insert(participant, record);
    }

    /// Makes sure a category is present even if it ends up with no participants.
    pub fn ensure_category(&mut self, category: Category) {
        self.0.entry(category).or_default();
    }

    /// Participants of a category.
    pub fn participants(&self, category: Category) -> Option<&BTreeMap<ParticipantId, AscentRecord>> {
        self.0.get(&category)
    }

    /// Iterates over `(category, participant, record)` triples.
    pub fn records(&self) -> impl Iterator<Item = (Category, &ParticipantId, &AscentRecord)> {
        self.0.iter().flat_map(|(category, participants)| {
            participants
                .iter()
                .map(move |(participant, record)| (*category, participant, record))
        })
    }

    /// Number of participants over all categories.
    pub fn participant_count(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }
}
