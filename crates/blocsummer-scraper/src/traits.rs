//! Capability traits for the data sources.

use async_trait::async_trait;
use blocsummer_common::{AscentRecord, Category, ParticipantId, Result};

/// Lists the competitors of a ranking class.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ParticipantSource: Send + Sync {
    /// Participant ids of `category`, in ranking order.
    async fn participants(&self, category: Category) -> Result<Vec<ParticipantId>>;
}

/// Reads one competitor's per-venue completion flags.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AscentSource: Send + Sync {
    /// Flags of `participant` for every configured venue.
    ///
    /// Every venue entry holds exactly `boulder_count` flags of 0 or 1.
    async fn ascents(&self, participant: &ParticipantId, category: Category) -> Result<AscentRecord>;
}
