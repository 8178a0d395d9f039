//! Tagged entity identifiers.
//!
//! A vessel shown on the map can come from four places: a recorded track,
//! the live feed, a recorded track mirrored into the forecast half of the
//! slider, or a purely synthetic forecast entity. Mirrored and synthetic
//! entities frequently reuse the base name of a recorded vessel, so the
//! source is carried as a tag next to the name instead of being encoded as
//! a string prefix.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::EntityKind;

/// Identity of a vessel in an output frame.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EntityId {
    /// Where the entity comes from.
    pub kind: EntityKind,
    /// Base name of the entity (vessel name, scripted path id, ...).
    pub id: String,
}

impl EntityId {
    /// Identifier of a vessel reconstructed from a recorded track.
    pub fn historical(id: impl Into<String>) -> Self {
        Self {
            kind: EntityKind::Historical,
            id: id.into(),
        }
    }

    /// Identifier of a vessel reported by the live feed.
    pub fn live(id: impl Into<String>) -> Self {
        Self {
            kind: EntityKind::Live,
            id: id.into(),
        }
    }

    /// Identifier of a recorded vessel mirrored into the forecast.
    pub fn mirrored(id: impl Into<String>) -> Self {
        Self {
            kind: EntityKind::MirroredFuture,
            id: id.into(),
        }
    }

    /// Identifier of a purely synthetic forecast entity.
    pub fn synthetic(id: impl Into<String>) -> Self {
        Self {
            kind: EntityKind::SyntheticFuture,
            id: id.into(),
        }
    }

    /// Whether the entity only exists in the forecast half of the slider.
    pub const fn is_forecast(&self) -> bool {
        matches!(
            self.kind,
            EntityKind::MirroredFuture | EntityKind::SyntheticFuture
        )
    }
}

impl core::fmt::Display for EntityId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}:{}", self.kind.as_str(), self.id)
    }
}
