use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::LaptopId;

/// A laptop the user has saved
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FavoriteEntry {
    pub id: LaptopId,
    /// Whether the entry is part of the current comparison
    pub selected: bool,
    pub added_at: DateTime<Utc>,
}

impl FavoriteEntry {
    /// Creates an unselected entry stamped with the current time
    pub fn new(id: LaptopId) -> Self {
        Self {
            id,
            selected: false,
            added_at: Utc::now(),
        }
    }
}

/// Whether side-by-side comparison is active
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMode {
    #[default]
    Idle,
    Comparing,
}

/// Serializable favorites state, in favoriting order
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FavoritesSnapshot {
    pub entries: Vec<FavoriteEntry>,
}
