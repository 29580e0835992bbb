use chrono::{DateTime, Utc};

/// A resident's nation and town membership as reported by the game API.
///
/// Residents without a nation or town are valid; the missing side simply resolves to no
/// role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Affiliation {
    pub nation: Option<String>,
    pub nation_id: Option<String>,
    pub town: Option<String>,
    /// Stable town identifier used for town role lookups.
    pub town_id: Option<String>,
    pub nation_ranks: Vec<String>,
    pub town_ranks: Vec<String>,
    pub last_online: Option<DateTime<Utc>>,
}

impl Affiliation {
    /// Whole days since the resident was last online, relative to `now`.
    pub fn days_offline(&self, now: DateTime<Utc>) -> Option<i64> {
        self.last_online
            .map(|last| (now - last).num_days().max(0))
    }
}
