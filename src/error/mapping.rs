use thiserror::Error;

/// Configuration errors in the role mapping store.
///
/// Detected when a run takes its mapping snapshot. Any of these aborts the run before a
/// single member is dispatched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// A stored role id is not a valid Discord snowflake.
    #[error("Invalid role id {role_id} in {source_table}")]
    InvalidRoleId {
        /// Table the id was read from
        source_table: &'static str,
        role_id: u64,
    },

    /// A nation mapping has an empty name after normalization.
    #[error("Nation mapping {id} has an empty nation name")]
    EmptyNationName { id: i32 },

    /// Two nation mappings normalize to the same name.
    #[error("Nation '{nation}' is mapped more than once")]
    DuplicateNation { nation: String },

    /// A town mapping has an empty town id.
    #[error("Town mapping {id} has an empty town id")]
    EmptyTownId { id: i32 },

    /// Two town mappings share a town id.
    #[error("Town '{town_id}' is mapped more than once")]
    DuplicateTown { town_id: String },

    /// Citizen or foreigner roles are configured without a home nation.
    #[error("Citizen/foreigner roles require HOME_NATION to be set")]
    StatusRolesWithoutHomeNation,

    /// No target roles are configured, so no member would ever be synced.
    #[error("No sync target roles are configured")]
    NoTargetRoles,
}
