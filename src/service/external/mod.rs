//! External game API boundary.
//!
//! The sync pipeline only talks to the game API through `AffiliationClient`, so tests can
//! substitute an instrumented fake.

pub mod planet_earth;

use serenity::async_trait;

use crate::{
    error::external::ExternalError,
    model::{affiliation::Affiliation, member::LinkedIdentity},
};

pub use planet_earth::PlanetEarthClient;

/// Looks up a member's in-game identity and affiliation.
#[async_trait]
pub trait AffiliationClient: Send + Sync + 'static {
    /// Resolves the game account linked to a Discord member.
    ///
    /// # Returns
    /// - `Ok(Some(LinkedIdentity))` - The member has a linked account
    /// - `Ok(None)` - The member has no linked account
    /// - `Err(ExternalError)` - The lookup failed
    async fn resolve_identity(&self, member_id: u64) -> Result<Option<LinkedIdentity>, ExternalError>;

    /// Looks up the current nation and town of a linked account.
    ///
    /// # Returns
    /// - `Ok(Affiliation)` - Current affiliation
    /// - `Err(ExternalError::NotFound)` - The API has no such resident
    /// - `Err(ExternalError)` - Any other failure; see `ExternalError::is_transient`
    async fn lookup_affiliation(&self, identity: &LinkedIdentity) -> Result<Affiliation, ExternalError>;
}
