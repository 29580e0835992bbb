//! Chat platform boundary.
//!
//! Everything the pipeline needs from Discord goes through `ChatPlatform`, implemented
//! for production by `SerenityPlatform`.

pub mod discord;

use serenity::async_trait;
use std::{collections::BTreeSet, path::Path};

use crate::{
    error::platform::PlatformError,
    model::{member::Member, report::Digest, role_diff::RoleDiff},
};

pub use self::discord::SerenityPlatform;

#[async_trait]
pub trait ChatPlatform: Send + Sync + 'static {
    /// Lists every non-bot member of the guild with their current roles.
    async fn list_members(&self) -> Result<Vec<Member>, PlatformError>;

    /// Fetches a member's current roles.
    async fn current_roles(&self, member_id: u64) -> Result<BTreeSet<u64>, PlatformError>;

    /// Adds and removes roles for one member.
    async fn apply_role_diff(&self, diff: &RoleDiff) -> Result<(), PlatformError>;

    /// Posts a run digest to a channel.
    async fn post_message(&self, channel_id: u64, digest: &Digest) -> Result<(), PlatformError>;

    /// Uploads a file to a channel.
    async fn upload_file(&self, channel_id: u64, path: &Path) -> Result<(), PlatformError>;
}
