//! `ChatPlatform` implementation over the Serenity HTTP client.

use serenity::{
    all::{
        ChannelId, CreateAttachment, CreateEmbed, CreateEmbedFooter, CreateMessage, GuildId,
        RoleId, UserId,
    },
    async_trait,
    http::{Http, HttpError},
};
use std::{collections::BTreeSet, path::Path, sync::Arc};

use crate::{
    error::platform::PlatformError,
    model::{member::Member, report::Digest, role_diff::RoleDiff},
    service::platform::ChatPlatform,
};

/// Discord caps member list pages at 1000.
const MEMBER_PAGE_SIZE: u64 = 1000;
const AUDIT_REASON: &str = "Role sync";

/// Discord access for a single guild.
#[derive(Clone)]
pub struct SerenityPlatform {
    http: Arc<Http>,
    guild_id: GuildId,
}

impl SerenityPlatform {
    pub fn new(http: Arc<Http>, guild_id: u64) -> Self {
        Self {
            http,
            guild_id: GuildId::new(guild_id),
        }
    }
}

#[async_trait]
impl ChatPlatform for SerenityPlatform {
    async fn list_members(&self) -> Result<Vec<Member>, PlatformError> {
        let mut members = Vec::new();
        let mut after: Option<u64> = None;

        loop {
            let page = self
                .http
                .get_guild_members(self.guild_id, Some(MEMBER_PAGE_SIZE), after)
                .await
                .map_err(|e| map_error(e, None))?;

            let page_len = page.len() as u64;
            after = page.last().map(|m| m.user.id.get());

            members.extend(
                page.into_iter()
                    .filter(|m| !m.user.bot)
                    .map(|m| Member {
                        id: m.user.id.get(),
                        display_name: m.display_name().to_string(),
                        linked: None,
                        current_roles: m.roles.iter().map(|r| r.get()).collect(),
                        last_synced_at: None,
                    }),
            );

            if page_len < MEMBER_PAGE_SIZE || after.is_none() {
                break;
            }
        }

        tracing::debug!(
            "Fetched {} members for guild {}",
            members.len(),
            self.guild_id
        );

        Ok(members)
    }

    async fn current_roles(&self, member_id: u64) -> Result<BTreeSet<u64>, PlatformError> {
        let member = self
            .http
            .get_member(self.guild_id, UserId::new(member_id))
            .await
            .map_err(|e| map_error(e, Some(member_id)))?;

        Ok(member.roles.iter().map(|r| r.get()).collect())
    }

    async fn apply_role_diff(&self, diff: &RoleDiff) -> Result<(), PlatformError> {
        let user_id = UserId::new(diff.member_id);

        for role_id in &diff.to_remove {
            self.http
                .remove_member_role(
                    self.guild_id,
                    user_id,
                    RoleId::new(*role_id),
                    Some(AUDIT_REASON),
                )
                .await
                .map_err(|e| map_error(e, Some(diff.member_id)))?;
        }

        for role_id in &diff.to_add {
            self.http
                .add_member_role(
                    self.guild_id,
                    user_id,
                    RoleId::new(*role_id),
                    Some(AUDIT_REASON),
                )
                .await
                .map_err(|e| map_error(e, Some(diff.member_id)))?;
        }

        Ok(())
    }

    async fn post_message(&self, channel_id: u64, digest: &Digest) -> Result<(), PlatformError> {
        let mut embed = CreateEmbed::new()
            .title(&digest.title)
            .description(&digest.description)
            .color(digest.color)
            .footer(CreateEmbedFooter::new(&digest.footer));
        for field in &digest.fields {
            embed = embed.field(&field.name, &field.value, field.inline);
        }

        ChannelId::new(channel_id)
            .send_message(&self.http, CreateMessage::new().embed(embed))
            .await
            .map_err(|e| map_error(e, None))?;

        Ok(())
    }

    async fn upload_file(&self, channel_id: u64, path: &Path) -> Result<(), PlatformError> {
        let attachment = CreateAttachment::path(path)
            .await
            .map_err(|e| PlatformError::Io(into_io(e)))?;

        ChannelId::new(channel_id)
            .send_message(&self.http, CreateMessage::new().add_file(attachment))
            .await
            .map_err(|e| map_error(e, None))?;

        Ok(())
    }
}

/// Maps a Serenity error onto the platform error taxonomy.
///
/// `member_id` turns a 404 into `MemberNotFound` for member-scoped calls.
fn map_error(err: serenity::Error, member_id: Option<u64>) -> PlatformError {
    let status = match &err {
        serenity::Error::Http(HttpError::Request(e)) => {
            return PlatformError::Network(e.to_string())
        }
        serenity::Error::Io(e) => return PlatformError::Network(e.to_string()),
        serenity::Error::Http(http_err) => http_status(http_err),
        _ => None,
    };

    match (status, member_id) {
        (Some(404), Some(id)) => PlatformError::MemberNotFound(id),
        (Some(403), _) => PlatformError::Forbidden(err.to_string()),
        (Some(status), _) if status == 429 || status >= 500 => PlatformError::Unavailable {
            status,
            retry_after: None,
        },
        _ => PlatformError::Discord(Box::new(err)),
    }
}

fn http_status(err: &HttpError) -> Option<u16> {
    err.status_code().map(|s| s.as_u16())
}

fn into_io(err: serenity::Error) -> std::io::Error {
    match err {
        serenity::Error::Io(e) => e,
        other => std::io::Error::other(other.to_string()),
    }
}
