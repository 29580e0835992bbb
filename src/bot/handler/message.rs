//! `sync` chat command.

use serenity::all::{Context, GuildId, Message, RoleId};

use crate::{
    data::audit_log::AuditLogRepository,
    model::sync::Initiator,
    scheduler::SchedulerState,
    state::AppState,
};

/// Recent audit records shown by `sync status`.
const STATUS_AUDIT_LINES: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncCommand {
    /// Start a run now.
    Trigger,
    /// Show whether a run is active.
    Status,
}

/// Parses `{prefix}sync` and `{prefix}sync status`.
pub fn parse_command(prefix: &str, content: &str) -> Option<SyncCommand> {
    let rest = content.trim().strip_prefix(prefix)?;
    let mut words = rest.split_whitespace();

    if !words.next()?.eq_ignore_ascii_case("sync") {
        return None;
    }

    match (words.next(), words.next()) {
        (None, _) => Some(SyncCommand::Trigger),
        (Some(arg), None) if arg.eq_ignore_ascii_case("status") => Some(SyncCommand::Status),
        _ => None,
    }
}

/// Handle message creation in a channel
pub async fn handle_message(state: &AppState, ctx: Context, message: Message) {
    if message.author.bot || message.guild_id != Some(GuildId::new(state.config.guild_id)) {
        return;
    }

    let Some(command) = parse_command(&state.config.command_prefix, &message.content) else {
        return;
    };

    let reply = match command {
        SyncCommand::Trigger => trigger(state, &ctx, &message).await,
        SyncCommand::Status => status(state).await,
    };

    if let Err(e) = message.reply(&ctx, reply).await {
        tracing::error!("Failed to reply to sync command: {:?}", e);
    }
}

async fn trigger(state: &AppState, ctx: &Context, message: &Message) -> String {
    match is_sync_admin(state, ctx, message).await {
        Ok(true) => {}
        Ok(false) => return "You need the sync admin role to start a sync.".to_string(),
        Err(e) => {
            tracing::error!("Failed to check sync admin role: {:?}", e);
            return "Could not verify your roles, try again later.".to_string();
        }
    }

    let initiator = Initiator::Manual {
        user_id: message.author.id.get(),
        name: message.author.name.clone(),
    };

    match state.scheduler.trigger_now(initiator) {
        Ok(run) => format!(
            "Sync run #{} started. The report will be posted when it finishes.",
            run.run_id
        ),
        Err(e) => e.to_string(),
    }
}

async fn is_sync_admin(
    state: &AppState,
    ctx: &Context,
    message: &Message,
) -> Result<bool, serenity::Error> {
    let admin_role = RoleId::new(state.config.admin_role_id);

    if let Some(member) = &message.member {
        return Ok(member.roles.contains(&admin_role));
    }

    let member = ctx
        .http
        .get_member(GuildId::new(state.config.guild_id), message.author.id)
        .await?;
    Ok(member.roles.contains(&admin_role))
}

async fn status(state: &AppState) -> String {
    let mut lines = vec![match state.scheduler.state() {
        SchedulerState::Idle => "No sync run is active.".to_string(),
        SchedulerState::Running(run) => format!(
            "Sync run #{} started by {} at {} is in progress.",
            run.run_id,
            run.initiator,
            run.started_at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
    }];

    match AuditLogRepository::new(&state.db)
        .get_recent(STATUS_AUDIT_LINES)
        .await
    {
        Ok(entries) if !entries.is_empty() => {
            lines.push("Recent activity:".to_string());
            lines.extend(entries.into_iter().map(|e| {
                format!(
                    "`{}` [{}] {}",
                    e.created_at.format("%m-%d %H:%M"),
                    e.level,
                    e.message
                )
            }));
        }
        Ok(_) => {}
        Err(e) => tracing::warn!("Failed to read recent audit records: {:?}", e),
    }

    lines.join("\n")
}
