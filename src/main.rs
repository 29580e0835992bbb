mod bot;
mod config;
mod data;
mod error;
mod model;
mod scheduler;
mod service;
mod startup;
mod state;
mod util;

use serenity::http::Http;
use std::sync::Arc;

use crate::{
    config::Config,
    error::AppError,
    scheduler::{weekly, SyncScheduler},
    service::{
        audit::{AuditSink, DatabaseAuditSink},
        external::{planet_earth, PlanetEarthClient},
        platform::SerenityPlatform,
        report::ReportService,
        sync::SyncPipeline,
    },
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    startup::init_tracing()?;

    let config = Arc::new(Config::from_env()?);
    let db = startup::connect_to_database(&config).await?;

    tracing::info!("Starting role sync for guild {}", config.guild_id);

    let discord_http = Arc::new(Http::new(&config.discord_bot_token));
    let platform = Arc::new(SerenityPlatform::new(discord_http, config.guild_id));
    let client = Arc::new(PlanetEarthClient::new(
        planet_earth::build_http_client()?,
        config.api_base_url.clone(),
    ));
    let audit: Arc<dyn AuditSink> = Arc::new(DatabaseAuditSink::new(db.clone()));

    let report = ReportService::new(
        platform.clone(),
        config.success_channel_id,
        config.failure_channel_id,
        &config.export_dir,
    );
    let pipeline = SyncPipeline::new(
        db.clone(),
        client,
        platform,
        audit.clone(),
        config.queue.clone(),
        config.status_roles.clone(),
        report,
    );
    let scheduler = Arc::new(SyncScheduler::new(Arc::new(pipeline), audit));

    weekly::start_weekly_trigger(scheduler.clone(), config.weekly).await?;

    let bot = bot::start::init_bot(AppState::new(db, config, scheduler)).await?;
    bot::start::start_bot(bot).await
}
