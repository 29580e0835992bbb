use chrono::{NaiveTime, Weekday};
use std::{path::PathBuf, str::FromStr, time::Duration};
use url::Url;

use crate::{error::config::ConfigError, model::mapping::StatusRoleConfig};

const DEFAULT_API_BASE: &str = "https://api.planetearth.kr";
const DEFAULT_EXPORT_DIR: &str = "data/csv_exports";

/// Weekly trigger time, interpreted in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklySchedule {
    pub day: Weekday,
    pub time: NaiveTime,
}

/// Tuning for the per-run worker pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueConfig {
    /// Number of worker slots pulling tasks.
    pub workers: usize,
    /// Maximum external API calls in flight across all workers.
    pub max_in_flight: usize,
    /// Minimum delay between two dispatches of the same worker.
    pub dispatch_interval: Duration,
    /// Attempt ceiling for transient failures, first attempt included.
    pub max_attempts: u32,
    /// Delay before the first retry; doubled for every further attempt.
    pub backoff_base: Duration,
    /// Upper bound for the retry delay.
    pub backoff_max: Duration,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            workers: 3,
            max_in_flight: 3,
            dispatch_interval: Duration::from_millis(1000),
            max_attempts: 3,
            backoff_base: Duration::from_millis(5000),
            backoff_max: Duration::from_millis(300_000),
        }
    }
}

pub struct Config {
    pub database_url: String,
    pub discord_bot_token: String,

    pub guild_id: u64,
    pub success_channel_id: u64,
    pub failure_channel_id: u64,
    pub admin_role_id: u64,
    pub command_prefix: String,

    pub api_base_url: Url,
    pub weekly: WeeklySchedule,
    pub queue: QueueConfig,
    pub export_dir: PathBuf,
    pub status_roles: StatusRoleConfig,
}

impl Config {
    /// Loads the configuration from the process environment.
    ///
    /// # Returns
    /// - `Ok(Config)` - All required variables present and valid
    /// - `Err(ConfigError)` - A required variable is missing or a value is invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Arguments
    /// - `lookup` - Returns the raw value for a variable name
    ///
    /// # Returns
    /// - `Ok(Config)` - All required variables present and valid
    /// - `Err(ConfigError)` - A required variable is missing or a value is invalid
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = EnvReader { lookup };

        let defaults = QueueConfig::default();
        let queue = QueueConfig {
            workers: env.parse_in_range("SYNC_WORKERS", defaults.workers, 1, 32)?,
            max_in_flight: env.parse_in_range("SYNC_MAX_IN_FLIGHT", defaults.max_in_flight, 1, 9)?,
            dispatch_interval: Duration::from_millis(env.parse_or(
                "SYNC_DISPATCH_INTERVAL_MS",
                defaults.dispatch_interval.as_millis() as u64,
            )?),
            max_attempts: env.parse_in_range("SYNC_MAX_ATTEMPTS", defaults.max_attempts, 1, 10)?,
            backoff_base: Duration::from_millis(
                env.parse_or("SYNC_BACKOFF_BASE_MS", defaults.backoff_base.as_millis() as u64)?,
            ),
            backoff_max: Duration::from_millis(
                env.parse_or("SYNC_BACKOFF_MAX_MS", defaults.backoff_max.as_millis() as u64)?,
            ),
        };

        let api_base = env.optional("MC_API_BASE");
        let api_base = api_base.as_deref().unwrap_or(DEFAULT_API_BASE);
        let mut api_base_url = Url::parse(api_base).map_err(|e| ConfigError::InvalidEnvVar {
            name: "MC_API_BASE".to_string(),
            value: api_base.to_string(),
            reason: e.to_string(),
        })?;
        // Endpoints are joined onto the base, which drops a last segment without a slash.
        if !api_base_url.path().ends_with('/') {
            let path = format!("{}/", api_base_url.path());
            api_base_url.set_path(&path);
        }

        let status_roles = StatusRoleConfig {
            home_nation: env.optional("HOME_NATION"),
            citizen_role_id: env.optional_id("CITIZEN_ROLE_ID")?,
            foreigner_role_id: env.optional_id("FOREIGNER_ROLE_ID")?,
        };

        Ok(Self {
            database_url: env.required("DATABASE_URL")?,
            discord_bot_token: env.required("DISCORD_BOT_TOKEN")?,
            guild_id: env.required_id("GUILD_ID")?,
            success_channel_id: env.required_id("SUCCESS_CHANNEL_ID")?,
            failure_channel_id: env.required_id("FAILURE_CHANNEL_ID")?,
            admin_role_id: env.required_id("SYNC_ADMIN_ROLE_ID")?,
            command_prefix: env.optional("COMMAND_PREFIX").unwrap_or_else(|| "!".to_string()),
            api_base_url,
            weekly: WeeklySchedule {
                day: env.weekday("AUTO_EXECUTION_DAY", Weekday::Sun)?,
                time: env.time_of_day("AUTO_EXECUTION_TIME", "02:00")?,
            },
            queue,
            export_dir: env
                .optional("EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_DIR)),
            status_roles,
        })
    }
}

struct EnvReader<F> {
    lookup: F,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, name: &str) -> Result<String, ConfigError> {
        self.optional(name)
            .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
    }

    fn required_id(&self, name: &str) -> Result<u64, ConfigError> {
        let value = self.required(name)?;
        parse_snowflake(name, &value)
    }

    fn optional_id(&self, name: &str) -> Result<Option<u64>, ConfigError> {
        self.optional(name)
            .map(|value| parse_snowflake(name, &value))
            .transpose()
    }

    fn parse_or<T>(&self, name: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.optional(name) {
            None => Ok(default),
            Some(value) => value.parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
                name: name.to_string(),
                value,
                reason: e.to_string(),
            }),
        }
    }

    fn parse_in_range<T>(&self, name: &str, default: T, min: T, max: T) -> Result<T, ConfigError>
    where
        T: FromStr + PartialOrd + std::fmt::Display + Copy,
        T::Err: std::fmt::Display,
    {
        let value = self.parse_or(name, default)?;
        if value < min || value > max {
            return Err(ConfigError::InvalidEnvVar {
                name: name.to_string(),
                value: value.to_string(),
                reason: format!("must be between {} and {}", min, max),
            });
        }
        Ok(value)
    }

    /// Accepts weekday names (`SUN`, `sunday`) or numbers where 0 is Monday.
    fn weekday(&self, name: &str, default: Weekday) -> Result<Weekday, ConfigError> {
        let Some(value) = self.optional(name) else {
            return Ok(default);
        };

        if let Ok(day) = value.parse::<Weekday>() {
            return Ok(day);
        }

        value
            .parse::<u8>()
            .ok()
            .and_then(|n| Weekday::try_from(n).ok())
            .ok_or_else(|| ConfigError::InvalidEnvVar {
                name: name.to_string(),
                value,
                reason: "expected a weekday name or 0 (Monday) to 6 (Sunday)".to_string(),
            })
    }

    fn time_of_day(&self, name: &str, default: &str) -> Result<NaiveTime, ConfigError> {
        let value = self.optional(name).unwrap_or_else(|| default.to_string());
        NaiveTime::parse_from_str(&value, "%H:%M").map_err(|e| ConfigError::InvalidEnvVar {
            name: name.to_string(),
            value,
            reason: e.to_string(),
        })
    }
}

fn parse_snowflake(name: &str, value: &str) -> Result<u64, ConfigError> {
    match value.parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ConfigError::InvalidEnvVar {
            name: name.to_string(),
            value: value.to_string(),
            reason: "expected a Discord snowflake id".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("DATABASE_URL", "sqlite://rolesync.db?mode=rwc"),
            ("DISCORD_BOT_TOKEN", "token"),
            ("GUILD_ID", "1000"),
            ("SUCCESS_CHANNEL_ID", "2000"),
            ("FAILURE_CHANNEL_ID", "2001"),
            ("SYNC_ADMIN_ROLE_ID", "3000"),
        ])
    }

    fn load(env: &HashMap<&'static str, &'static str>) -> Result<Config, ConfigError> {
        Config::from_lookup(|key| env.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn applies_defaults_for_optional_values() {
        let config = load(&base_env()).unwrap();

        assert_eq!(config.guild_id, 1000);
        assert_eq!(config.command_prefix, "!");
        assert_eq!(config.api_base_url.as_str(), "https://api.planetearth.kr/");
        assert_eq!(config.weekly.day, Weekday::Sun);
        assert_eq!(config.weekly.time, NaiveTime::from_hms_opt(2, 0, 0).unwrap());
        assert_eq!(config.queue, QueueConfig::default());
        assert_eq!(config.export_dir, PathBuf::from("data/csv_exports"));
        assert_eq!(config.status_roles, StatusRoleConfig::default());
    }

    #[test]
    fn reports_missing_required_variable() {
        let mut env = base_env();
        env.remove("GUILD_ID");

        let err = load(&env).err().unwrap();

        assert_eq!(err, ConfigError::MissingEnvVar("GUILD_ID".to_string()));
    }

    #[test]
    fn treats_blank_values_as_missing() {
        let mut env = base_env();
        env.insert("DISCORD_BOT_TOKEN", "   ");

        let err = load(&env).err().unwrap();

        assert_eq!(
            err,
            ConfigError::MissingEnvVar("DISCORD_BOT_TOKEN".to_string())
        );
    }

    #[test]
    fn rejects_non_numeric_ids() {
        let mut env = base_env();
        env.insert("SUCCESS_CHANNEL_ID", "general");

        let err = load(&env).err().unwrap();

        assert!(matches!(err, ConfigError::InvalidEnvVar { ref name, .. } if name == "SUCCESS_CHANNEL_ID"));
    }

    #[test]
    fn parses_weekday_names_and_numbers() {
        let mut env = base_env();
        env.insert("AUTO_EXECUTION_DAY", "wednesday");
        env.insert("AUTO_EXECUTION_TIME", "18:30");
        let config = load(&env).unwrap();
        assert_eq!(config.weekly.day, Weekday::Wed);
        assert_eq!(config.weekly.time, NaiveTime::from_hms_opt(18, 30, 0).unwrap());

        env.insert("AUTO_EXECUTION_DAY", "4");
        let config = load(&env).unwrap();
        assert_eq!(config.weekly.day, Weekday::Fri);

        env.insert("AUTO_EXECUTION_DAY", "someday");
        assert!(load(&env).is_err());
    }

    #[test]
    fn rejects_concurrency_cap_outside_single_digits() {
        let mut env = base_env();
        env.insert("SYNC_MAX_IN_FLIGHT", "12");

        let err = load(&env).err().unwrap();

        assert!(matches!(err, ConfigError::InvalidEnvVar { ref name, .. } if name == "SYNC_MAX_IN_FLIGHT"));
    }

    #[test]
    fn reads_queue_tuning_and_status_roles() {
        let mut env = base_env();
        env.insert("SYNC_WORKERS", "5");
        env.insert("SYNC_DISPATCH_INTERVAL_MS", "250");
        env.insert("SYNC_BACKOFF_BASE_MS", "100");
        env.insert("HOME_NATION", "Avalon");
        env.insert("CITIZEN_ROLE_ID", "4000");

        let config = load(&env).unwrap();

        assert_eq!(config.queue.workers, 5);
        assert_eq!(config.queue.dispatch_interval, Duration::from_millis(250));
        assert_eq!(config.queue.backoff_base, Duration::from_millis(100));
        assert_eq!(config.status_roles.home_nation.as_deref(), Some("Avalon"));
        assert_eq!(config.status_roles.citizen_role_id, Some(4000));
        assert_eq!(config.status_roles.foreigner_role_id, None);
    }

    #[test]
    fn keeps_api_base_path_when_joining_endpoints() {
        let mut env = base_env();
        env.insert("MC_API_BASE", "https://host.example/v1");

        let config = load(&env).unwrap();

        assert_eq!(config.api_base_url.as_str(), "https://host.example/v1/");
        assert_eq!(
            config.api_base_url.join("resident").unwrap().as_str(),
            "https://host.example/v1/resident"
        );
    }
}
