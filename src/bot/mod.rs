//! Discord gateway connection.
//!
//! The gateway is only used for the `sync` chat command; the sync pipeline itself talks
//! to Discord over HTTP through `SerenityPlatform`.
//!
//! # Gateway Intents
//!
//! - `GUILDS` - Guild availability
//! - `GUILD_MESSAGES` - Command messages
//! - `GUILD_MEMBERS` - Member role data on command messages (privileged intent)
//! - `MESSAGE_CONTENT` - Reading the command text (privileged intent)
//!
//! Both privileged intents must be enabled in the Discord Developer Portal.

pub mod handler;
pub mod start;
