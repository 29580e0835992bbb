//! Rolesync Test Utils
//!
//! Shared testing utilities for the rolesync repositories and services. Provides a builder
//! for creating test contexts backed by in-memory SQLite databases plus factories for
//! seeding the role mapping store.
//!
//! # Overview
//!
//! - **TestBuilder**: Fluent builder for configuring which tables exist
//! - **TestContext**: Test environment holding the database connection
//! - **TestError**: Error raised while setting up the environment
//! - **factory**: Builders for mapping-store rows with sensible defaults
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::{builder::TestBuilder, factory};
//! use entity::prelude::NationRole;
//!
//! #[tokio::test]
//! async fn finds_nation() -> Result<(), sea_orm::DbErr> {
//!     let test = TestBuilder::new().with_table(NationRole).build().await.unwrap();
//!     let db = test.db.as_ref().unwrap();
//!
//!     factory::create_nation_role(db, "Avalon", "100").await?;
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;
