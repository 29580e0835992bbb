//! Factory methods for creating test data.
//!
//! Each table of the role mapping store has its own factory module with a `Factory` struct
//! for customization and a `create_*` convenience function for quick default creation.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! let avalon = factory::create_nation_role(&db, "Avalon", "100").await?;
//! let town = factory::create_town_role(&db, "town-uuid-1", "200").await?;
//! factory::create_alliance(&db, "Avalon", "Brightwater").await?;
//! ```
//!
//! # Customization
//!
//! ```rust,ignore
//! let nation = factory::nation_role::NationRoleFactory::new(&db)
//!     .nation("Avalon")
//!     .role_id("100")
//!     .allied_role_id("101")
//!     .build()
//!     .await?;
//! ```
//!
//! # Available Factories
//!
//! - `nation_role` - Nation to role mappings
//! - `town_role` - Town id to role mappings
//! - `alliance` - Directed alliance edges
//! - `sync_exception` - Exception list entries
//! - `sync_target_role` - Roles whose holders are synced
//! - `managed_role` - Historical managed role ids
//! - `linked_account` - Cached external account links
//! - `helpers` - Unique id generation

pub mod alliance;
pub mod helpers;
pub mod linked_account;
pub mod managed_role;
pub mod nation_role;
pub mod sync_exception;
pub mod sync_target_role;
pub mod town_role;

pub use alliance::create_alliance;
pub use linked_account::create_linked_account;
pub use managed_role::create_managed_role;
pub use nation_role::create_nation_role;
pub use sync_exception::create_exception;
pub use sync_target_role::create_target_role;
pub use town_role::create_town_role;
