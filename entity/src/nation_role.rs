use sea_orm::entity::prelude::*;

/// Maps a nation to the Discord role its members receive.
///
/// `nation` holds the case-normalized name used for lookups, `display_name` keeps the
/// spelling the mapping was created with. `allied_role_id` is granted to members of every
/// nation this nation lists as an ally.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "nation_role")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub nation: String,
    pub display_name: String,
    pub role_id: String,
    pub allied_role_id: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
