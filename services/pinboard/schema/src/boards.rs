use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "boards")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    /// Unique across all users.
    #[sea_orm(unique)]
    pub title: String,
    pub cover: String,
    pub is_private: bool,
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::board_pins::Entity")]
    BoardPins,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::board_pins::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BoardPins.def()
    }
}

impl Related<super::pins::Entity> for Entity {
    fn to() -> RelationDef {
        super::board_pins::Relation::Pin.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::board_pins::Relation::Board.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
