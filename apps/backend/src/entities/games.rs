use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum GameState {
    #[sea_orm(string_value = "STARTED")]
    Started,
    #[sea_orm(string_value = "PLAYERS_JOINED")]
    PlayersJoined,
    #[sea_orm(string_value = "WAITING_FOR_BOT_QUESTION")]
    WaitingForBotQuestion,
    #[sea_orm(string_value = "WAITING_FOR_BOT_ANSWER")]
    WaitingForBotAnswer,
    #[sea_orm(string_value = "WAITING_FOR_PLAYER_QUESTION")]
    WaitingForPlayerQuestion,
    #[sea_orm(string_value = "WAITING_FOR_PLAYER_ANSWER")]
    WaitingForPlayerAnswer,
    #[sea_orm(string_value = "FINISHED")]
    Finished,
}

/// Bot ids in play order, stored as a JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct TurnOrder(pub Vec<i64>);

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "games")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub state: GameState,
    #[sea_orm(column_name = "turn_order", column_type = "JsonBinary")]
    pub turn_order: TurnOrder,
    #[sea_orm(column_name = "current_turn_index")]
    pub current_turn_index: i32,
    #[sea_orm(column_name = "state_handled")]
    pub state_handled: bool,
    #[sea_orm(column_name = "state_handled_at")]
    pub state_handled_at: Option<OffsetDateTime>,
    #[sea_orm(column_name = "current_state_total_time")]
    pub current_state_total_time: i32,
    #[sea_orm(column_name = "last_question", column_type = "Text", nullable)]
    pub last_question: Option<String>,
    #[sea_orm(column_name = "last_question_target_bot_id")]
    pub last_question_target_bot_id: Option<i64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub result: Option<String>,
    #[sea_orm(column_name = "winning_bot_id")]
    pub winning_bot_id: Option<i64>,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::bots::Entity")]
    Bots,
    #[sea_orm(has_many = "super::messages::Entity")]
    Messages,
}

impl Related<super::bots::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bots.def()
    }
}

impl Related<super::messages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Messages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
