use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Players {
    Table,
    Id,
    DisplayName,
    CreatedAt,
}

#[derive(Iden)]
enum Games {
    Table,
    Id,
    State,
    TurnOrder,
    CurrentTurnIndex,
    StateHandled,
    StateHandledAt,
    CurrentStateTotalTime,
    LastQuestion,
    LastQuestionTargetBotId,
    Result,
    WinningBotId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Bots {
    Table,
    Id,
    GameId,
    Seat,
    Name,
    BotType,
    PlayerId,
    HelpCount,
    CreatedAt,
}

#[derive(Iden)]
enum Messages {
    Table,
    Id,
    GameId,
    SourceBotId,
    TargetBotId,
    Kind,
    Text,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // players
        manager
            .create_table(
                Table::create()
                    .table(Players::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Players::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Players::DisplayName).string().not_null())
                    .col(
                        ColumnDef::new(Players::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // games
        manager
            .create_table(
                Table::create()
                    .table(Games::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Games::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(
                        ColumnDef::new(Games::State)
                            .string()
                            .not_null()
                            .default("STARTED"),
                    )
                    .col(ColumnDef::new(Games::TurnOrder).json_binary().not_null())
                    .col(
                        ColumnDef::new(Games::CurrentTurnIndex)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Games::StateHandled)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Games::StateHandledAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Games::CurrentStateTotalTime)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Games::LastQuestion).text().null())
                    .col(
                        ColumnDef::new(Games::LastQuestionTargetBotId)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(Games::Result).text().null())
                    .col(ColumnDef::new(Games::WinningBotId).big_integer().null())
                    .col(
                        ColumnDef::new(Games::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Games::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // The reconciler scans by (state, state_handled) and by created_at.
        manager
            .create_index(
                Index::create()
                    .name("ix_games_state_handled")
                    .table(Games::Table)
                    .col(Games::State)
                    .col(Games::StateHandled)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_games_created_at")
                    .table(Games::Table)
                    .col(Games::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // bots
        manager
            .create_table(
                Table::create()
                    .table(Bots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bots::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Bots::GameId).big_integer().not_null())
                    .col(ColumnDef::new(Bots::Seat).small_integer().not_null())
                    .col(ColumnDef::new(Bots::Name).string().not_null())
                    .col(
                        ColumnDef::new(Bots::BotType)
                            .string()
                            .not_null()
                            .default("AI"),
                    )
                    .col(ColumnDef::new(Bots::PlayerId).big_integer().null())
                    .col(
                        ColumnDef::new(Bots::HelpCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Bots::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bots_game_id")
                            .from(Bots::Table, Bots::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bots_player_id")
                            .from(Bots::Table, Bots::PlayerId)
                            .to(Players::Table, Players::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_bots_game_seat")
                    .table(Bots::Table)
                    .col(Bots::GameId)
                    .col(Bots::Seat)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_bots_player_id")
                    .table(Bots::Table)
                    .col(Bots::PlayerId)
                    .to_owned(),
            )
            .await?;

        // messages
        manager
            .create_table(
                Table::create()
                    .table(Messages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Messages::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Messages::GameId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Messages::SourceBotId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Messages::TargetBotId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Messages::Kind).string().not_null())
                    .col(ColumnDef::new(Messages::Text).text().not_null())
                    .col(
                        ColumnDef::new(Messages::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_messages_game_id")
                            .from(Messages::Table, Messages::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_messages_source_bot_id")
                            .from(Messages::Table, Messages::SourceBotId)
                            .to(Bots::Table, Bots::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_messages_target_bot_id")
                            .from(Messages::Table, Messages::TargetBotId)
                            .to(Bots::Table, Bots::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_messages_game_created")
                    .table(Messages::Table)
                    .col(Messages::GameId)
                    .col(Messages::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // drop in reverse order + drop index before table
        manager
            .drop_index(
                Index::drop()
                    .name("ix_messages_game_created")
                    .table(Messages::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Messages::Table).to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("ix_bots_player_id")
                    .table(Bots::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("ux_bots_game_seat")
                    .table(Bots::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Bots::Table).to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("ix_games_created_at")
                    .table(Games::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("ix_games_state_handled")
                    .table(Games::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Games::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Players::Table).to_owned())
            .await?;

        Ok(())
    }
}
