//! Adapters for external dependencies.

pub mod bots_sea;
pub mod games_sea;
pub mod messages_sea;
pub mod players_sea;
