//! Repository functions for the domain layer.

pub mod bots;
pub mod convert;
pub mod games;
pub mod messages;
pub mod players;
