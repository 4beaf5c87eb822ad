//! Error codes for the Turing Tag backend API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses.

use core::fmt;

/// Centralized error codes for the backend API.
///
/// Each variant maps to a canonical SCREAMING_SNAKE_CASE string that appears
/// in HTTP responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Request Validation
    /// Invalid game ID provided
    InvalidGameId,
    /// Missing or malformed X-Player-Id header
    InvalidPlayerId,
    /// Unknown game state text
    InvalidState,
    /// Message text is empty or whitespace
    EmptyText,
    /// Message text exceeds the length cap
    TextTooLong,
    /// Display name empty or too long
    InvalidDisplayName,
    /// A bot cannot question or tag itself
    SelfTarget,
    /// Bot id does not belong to the game
    UnknownBot,
    /// General validation error
    ValidationError,
    /// General bad request error
    BadRequest,

    // Resource Not Found
    /// Game not found
    GameNotFound,
    /// Player not found
    PlayerNotFound,
    /// General not found error
    NotFound,

    // Business Logic Conflicts
    /// Game is not in the expected state
    StateMismatch,
    /// Current state was already handled
    AlreadyHandled,
    /// Game already finished
    GameFinished,
    /// No AI bot left to claim
    NoFreeSeat,
    /// Caller's bot is not due to act
    OutOfTurn,
    /// Caller has no bot in the game
    NotAMember,
    /// Help budget used up
    HelpExhausted,
    /// Message kind does not fit the current state
    KindMismatch,
    /// Unique constraint violation
    UniqueViolation,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // System Errors
    /// Database error
    DbError,
    /// Database unavailable
    DbUnavailable,
    /// Database timeout
    DbTimeout,
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
    /// Data corruption detected
    DataCorruption,
    /// Storage invariant broken
    InvariantViolation,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidGameId => "INVALID_GAME_ID",
            Self::InvalidPlayerId => "INVALID_PLAYER_ID",
            Self::InvalidState => "INVALID_STATE",
            Self::EmptyText => "EMPTY_TEXT",
            Self::TextTooLong => "TEXT_TOO_LONG",
            Self::InvalidDisplayName => "INVALID_DISPLAY_NAME",
            Self::SelfTarget => "SELF_TARGET",
            Self::UnknownBot => "UNKNOWN_BOT",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",

            Self::GameNotFound => "GAME_NOT_FOUND",
            Self::PlayerNotFound => "PLAYER_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::StateMismatch => "STATE_MISMATCH",
            Self::AlreadyHandled => "ALREADY_HANDLED",
            Self::GameFinished => "GAME_FINISHED",
            Self::NoFreeSeat => "NO_FREE_SEAT",
            Self::OutOfTurn => "OUT_OF_TURN",
            Self::NotAMember => "NOT_A_MEMBER",
            Self::HelpExhausted => "HELP_EXHAUSTED",
            Self::KindMismatch => "KIND_MISMATCH",
            Self::UniqueViolation => "UNIQUE_VIOLATION",
            Self::Conflict => "CONFLICT",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
            Self::DataCorruption => "DATA_CORRUPTION",
            Self::InvariantViolation => "INVARIANT_VIOLATION",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
