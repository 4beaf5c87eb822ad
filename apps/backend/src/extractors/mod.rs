pub mod game_id;
pub mod player_id;
pub mod validated_json;

pub use game_id::GameIdPath;
pub use player_id::{CallerPlayerId, OptionalCallerPlayerId};
pub use validated_json::ValidatedJson;
