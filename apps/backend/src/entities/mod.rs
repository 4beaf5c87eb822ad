pub mod bots;
pub mod games;
pub mod messages;
pub mod players;

pub use bots::Entity as Bots;
pub use bots::Model as Bot;
pub use games::Entity as Games;
pub use games::Model as Game;
pub use messages::Entity as Messages;
pub use messages::Model as Message;
pub use players::Entity as Players;
pub use players::Model as Player;
