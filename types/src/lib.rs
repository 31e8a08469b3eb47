pub mod clock;
pub mod error;
pub mod game;
pub mod id;
pub mod player;
pub mod round;
pub mod summary;

pub use error::ValidationError;
pub use game::{Game, GameStatus};
pub use id::{GameId, PlayerId, RoundId};
pub use player::Player;
pub use round::{LoserPoints, Round};
pub use summary::GameSummary;

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;
pub const MAX_NAME_LEN: usize = 20;
pub const MIN_TARGET_SCORE: u32 = 10;
pub const DEFAULT_TARGET_SCORE: u32 = 100;
