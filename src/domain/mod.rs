//! Доменная модель Xì Dách: карты, колода, игроки, столы.

pub mod card;
pub mod chips;
pub mod deck;
pub mod player;
pub mod table;

// Идентификаторы приходят из чат-платформы (snowflake-подобные u64).
pub type UserId = u64;
pub type ChannelId = u64;
pub type TableId = u64;

/// Индекс места за столом (0..max_seats-1).
pub type SeatIndex = u8;

pub use card::*;
pub use chips::*;
pub use deck::*;
pub use player::*;
pub use table::*;
