//! Оценка рук Xì Dách.
//!
//! Основные функции:
//!   `calculate_value(cards) -> u32`
//!   `determine_hand_type(cards) -> (u32, HandType)`
//!   `compare(player, dealer) -> Comparison`

pub mod compare;
pub mod evaluator;
pub mod hand_rank;

pub use compare::{compare, Comparison, Outcome};
pub use evaluator::{calculate_value, can_stand_safely, determine_hand_type, MIN_STANDING_VALUE};
pub use hand_rank::{describe_hand, HandType};
