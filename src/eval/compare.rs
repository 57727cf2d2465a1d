use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::domain::card::Card;

use super::evaluator::{determine_hand_type, MIN_STANDING_VALUE};
use super::hand_rank::HandType;

/// Исход руки игрока против дилера.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Outcome {
    Win,
    Lose,
    Push,
}

/// Результат сравнения. `multiplier`: полный возврат от ставки,
/// включая саму ставку: 0: ставка сгорает, 1: возврат, 2+: выигрыш.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comparison {
    pub outcome: Outcome,
    pub multiplier: u64,
}

impl Comparison {
    pub const fn win(multiplier: u64) -> Self {
        Self {
            outcome: Outcome::Win,
            multiplier,
        }
    }

    pub const LOSE: Comparison = Comparison {
        outcome: Outcome::Lose,
        multiplier: 0,
    };

    pub const PUSH: Comparison = Comparison {
        outcome: Outcome::Push,
        multiplier: 1,
    };
}

pub const WIN_MULTIPLIER: u64 = 2;
pub const XI_DACH_MULTIPLIER: u64 = 3;
pub const XI_BAN_MULTIPLIER: u64 = 4;

/// Сравнить руку игрока с финальной рукой дилера.
///
/// Иерархия: Xì Bàn > Ngũ Linh > Xì Dách > очки.
pub fn compare(player: &[Card], dealer: &[Card]) -> Comparison {
    let (p_value, p_type) = determine_hand_type(player);
    let (d_value, d_type) = determine_hand_type(dealer);

    // Не дотянул до 16: проигрыш при любой руке дилера.
    if p_type == HandType::Normal && p_value < MIN_STANDING_VALUE {
        return Comparison::LOSE;
    }

    if p_type == HandType::Bust {
        return Comparison::LOSE;
    }

    if d_type == HandType::Bust {
        return Comparison::win(WIN_MULTIPLIER);
    }

    match (p_type == HandType::XiBan, d_type == HandType::XiBan) {
        (true, true) => return Comparison::PUSH,
        (true, false) => return Comparison::win(XI_BAN_MULTIPLIER),
        (false, true) => return Comparison::LOSE,
        (false, false) => {}
    }

    match (p_type == HandType::NguLinh, d_type == HandType::NguLinh) {
        (true, true) => return by_value(p_value, d_value),
        (true, false) => return Comparison::win(WIN_MULTIPLIER),
        (false, true) => return Comparison::LOSE,
        (false, false) => {}
    }

    match (p_type == HandType::XiDach, d_type == HandType::XiDach) {
        (true, true) => return Comparison::PUSH,
        (true, false) => return Comparison::win(XI_DACH_MULTIPLIER),
        (false, true) => return Comparison::LOSE,
        (false, false) => {}
    }

    by_value(p_value, d_value)
}

fn by_value(player: u32, dealer: u32) -> Comparison {
    match player.cmp(&dealer) {
        Ordering::Greater => Comparison::win(WIN_MULTIPLIER),
        Ordering::Less => Comparison::LOSE,
        Ordering::Equal => Comparison::PUSH,
    }
}
