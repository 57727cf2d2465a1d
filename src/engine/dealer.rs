//! Политика дилера. Чистая функция от текущей руки,
//! применяется повторно, пока не вернёт `Stand`.

use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::eval::{calculate_value, MIN_STANDING_VALUE};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum DealerDecision {
    Hit,
    Stand,
}

/// Почему дилер принял решение (для логов и фронта).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum DealerReason {
    /// Пять карт: кандидат на Ngũ Linh (или уже перебор).
    FiveCards,
    /// 21 или больше.
    ReachedLimit,
    /// Меньше 16: обязан брать.
    UnderMinimum,
    /// Ровно 16: дилер "dằn", стоит.
    StandPat,
    /// 17–20.
    Comfortable,
}

pub fn dealer_decision(cards: &[Card]) -> (DealerDecision, DealerReason) {
    let value = calculate_value(cards);

    if cards.len() >= 5 {
        return (DealerDecision::Stand, DealerReason::FiveCards);
    }
    if value >= 21 {
        return (DealerDecision::Stand, DealerReason::ReachedLimit);
    }
    if value < MIN_STANDING_VALUE {
        return (DealerDecision::Hit, DealerReason::UnderMinimum);
    }
    if value == MIN_STANDING_VALUE {
        return (DealerDecision::Stand, DealerReason::StandPat);
    }
    (DealerDecision::Stand, DealerReason::Comfortable)
}
