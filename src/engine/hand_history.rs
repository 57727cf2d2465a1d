use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::{SeatIndex, TableId, UserId};
use crate::engine::actions::PlayerActionKind;
use crate::eval::{HandType, Outcome};

/// Тип события за столом.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum HandEventKind {
    TableOpened {
        table_id: TableId,
        host_id: UserId,
    },

    PlayerSeated {
        seat: SeatIndex,
        user_id: UserId,
    },

    PlayerLeft {
        seat: SeatIndex,
        user_id: UserId,
        refunded: Chips,
    },

    BettingOpened,

    /// Ставка списана с баланса, игрок готов.
    StakeLocked {
        seat: SeatIndex,
        user_id: UserId,
        stake: Chips,
    },

    /// Неготовые игроки сняты при закрытии ставок.
    PlayersDropped {
        user_ids: Vec<UserId>,
    },

    CardsDealt {
        turn_order: Vec<SeatIndex>,
        dealer_cards: Vec<Card>,
    },

    PlayerActed {
        seat: SeatIndex,
        action: PlayerActionKind,
        card: Option<Card>,
        value_after: u32,
    },

    /// Ход закрыт по таймеру.
    TurnTimedOut {
        seat: SeatIndex,
        value: u32,
    },

    DealerTurnStarted {
        value: u32,
    },

    DealerDrew {
        card: Card,
        value_after: u32,
    },

    SeatSettled {
        seat: SeatIndex,
        user_id: UserId,
        outcome: Outcome,
        hand_type: HandType,
        payout: Chips,
    },

    /// Стол распущен без игры, ставки возвращены.
    Cancelled {
        refunds: Vec<(UserId, Chips)>,
    },
}

/// Событие с порядковым номером.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HandEvent {
    pub index: u32,
    pub kind: HandEventKind,
}

/// Полная история стола.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct HandHistory {
    pub events: Vec<HandEvent>,
}

impl HandHistory {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, kind: HandEventKind) {
        let idx = self.events.len() as u32;
        self.events.push(HandEvent { index: idx, kind });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
