use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::{SeatIndex, UserId};
use crate::eval::{calculate_value, determine_hand_type, HandType};

/// Статус игрока в контексте стола.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlayerStatus {
    /// Сидит за столом, ставка ещё не списана.
    Spectating,
    /// Ставка списана, ждёт раздачи или своего хода.
    Waiting,
    /// Сейчас ход этого игрока.
    Playing,
    /// Остановился (сам, по таймауту, после double или на 5 картах).
    Stand,
    /// Перебор.
    Bust,
    /// Xì Bàn на раздаче: в ходах не участвует.
    Blackjack,
}

impl PlayerStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PlayerStatus::Stand | PlayerStatus::Bust | PlayerStatus::Blackjack
        )
    }
}

/// Игрок за конкретным столом. Принадлежит ровно одному `Table`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub seat: SeatIndex,
    pub user_id: UserId,
    pub display_name: String,
    /// Текущая ставка. Меняется только при ready/double
    /// (после успешного списания) и читается только при расчёте.
    pub stake: Chips,
    /// Выбранная, но ещё не списанная ставка (до ready).
    pub selected_stake: Chips,
    pub hand: Vec<Card>,
    pub status: PlayerStatus,
    pub has_doubled: bool,
    pub is_ready: bool,
}

impl Player {
    /// Новый игрок мультистола: сидит, но ещё ничего не поставил.
    pub fn new(seat: SeatIndex, user_id: UserId, display_name: String) -> Self {
        Self {
            seat,
            user_id,
            display_name,
            stake: Chips::ZERO,
            selected_stake: Chips::ZERO,
            hand: Vec::new(),
            status: PlayerStatus::Spectating,
            has_doubled: false,
            is_ready: false,
        }
    }

    /// Игрок соло-стола: ставка уже списана при создании.
    pub fn staked(seat: SeatIndex, user_id: UserId, display_name: String, stake: Chips) -> Self {
        Self {
            stake,
            selected_stake: stake,
            status: PlayerStatus::Waiting,
            is_ready: true,
            ..Self::new(seat, user_id, display_name)
        }
    }

    pub fn hand_value(&self) -> u32 {
        calculate_value(&self.hand)
    }

    pub fn hand_type(&self) -> HandType {
        determine_hand_type(&self.hand).1
    }

    /// Перебор по типу руки: Xì Bàn (22 очка) перебором не считается.
    pub fn is_bust(&self) -> bool {
        self.hand_type() == HandType::Bust
    }

    pub fn can_double(&self) -> bool {
        self.hand.len() == 2 && !self.has_doubled
    }

    /// Игрок участвует в раздаче (ставка списана).
    pub fn is_in_round(&self) -> bool {
        self.is_ready && !self.stake.is_zero()
    }

    /// Добавить карту в ходе игры. Перебор: Bust, пятая карта: Stand.
    pub fn take_card(&mut self, card: Card) {
        self.hand.push(card);
        if self.is_bust() {
            self.status = PlayerStatus::Bust;
        } else if self.hand.len() >= 5 {
            self.status = PlayerStatus::Stand;
        }
    }
}
