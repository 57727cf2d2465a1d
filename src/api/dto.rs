use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::player::PlayerStatus;
use crate::domain::table::{TableKind, TableStatus};
use crate::domain::{ChannelId, SeatIndex, TableId, UserId};
use crate::engine::game_loop::SeatSettlement;
use crate::engine::hand_history::HandHistory;
use crate::eval::{describe_hand, HandType, Outcome};

/// DTO игрока за столом.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatView {
    pub seat: SeatIndex,
    pub user_id: UserId,
    pub display_name: String,
    /// Списанная ставка (0, пока игрок не готов).
    pub stake: Chips,
    /// Выбранная, но ещё не подтверждённая ставка.
    pub selected_stake: Chips,
    pub cards: Vec<Card>,
    pub value: u32,
    pub hand_type: HandType,
    pub status: PlayerStatus,
    pub is_ready: bool,
    pub has_doubled: bool,
    /// "Đủ tuổi": рука не проиграет автоматически при остановке.
    pub can_stand_safely: bool,
}

/// DTO стола. Первая карта дилера скрыта до его хода.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableView {
    pub table_id: TableId,
    pub channel_id: ChannelId,
    pub host_id: UserId,
    pub kind: TableKind,
    pub status: TableStatus,
    pub max_seats: u8,
    pub seats: Vec<SeatView>,
    /// Открытые карты дилера.
    pub dealer_visible: Vec<Card>,
    /// Сколько карт дилера закрыто.
    pub dealer_hidden: usize,
    /// Очки дилера: только когда все карты открыты.
    pub dealer_value: Option<u32>,
    /// Место, чей сейчас ход.
    pub current_turn_seat: Option<SeatIndex>,
}

impl TableView {
    pub fn seat(&self, seat: SeatIndex) -> Option<&SeatView> {
        self.seats.iter().find(|s| s.seat == seat)
    }

    pub fn seat_of(&self, user_id: UserId) -> Option<&SeatView> {
        self.seats.iter().find(|s| s.user_id == user_id)
    }
}

/// Итог одного места после расчёта.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatResult {
    pub seat: SeatIndex,
    pub user_id: UserId,
    pub display_name: String,
    pub stake: Chips,
    pub cards: Vec<Card>,
    pub value: u32,
    pub hand_type: HandType,
    /// Название руки для показа ("Xì Dách", "Ngũ Linh", ...).
    pub hand_name: String,
    pub outcome: Outcome,
    pub multiplier: u64,
    /// Полный возврат (ставка включена).
    pub payout: Chips,
    pub busted: bool,
}

impl From<&SeatSettlement> for SeatResult {
    fn from(s: &SeatSettlement) -> Self {
        Self {
            seat: s.seat,
            user_id: s.user_id,
            display_name: s.display_name.clone(),
            stake: s.stake,
            cards: s.hand.clone(),
            value: s.value,
            hand_type: s.hand_type,
            hand_name: describe_hand(s.hand_type).to_string(),
            outcome: s.outcome,
            multiplier: s.multiplier,
            payout: s.payout,
            busted: s.busted,
        }
    }
}

/// Итог всей игры за столом.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GameSummary {
    pub table: TableView,
    pub dealer_cards: Vec<Card>,
    pub dealer_value: u32,
    pub results: Vec<SeatResult>,
    pub history: HandHistory,
}

/// Ответ API на команду.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum CommandResponse {
    /// Успешный результат без доп.данных.
    Ok,

    /// Вернуть обновлённое состояние стола.
    TableState(TableView),

    /// Создан новый стол.
    TableCreated(TableView),

    /// Игра за столом закончилась.
    Finished(GameSummary),

    /// Баланс игрока.
    Balance { user_id: UserId, balance: Chips },

    /// Столы канала.
    Tables(Vec<TableView>),
}
