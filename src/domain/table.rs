use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::domain::card::Card;
use crate::domain::deck::Deck;
use crate::domain::player::{Player, PlayerStatus};
use crate::domain::{ChannelId, SeatIndex, TableId, UserId};
use crate::engine::hand_history::HandHistory;
use crate::infra::rng::DeterministicRng;

/// Тип стола.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TableKind {
    /// Один игрок против дилера, без лобби и ставок.
    Solo,
    /// Лобби → ставки → игра.
    Multi,
}

/// Стадия стола. Порядок вариантов = порядок переходов,
/// статус только растёт.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum TableStatus {
    Lobby,
    Betting,
    Playing,
    DealerTurn,
    Finished,
}

/// Корневой агрегат одной игры. Простые данные без замков -
/// синхронизация снаружи (`engine::registry::SharedTable`).
#[derive(Clone, Debug)]
pub struct Table {
    pub id: TableId,
    pub channel_id: ChannelId,
    pub host_id: UserId,
    pub kind: TableKind,
    pub max_seats: u8,

    /// Места: индекс вектора = SeatIndex, None = пусто.
    pub seats: Vec<Option<Player>>,

    pub dealer_hand: Vec<Card>,
    pub deck: Deck,
    pub rng: DeterministicRng,

    pub status: TableStatus,
    /// Фиксируется при закрытии ставок.
    pub turn_order: Vec<SeatIndex>,
    pub current_turn_index: usize,

    pub created_at: Instant,
    pub history: HandHistory,
}

impl Table {
    pub fn new(
        id: TableId,
        channel_id: ChannelId,
        host_id: UserId,
        kind: TableKind,
        max_seats: u8,
        mut rng: DeterministicRng,
    ) -> Self {
        let deck = Deck::shuffled(&mut rng);
        let status = match kind {
            TableKind::Solo => TableStatus::Playing,
            TableKind::Multi => TableStatus::Lobby,
        };
        Self {
            id,
            channel_id,
            host_id,
            kind,
            max_seats: max_seats.max(1),
            seats: vec![None; max_seats.max(1) as usize],
            dealer_hand: Vec::new(),
            deck,
            rng,
            status,
            turn_order: Vec::new(),
            current_turn_index: 0,
            created_at: Instant::now(),
            history: HandHistory::new(),
        }
    }

    pub fn seated_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_some()).count()
    }

    pub fn ready_count(&self) -> usize {
        self.players().filter(|p| p.is_ready).count()
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.seats.iter().filter_map(|s| s.as_ref())
    }

    pub fn players_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.seats.iter_mut().filter_map(|s| s.as_mut())
    }

    pub fn player(&self, seat: SeatIndex) -> Option<&Player> {
        self.seats.get(seat as usize).and_then(|s| s.as_ref())
    }

    pub fn player_mut(&mut self, seat: SeatIndex) -> Option<&mut Player> {
        self.seats.get_mut(seat as usize).and_then(|s| s.as_mut())
    }

    pub fn seat_of(&self, user_id: UserId) -> Option<SeatIndex> {
        self.players().find(|p| p.user_id == user_id).map(|p| p.seat)
    }

    pub fn first_free_seat(&self) -> Option<SeatIndex> {
        self.seats
            .iter()
            .position(|s| s.is_none())
            .map(|idx| idx as SeatIndex)
    }

    /// Место, чей сейчас ход (если идёт фаза ходов).
    pub fn current_seat(&self) -> Option<SeatIndex> {
        if self.status != TableStatus::Playing {
            return None;
        }
        self.turn_order.get(self.current_turn_index).copied()
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.current_seat().and_then(|seat| self.player(seat))
    }

    /// Сколько игроков сейчас в статусе Playing (инвариант: ≤ 1).
    pub fn playing_count(&self) -> usize {
        self.players()
            .filter(|p| p.status == PlayerStatus::Playing)
            .count()
    }

    pub fn is_finished(&self) -> bool {
        self.status == TableStatus::Finished
    }

    pub fn age_secs(&self) -> u64 {
        self.created_at.elapsed().as_secs()
    }
}
