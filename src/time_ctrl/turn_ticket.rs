// src/time_ctrl/turn_ticket.rs
//! Идентичность хода для таймера.

use serde::{Deserialize, Serialize};

use crate::domain::{SeatIndex, TableId, UserId};
use crate::engine::game_loop::TurnState;

/// Какой именно ход ждёт таймер. Таймер срабатывает,
/// только если под замком стола ход всё ещё тот же.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TurnTicket {
    pub table_id: TableId,
    pub seat: SeatIndex,
    pub turn_index: usize,
    pub user_id: UserId,
}

impl TurnTicket {
    /// Билет для хода игрока; для хода дилера: `None`.
    pub fn for_turn(table_id: TableId, state: TurnState) -> Option<Self> {
        match state {
            TurnState::Turn {
                seat,
                turn_index,
                user_id,
            } => Some(Self {
                table_id,
                seat,
                turn_index,
                user_id,
            }),
            TurnState::DealerTurn => None,
        }
    }
}
