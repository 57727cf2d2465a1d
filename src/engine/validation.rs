use crate::domain::chips::Chips;
use crate::domain::player::PlayerStatus;
use crate::domain::table::{Table, TableStatus};
use crate::domain::{SeatIndex, UserId};
use crate::engine::actions::{PlayerAction, PlayerActionKind};
use crate::engine::errors::EngineError;

/// Проверка, может ли игрок сделать это действие прямо сейчас.
/// Возвращает место игрока. Состояние стола не трогает.
pub fn validate_action(table: &Table, action: &PlayerAction) -> Result<SeatIndex, EngineError> {
    if table.status != TableStatus::Playing {
        return Err(EngineError::WrongStatus(table.status));
    }

    let seat = table
        .seat_of(action.user_id)
        .ok_or(EngineError::PlayerNotAtTable(action.user_id))?;

    if table.current_seat() != Some(seat) {
        return Err(EngineError::NotPlayersTurn(action.user_id));
    }

    let player = table
        .player(seat)
        .ok_or(EngineError::Internal("turn order points to an empty seat"))?;

    if player.status != PlayerStatus::Playing {
        return Err(EngineError::TurnAlreadyOver(seat));
    }

    if action.kind == PlayerActionKind::Double && !player.can_double() {
        return Err(EngineError::CannotDouble);
    }

    Ok(seat)
}

/// Проверка размера ставки.
pub fn validate_stake(amount: Chips, min_bet: Chips) -> Result<(), EngineError> {
    if amount.is_zero() || amount < min_bet {
        return Err(EngineError::StakeBelowMinimum {
            min: min_bet,
            got: amount,
        });
    }
    Ok(())
}

/// Ставки можно выбирать и подтверждать только до раздачи.
pub fn ensure_pre_deal(table: &Table) -> Result<(), EngineError> {
    match table.status {
        TableStatus::Lobby | TableStatus::Betting => Ok(()),
        other => Err(EngineError::WrongStatus(other)),
    }
}

pub fn ensure_host(table: &Table, user_id: UserId) -> Result<(), EngineError> {
    if table.host_id != user_id {
        return Err(EngineError::NotHost);
    }
    Ok(())
}
