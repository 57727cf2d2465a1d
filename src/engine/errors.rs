use crate::domain::{Chips, SeatIndex, TableId, TableStatus, UserId};

use thiserror::Error;

/// Ошибки валидации движка. Любая из них означает:
/// состояние стола не изменилось, ответ получает только сам игрок.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Стол {0} не найден")]
    TableNotFound(TableId),

    #[error("Игрок {0} не сидит за этим столом")]
    PlayerNotAtTable(UserId),

    #[error("Игрок {0} уже сидит за этим столом")]
    AlreadySeated(UserId),

    #[error("Свободных мест нет")]
    TableFull,

    #[error("Действие недоступно в стадии {0:?}")]
    WrongStatus(TableStatus),

    #[error("Сейчас не ход игрока {0}")]
    NotPlayersTurn(UserId),

    #[error("Игрок на месте {0} уже закончил ход")]
    TurnAlreadyOver(SeatIndex),

    #[error("Игрок {0} уже подтвердил ставку")]
    AlreadyReady(UserId),

    #[error("Ставка не выбрана")]
    NoStakeSelected,

    #[error("Ставка {got} меньше минимальной {min}")]
    StakeBelowMinimum { min: Chips, got: Chips },

    #[error("Удвоение возможно только с двумя картами и один раз")]
    CannotDouble,

    #[error("Только хозяин стола может это сделать")]
    NotHost,

    #[error("Нет ни одного игрока со ставкой")]
    NoReadyPlayers,

    #[error("Внутренняя ошибка: {0}")]
    Internal(&'static str),
}
