use serde::{Deserialize, Serialize};

use crate::controller::GameError;
use crate::domain::{Chips, TableId, UserId};
use crate::engine::{EngineError, RegistryError};

/// Ошибки внешнего API (то, что отдаём фронту / клиенту).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ApiError {
    /// Неправильные входные данные (например, битый JSON).
    BadRequest(String),

    /// Стол не найден или уже закрыт.
    TableNotFound(TableId),

    /// Игрок не найден за столом.
    PlayerNotAtTable(UserId),

    /// Команда не может быть выполнена в текущем состоянии.
    InvalidCommand(String),

    /// Не хватает баланса на ставку / удвоение.
    InsufficientFunds { user_id: UserId, needed: Chips },

    /// Лимит столов в канале или игрок уже за другим столом.
    Capacity(String),

    /// Внутренняя ошибка сервера.
    Internal(String),
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::TableNotFound(id) => ApiError::TableNotFound(id),
            EngineError::PlayerNotAtTable(id) => ApiError::PlayerNotAtTable(id),
            EngineError::Internal(_) => ApiError::Internal(err.to_string()),
            other => ApiError::InvalidCommand(other.to_string()),
        }
    }
}

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        match err {
            GameError::Engine(e) => e.into(),
            GameError::Registry(RegistryError::TableNotFound(id)) => ApiError::TableNotFound(id),
            GameError::Registry(e) => ApiError::Capacity(e.to_string()),
            GameError::InsufficientFunds { user_id, needed } => {
                ApiError::InsufficientFunds { user_id, needed }
            }
            GameError::TableNotFound(id) | GameError::TableClosed(id) => {
                ApiError::TableNotFound(id)
            }
            GameError::Ledger(_) | GameError::SettlementFailed { .. } => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}
