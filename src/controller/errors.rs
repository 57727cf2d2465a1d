use thiserror::Error;

use crate::domain::{Chips, TableId, UserId};
use crate::engine::{EngineError, RegistryError};
use crate::infra::LedgerError;

/// Ошибки уровня контроллера (над движком одного стола).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// Проброшенная ошибка валидации движка. Стол не изменился.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Лимит столов или поиск в реестре.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Сбой хранилища балансов.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("У игрока {user_id} не хватает средств: нужно {needed}")]
    InsufficientFunds { user_id: UserId, needed: Chips },

    #[error("Стол {0} не найден")]
    TableNotFound(TableId),

    /// Стол закрыли (сборщик, отмена), пока шла игра.
    #[error("Стол {0} закрыт")]
    TableClosed(TableId),

    /// Часть выплат не прошла. Стол снят с учёта, нужна сверка вручную.
    #[error("Расчёт стола {table_id} не завершён, выплаты не прошли для {failed:?}")]
    SettlementFailed {
        table_id: TableId,
        failed: Vec<UserId>,
    },
}
