use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::chips::Chips;
use crate::domain::UserId;

/// Сбой внешнего хранилища балансов.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Хранилище балансов недоступно: {0}")]
    Unavailable(String),

    #[error("Хранилище балансов отклонило операцию для игрока {user_id}: {reason}")]
    Rejected { user_id: UserId, reason: String },
}

/// Абстракция баланса игроков.
///
/// Каждая операция делается одной атомарной попыткой:
/// - `try_debit` списывает, только если баланса хватает ("UPDATE ... WHERE balance >= N"),
///   `Ok(false)`: денег не хватило;
/// - `credit` зачисляет безусловно.
///
/// Движок никогда не делает "прочитать баланс, потом записать".
#[async_trait]
pub trait Ledger: Send + Sync {
    async fn try_debit(&self, user_id: UserId, amount: Chips) -> Result<bool, LedgerError>;

    async fn credit(&self, user_id: UserId, amount: Chips) -> Result<(), LedgerError>;

    async fn balance(&self, user_id: UserId) -> Result<Chips, LedgerError>;
}

/// Простая in-memory реализация для тестов и локального запуска.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    balances: Mutex<HashMap<UserId, Chips>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balances(balances: impl IntoIterator<Item = (UserId, Chips)>) -> Self {
        Self {
            balances: Mutex::new(balances.into_iter().collect()),
        }
    }

    pub fn set_balance(&self, user_id: UserId, amount: Chips) {
        self.lock().insert(user_id, amount);
    }

    /// Сумма всех балансов (для проверок сохранения денег).
    pub fn total(&self) -> Chips {
        self.lock().values().fold(Chips::ZERO, |acc, c| acc + *c)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<UserId, Chips>> {
        self.balances.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Ledger for InMemoryLedger {
    async fn try_debit(&self, user_id: UserId, amount: Chips) -> Result<bool, LedgerError> {
        let mut balances = self.lock();
        let balance = balances.entry(user_id).or_default();
        if *balance < amount {
            return Ok(false);
        }
        *balance -= amount;
        Ok(true)
    }

    async fn credit(&self, user_id: UserId, amount: Chips) -> Result<(), LedgerError> {
        *self.lock().entry(user_id).or_default() += amount;
        Ok(())
    }

    async fn balance(&self, user_id: UserId) -> Result<Chips, LedgerError> {
        Ok(self.lock().get(&user_id).copied().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn debit_fails_closed() {
        let ledger = InMemoryLedger::with_balances([(1, Chips(10))]);
        assert!(!ledger.try_debit(1, Chips(11)).await.unwrap());
        assert_eq!(ledger.balance(1).await.unwrap(), Chips(10));
        assert!(ledger.try_debit(1, Chips(10)).await.unwrap());
        assert_eq!(ledger.balance(1).await.unwrap(), Chips::ZERO);
    }

    #[tokio::test]
    async fn unknown_user_has_zero() {
        let ledger = InMemoryLedger::new();
        assert_eq!(ledger.balance(42).await.unwrap(), Chips::ZERO);
        ledger.credit(42, Chips(3)).await.unwrap();
        assert_eq!(ledger.total(), Chips(3));
    }
}
