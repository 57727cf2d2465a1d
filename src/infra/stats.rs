use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::chips::Chips;
use crate::domain::{TableId, UserId};
use crate::eval::{HandType, Outcome};

/// Одна запись статистики на каждое сыгранное место.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatRecord {
    pub table_id: TableId,
    pub user_id: UserId,
    pub result: Outcome,
    pub payout: Chips,
    pub hand_type: HandType,
    pub busted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    #[error("Статистика недоступна: {0}")]
    Unavailable(String),
}

/// Приёмник статистики и ачивок. Вызывается после расчёта;
/// его ошибка расчёт не откатывает.
#[async_trait]
pub trait StatsSink: Send + Sync {
    async fn record(&self, record: SeatRecord) -> Result<(), StatsError>;
}

#[derive(Debug, Default)]
pub struct InMemoryStats {
    records: Mutex<Vec<SeatRecord>>,
}

impl InMemoryStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<SeatRecord> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<SeatRecord>> {
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl StatsSink for InMemoryStats {
    async fn record(&self, record: SeatRecord) -> Result<(), StatsError> {
        self.lock().push(record);
        Ok(())
    }
}
