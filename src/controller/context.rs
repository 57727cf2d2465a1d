use std::sync::Arc;

use crate::config::EngineConfig;
use crate::domain::TableId;
use crate::engine::registry::{SharedTable, TableRegistry};
use crate::infra::{InMemoryLedger, InMemoryStats, Ledger, NoopNotifier, Notifier, StatsSink};

use super::errors::GameError;

/// Всё, с чем работают контроллеры. Дёшево клонируется
/// и уезжает в фоновые таймеры.
#[derive(Clone)]
pub struct GameContext {
    pub config: Arc<EngineConfig>,
    pub registry: Arc<TableRegistry>,
    pub ledger: Arc<dyn Ledger>,
    pub notifier: Arc<dyn Notifier>,
    pub stats: Arc<dyn StatsSink>,
}

impl GameContext {
    pub fn new(
        config: EngineConfig,
        ledger: Arc<dyn Ledger>,
        notifier: Arc<dyn Notifier>,
        stats: Arc<dyn StatsSink>,
    ) -> Self {
        let registry = Arc::new(TableRegistry::new(config.registry_limits()));
        Self {
            config: Arc::new(config),
            registry,
            ledger,
            notifier,
            stats,
        }
    }

    /// Контекст целиком в памяти, без фронта.
    pub fn in_memory(config: EngineConfig, ledger: Arc<InMemoryLedger>) -> Self {
        Self::new(
            config,
            ledger,
            Arc::new(NoopNotifier),
            Arc::new(InMemoryStats::new()),
        )
    }

    pub fn table(&self, table_id: TableId) -> Result<SharedTable, GameError> {
        self.registry
            .get(table_id)
            .ok_or(GameError::TableNotFound(table_id))
    }
}
