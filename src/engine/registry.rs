// src/engine/registry.rs

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::domain::table::{Table, TableKind};
use crate::domain::{ChannelId, TableId, UserId};
use crate::infra::ids::IdGenerator;
use crate::infra::rng::DeterministicRng;

/// Стол под собственным замком. Любая мутация: только под ним.
pub type SharedTable = Arc<tokio::sync::Mutex<Table>>;

/// Ошибки реестра столов (ёмкость и поиск).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("В канале {channel_id} уже {limit} активных столов")]
    ChannelFull { channel_id: ChannelId, limit: usize },

    #[error("Игрок {user_id} уже сидит за столом {table_id}")]
    UserAlreadySeated { user_id: UserId, table_id: TableId },

    #[error("Стол {0} не найден")]
    TableNotFound(TableId),
}

/// Параметры, с которыми реестр создаёт столы.
#[derive(Clone, Debug)]
pub struct RegistryLimits {
    pub max_tables_per_channel: usize,
    pub max_players_per_table: u8,
    /// Если задан: RNG каждого стола детерминирован (seed ^ table_id).
    pub rng_seed: Option<u64>,
}

struct RegisteredTable {
    table: SharedTable,
    channel_id: ChannelId,
    created_at: Instant,
}

#[derive(Default)]
struct Indices {
    tables: HashMap<TableId, RegisteredTable>,
    by_channel: HashMap<ChannelId, Vec<TableId>>,
    by_user: HashMap<UserId, TableId>,
}

impl Indices {
    fn drop_table(&mut self, table_id: TableId) -> Option<RegisteredTable> {
        let entry = self.tables.remove(&table_id)?;
        if let Some(ids) = self.by_channel.get_mut(&entry.channel_id) {
            ids.retain(|id| *id != table_id);
            if ids.is_empty() {
                self.by_channel.remove(&entry.channel_id);
            }
        }
        self.by_user.retain(|_, id| *id != table_id);
        Some(entry)
    }
}

/// Реестр активных столов:
/// - столы по TableId;
/// - список столов канала (для лимита на канал);
/// - стол каждого игрока (не больше одного стола на игрока).
///
/// Индексы под коротким `std::sync::Mutex`, который никогда
/// не держится через `.await`.
pub struct TableRegistry {
    inner: Mutex<Indices>,
    ids: IdGenerator,
    limits: RegistryLimits,
}

impl TableRegistry {
    pub fn new(limits: RegistryLimits) -> Self {
        Self {
            inner: Mutex::new(Indices::default()),
            ids: IdGenerator::new(),
            limits,
        }
    }

    fn indices(&self) -> MutexGuard<'_, Indices> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn table_rng(&self, table_id: TableId) -> DeterministicRng {
        match self.limits.rng_seed {
            Some(seed) => DeterministicRng::from_seed(seed ^ table_id),
            None => DeterministicRng::from_entropy(),
        }
    }

    /// Создать стол в канале. Хозяин сразу индексируется за этим столом.
    pub fn create(
        &self,
        channel_id: ChannelId,
        host_id: UserId,
        kind: TableKind,
    ) -> Result<(TableId, SharedTable), RegistryError> {
        let mut idx = self.indices();

        if let Some(&table_id) = idx.by_user.get(&host_id) {
            return Err(RegistryError::UserAlreadySeated {
                user_id: host_id,
                table_id,
            });
        }
        let in_channel = idx.by_channel.get(&channel_id).map_or(0, Vec::len);
        if in_channel >= self.limits.max_tables_per_channel {
            return Err(RegistryError::ChannelFull {
                channel_id,
                limit: self.limits.max_tables_per_channel,
            });
        }

        let table_id = self.ids.next_table_id();
        let max_seats = match kind {
            TableKind::Solo => 1,
            TableKind::Multi => self.limits.max_players_per_table,
        };
        let table = Table::new(
            table_id,
            channel_id,
            host_id,
            kind,
            max_seats,
            self.table_rng(table_id),
        );
        let shared: SharedTable = Arc::new(tokio::sync::Mutex::new(table));

        idx.tables.insert(
            table_id,
            RegisteredTable {
                table: Arc::clone(&shared),
                channel_id,
                created_at: Instant::now(),
            },
        );
        idx.by_channel.entry(channel_id).or_default().push(table_id);
        idx.by_user.insert(host_id, table_id);

        info!(table_id, channel_id, host_id, ?kind, "table created");
        Ok((table_id, shared))
    }

    pub fn get(&self, table_id: TableId) -> Option<SharedTable> {
        self.indices()
            .tables
            .get(&table_id)
            .map(|entry| Arc::clone(&entry.table))
    }

    pub fn tables_in_channel(&self, channel_id: ChannelId) -> Vec<TableId> {
        self.indices()
            .by_channel
            .get(&channel_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn table_of_user(&self, user_id: UserId) -> Option<TableId> {
        self.indices().by_user.get(&user_id).copied()
    }

    /// Зарезервировать игрока за столом. Повторный вызов для того же
    /// стола ничего не меняет.
    pub fn index_user(&self, user_id: UserId, table_id: TableId) -> Result<(), RegistryError> {
        let mut idx = self.indices();
        if !idx.tables.contains_key(&table_id) {
            return Err(RegistryError::TableNotFound(table_id));
        }
        match idx.by_user.get(&user_id) {
            Some(&current) if current != table_id => Err(RegistryError::UserAlreadySeated {
                user_id,
                table_id: current,
            }),
            _ => {
                idx.by_user.insert(user_id, table_id);
                Ok(())
            }
        }
    }

    /// Снять игрока с индекса, если он числится именно за этим столом.
    pub fn unindex_user(&self, user_id: UserId, table_id: TableId) {
        let mut idx = self.indices();
        if idx.by_user.get(&user_id) == Some(&table_id) {
            idx.by_user.remove(&user_id);
        }
    }

    /// Убрать стол и всех его игроков из индексов.
    pub fn remove(&self, table_id: TableId) -> Option<SharedTable> {
        let removed = self.indices().drop_table(table_id).map(|e| e.table);
        if removed.is_some() {
            debug!(table_id, "table removed from registry");
        }
        removed
    }

    /// Снять с учёта все столы старше `max_age` (в любом статусе).
    /// Возвращает снятые столы: возвраты ставок делает вызывающий код.
    pub fn sweep_stale(&self, max_age: Duration) -> Vec<(TableId, SharedTable)> {
        let mut idx = self.indices();
        let stale: Vec<TableId> = idx
            .tables
            .iter()
            .filter(|(_, entry)| entry.created_at.elapsed() > max_age)
            .map(|(id, _)| *id)
            .collect();

        stale
            .into_iter()
            .filter_map(|id| idx.drop_table(id).map(|entry| (id, entry.table)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.indices().tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn limits(&self) -> &RegistryLimits {
        &self.limits
    }
}
