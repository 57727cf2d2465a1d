use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::TableId;

/// Генерация ID столов на основе монотонного счётчика.
/// ID никогда не переиспользуются в пределах процесса.
#[derive(Debug)]
pub struct IdGenerator {
    table_counter: AtomicU64,
}

impl IdGenerator {
    /// Создать генератор с начальным значением 1.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: TableId) -> Self {
        Self {
            table_counter: AtomicU64::new(first),
        }
    }

    #[inline]
    pub fn next_table_id(&self) -> TableId {
        self.table_counter.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
