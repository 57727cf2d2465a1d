//! Инфраструктурный слой вокруг движка:
//! - генерация ID;
//! - RNG-реализации для движка;
//! - внешние сервисы: баланс, фронт, статистика.

pub mod ids;
pub mod ledger;
pub mod notifier;
pub mod rng;
pub mod stats;

pub use ids::*;
pub use ledger::{InMemoryLedger, Ledger, LedgerError};
pub use notifier::{NoopNotifier, Notifier, RecordingNotifier, Rendered};
pub use rng::*;
pub use stats::{InMemoryStats, SeatRecord, StatsError, StatsSink};
