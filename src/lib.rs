//! Движок Xì Dách (вьетнамский блэкджек) для чат-ботов и сервисов.
//!
//! Слои:
//! - `domain` – карты, колода, игроки, столы (простые данные);
//! - `eval` – подсчёт очков, типы рук, сравнение с дилером;
//! - `engine` – переходы стола, политика дилера, реестр столов;
//! - `controller` – замки, таймеры, баланс, фронт;
//! - `api` – команды, запросы, DTO;
//! - `infra` – RNG, ID, внешние сервисы (ledger, notifier, stats).

pub mod api;
pub mod config;
pub mod controller;
pub mod domain;
pub mod engine;
pub mod eval;
pub mod infra;
pub mod time_ctrl;

pub use config::EngineConfig;
pub use controller::{GameContext, GameError, MultiController, SoloController, Sweeper};
