//! Движок Xì Dách: правила хода, дилер, расчёт, реестр столов.
//!
//! Все функции `game_loop` работают над `&mut Table` и не знают
//! про замки, таймеры и баланс: это забота `controller`.
//! Основные операции:
//!   - `close_betting` / `deal` – раздача
//!   - `apply_action` / `force_stand` – ход игрока
//!   - `dealer_step` / `settle` – ход дилера и расчёт

pub mod actions;
pub mod dealer;
pub mod errors;
pub mod game_loop;
pub mod hand_history;
pub mod registry;
pub mod validation;

pub use actions::{PlayerAction, PlayerActionKind};
pub use dealer::{dealer_decision, DealerDecision, DealerReason};
pub use errors::EngineError;
pub use game_loop::{
    apply_action, cancel, close_betting, current_turn, deal, dealer_step, double_cost,
    force_stand, mark_ready, open_betting, prepare_ready, remove_player, seat_player,
    seat_staked_player, select_stake, settle, ActionOutcome, BettingClosed, DealerStep,
    SeatSettlement, TurnState,
};
pub use hand_history::{HandEvent, HandEventKind, HandHistory};
pub use registry::{RegistryError, RegistryLimits, SharedTable, TableRegistry};

/// RNG интерфейс для engine.
/// Реализации в `infra::rng` (обёртки над `rand`).
pub trait RandomSource {
    fn shuffle<T>(&mut self, slice: &mut [T]);
}
