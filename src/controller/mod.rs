//! Контроллеры: единственная точка мутации столов.
//!
//! Каждая команда берёт замок стола, вызывает `engine::game_loop`,
//! делает списания/зачисления, отпускает замок и только потом
//! обращается к фронту и статистике.

pub mod context;
pub mod errors;
pub mod multi;
pub mod play;
pub mod solo;
pub mod sweeper;

pub use context::GameContext;
pub use errors::GameError;
pub use multi::MultiController;
pub use play::Progress;
pub use solo::SoloController;
pub use sweeper::{SweepReport, Sweeper};
