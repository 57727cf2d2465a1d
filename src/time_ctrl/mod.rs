// src/time_ctrl/mod.rs
//! Контроль времени стола.
//!
//! Здесь собираем:
//! - правила (`TimeRules`);
//! - билет хода (`TurnTicket`), по которому таймер отличает
//!   "свой" ход от уже сменившегося.

pub mod time_rules;
pub mod turn_ticket;

pub use time_rules::{TimeProfile, TimeRules};
pub use turn_ticket::TurnTicket;
