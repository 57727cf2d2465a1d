// src/time_ctrl/time_rules.rs
//! Конфигурация тайминга стола: лобби, ставки, ход, темп дилера.
//!
//! Здесь описываем только "правила", без состояния и без привязки к конкретному столу.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::table::TableKind;

/// Профиль тайминга.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TimeProfile {
    /// Как в чат-боте: 30 сек лобби, 15 сек ставок, 45 сек на ход.
    Standard,
    /// Для симуляций и CLI: всё за доли секунды.
    Fast,
}

/// Правила тайминга для одного стола.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimeRules {
    /// Сколько длится лобби до автоматического открытия ставок.
    pub lobby_secs: u64,
    /// Сколько длится приём ставок.
    pub betting_secs: u64,
    /// Время на ход в мультистоле.
    pub turn_timeout_secs: u64,
    /// Время на ход в соло-игре.
    pub solo_turn_timeout_secs: u64,
    /// Пауза между картами дилера (только для показа).
    pub dealer_card_delay_ms: u64,
}

impl TimeRules {
    /// Стандартный профиль.
    pub const fn standard() -> Self {
        Self {
            lobby_secs: 30,
            betting_secs: 15,
            turn_timeout_secs: 45,
            solo_turn_timeout_secs: 120,
            dealer_card_delay_ms: 1500,
        }
    }

    pub const fn fast() -> Self {
        Self {
            lobby_secs: 1,
            betting_secs: 1,
            turn_timeout_secs: 2,
            solo_turn_timeout_secs: 2,
            dealer_card_delay_ms: 10,
        }
    }

    /// Получить правила по профилю.
    pub const fn from_profile(profile: TimeProfile) -> Self {
        match profile {
            TimeProfile::Standard => Self::standard(),
            TimeProfile::Fast => Self::fast(),
        }
    }

    pub fn lobby(&self) -> Duration {
        Duration::from_secs(self.lobby_secs)
    }

    pub fn betting(&self) -> Duration {
        Duration::from_secs(self.betting_secs)
    }

    pub fn turn_timeout(&self, kind: TableKind) -> Duration {
        match kind {
            TableKind::Solo => Duration::from_secs(self.solo_turn_timeout_secs),
            TableKind::Multi => Duration::from_secs(self.turn_timeout_secs),
        }
    }

    pub fn dealer_card_delay(&self) -> Duration {
        Duration::from_millis(self.dealer_card_delay_ms)
    }
}

impl Default for TimeRules {
    fn default() -> Self {
        Self::standard()
    }
}
