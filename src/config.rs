//! Настройки движка: лимиты, тайминги, RNG.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::engine::registry::RegistryLimits;
use crate::time_ctrl::TimeRules;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    pub min_bet: Chips,
    pub max_players_per_table: u8,
    pub max_tables_per_channel: usize,
    /// Стол старше этого снимается сборщиком в любом статусе.
    pub stale_table_max_age_secs: u64,
    pub sweep_interval_secs: u64,
    pub time: TimeRules,
    /// Фиксированный seed для воспроизводимых раздач.
    pub rng_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_bet: Chips(1),
            max_players_per_table: 8,
            max_tables_per_channel: 3,
            stale_table_max_age_secs: 600,
            sweep_interval_secs: 300,
            time: TimeRules::standard(),
            rng_seed: None,
        }
    }
}

impl EngineConfig {
    /// Читает `XIDACH_*` переменные; отсутствующие или битые берут значение по умолчанию.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            min_bet: Chips(read_env("XIDACH_MIN_BET", d.min_bet.0)),
            max_players_per_table: read_env("XIDACH_MAX_PLAYERS", d.max_players_per_table),
            max_tables_per_channel: read_env("XIDACH_MAX_TABLES_PER_CHANNEL", d.max_tables_per_channel),
            stale_table_max_age_secs: read_env("XIDACH_STALE_TABLE_SECS", d.stale_table_max_age_secs),
            sweep_interval_secs: read_env("XIDACH_SWEEP_INTERVAL_SECS", d.sweep_interval_secs),
            time: TimeRules {
                lobby_secs: read_env("XIDACH_LOBBY_SECS", d.time.lobby_secs),
                betting_secs: read_env("XIDACH_BETTING_SECS", d.time.betting_secs),
                turn_timeout_secs: read_env("XIDACH_TURN_TIMEOUT_SECS", d.time.turn_timeout_secs),
                solo_turn_timeout_secs: read_env(
                    "XIDACH_SOLO_TURN_TIMEOUT_SECS",
                    d.time.solo_turn_timeout_secs,
                ),
                dealer_card_delay_ms: read_env(
                    "XIDACH_DEALER_CARD_DELAY_MS",
                    d.time.dealer_card_delay_ms,
                ),
            },
            rng_seed: std::env::var("XIDACH_RNG_SEED")
                .ok()
                .and_then(|raw| raw.parse::<u64>().ok()),
        }
    }

    /// JSON-документ; отсутствующие поля берут значение по умолчанию.
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn stale_table_max_age(&self) -> Duration {
        Duration::from_secs(self.stale_table_max_age_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }

    pub fn registry_limits(&self) -> RegistryLimits {
        RegistryLimits {
            max_tables_per_channel: self.max_tables_per_channel,
            max_players_per_table: self.max_players_per_table,
            rng_seed: self.rng_seed,
        }
    }
}

fn read_env<T: FromStr>(key: &str, fallback: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.parse::<T>().ok())
        .unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_fills_missing_fields() {
        let cfg = EngineConfig::from_json_str(r#"{"min_bet": 5, "time": {"betting_secs": 3}}"#)
            .unwrap();
        assert_eq!(cfg.min_bet, Chips(5));
        assert_eq!(cfg.time.betting_secs, 3);
        assert_eq!(cfg.time.turn_timeout_secs, 45);
        assert_eq!(cfg.max_tables_per_channel, 3);
    }

    #[test]
    fn broken_json_is_an_error() {
        assert!(EngineConfig::from_json_str("{min_bet").is_err());
    }
}
