use serde::{Deserialize, Serialize};

use crate::domain::UserId;

/// Тип действия игрока в свой ход.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlayerActionKind {
    /// Взять карту.
    Hit,
    /// Остановиться.
    Stand,
    /// Удвоить ставку, взять ровно одну карту и остановиться.
    Double,
}

/// Конкретное действие игрока.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerAction {
    pub user_id: UserId,
    pub kind: PlayerActionKind,
}

impl PlayerAction {
    pub fn new(user_id: UserId, kind: PlayerActionKind) -> Self {
        Self { user_id, kind }
    }
}
