use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::controller::{play, GameContext, MultiController, Progress, SoloController};
use crate::domain::chips::Chips;
use crate::domain::{ChannelId, TableId, UserId};
use crate::engine::actions::{PlayerAction, PlayerActionKind};

use super::dto::CommandResponse;
use super::errors::ApiError;

/// Команда верхнего уровня. Каждая 1:1 отображается
/// на метод контроллера.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Command {
    /// Открыть мультистол в канале.
    OpenTable {
        channel_id: ChannelId,
        host_id: UserId,
        display_name: String,
    },

    /// Сыграть одному против дилера.
    StartSolo {
        channel_id: ChannelId,
        user_id: UserId,
        display_name: String,
        stake: Chips,
    },

    /// Сесть за мультистол.
    Join {
        table_id: TableId,
        user_id: UserId,
        display_name: String,
    },

    /// Выбрать ставку.
    PlaceBet {
        table_id: TableId,
        user_id: UserId,
        amount: Chips,
    },

    /// Подтвердить ставку (списание).
    Ready { table_id: TableId, user_id: UserId },

    /// Хозяин начинает раньше таймера.
    StartNow { table_id: TableId, user_id: UserId },

    /// Уйти до раздачи.
    Leave { table_id: TableId, user_id: UserId },

    /// Действие в свой ход (соло или мультистол).
    Act {
        table_id: TableId,
        user_id: UserId,
        action: PlayerActionKind,
    },
}

/// Выполнить команду.
pub async fn dispatch(ctx: &GameContext, command: Command) -> Result<CommandResponse, ApiError> {
    debug!(?command, "dispatch");
    let solo = SoloController::new(ctx.clone());
    let multi = MultiController::new(ctx.clone());

    let progress = match command {
        Command::OpenTable {
            channel_id,
            host_id,
            display_name,
        } => {
            let progress = multi.open(channel_id, host_id, display_name).await?;
            return Ok(CommandResponse::TableCreated(progress.view));
        }
        Command::StartSolo {
            channel_id,
            user_id,
            display_name,
            stake,
        } => solo.start(channel_id, user_id, display_name, stake).await?,
        Command::Join {
            table_id,
            user_id,
            display_name,
        } => multi.join(table_id, user_id, display_name).await?,
        Command::PlaceBet {
            table_id,
            user_id,
            amount,
        } => multi.place_bet(table_id, user_id, amount).await?,
        Command::Ready { table_id, user_id } => multi.ready(table_id, user_id).await?,
        Command::StartNow { table_id, user_id } => multi.start_now(table_id, user_id).await?,
        Command::Leave { table_id, user_id } => multi.leave(table_id, user_id).await?,
        Command::Act {
            table_id,
            user_id,
            action,
        } => play::act(ctx, table_id, PlayerAction::new(user_id, action)).await?,
    };

    Ok(into_response(progress))
}

/// Команда из JSON (CLI, сокет).
pub async fn dispatch_json(ctx: &GameContext, raw: &str) -> Result<CommandResponse, ApiError> {
    let command: Command = serde_json::from_str(raw)?;
    dispatch(ctx, command).await
}

fn into_response(progress: Progress) -> CommandResponse {
    match progress.finished {
        Some(summary) => CommandResponse::Finished(summary),
        None => CommandResponse::TableState(progress.view),
    }
}
