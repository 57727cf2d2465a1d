use tracing::{debug, info};

use crate::api::queries::build_table_view;
use crate::domain::chips::Chips;
use crate::domain::table::TableKind;
use crate::domain::{ChannelId, TableId, UserId};
use crate::engine::game_loop::{deal, seat_staked_player};
use crate::engine::validation::validate_stake;
use crate::engine::{PlayerAction, PlayerActionKind};

use super::context::GameContext;
use super::errors::GameError;
use super::play::{act, advance, Progress};

/// Один игрок против дилера: ставка списывается при создании,
/// карты раздаются сразу.
#[derive(Clone)]
pub struct SoloController {
    ctx: GameContext,
}

impl SoloController {
    pub fn new(ctx: GameContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &GameContext {
        &self.ctx
    }

    /// Создать соло-стол, списать ставку и раздать.
    /// При Xì Bàn игра заканчивается прямо здесь.
    pub async fn start(
        &self,
        channel_id: ChannelId,
        user_id: UserId,
        display_name: String,
        stake: Chips,
    ) -> Result<Progress, GameError> {
        let ctx = &self.ctx;
        validate_stake(stake, ctx.config.min_bet)?;

        let (table_id, table) = ctx.registry.create(channel_id, user_id, TableKind::Solo)?;

        let (state, view) = {
            let mut t = table.lock().await;

            let debited = match ctx.ledger.try_debit(user_id, stake).await {
                Ok(debited) => debited,
                Err(err) => {
                    ctx.registry.remove(table_id);
                    return Err(err.into());
                }
            };
            if !debited {
                ctx.registry.remove(table_id);
                debug!(table_id, user_id, stake = %stake, "solo rejected: funds");
                return Err(GameError::InsufficientFunds {
                    user_id,
                    needed: stake,
                });
            }

            let dealt = seat_staked_player(&mut t, user_id, display_name, stake)
                .and_then(|_| deal(&mut t));
            let state = match dealt {
                Ok(state) => state,
                Err(err) => {
                    ctx.registry.remove(table_id);
                    ctx.ledger.credit(user_id, stake).await?;
                    return Err(err.into());
                }
            };
            (state, build_table_view(&t))
        };

        info!(table_id, user_id, stake = %stake, "solo game dealt");
        ctx.notifier.render_table_state(&view).await;
        advance(ctx, &table, table_id, state, view).await
    }

    pub async fn hit(&self, table_id: TableId, user_id: UserId) -> Result<Progress, GameError> {
        act(&self.ctx, table_id, PlayerAction::new(user_id, PlayerActionKind::Hit)).await
    }

    pub async fn stand(&self, table_id: TableId, user_id: UserId) -> Result<Progress, GameError> {
        act(&self.ctx, table_id, PlayerAction::new(user_id, PlayerActionKind::Stand)).await
    }

    pub async fn double(&self, table_id: TableId, user_id: UserId) -> Result<Progress, GameError> {
        act(&self.ctx, table_id, PlayerAction::new(user_id, PlayerActionKind::Double)).await
    }
}
