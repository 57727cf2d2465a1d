//! Мультистол: лобби → ставки → игра.

use std::sync::Arc;

use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::api::dto::TableView;
use crate::api::queries::build_table_view;
use crate::domain::chips::Chips;
use crate::domain::table::{TableKind, TableStatus};
use crate::domain::{ChannelId, TableId, UserId};
use crate::engine::game_loop::{
    cancel, close_betting, mark_ready, open_betting, prepare_ready, remove_player, seat_player,
    select_stake, BettingClosed,
};
use crate::engine::registry::SharedTable;
use crate::engine::validation::{ensure_host, ensure_pre_deal};
use crate::engine::{EngineError, PlayerAction, PlayerActionKind};

use super::context::GameContext;
use super::errors::GameError;
use super::play::{act, advance, Progress};

#[derive(Clone)]
pub struct MultiController {
    ctx: GameContext,
}

impl MultiController {
    pub fn new(ctx: GameContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &GameContext {
        &self.ctx
    }

    /// Открыть стол. Хозяин садится первым; через `lobby_secs`
    /// приём ставок откроется сам.
    pub async fn open(
        &self,
        channel_id: ChannelId,
        host_id: UserId,
        display_name: String,
    ) -> Result<Progress, GameError> {
        let ctx = &self.ctx;
        let (table_id, table) = ctx.registry.create(channel_id, host_id, TableKind::Multi)?;

        let view = {
            let mut t = table.lock().await;
            if let Err(err) = seat_player(&mut t, host_id, display_name) {
                ctx.registry.remove(table_id);
                return Err(err.into());
            }
            build_table_view(&t)
        };

        info!(table_id, channel_id, host_id, "lobby opened");
        ctx.notifier.render_table_state(&view).await;
        schedule_lobby_timer(ctx, &table, table_id);
        Ok(Progress::ongoing(view))
    }

    /// Сесть за стол (только в лобби, не больше одного стола на игрока).
    pub async fn join(
        &self,
        table_id: TableId,
        user_id: UserId,
        display_name: String,
    ) -> Result<Progress, GameError> {
        let ctx = &self.ctx;
        let table = ctx.table(table_id)?;
        ctx.registry.index_user(user_id, table_id)?;

        let view = {
            let mut t = table.lock().await;
            if let Err(err) = seat_player(&mut t, user_id, display_name) {
                if err != EngineError::AlreadySeated(user_id) {
                    ctx.registry.unindex_user(user_id, table_id);
                }
                debug!(table_id, user_id, %err, "join rejected");
                return Err(err.into());
            }
            build_table_view(&t)
        };

        info!(table_id, user_id, seated = view.seats.len(), "player joined");
        ctx.notifier.render_table_state(&view).await;
        Ok(Progress::ongoing(view))
    }

    /// Выбрать ставку. Баланс не трогается до `ready`.
    pub async fn place_bet(
        &self,
        table_id: TableId,
        user_id: UserId,
        amount: Chips,
    ) -> Result<Progress, GameError> {
        let ctx = &self.ctx;
        let table = ctx.table(table_id)?;

        let view = {
            let mut t = table.lock().await;
            select_stake(&mut t, user_id, amount, ctx.config.min_bet)?;
            build_table_view(&t)
        };

        debug!(table_id, user_id, amount = %amount, "stake selected");
        ctx.notifier.render_table_state(&view).await;
        Ok(Progress::ongoing(view))
    }

    /// Подтвердить ставку: атомарное списание под замком стола.
    /// Если в фазе ставок готовы все: сразу раздача.
    pub async fn ready(&self, table_id: TableId, user_id: UserId) -> Result<Progress, GameError> {
        let ctx = &self.ctx;
        let table = ctx.table(table_id)?;

        let (closed, view) = {
            let mut t = table.lock().await;
            let (seat, stake) = prepare_ready(&t, user_id)?;

            if !ctx.ledger.try_debit(user_id, stake).await? {
                debug!(table_id, user_id, stake = %stake, "ready rejected: funds");
                return Err(GameError::InsufficientFunds {
                    user_id,
                    needed: stake,
                });
            }
            let all_ready = mark_ready(&mut t, seat, stake)?;
            info!(table_id, user_id, seat, stake = %stake, "stake locked");

            let closed = if all_ready && t.status == TableStatus::Betting {
                Some(close_betting(&mut t)?)
            } else {
                None
            };
            (closed, build_table_view(&t))
        };

        match closed {
            Some(closed) => finish_betting(ctx, &table, table_id, closed, view).await,
            None => {
                ctx.notifier.render_table_state(&view).await;
                Ok(Progress::ongoing(view))
            }
        }
    }

    /// Только хозяин. Из лобби открывает ставки (и сразу раздаёт,
    /// если все уже готовы), из ставок раздаёт.
    pub async fn start_now(&self, table_id: TableId, user_id: UserId) -> Result<Progress, GameError> {
        let ctx = &self.ctx;
        let table = ctx.table(table_id)?;

        let (closed, view) = {
            let mut t = table.lock().await;
            ensure_host(&t, user_id)?;
            let closed = match t.status {
                TableStatus::Lobby => {
                    if open_betting(&mut t)? {
                        Some(close_betting(&mut t)?)
                    } else {
                        None
                    }
                }
                TableStatus::Betting => Some(close_betting(&mut t)?),
                other => return Err(EngineError::WrongStatus(other).into()),
            };
            (closed, build_table_view(&t))
        };

        info!(table_id, host_id = user_id, status = ?view.status, "host started early");
        match closed {
            Some(closed) => finish_betting(ctx, &table, table_id, closed, view).await,
            None => {
                ctx.notifier.render_table_state(&view).await;
                schedule_betting_timer(ctx, &table, table_id);
                Ok(Progress::ongoing(view))
            }
        }
    }

    /// Уйти до раздачи. Подтверждённая ставка возвращается.
    /// Если за столом никого не осталось: стол закрывается.
    pub async fn leave(&self, table_id: TableId, user_id: UserId) -> Result<Progress, GameError> {
        let ctx = &self.ctx;
        let table = ctx.table(table_id)?;

        let (view, refunded, dissolved) = {
            let mut t = table.lock().await;
            ensure_pre_deal(&t)?;

            let seat = t
                .seat_of(user_id)
                .ok_or(EngineError::PlayerNotAtTable(user_id))?;
            let refund = t
                .player(seat)
                .filter(|p| p.is_in_round())
                .map(|p| p.stake)
                .unwrap_or(Chips::ZERO);

            if !refund.is_zero() {
                ctx.ledger.credit(user_id, refund).await?;
            }
            remove_player(&mut t, user_id)?;

            let dissolved = t.seated_count() == 0;
            if dissolved {
                // Последнее место уже снято, возвращать нечего.
                let refunds = cancel(&mut t);
                debug_assert!(refunds.is_empty());
            } else if t.host_id == user_id {
                let next_host = t.players().next().map(|p| p.user_id);
                if let Some(next_host) = next_host {
                    t.host_id = next_host;
                }
            }
            (build_table_view(&t), refund, dissolved)
        };

        ctx.registry.unindex_user(user_id, table_id);
        if dissolved {
            ctx.registry.remove(table_id);
        }
        info!(table_id, user_id, refunded = %refunded, dissolved, "player left");
        ctx.notifier.render_table_state(&view).await;
        Ok(Progress::ongoing(view))
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

/// После закрытия ставок: снять индексы выбывших, затем
/// либо закрыть стол, либо начать ходы.
async fn finish_betting(
    ctx: &GameContext,
    table: &SharedTable,
    table_id: TableId,
    closed: BettingClosed,
    view: TableView,
) -> Result<Progress, GameError> {
    match closed {
        BettingClosed::Cancelled { dropped } => {
            for user_id in dropped {
                ctx.registry.unindex_user(user_id, table_id);
            }
            ctx.registry.remove(table_id);
            info!(table_id, "nobody ready, table dissolved");
            ctx.notifier.render_table_state(&view).await;
            Ok(Progress::ongoing(view))
        }
        BettingClosed::Dealt { dropped, first } => {
            for &user_id in &dropped {
                ctx.registry.unindex_user(user_id, table_id);
            }
            info!(table_id, ?dropped, players = view.seats.len(), "cards dealt");
            ctx.notifier.render_table_state(&view).await;
            advance(ctx, table, table_id, first, view).await
        }
    }
}

fn schedule_lobby_timer(ctx: &GameContext, table: &SharedTable, table_id: TableId) {
    let ctx = ctx.clone();
    let table = Arc::clone(table);
    let wait = ctx.config.time.lobby();

    tokio::spawn(async move {
        sleep(wait).await;

        let (closed, view) = {
            let mut t = table.lock().await;
            if t.status != TableStatus::Lobby {
                return;
            }
            let all_ready = match open_betting(&mut t) {
                Ok(all_ready) => all_ready,
                Err(_) => return,
            };
            let closed = if all_ready {
                match close_betting(&mut t) {
                    Ok(closed) => Some(closed),
                    Err(err) => {
                        error!(table_id, %err, "lobby timer could not close betting");
                        return;
                    }
                }
            } else {
                None
            };
            (closed, build_table_view(&t))
        };

        match closed {
            Some(closed) => {
                info!(table_id, "lobby closed, everyone ready, dealing");
                if let Err(err) = finish_betting(&ctx, &table, table_id, closed, view).await {
                    error!(table_id, %err, "game did not finish after lobby timer");
                }
            }
            None => {
                info!(table_id, "lobby closed, betting opened");
                ctx.notifier.render_table_state(&view).await;
                schedule_betting_timer(&ctx, &table, table_id);
            }
        }
    });
}

fn schedule_betting_timer(ctx: &GameContext, table: &SharedTable, table_id: TableId) {
    let ctx = ctx.clone();
    let table = Arc::clone(table);
    let wait = ctx.config.time.betting();

    tokio::spawn(async move {
        sleep(wait).await;

        let (closed, view) = {
            let mut t = table.lock().await;
            if t.status != TableStatus::Betting {
                return;
            }
            match close_betting(&mut t) {
                Ok(closed) => (closed, build_table_view(&t)),
                Err(err) => {
                    error!(table_id, %err, "betting timer could not close betting");
                    return;
                }
            }
        };

        info!(table_id, "betting time is over");
        if let Err(err) = finish_betting(&ctx, &table, table_id, closed, view).await {
            error!(table_id, %err, "game did not finish after betting timer");
        }
    });
}
