//! Общая часть соло и мультистола: ходы игроков, таймер хода,
//! ход дилера и расчёт.
//!
//! Порядок везде один: взять замок стола, сделать мутацию,
//! снять снимок `TableView`, отпустить замок, и только потом
//! звать фронт и статистику.

use std::sync::Arc;

use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::api::dto::{GameSummary, SeatResult, TableView};
use crate::api::queries::build_table_view;
use crate::domain::table::{TableKind, TableStatus};
use crate::domain::TableId;
use crate::engine::game_loop::{
    apply_action, dealer_step, double_cost, force_stand, settle, DealerStep, TurnState,
};
use crate::engine::registry::SharedTable;
use crate::engine::{EngineError, PlayerAction, PlayerActionKind};
use crate::eval::calculate_value;
use crate::infra::SeatRecord;
use crate::time_ctrl::TurnTicket;

use super::context::GameContext;
use super::errors::GameError;

/// Что получил вызывающий после команды.
#[derive(Clone, Debug, PartialEq)]
pub struct Progress {
    pub view: TableView,
    /// Заполнено, если команда довела игру до расчёта.
    pub finished: Option<GameSummary>,
}

impl Progress {
    pub fn ongoing(view: TableView) -> Self {
        Self {
            view,
            finished: None,
        }
    }
}

/// Hit / Stand / Double для любого типа стола.
pub async fn act(
    ctx: &GameContext,
    table_id: TableId,
    action: PlayerAction,
) -> Result<Progress, GameError> {
    let table = ctx.table(table_id)?;

    let (outcome, view) = {
        let mut t = table.lock().await;

        let outcome = if action.kind == PlayerActionKind::Double {
            let (seat, extra) = double_cost(&t, action.user_id)?;
            if !ctx.ledger.try_debit(action.user_id, extra).await? {
                debug!(table_id, user_id = action.user_id, seat, "double rejected: funds");
                return Err(GameError::InsufficientFunds {
                    user_id: action.user_id,
                    needed: extra,
                });
            }
            match apply_action(&mut t, action) {
                Ok(outcome) => outcome,
                Err(err) => {
                    // Проверки уже пройдены под тем же замком, сюда не попадаем.
                    ctx.ledger.credit(action.user_id, extra).await?;
                    return Err(err.into());
                }
            }
        } else {
            apply_action(&mut t, action)?
        };

        (outcome, build_table_view(&t))
    };

    info!(
        table_id,
        user_id = action.user_id,
        seat = outcome.seat,
        action = ?outcome.kind,
        card = ?outcome.card,
        status = ?outcome.status_after,
        "player acted"
    );
    ctx.notifier.render_table_state(&view).await;

    if outcome.status_after.is_terminal() {
        advance(ctx, &table, table_id, outcome.next, view).await
    } else {
        Ok(Progress::ongoing(view))
    }
}

/// Ход перешёл: либо подсказка следующему игроку и его таймер,
/// либо ход дилера с расчётом.
pub(crate) async fn advance(
    ctx: &GameContext,
    table: &SharedTable,
    table_id: TableId,
    state: TurnState,
    view: TableView,
) -> Result<Progress, GameError> {
    match state {
        TurnState::Turn { seat, .. } => {
            ctx.notifier.render_turn_prompt(&view, seat).await;
            if let Some(ticket) = TurnTicket::for_turn(table_id, state) {
                schedule_turn_timeout(ctx, table, ticket, view.kind);
            }
            Ok(Progress::ongoing(view))
        }
        TurnState::DealerTurn => {
            let summary = run_dealer(ctx, table, table_id).await?;
            Ok(Progress {
                view: summary.table.clone(),
                finished: Some(summary),
            })
        }
    }
}

/// Таймер хода. Под замком проверяет, что ход всё ещё тот же;
/// если игрок успел походить: ничего не делает.
fn schedule_turn_timeout(
    ctx: &GameContext,
    table: &SharedTable,
    ticket: TurnTicket,
    kind: TableKind,
) {
    let ctx = ctx.clone();
    let table = Arc::clone(table);
    let timeout = ctx.config.time.turn_timeout(kind);

    tokio::spawn(async move {
        sleep(timeout).await;

        let (next, view) = {
            let mut t = table.lock().await;
            match force_stand(&mut t, ticket.turn_index, ticket.seat) {
                Some(next) => (next, build_table_view(&t)),
                None => return,
            }
        };

        info!(
            table_id = ticket.table_id,
            user_id = ticket.user_id,
            seat = ticket.seat,
            "turn timed out, forced stand"
        );
        ctx.notifier.render_table_state(&view).await;

        if let Err(err) = advance(&ctx, &table, ticket.table_id, next, view).await {
            error!(table_id = ticket.table_id, %err, "game did not finish after timeout");
        }
    });
}

/// Ход дилера: открыть карту, брать по политике с паузой между
/// картами, затем расчёт.
pub(crate) async fn run_dealer(
    ctx: &GameContext,
    table: &SharedTable,
    table_id: TableId,
) -> Result<GameSummary, GameError> {
    let delay = ctx.config.time.dealer_card_delay();

    let view = {
        let t = table.lock().await;
        if t.status != TableStatus::DealerTurn {
            return Err(GameError::TableClosed(table_id));
        }
        build_table_view(&t)
    };
    info!(table_id, dealer_value = ?view.dealer_value, "dealer reveals");
    ctx.notifier.render_table_state(&view).await;
    sleep(delay).await;

    loop {
        let (step, view) = {
            let mut t = table.lock().await;
            let step = match dealer_step(&mut t) {
                Ok(step) => step,
                Err(EngineError::WrongStatus(_)) => return Err(GameError::TableClosed(table_id)),
                Err(err) => return Err(err.into()),
            };
            (step, build_table_view(&t))
        };

        match step {
            DealerStep::Drew { card, value_after } => {
                debug!(table_id, %card, value_after, "dealer draws");
                ctx.notifier.render_table_state(&view).await;
                sleep(delay).await;
            }
            DealerStep::Stood { value, reason } => {
                info!(table_id, value, ?reason, "dealer stands");
                break;
            }
        }
    }

    settle_table(ctx, table, table_id).await
}

/// Расчёт и выплаты. Каждое зачисление делается один раз; если хоть
/// одна не прошла, стол всё равно снимается с учёта, а ошибка
/// поднимается наверх.
async fn settle_table(
    ctx: &GameContext,
    table: &SharedTable,
    table_id: TableId,
) -> Result<GameSummary, GameError> {
    let (settlements, view, dealer_cards, history) = {
        let mut t = table.lock().await;
        let settlements = match settle(&mut t) {
            Ok(s) => s,
            Err(EngineError::WrongStatus(_)) => return Err(GameError::TableClosed(table_id)),
            Err(err) => return Err(err.into()),
        };
        (
            settlements,
            build_table_view(&t),
            t.dealer_hand.clone(),
            t.history.clone(),
        )
    };

    ctx.registry.remove(table_id);

    let mut failed = Vec::new();
    for s in &settlements {
        if s.payout.is_zero() {
            continue;
        }
        if let Err(err) = ctx.ledger.credit(s.user_id, s.payout).await {
            error!(
                table_id,
                user_id = s.user_id,
                payout = %s.payout,
                %err,
                "payout failed"
            );
            failed.push(s.user_id);
        }
    }
    if !failed.is_empty() {
        error!(table_id, ?failed, "settlement incomplete, table evicted");
        return Err(GameError::SettlementFailed { table_id, failed });
    }

    let results: Vec<SeatResult> = settlements.iter().map(SeatResult::from).collect();
    for r in &results {
        info!(
            table_id,
            user_id = r.user_id,
            outcome = ?r.outcome,
            hand = ?r.hand_type,
            payout = %r.payout,
            "seat settled"
        );
    }
    ctx.notifier.render_result(&view, &results).await;

    for s in &settlements {
        let record = SeatRecord {
            table_id,
            user_id: s.user_id,
            result: s.outcome,
            payout: s.payout,
            hand_type: s.hand_type,
            busted: s.busted,
        };
        if let Err(err) = ctx.stats.record(record).await {
            warn!(table_id, user_id = s.user_id, %err, "stats record dropped");
        }
    }

    Ok(GameSummary {
        dealer_value: calculate_value(&dealer_cards),
        dealer_cards,
        table: view,
        results,
        history,
    })
}
