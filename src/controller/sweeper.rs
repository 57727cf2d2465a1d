use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

use crate::domain::{Chips, TableId, UserId};
use crate::engine::game_loop::cancel;

use super::context::GameContext;

/// Итог одного прохода сборщика.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub removed: Vec<TableId>,
    pub refunded: Vec<(UserId, Chips)>,
    /// Возвраты, которые не прошли (нужна ручная сверка).
    pub failed: Vec<(UserId, Chips)>,
}

/// Фоновая уборка брошенных столов. Стол старше
/// `stale_table_max_age_secs` снимается в любом статусе,
/// списанные ставки возвращаются.
#[derive(Clone)]
pub struct Sweeper {
    ctx: GameContext,
}

impl Sweeper {
    pub fn new(ctx: GameContext) -> Self {
        Self { ctx }
    }

    pub async fn sweep_once(&self) -> SweepReport {
        let ctx = &self.ctx;
        let mut report = SweepReport::default();

        for (table_id, table) in ctx.registry.sweep_stale(ctx.config.stale_table_max_age()) {
            let (refunds, status) = {
                let mut t = table.lock().await;
                let status = t.status;
                (cancel(&mut t), status)
            };

            for (user_id, amount) in refunds {
                match ctx.ledger.credit(user_id, amount).await {
                    Ok(()) => report.refunded.push((user_id, amount)),
                    Err(err) => {
                        error!(table_id, user_id, amount = %amount, %err, "stale refund failed");
                        report.failed.push((user_id, amount));
                    }
                }
            }

            info!(table_id, ?status, "stale table swept");
            report.removed.push(table_id);
        }

        report
    }

    /// Запустить уборку раз в `sweep_interval_secs`.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval(self.ctx.config.sweep_interval());
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // Первый тик срабатывает сразу.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let report = self.sweep_once().await;
                if !report.removed.is_empty() {
                    info!(
                        removed = report.removed.len(),
                        refunded = report.refunded.len(),
                        "sweep finished"
                    );
                }
            }
        })
    }
}
