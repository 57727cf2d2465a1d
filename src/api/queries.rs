use serde::{Deserialize, Serialize};

use crate::controller::GameContext;
use crate::domain::player::Player;
use crate::domain::table::{Table, TableStatus};
use crate::domain::{ChannelId, TableId, UserId};
use crate::eval::{calculate_value, can_stand_safely};

use super::dto::{CommandResponse, SeatView, TableView};
use super::errors::ApiError;

/// Запросы "только чтение".
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Query {
    /// Получить состояние стола.
    GetTable { table_id: TableId },

    /// Столы канала (для лобби).
    ListTables { channel_id: ChannelId },

    /// Баланс игрока в ledger.
    Balance { user_id: UserId },
}

/// Сформировать DTO стола. Пока дилер не начал ход,
/// его первая карта закрыта.
pub fn build_table_view(table: &Table) -> TableView {
    let seats = table.players().map(build_seat_view).collect();

    let revealed = matches!(
        table.status,
        TableStatus::DealerTurn | TableStatus::Finished
    );
    let (dealer_visible, dealer_hidden, dealer_value) = if revealed || table.dealer_hand.is_empty()
    {
        (
            table.dealer_hand.clone(),
            0,
            (!table.dealer_hand.is_empty()).then(|| calculate_value(&table.dealer_hand)),
        )
    } else {
        (table.dealer_hand[1..].to_vec(), 1, None)
    };

    TableView {
        table_id: table.id,
        channel_id: table.channel_id,
        host_id: table.host_id,
        kind: table.kind,
        status: table.status,
        max_seats: table.max_seats,
        seats,
        dealer_visible,
        dealer_hidden,
        dealer_value,
        current_turn_seat: table.current_seat(),
    }
}

fn build_seat_view(p: &Player) -> SeatView {
    SeatView {
        seat: p.seat,
        user_id: p.user_id,
        display_name: p.display_name.clone(),
        stake: p.stake,
        selected_stake: p.selected_stake,
        cards: p.hand.clone(),
        value: p.hand_value(),
        hand_type: p.hand_type(),
        status: p.status,
        is_ready: p.is_ready,
        has_doubled: p.has_doubled,
        can_stand_safely: can_stand_safely(&p.hand),
    }
}

/// Выполнить запрос.
pub async fn run_query(ctx: &GameContext, query: Query) -> Result<CommandResponse, ApiError> {
    match query {
        Query::GetTable { table_id } => {
            let table = ctx.table(table_id)?;
            let view = build_table_view(&*table.lock().await);
            Ok(CommandResponse::TableState(view))
        }
        Query::ListTables { channel_id } => {
            let mut views = Vec::new();
            for table_id in ctx.registry.tables_in_channel(channel_id) {
                if let Some(table) = ctx.registry.get(table_id) {
                    views.push(build_table_view(&*table.lock().await));
                }
            }
            Ok(CommandResponse::Tables(views))
        }
        Query::Balance { user_id } => {
            let balance = ctx
                .ledger
                .balance(user_id)
                .await
                .map_err(|e| ApiError::Internal(e.to_string()))?;
            Ok(CommandResponse::Balance { user_id, balance })
        }
    }
}
