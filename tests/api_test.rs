//! Внешний API: команды, JSON, запросы и отображение ошибок.

use std::sync::Arc;

use xidach_engine::api::*;
use xidach_engine::controller::{GameContext, GameError};
use xidach_engine::domain::{Chips, Deck, TableStatus};
use xidach_engine::engine::{EngineError, PlayerActionKind, RegistryError};
use xidach_engine::infra::{InMemoryLedger, LedgerError};
use xidach_engine::EngineConfig;

fn context() -> GameContext {
    let ledger = Arc::new(InMemoryLedger::with_balances([
        (1, Chips(100)),
        (2, Chips(100)),
    ]));
    GameContext::in_memory(
        EngineConfig {
            rng_seed: Some(3),
            ..EngineConfig::default()
        },
        ledger,
    )
}

fn table_state(resp: CommandResponse) -> TableView {
    match resp {
        CommandResponse::TableState(view) | CommandResponse::TableCreated(view) => view,
        other => panic!("expected table state, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn full_multi_game_through_dispatch() {
    let ctx = context();

    let created = dispatch(
        &ctx,
        Command::OpenTable {
            channel_id: 9,
            host_id: 1,
            display_name: "host".into(),
        },
    )
    .await
    .unwrap();
    let CommandResponse::TableCreated(view) = created else {
        panic!("expected TableCreated");
    };
    let table_id = view.table_id;
    assert_eq!(view.status, TableStatus::Lobby);
    assert_eq!(view.host_id, 1);

    let commands = vec![
        Command::Join {
            table_id,
            user_id: 2,
            display_name: "guest".into(),
        },
        Command::StartNow {
            table_id,
            user_id: 1,
        },
        Command::PlaceBet {
            table_id,
            user_id: 1,
            amount: Chips(10),
        },
        Command::PlaceBet {
            table_id,
            user_id: 2,
            amount: Chips(20),
        },
        Command::Ready {
            table_id,
            user_id: 1,
        },
    ];
    for command in commands {
        dispatch(&ctx, command).await.unwrap();
    }

    let table = ctx.table(table_id).unwrap();
    table.lock().await.deck = Deck::stacked(
        "10s 8s 10h 9h 10d 7d"
            .split_whitespace()
            .map(|c| c.parse().unwrap())
            .collect(),
    );

    let view = table_state(
        dispatch(
            &ctx,
            Command::Ready {
                table_id,
                user_id: 2,
            },
        )
        .await
        .unwrap(),
    );
    assert_eq!(view.status, TableStatus::Playing);
    assert_eq!(view.dealer_hidden, 1);

    let mut last = CommandResponse::TableState(view);
    while let CommandResponse::TableState(view) = last {
        let seat = view.current_turn_seat.unwrap();
        let user_id = view.seat(seat).unwrap().user_id;
        last = dispatch(
            &ctx,
            Command::Act {
                table_id,
                user_id,
                action: PlayerActionKind::Stand,
            },
        )
        .await
        .unwrap();
    }

    let CommandResponse::Finished(summary) = last else {
        panic!("expected Finished");
    };
    assert_eq!(summary.dealer_value, 17);
    assert_eq!(summary.table.status, TableStatus::Finished);
    assert_eq!(summary.table.dealer_hidden, 0);
    for r in &summary.results {
        assert_eq!(r.outcome, xidach_engine::eval::Outcome::Win);
        assert_eq!(r.payout, r.stake.times(2));
    }

    let balance = run_query(&ctx, Query::Balance { user_id: 2 }).await.unwrap();
    assert_eq!(
        balance,
        CommandResponse::Balance {
            user_id: 2,
            balance: Chips(120)
        }
    );
}

#[tokio::test(start_paused = true)]
async fn json_commands_and_bad_input() {
    let ctx = context();

    let raw = r#"{"OpenTable":{"channel_id":1,"host_id":1,"display_name":"a"}}"#;
    let view = table_state(dispatch_json(&ctx, raw).await.unwrap());
    assert_eq!(view.seats.len(), 1);

    let err = dispatch_json(&ctx, "{not json").await.unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));

    let unknown = format!(
        r#"{{"Act":{{"table_id":{},"user_id":2,"action":"Hit"}}}}"#,
        view.table_id
    );
    let err = dispatch_json(&ctx, &unknown).await.unwrap_err();
    // Стол ещё в лобби.
    assert!(matches!(err, ApiError::InvalidCommand(_)));
}

#[tokio::test(start_paused = true)]
async fn queries_list_and_hide_dealer_card() {
    let ctx = context();
    dispatch(
        &ctx,
        Command::StartSolo {
            channel_id: 4,
            user_id: 1,
            display_name: "solo".into(),
            stake: Chips(5),
        },
    )
    .await
    .unwrap();

    let CommandResponse::Tables(tables) = run_query(&ctx, Query::ListTables { channel_id: 4 })
        .await
        .unwrap()
    else {
        panic!("expected Tables");
    };

    // Xì Bàn на раздаче закрывает игру сразу, тогда стола уже нет.
    if let Some(view) = tables.first() {
        assert_eq!(view.status, TableStatus::Playing);
        assert_eq!(view.dealer_hidden, 1);
        assert_eq!(view.dealer_visible.len(), 1);
        assert_eq!(view.dealer_value, None);
        assert_eq!(view.seats[0].stake, Chips(5));
    }

    let err = run_query(&ctx, Query::GetTable { table_id: 999 }).await.unwrap_err();
    assert_eq!(err, ApiError::TableNotFound(999));
}

#[test]
fn game_errors_map_to_api_errors() {
    assert_eq!(
        ApiError::from(GameError::Engine(EngineError::NotPlayersTurn(3))),
        ApiError::InvalidCommand(EngineError::NotPlayersTurn(3).to_string())
    );
    assert_eq!(
        ApiError::from(GameError::Engine(EngineError::PlayerNotAtTable(3))),
        ApiError::PlayerNotAtTable(3)
    );
    assert_eq!(
        ApiError::from(GameError::TableClosed(5)),
        ApiError::TableNotFound(5)
    );
    assert!(matches!(
        ApiError::from(GameError::Registry(RegistryError::ChannelFull {
            channel_id: 1,
            limit: 3
        })),
        ApiError::Capacity(_)
    ));
    assert_eq!(
        ApiError::from(GameError::InsufficientFunds {
            user_id: 1,
            needed: Chips(7)
        }),
        ApiError::InsufficientFunds {
            user_id: 1,
            needed: Chips(7)
        }
    );
    assert!(matches!(
        ApiError::from(GameError::Ledger(LedgerError::Unavailable("db".into()))),
        ApiError::Internal(_)
    ));
    assert!(matches!(
        ApiError::from(GameError::SettlementFailed {
            table_id: 1,
            failed: vec![2]
        }),
        ApiError::Internal(_)
    ));
}

#[test]
fn command_json_shape_is_stable() {
    let cmd = Command::PlaceBet {
        table_id: 1,
        user_id: 2,
        amount: Chips(30),
    };
    let json = serde_json::to_string(&cmd).unwrap();
    assert_eq!(json, r#"{"PlaceBet":{"table_id":1,"user_id":2,"amount":30}}"#);
}
