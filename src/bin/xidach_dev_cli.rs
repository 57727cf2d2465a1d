// src/bin/xidach_dev_cli.rs
//! Dev-CLI: гоняет несколько столов параллельно с ботами
//! против in-memory баланса и печатает итоги в JSON.

use std::sync::Arc;

use clap::Parser;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;
use tracing::{info, warn};

use xidach_engine::api::{
    dispatch, run_query, ApiError, Command, CommandResponse, GameSummary, Query, TableView,
};
use xidach_engine::controller::GameContext;
use xidach_engine::domain::{Chips, TableId, UserId};
use xidach_engine::engine::PlayerActionKind;
use xidach_engine::infra::{InMemoryLedger, Ledger};
use xidach_engine::time_ctrl::{TimeProfile, TimeRules};
use xidach_engine::{EngineConfig, Sweeper};

#[derive(Parser, Debug)]
#[command(author, version, about = "Xi Dach multi-table simulation")]
struct Args {
    /// Сколько мультистолов запустить.
    #[arg(long, default_value = "3")]
    tables: u64,

    /// Игроков за каждым мультистолом (включая хозяина).
    #[arg(long, default_value = "4")]
    players: u64,

    /// Сколько соло-игр запустить.
    #[arg(long, default_value = "2")]
    solo: u64,

    #[arg(long, default_value = "10")]
    stake: u64,

    #[arg(long, default_value = "1000")]
    balance: u64,

    #[arg(long, default_value = "42")]
    seed: u64,

    /// Реальные тайминги чат-бота вместо быстрых.
    #[arg(long)]
    real_time: bool,

    /// JSON-файл конфигурации вместо переменных окружения.
    #[arg(long)]
    config: Option<String>,

    /// Куда записать итоговый JSON (иначе stdout).
    #[arg(long)]
    output: Option<String>,
}

#[derive(Debug, Serialize)]
struct TableReport {
    table_id: Option<TableId>,
    summary: Option<GameSummary>,
    error: Option<ApiError>,
}

#[derive(Debug, Serialize)]
struct RunReport {
    tables: Vec<TableReport>,
    balances: Vec<(UserId, Chips)>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EngineConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => EngineConfig::from_env(),
    };
    if !args.real_time {
        config.time = TimeRules::from_profile(TimeProfile::Fast);
    }
    config.rng_seed = Some(args.seed);
    config.max_tables_per_channel = (args.tables + args.solo) as usize;

    let users_total = args.tables * args.players + args.solo;
    let ledger = Arc::new(InMemoryLedger::with_balances(
        (1..=users_total).map(|u| (u, Chips(args.balance))),
    ));
    let ctx = GameContext::in_memory(config, Arc::clone(&ledger));
    let sweeper = Sweeper::new(ctx.clone()).spawn();

    info!(
        tables = args.tables,
        solo = args.solo,
        players = args.players,
        "simulation started"
    );

    let mut handles = Vec::new();
    for n in 0..args.tables {
        let ctx = ctx.clone();
        let first_user = n * args.players + 1;
        let users: Vec<UserId> = (first_user..first_user + args.players).collect();
        let stake = Chips(args.stake);
        let seed = args.seed.wrapping_add(n);
        handles.push(tokio::spawn(async move {
            run_multi_table(&ctx, users, stake, seed).await
        }));
    }
    for n in 0..args.solo {
        let ctx = ctx.clone();
        let user_id = args.tables * args.players + n + 1;
        let stake = Chips(args.stake);
        let seed = args.seed.wrapping_add(1_000 + n);
        handles.push(tokio::spawn(async move {
            run_solo_table(&ctx, user_id, stake, seed).await
        }));
    }

    let mut tables = Vec::new();
    for handle in handles {
        match handle.await {
            Ok(report) => tables.push(report),
            Err(err) => warn!(%err, "table task panicked"),
        }
    }
    sweeper.abort();

    let mut balances = Vec::new();
    for user_id in 1..=users_total {
        balances.push((user_id, ledger.balance(user_id).await?));
    }

    let json = serde_json::to_string_pretty(&RunReport { tables, balances })?;
    match &args.output {
        Some(path) => std::fs::write(path, json)?,
        None => println!("{json}"),
    }
    Ok(())
}

async fn run_multi_table(
    ctx: &GameContext,
    users: Vec<UserId>,
    stake: Chips,
    seed: u64,
) -> TableReport {
    let host = users[0];
    let channel_id = 1;
    let opened = dispatch(
        ctx,
        Command::OpenTable {
            channel_id,
            host_id: host,
            display_name: format!("bot-{host}"),
        },
    )
    .await;
    let table_id = match opened {
        Ok(CommandResponse::TableCreated(view)) => view.table_id,
        Ok(other) => return failed(None, ApiError::Internal(format!("{other:?}"))),
        Err(err) => return failed(None, err),
    };

    let mut setup = Vec::new();
    for &user_id in &users[1..] {
        setup.push(Command::Join {
            table_id,
            user_id,
            display_name: format!("bot-{user_id}"),
        });
    }
    setup.push(Command::StartNow {
        table_id,
        user_id: host,
    });
    for &user_id in &users {
        setup.push(Command::PlaceBet {
            table_id,
            user_id,
            amount: stake,
        });
        setup.push(Command::Ready { table_id, user_id });
    }

    let mut last = None;
    for command in setup {
        match dispatch(ctx, command).await {
            Ok(response) => last = Some(response),
            Err(err) => return failed(Some(table_id), err),
        }
    }

    play_bots(ctx, table_id, last, seed).await
}

async fn run_solo_table(ctx: &GameContext, user_id: UserId, stake: Chips, seed: u64) -> TableReport {
    let started = dispatch(
        ctx,
        Command::StartSolo {
            channel_id: 2,
            user_id,
            display_name: format!("solo-{user_id}"),
            stake,
        },
    )
    .await;
    let table_id = match &started {
        Ok(CommandResponse::TableState(view)) => view.table_id,
        Ok(CommandResponse::Finished(summary)) => summary.table.table_id,
        Ok(other) => return failed(None, ApiError::Internal(format!("{other:?}"))),
        Err(err) => return failed(None, err.clone()),
    };
    play_bots(ctx, table_id, started.ok(), seed).await
}

/// Боты ходят, пока стол не дойдёт до расчёта.
async fn play_bots(
    ctx: &GameContext,
    table_id: TableId,
    mut last: Option<CommandResponse>,
    seed: u64,
) -> TableReport {
    const MAX_STEPS: u32 = 200;
    let mut rng = StdRng::seed_from_u64(seed);

    for _ in 0..MAX_STEPS {
        let view = match last.take() {
            Some(CommandResponse::Finished(summary)) => {
                return TableReport {
                    table_id: Some(table_id),
                    summary: Some(summary),
                    error: None,
                }
            }
            Some(CommandResponse::TableState(view)) => view,
            _ => match run_query(ctx, Query::GetTable { table_id }).await {
                Ok(CommandResponse::TableState(view)) => view,
                Ok(_) => continue,
                // Игра могла закончиться по таймеру хода.
                Err(err) => return failed(Some(table_id), err),
            },
        };

        let Some(seat) = view.current_turn_seat else {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            continue;
        };
        let Some(user_id) = view.seat(seat).map(|s| s.user_id) else {
            continue;
        };

        let action = bot_decision(&view, seat, &mut rng);
        match dispatch(
            ctx,
            Command::Act {
                table_id,
                user_id,
                action,
            },
        )
        .await
        {
            Ok(response) => last = Some(response),
            Err(err) => warn!(table_id, user_id, ?err, "bot action rejected"),
        }
    }

    failed(
        Some(table_id),
        ApiError::Internal("step limit reached".to_string()),
    )
}

fn bot_decision(view: &TableView, seat: u8, rng: &mut StdRng) -> PlayerActionKind {
    let Some(me) = view.seat(seat) else {
        return PlayerActionKind::Stand;
    };
    if me.cards.len() == 2 && (10..=11).contains(&me.value) && rng.gen_bool(0.5) {
        return PlayerActionKind::Double;
    }
    if !me.can_stand_safely {
        return PlayerActionKind::Hit;
    }
    if me.value <= 17 && me.cards.len() < 5 && rng.gen_bool(0.3) {
        return PlayerActionKind::Hit;
    }
    PlayerActionKind::Stand
}

fn failed(table_id: Option<TableId>, err: ApiError) -> TableReport {
    TableReport {
        table_id,
        summary: None,
        error: Some(err),
    }
}
