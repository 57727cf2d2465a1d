//! Реестр столов: лимиты канала, один стол на игрока, сборка старых столов.

use std::time::Duration;

use xidach_engine::domain::{TableKind, TableStatus};
use xidach_engine::engine::{RegistryError, RegistryLimits, TableRegistry};

fn registry(max_tables: usize) -> TableRegistry {
    TableRegistry::new(RegistryLimits {
        max_tables_per_channel: max_tables,
        max_players_per_table: 8,
        rng_seed: Some(5),
    })
}

#[tokio::test]
async fn channel_cap_counts_all_table_kinds() {
    let reg = registry(2);
    reg.create(1, 10, TableKind::Multi).unwrap();
    reg.create(1, 11, TableKind::Solo).unwrap();

    let err = reg.create(1, 12, TableKind::Multi).unwrap_err();
    assert_eq!(
        err,
        RegistryError::ChannelFull {
            channel_id: 1,
            limit: 2
        }
    );

    // Другой канал не затронут.
    assert!(reg.create(2, 12, TableKind::Multi).is_ok());
    assert_eq!(reg.tables_in_channel(1).len(), 2);
    assert_eq!(reg.len(), 3);
}

#[tokio::test]
async fn solo_table_has_one_seat_and_starts_playing() {
    let reg = registry(4);
    let (_, table) = reg.create(1, 10, TableKind::Solo).unwrap();
    let t = table.lock().await;
    assert_eq!(t.max_seats, 1);
    assert_eq!(t.status, TableStatus::Playing);
}

#[tokio::test]
async fn user_sits_at_one_table_at_a_time() {
    let reg = registry(4);
    let (first, _) = reg.create(1, 10, TableKind::Multi).unwrap();
    let (second, _) = reg.create(1, 20, TableKind::Multi).unwrap();

    assert_eq!(
        reg.create(1, 10, TableKind::Solo).unwrap_err(),
        RegistryError::UserAlreadySeated {
            user_id: 10,
            table_id: first
        }
    );

    reg.index_user(30, first).unwrap();
    // Повтор для того же стола: не ошибка.
    reg.index_user(30, first).unwrap();
    assert!(matches!(
        reg.index_user(30, second),
        Err(RegistryError::UserAlreadySeated { user_id: 30, .. })
    ));
    assert_eq!(
        reg.index_user(31, 999),
        Err(RegistryError::TableNotFound(999))
    );

    // Снять с чужого стола нельзя.
    reg.unindex_user(30, second);
    assert_eq!(reg.table_of_user(30), Some(first));
    reg.unindex_user(30, first);
    assert_eq!(reg.table_of_user(30), None);
}

#[tokio::test]
async fn remove_frees_players_and_channel_slot() {
    let reg = registry(1);
    let (id, _) = reg.create(1, 10, TableKind::Multi).unwrap();
    reg.index_user(11, id).unwrap();

    assert!(reg.remove(id).is_some());
    assert!(reg.remove(id).is_none());
    assert!(reg.get(id).is_none());
    assert_eq!(reg.table_of_user(10), None);
    assert_eq!(reg.table_of_user(11), None);
    assert!(reg.tables_in_channel(1).is_empty());
    assert!(reg.is_empty());

    assert!(reg.create(1, 11, TableKind::Multi).is_ok());
}

#[tokio::test]
async fn table_ids_are_unique() {
    let reg = registry(16);
    let mut ids: Vec<_> = (0..10)
        .map(|u| reg.create(1, u, TableKind::Multi).unwrap().0)
        .collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 10);
}

#[tokio::test(start_paused = true)]
async fn sweep_takes_only_old_tables() {
    let reg = registry(4);
    let (old, _) = reg.create(1, 10, TableKind::Multi).unwrap();
    tokio::time::advance(Duration::from_secs(500)).await;
    let (young, _) = reg.create(1, 20, TableKind::Multi).unwrap();

    assert!(reg.sweep_stale(Duration::from_secs(600)).is_empty());

    tokio::time::advance(Duration::from_secs(101)).await;
    let swept = reg.sweep_stale(Duration::from_secs(600));
    assert_eq!(swept.len(), 1);
    assert_eq!(swept[0].0, old);

    assert!(reg.get(old).is_none());
    assert!(reg.get(young).is_some());
    assert_eq!(reg.table_of_user(10), None);
    assert_eq!(reg.table_of_user(20), Some(young));
}
