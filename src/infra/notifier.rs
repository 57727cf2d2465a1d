use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::api::dto::{SeatResult, TableView};
use crate::domain::{SeatIndex, TableId};
use crate::domain::table::TableStatus;

/// Фронт (чат, CLI, сокет). Вызывается после каждого изменения стола,
/// всегда со снимком и всегда без замка стола.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn render_table_state(&self, view: &TableView);

    async fn render_turn_prompt(&self, view: &TableView, seat: SeatIndex);

    async fn render_result(&self, view: &TableView, results: &[SeatResult]);
}

/// Ничего не показывает.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn render_table_state(&self, _view: &TableView) {}

    async fn render_turn_prompt(&self, _view: &TableView, _seat: SeatIndex) {}

    async fn render_result(&self, _view: &TableView, _results: &[SeatResult]) {}
}

/// Что было отрисовано (для тестов).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rendered {
    TableState {
        table_id: TableId,
        status: TableStatus,
    },
    TurnPrompt {
        table_id: TableId,
        seat: SeatIndex,
    },
    Result {
        table_id: TableId,
        results: Vec<SeatResult>,
    },
}

/// Запоминает все вызовы.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    rendered: Mutex<Vec<Rendered>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rendered(&self) -> Vec<Rendered> {
        self.lock().clone()
    }

    pub fn results_for(&self, table_id: TableId) -> Option<Vec<SeatResult>> {
        self.lock().iter().find_map(|r| match r {
            Rendered::Result {
                table_id: id,
                results,
            } if *id == table_id => Some(results.clone()),
            _ => None,
        })
    }

    pub fn turn_prompts(&self, table_id: TableId) -> Vec<SeatIndex> {
        self.lock()
            .iter()
            .filter_map(|r| match r {
                Rendered::TurnPrompt { table_id: id, seat } if *id == table_id => Some(*seat),
                _ => None,
            })
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Rendered>> {
        self.rendered.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn render_table_state(&self, view: &TableView) {
        self.lock().push(Rendered::TableState {
            table_id: view.table_id,
            status: view.status,
        });
    }

    async fn render_turn_prompt(&self, view: &TableView, seat: SeatIndex) {
        self.lock().push(Rendered::TurnPrompt {
            table_id: view.table_id,
            seat,
        });
    }

    async fn render_result(&self, view: &TableView, results: &[SeatResult]) {
        self.lock().push(Rendered::Result {
            table_id: view.table_id,
            results: results.to_vec(),
        });
    }
}
