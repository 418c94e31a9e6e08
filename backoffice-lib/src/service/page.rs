//! Page controller tying a record service to a table engine

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use serde::Serialize;
use serde_json::Value as JsonValue;
use tokio_util::sync::CancellationToken;

use super::Notifier;
use super::RecordService;
use super::Severity;
use crate::error::ErrorDescriptor;
use crate::model::Row;
use crate::model::TableData;
use crate::table::TableEngine;
use crate::task::AsyncState;
use crate::task::AsyncTask;

type SharedTable = Arc<Mutex<TableEngine>>;

fn lock(table: &SharedTable) -> MutexGuard<'_, TableEngine> {
    table.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// List-and-create page for one resource.
///
/// Loads replace the table on success and empty it on failure. Creates
/// prepend the stored row only after the server confirmed it, so a failed
/// create leaves the rows untouched. Every current load failure sends one
/// notification, and every create call sends exactly one.
pub struct ResourcePage {
    service: RecordService,
    table: SharedTable,
    load_task: AsyncTask<(), TableData>,
    create_task: AsyncTask<JsonValue, Row>,
    notifier: Arc<dyn Notifier>,
}

impl ResourcePage {
    /// Creates a page with a default table engine.
    pub fn new(service: RecordService, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_table(service, notifier, TableEngine::empty())
    }

    /// Creates a page around a preconfigured table engine.
    pub fn with_table(service: RecordService, notifier: Arc<dyn Notifier>, table: TableEngine) -> Self {
        let table: SharedTable = Arc::new(Mutex::new(table));
        let resource = service.resource();

        let load_task = {
            let service = service.clone();
            let on_loaded = Arc::clone(&table);
            let on_failed = Arc::clone(&table);
            let notifier = Arc::clone(&notifier);
            AsyncTask::new(move |_: (), cancel: CancellationToken| {
                let service = service.clone();
                async move { service.get_all(Some(cancel)).await }
            })
            .on_success(move |data: &TableData| lock(&on_loaded).set_data(data.clone()))
            .on_error(move |error: &ErrorDescriptor| {
                lock(&on_failed).clear();
                notifier.notify(
                    Severity::Error,
                    &format!("Failed to load {}", resource),
                    &error.message,
                );
            })
        };

        let create_task = {
            let service = service.clone();
            AsyncTask::new(move |record: JsonValue, cancel: CancellationToken| {
                let service = service.clone();
                async move { service.create(&record, Some(cancel)).await }
            })
        };

        Self {
            service,
            table,
            load_task,
            create_task,
            notifier,
        }
    }

    pub fn service(&self) -> &RecordService {
        &self.service
    }

    /// Locks the table for reading or view operations.
    pub fn table(&self) -> MutexGuard<'_, TableEngine> {
        lock(&self.table)
    }

    /// Loads the table, superseding any load still in flight.
    pub async fn load(&self) -> Result<(), ErrorDescriptor> {
        log::debug!("loading {}", self.service.resource());
        self.load_task.execute(()).await.map(|_| ())
    }

    /// Creates a record and prepends it to the table.
    ///
    /// Starting a create supersedes one still in flight. Each call reports
    /// its own outcome, so a superseded create is still notified (as
    /// cancelled) and a create the server confirmed is still prepended.
    pub async fn create<B: Serialize + ?Sized>(&self, record: &B) -> Result<Row, ErrorDescriptor> {
        let result = match serde_json::to_value(record) {
            Ok(record) => self.create_task.execute(record).await,
            Err(e) => Err(ErrorDescriptor::unknown(RecordService::TABLE_PATH, e.to_string())),
        };

        match &result {
            Ok(row) => {
                self.table().prepend_row(row.clone());
                self.notifier.notify(
                    Severity::Success,
                    &format!("{} added", self.service.resource().record_name()),
                    &format!("\"{}\" was created", row.get("name")),
                );
            }
            Err(error) if error.is_cancelled() => {
                self.notifier
                    .notify(Severity::Warning, "Create cancelled", &error.message);
            }
            Err(error) => {
                self.notifier
                    .notify(Severity::Error, "Create failed", &error.message);
            }
        }
        result
    }

    pub fn load_state(&self) -> AsyncState<TableData> {
        self.load_task.state()
    }

    pub fn create_state(&self) -> AsyncState<Row> {
        self.create_task.state()
    }

    pub fn is_loading(&self) -> bool {
        self.load_task.state().is_loading()
    }

    pub fn is_creating(&self) -> bool {
        self.create_task.state().is_loading()
    }

    /// Aborts in-flight loads and creates.
    pub fn cancel(&self) {
        self.load_task.cancel();
        self.create_task.cancel();
    }
}

impl std::fmt::Debug for ResourcePage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourcePage")
            .field("service", &self.service)
            .field("load", &self.load_task)
            .field("create", &self.create_task)
            .finish_non_exhaustive()
    }
}
