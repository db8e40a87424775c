//! Pipeline session
//!
//! A `Session` is the explicit execution context of a run: the
//! configuration, the `now` snapshot, the dataset loader, the frozen table
//! registry and a cancellation flag. It is released by `Session::stop` or
//! when dropped.

use crate::config::PipelineConfig;
use crate::registry::TableRegistry;
use chrono::NaiveDateTime;
use cohort_diagnostics::{CohortError, Result};
use cohort_eval::ExecutionContext;
use cohort_loader::{DataSource, DatasetLoader, source_for};
use log::{debug, info};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared cancellation flag
///
/// Cloning yields a handle to the same flag, so it can be moved into a
/// signal handler while the session keeps running.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; the run stops at the next stage boundary
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Builder for `Session`
#[derive(Debug, Default)]
pub struct SessionBuilder {
    app_name: Option<String>,
    config: PipelineConfig,
    now: Option<NaiveDateTime>,
    source: Option<Arc<dyn DataSource>>,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the application name from the configuration
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }

    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Fix the run clock instead of reading the system clock
    pub fn now(mut self, now: NaiveDateTime) -> Self {
        self.now = Some(now);
        self
    }

    /// Use this source instead of one derived from `base_location`
    pub fn source(mut self, source: Arc<dyn DataSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Validate the configuration and create the session
    pub fn build(self) -> Result<Session> {
        self.config.validate()?;

        let source = match self.source {
            Some(source) => source,
            None => source_for(&self.config.base_location, self.config.timeout())?,
        };
        let loader = DatasetLoader::new(source, self.config.read_options()?);
        let context = self
            .now
            .map_or_else(ExecutionContext::from_system_clock, ExecutionContext::new);
        let app_name = self
            .app_name
            .unwrap_or_else(|| self.config.app_name.clone());

        info!("session '{app_name}' started, now = {}", context.now());
        Ok(Session {
            app_name,
            config: self.config,
            context,
            loader,
            registry: None,
            cancel: CancelHandle::new(),
        })
    }
}

/// Execution context of a pipeline run
#[derive(Debug)]
pub struct Session {
    app_name: String,
    config: PipelineConfig,
    context: ExecutionContext,
    loader: DatasetLoader,
    registry: Option<TableRegistry>,
    cancel: CancelHandle,
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn context(&self) -> &ExecutionContext {
        &self.context
    }

    pub fn now(&self) -> NaiveDateTime {
        self.context.now()
    }

    pub fn loader(&self) -> &DatasetLoader {
        &self.loader
    }

    /// Registry of the most recent run, if any
    pub fn registry(&self) -> Option<&TableRegistry> {
        self.registry.as_ref()
    }

    /// Install the frozen registry of the current run
    pub fn install_registry(&mut self, registry: TableRegistry) -> &TableRegistry {
        debug!("session '{}': {} tables registered", self.app_name, registry.len());
        self.registry.insert(registry)
    }

    /// A handle that can cancel this session from elsewhere
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Fail with `Cancelled` if cancellation was requested
    pub fn check_cancelled(&self, stage: &str) -> Result<()> {
        if self.cancel.is_cancelled() {
            info!("session '{}' cancelled before {stage}", self.app_name);
            return Err(CohortError::cancelled(stage));
        }
        Ok(())
    }

    /// Release the session and everything it holds
    pub fn stop(self) {
        info!("stopping session '{}'", self.app_name);
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        let tables = self.registry.take().map_or(0, |r| r.len());
        info!("session '{}' released ({tables} tables dropped)", self.app_name);
    }
}
