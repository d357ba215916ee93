// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wiring shared by every subcommand: dataset store, engine and dispatcher.

use std::sync::Arc;

use raad_agent::{ChatSession, QueryDispatcher, SessionSettings};
use raad_config::RaadConfig;
use raad_core::{QueryEngine, RaadError, SessionId};
use raad_data::{DatasetStore, Datasets};
use raad_query::{EngineStatus, build_engine, resolve_api_key};
use tracing::info;

pub struct App {
    pub config: RaadConfig,
    pub store: Arc<DatasetStore>,
    pub engine: Arc<dyn QueryEngine>,
    pub engine_status: EngineStatus,
    pub settings: SessionSettings,
}

impl App {
    /// Builds the store and engine. Nothing is read from disk yet.
    pub fn new(config: RaadConfig) -> Result<Self, RaadError> {
        let api_key = resolve_api_key(&config.engine, |name| std::env::var(name).ok());
        let engine_status = EngineStatus::from_config(&config.engine, api_key.as_ref());
        let engine = build_engine(&config.engine, api_key)?;
        let store = Arc::new(DatasetStore::new(&config.data.data_dir));
        let settings = SessionSettings::from_config(&config.session)?;
        Ok(Self {
            config,
            store,
            engine,
            engine_status,
            settings,
        })
    }

    /// Loads all four datasets. A missing file is fatal to the caller.
    pub fn load_data(&self) -> Result<Arc<Datasets>, RaadError> {
        let datasets = self.store.load()?;
        info!(data_dir = %self.store.data_dir().display(), "datasets ready");
        Ok(datasets)
    }

    pub fn dispatcher(&self) -> QueryDispatcher {
        QueryDispatcher::new(Arc::clone(&self.store), Arc::clone(&self.engine))
    }

    /// A fresh local session on the configured default dataset.
    pub fn session(&self) -> ChatSession {
        ChatSession::new(
            SessionId(format!("local-{}", chrono::Utc::now().format("%Y%m%d%H%M%S"))),
            self.dispatcher(),
            self.settings.clone(),
        )
    }
}
