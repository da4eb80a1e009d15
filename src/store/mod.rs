//! Entity storage
//!
//! The `EntityStore` trait is the persistence contract the stage operations
//! rely on: get and put by id, single-record atomic writes, plus one atomic
//! call that writes a new stage together with its gate.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::error::AppError;
use crate::models::{Feature, Gate, Stage};
use std::future::Future;

pub trait EntityStore: Send + Sync {
    fn get_feature(&self, id: i64) -> impl Future<Output = Result<Option<Feature>, AppError>> + Send;

    /// Insert (id 0) or replace a feature
    fn put_feature(&self, feature: Feature) -> impl Future<Output = Result<Feature, AppError>> + Send;

    fn get_stage(&self, id: i64) -> impl Future<Output = Result<Option<Stage>, AppError>> + Send;

    /// Insert (id 0) or replace a stage; returns the stored record
    fn put_stage(&self, stage: Stage) -> impl Future<Output = Result<Stage, AppError>> + Send;

    /// Insert a new stage and, when `gate_type` is set, its `PREPARING` gate
    /// in one atomic write
    fn create_stage(
        &self,
        stage: Stage,
        gate_type: Option<i32>,
    ) -> impl Future<Output = Result<(Stage, Option<Gate>), AppError>> + Send;

    fn gates_for_stage(&self, stage_id: i64) -> impl Future<Output = Result<Vec<Gate>, AppError>> + Send;

    /// Non-archived stages of a feature, ordered by id
    fn stages_for_feature(
        &self,
        feature_id: i64,
    ) -> impl Future<Output = Result<Vec<Stage>, AppError>> + Send;

    /// Stages that extend the origin trial of `stage_id`
    fn extensions_for_stage(
        &self,
        stage_id: i64,
    ) -> impl Future<Output = Result<Vec<Stage>, AppError>> + Send;
}

/// Store selected at start-up
pub enum Datastore {
    Memory(MemoryStore),
    Postgres(PgStore),
}

impl EntityStore for Datastore {
    async fn get_feature(&self, id: i64) -> Result<Option<Feature>, AppError> {
        match self {
            Datastore::Memory(store) => store.get_feature(id).await,
            Datastore::Postgres(store) => store.get_feature(id).await,
        }
    }

    async fn put_feature(&self, feature: Feature) -> Result<Feature, AppError> {
        match self {
            Datastore::Memory(store) => store.put_feature(feature).await,
            Datastore::Postgres(store) => store.put_feature(feature).await,
        }
    }

    async fn get_stage(&self, id: i64) -> Result<Option<Stage>, AppError> {
        match self {
            Datastore::Memory(store) => store.get_stage(id).await,
            Datastore::Postgres(store) => store.get_stage(id).await,
        }
    }

    async fn put_stage(&self, stage: Stage) -> Result<Stage, AppError> {
        match self {
            Datastore::Memory(store) => store.put_stage(stage).await,
            Datastore::Postgres(store) => store.put_stage(stage).await,
        }
    }

    async fn create_stage(
        &self,
        stage: Stage,
        gate_type: Option<i32>,
    ) -> Result<(Stage, Option<Gate>), AppError> {
        match self {
            Datastore::Memory(store) => store.create_stage(stage, gate_type).await,
            Datastore::Postgres(store) => store.create_stage(stage, gate_type).await,
        }
    }

    async fn gates_for_stage(&self, stage_id: i64) -> Result<Vec<Gate>, AppError> {
        match self {
            Datastore::Memory(store) => store.gates_for_stage(stage_id).await,
            Datastore::Postgres(store) => store.gates_for_stage(stage_id).await,
        }
    }

    async fn stages_for_feature(&self, feature_id: i64) -> Result<Vec<Stage>, AppError> {
        match self {
            Datastore::Memory(store) => store.stages_for_feature(feature_id).await,
            Datastore::Postgres(store) => store.stages_for_feature(feature_id).await,
        }
    }

    async fn extensions_for_stage(&self, stage_id: i64) -> Result<Vec<Stage>, AppError> {
        match self {
            Datastore::Memory(store) => store.extensions_for_stage(stage_id).await,
            Datastore::Postgres(store) => store.extensions_for_stage(stage_id).await,
        }
    }
}
