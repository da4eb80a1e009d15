//! In-memory entity store
//!
//! Backs the service when no database is configured, and the test suites.

use crate::error::AppError;
use crate::models::{Feature, Gate, Stage};
use crate::store::EntityStore;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Default)]
struct Tables {
    features: HashMap<i64, Feature>,
    stages: HashMap<i64, Stage>,
    gates: HashMap<i64, Gate>,
    last_id: i64,
    #[cfg_attr(not(test), allow(dead_code))]
    stage_writes: usize,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn insert_stage(&mut self, mut stage: Stage) -> Stage {
        if stage.id == 0 {
            stage.id = self.next_id();
        }
        self.stages.insert(stage.id, stage.clone());
        self.stage_writes += 1;
        stage
    }
}

/// Thread-safe in-memory store; ids are shared across entity kinds
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }

    /// Number of stage writes performed so far
    #[cfg(test)]
    pub async fn write_count(&self) -> usize {
        self.tables.read().await.stage_writes
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore for MemoryStore {
    async fn get_feature(&self, id: i64) -> Result<Option<Feature>, AppError> {
        Ok(self.tables.read().await.features.get(&id).cloned())
    }

    async fn put_feature(&self, mut feature: Feature) -> Result<Feature, AppError> {
        let mut tables = self.tables.write().await;
        if feature.id == 0 {
            feature.id = tables.next_id();
        }
        tables.features.insert(feature.id, feature.clone());
        Ok(feature)
    }

    async fn get_stage(&self, id: i64) -> Result<Option<Stage>, AppError> {
        Ok(self.tables.read().await.stages.get(&id).cloned())
    }

    async fn put_stage(&self, stage: Stage) -> Result<Stage, AppError> {
        let mut tables = self.tables.write().await;
        let stage = tables.insert_stage(stage);
        debug!("Stored stage {} (feature {})", stage.id, stage.feature_id);
        Ok(stage)
    }

    async fn create_stage(
        &self,
        stage: Stage,
        gate_type: Option<i32>,
    ) -> Result<(Stage, Option<Gate>), AppError> {
        // Both inserts happen under one write lock
        let mut tables = self.tables.write().await;
        let stage = tables.insert_stage(Stage { id: 0, ..stage });

        let gate = gate_type.map(|gate_type| {
            let mut gate = Gate::preparing(stage.feature_id, stage.id, gate_type);
            gate.id = tables.next_id();
            tables.gates.insert(gate.id, gate.clone());
            gate
        });

        Ok((stage, gate))
    }

    async fn gates_for_stage(&self, stage_id: i64) -> Result<Vec<Gate>, AppError> {
        let tables = self.tables.read().await;
        let mut gates: Vec<Gate> = tables
            .gates
            .values()
            .filter(|g| g.stage_id == stage_id)
            .cloned()
            .collect();
        gates.sort_by_key(|g| g.id);
        Ok(gates)
    }

    async fn stages_for_feature(&self, feature_id: i64) -> Result<Vec<Stage>, AppError> {
        let tables = self.tables.read().await;
        let mut stages: Vec<Stage> = tables
            .stages
            .values()
            .filter(|s| s.feature_id == feature_id && !s.archived)
            .cloned()
            .collect();
        stages.sort_by_key(|s| s.id);
        Ok(stages)
    }

    async fn extensions_for_stage(&self, stage_id: i64) -> Result<Vec<Stage>, AppError> {
        let tables = self.tables.read().await;
        let mut extensions: Vec<Stage> = tables
            .stages
            .values()
            .filter(|s| s.ot_stage_id == Some(stage_id) && !s.archived)
            .cloned()
            .collect();
        extensions.sort_by_key(|s| s.id);
        Ok(extensions)
    }
}
