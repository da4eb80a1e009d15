// PostgreSQL entity store
//
// Stage records keep their schema fields in a JSONB column; the columns used
// for lookups (feature, type, archived flag, extended trial) are kept beside it.

use crate::error::AppError;
use crate::models::{Feature, Gate, GateState, Stage};
use crate::store::EntityStore;
use deadpool_postgres::Pool;
use postgres_types::Json;
use tokio_postgres::Row;
use tracing::{debug, info};

const INSERT_STAGE: &str = "INSERT INTO stages (feature_id, stage_type, archived, ot_stage_id, data)
     VALUES ($1, $2, $3, $4, $5)
     RETURNING id";

const UPSERT_STAGE: &str = "INSERT INTO stages (id, feature_id, stage_type, archived, ot_stage_id, data)
     VALUES ($1, $2, $3, $4, $5, $6)
     ON CONFLICT (id) DO UPDATE SET
        stage_type = EXCLUDED.stage_type,
        archived = EXCLUDED.archived,
        ot_stage_id = EXCLUDED.ot_stage_id,
        data = EXCLUDED.data
     RETURNING id";

const INSERT_GATE: &str = "INSERT INTO gates (feature_id, stage_id, gate_type, state)
     VALUES ($1, $2, $3, $4)
     RETURNING id";

// Store backed by a deadpool connection pool
pub struct PgStore {
    pool: Pool,
}

impl PgStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    // Create tables if they don't exist
    pub async fn init_schema(&self) -> Result<(), AppError> {
        let client = self.pool.get().await?;

        client
            .batch_execute(
                "CREATE TABLE IF NOT EXISTS features (
                    id BIGSERIAL PRIMARY KEY,
                    name TEXT NOT NULL,
                    feature_type INTEGER NOT NULL DEFAULT 0,
                    creator_email TEXT,
                    owner_emails TEXT[] NOT NULL DEFAULT '{}',
                    editor_emails TEXT[] NOT NULL DEFAULT '{}'
                );
                CREATE TABLE IF NOT EXISTS stages (
                    id BIGSERIAL PRIMARY KEY,
                    feature_id BIGINT NOT NULL,
                    stage_type INTEGER NOT NULL,
                    archived BOOLEAN NOT NULL DEFAULT false,
                    ot_stage_id BIGINT,
                    data JSONB NOT NULL
                );
                CREATE TABLE IF NOT EXISTS gates (
                    id BIGSERIAL PRIMARY KEY,
                    feature_id BIGINT NOT NULL,
                    stage_id BIGINT NOT NULL REFERENCES stages(id),
                    gate_type INTEGER NOT NULL,
                    state TEXT NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_stages_feature_id ON stages(feature_id);
                CREATE INDEX IF NOT EXISTS idx_stages_ot_stage_id ON stages(ot_stage_id);
                CREATE INDEX IF NOT EXISTS idx_gates_stage_id ON gates(stage_id);",
            )
            .await?;

        info!("✅ Stage tables initialized");
        Ok(())
    }
}

fn stage_from_row(row: &Row) -> Stage {
    let Json(mut stage): Json<Stage> = row.get("data");
    // Columns are authoritative over the copy inside the document
    stage.id = row.get("id");
    stage.feature_id = row.get("feature_id");
    stage.stage_type = row.get("stage_type");
    stage.archived = row.get("archived");
    stage
}

fn gate_from_row(row: &Row) -> Result<Gate, AppError> {
    let state: String = row.get("state");
    Ok(Gate {
        id: row.get("id"),
        feature_id: row.get("feature_id"),
        stage_id: row.get("stage_id"),
        gate_type: row.get("gate_type"),
        state: state.parse::<GateState>().map_err(AppError::Internal)?,
    })
}

impl EntityStore for PgStore {
    async fn get_feature(&self, id: i64) -> Result<Option<Feature>, AppError> {
        let client = self.pool.get().await?;

        let row = client
            .query_opt(
                "SELECT id, name, feature_type, creator_email, owner_emails, editor_emails
                 FROM features WHERE id = $1",
                &[&id],
            )
            .await?;

        Ok(row.map(|r| Feature {
            id: r.get("id"),
            name: r.get("name"),
            feature_type: r.get("feature_type"),
            creator_email: r.get("creator_email"),
            owner_emails: r.get("owner_emails"),
            editor_emails: r.get("editor_emails"),
        }))
    }

    async fn put_feature(&self, mut feature: Feature) -> Result<Feature, AppError> {
        let client = self.pool.get().await?;

        let row = if feature.id == 0 {
            client
                .query_one(
                    "INSERT INTO features (name, feature_type, creator_email, owner_emails, editor_emails)
                     VALUES ($1, $2, $3, $4, $5)
                     RETURNING id",
                    &[
                        &feature.name,
                        &feature.feature_type,
                        &feature.creator_email,
                        &feature.owner_emails,
                        &feature.editor_emails,
                    ],
                )
                .await?
        } else {
            client
                .query_one(
                    "INSERT INTO features (id, name, feature_type, creator_email, owner_emails, editor_emails)
                     VALUES ($1, $2, $3, $4, $5, $6)
                     ON CONFLICT (id) DO UPDATE SET
                        name = EXCLUDED.name,
                        feature_type = EXCLUDED.feature_type,
                        creator_email = EXCLUDED.creator_email,
                        owner_emails = EXCLUDED.owner_emails,
                        editor_emails = EXCLUDED.editor_emails
                     RETURNING id",
                    &[
                        &feature.id,
                        &feature.name,
                        &feature.feature_type,
                        &feature.creator_email,
                        &feature.owner_emails,
                        &feature.editor_emails,
                    ],
                )
                .await?
        };

        feature.id = row.get(0);
        Ok(feature)
    }

    async fn get_stage(&self, id: i64) -> Result<Option<Stage>, AppError> {
        let client = self.pool.get().await?;

        let row = client
            .query_opt(
                "SELECT id, feature_id, stage_type, archived, data FROM stages WHERE id = $1",
                &[&id],
            )
            .await?;

        Ok(row.as_ref().map(stage_from_row))
    }

    async fn put_stage(&self, mut stage: Stage) -> Result<Stage, AppError> {
        let client = self.pool.get().await?;

        let row = if stage.id == 0 {
            client
                .query_one(
                    INSERT_STAGE,
                    &[
                        &stage.feature_id,
                        &stage.stage_type,
                        &stage.archived,
                        &stage.ot_stage_id,
                        &Json(&stage),
                    ],
                )
                .await?
        } else {
            client
                .query_one(
                    UPSERT_STAGE,
                    &[
                        &stage.id,
                        &stage.feature_id,
                        &stage.stage_type,
                        &stage.archived,
                        &stage.ot_stage_id,
                        &Json(&stage),
                    ],
                )
                .await?
        };

        stage.id = row.get(0);
        debug!("Stored stage {} (feature {})", stage.id, stage.feature_id);
        Ok(stage)
    }

    async fn create_stage(
        &self,
        mut stage: Stage,
        gate_type: Option<i32>,
    ) -> Result<(Stage, Option<Gate>), AppError> {
        let mut client = self.pool.get().await?;
        let tx = client.transaction().await?;

        let row = tx
            .query_one(
                INSERT_STAGE,
                &[
                    &stage.feature_id,
                    &stage.stage_type,
                    &stage.archived,
                    &stage.ot_stage_id,
                    &Json(&stage),
                ],
            )
            .await?;
        stage.id = row.get(0);

        let gate = match gate_type {
            Some(gate_type) => {
                let mut gate = Gate::preparing(stage.feature_id, stage.id, gate_type);
                let row = tx
                    .query_one(
                        INSERT_GATE,
                        &[&gate.feature_id, &gate.stage_id, &gate.gate_type, &gate.state.as_str()],
                    )
                    .await?;
                gate.id = row.get(0);
                Some(gate)
            }
            None => None,
        };

        tx.commit().await?;
        Ok((stage, gate))
    }

    async fn gates_for_stage(&self, stage_id: i64) -> Result<Vec<Gate>, AppError> {
        let client = self.pool.get().await?;

        let rows = client
            .query(
                "SELECT id, feature_id, stage_id, gate_type, state
                 FROM gates WHERE stage_id = $1 ORDER BY id",
                &[&stage_id],
            )
            .await?;

        rows.iter().map(gate_from_row).collect()
    }

    async fn stages_for_feature(&self, feature_id: i64) -> Result<Vec<Stage>, AppError> {
        let client = self.pool.get().await?;

        let rows = client
            .query(
                "SELECT id, feature_id, stage_type, archived, data
                 FROM stages WHERE feature_id = $1 AND NOT archived ORDER BY id",
                &[&feature_id],
            )
            .await?;

        Ok(rows.iter().map(stage_from_row).collect())
    }

    async fn extensions_for_stage(&self, stage_id: i64) -> Result<Vec<Stage>, AppError> {
        let client = self.pool.get().await?;

        let rows = client
            .query(
                "SELECT id, feature_id, stage_type, archived, data
                 FROM stages WHERE ot_stage_id = $1 AND NOT archived ORDER BY id",
                &[&stage_id],
            )
            .await?;

        Ok(rows.iter().map(stage_from_row).collect())
    }
}
