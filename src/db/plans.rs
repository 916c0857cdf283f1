// src/db/plans.rs
use crate::errors::ServerError;
use rusqlite::{params, Connection, OptionalExtension};

#[derive(Debug, Clone)]
pub struct PlanInfo {
    pub code: String,
    pub name: String,
    pub price_cents: i64,
    pub interval: String,
}

fn plan_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PlanInfo> {
    Ok(PlanInfo {
        code: row.get(0)?,
        name: row.get(1)?,
        price_cents: row.get(2)?,
        interval: row.get(3)?,
    })
}

pub fn list_plans(conn: &Connection) -> Result<Vec<PlanInfo>, ServerError> {
    let mut stmt = conn
        .prepare("select code, name, price_cents, interval from plans order by price_cents")
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map([], plan_from_row)
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut plans = Vec::new();
    for r in rows {
        plans.push(r.map_err(|e| ServerError::DbError(e.to_string()))?);
    }
    Ok(plans)
}

pub fn find_plan(conn: &Connection, code: &str) -> Result<Option<PlanInfo>, ServerError> {
    conn.query_row(
        "select code, name, price_cents, interval from plans where code = ?",
        params![code],
        plan_from_row,
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("failed to load plan: {e}")))
}

impl PlanInfo {
    /// "$19.00 / month"
    pub fn price_label(&self) -> String {
        format!(
            "${}.{:02} / {}",
            self.price_cents / 100,
            self.price_cents % 100,
            self.interval
        )
    }
}
