// src/db/leads.rs
use rusqlite::{params, Connection, Row};

use crate::domain::lead::{Lead, LeadStatus, NewLead};
use crate::errors::ServerError;

fn lead_from_row(r: &Row<'_>) -> rusqlite::Result<(Lead, String)> {
    let status: String = r.get(7)?;
    Ok((
        Lead {
            id: r.get(0)?,
            agent_id: r.get(1)?,
            property_id: r.get(2)?,
            name: r.get(3)?,
            email: r.get(4)?,
            phone: r.get(5)?,
            message: r.get(6)?,
            status: LeadStatus::New,
            created_at: r.get(8)?,
        },
        status,
    ))
}

pub fn create_lead(
    conn: &Connection,
    agent_id: i64,
    lead: &NewLead,
    now: i64,
) -> Result<i64, ServerError> {
    conn.execute(
        r#"
        insert into leads (agent_id, property_id, name, email, phone, message, status, created_at)
        values (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
        params![
            agent_id,
            lead.property_id,
            lead.name,
            lead.email,
            lead.phone,
            lead.message,
            LeadStatus::New.as_str(),
            now
        ],
    )
    .map_err(|e| ServerError::DbError(format!("insert lead failed: {e}")))?;
    Ok(conn.last_insert_rowid())
}

/// Newest first.
pub fn leads_for_agent(conn: &Connection, agent_id: i64) -> Result<Vec<Lead>, ServerError> {
    let mut stmt = conn
        .prepare(
            r#"
            select id, agent_id, property_id, name, email, phone, message, status, created_at
            from leads
            where agent_id = ?
            order by created_at desc, id desc
            "#,
        )
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map(params![agent_id], lead_from_row)
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut leads = Vec::new();
    for r in rows {
        let (mut lead, status) = r.map_err(|e| ServerError::DbError(e.to_string()))?;
        lead.status = LeadStatus::parse(&status).ok_or_else(|| {
            ServerError::DbError(format!("lead {}: unknown status {status:?}", lead.id))
        })?;
        leads.push(lead);
    }
    Ok(leads)
}

pub fn set_lead_status(
    conn: &Connection,
    agent_id: i64,
    lead_id: i64,
    status: LeadStatus,
) -> Result<(), ServerError> {
    let updated = conn
        .execute(
            "update leads set status = ? where id = ? and agent_id = ?",
            params![status.as_str(), lead_id, agent_id],
        )
        .map_err(|e| ServerError::DbError(format!("update lead failed: {e}")))?;

    if updated == 0 {
        return Err(ServerError::NotFound);
    }
    Ok(())
}

pub fn count_new_leads(conn: &Connection, agent_id: i64) -> Result<i64, ServerError> {
    conn.query_row(
        "select count(*) from leads where agent_id = ? and status = 'new'",
        params![agent_id],
        |r| r.get(0),
    )
    .map_err(|e| ServerError::DbError(format!("count leads failed: {e}")))
}
