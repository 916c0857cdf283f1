// src/db/listings.rs
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::listing::{NewListing, PropertyListing};
use crate::errors::ServerError;

const LISTING_COLUMNS: &str =
    "id, agent_id, title, city, area, price, bedrooms, bathrooms, description, status, created_at";

fn listing_from_row(r: &Row<'_>) -> rusqlite::Result<PropertyListing> {
    Ok(PropertyListing {
        id: r.get(0)?,
        agent_id: r.get(1)?,
        title: r.get(2)?,
        city: r.get(3)?,
        area: r.get(4)?,
        price: r.get(5)?,
        bedrooms: r.get(6)?,
        bathrooms: r.get(7)?,
        description: r.get(8)?,
        status: r.get(9)?,
        created_at: r.get(10)?,
    })
}

pub fn create_listing(
    conn: &Connection,
    agent_id: i64,
    listing: &NewListing,
    now: i64,
) -> Result<i64, ServerError> {
    conn.execute(
        r#"
        insert into properties
            (agent_id, title, city, area, price, bedrooms, bathrooms, description, created_at)
        values (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
        params![
            agent_id,
            listing.title,
            listing.city,
            listing.area,
            listing.price,
            listing.bedrooms,
            listing.bathrooms,
            listing.description,
            now
        ],
    )
    .map_err(|e| ServerError::DbError(format!("insert listing failed: {e}")))?;
    Ok(conn.last_insert_rowid())
}

pub fn listings_for_agent(
    conn: &Connection,
    agent_id: i64,
) -> Result<Vec<PropertyListing>, ServerError> {
    let sql = format!(
        "select {LISTING_COLUMNS} from properties where agent_id = ? order by created_at desc, id desc"
    );
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map(params![agent_id], listing_from_row)
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(|e| ServerError::DbError(e.to_string()))?);
    }
    Ok(out)
}

/// A listing, only if it belongs to `agent_id`.
pub fn find_listing(
    conn: &Connection,
    agent_id: i64,
    listing_id: i64,
) -> Result<Option<PropertyListing>, ServerError> {
    let sql = format!("select {LISTING_COLUMNS} from properties where id = ? and agent_id = ?");
    conn.query_row(&sql, params![listing_id, agent_id], listing_from_row)
        .optional()
        .map_err(|e| ServerError::DbError(format!("select listing failed: {e}")))
}

/// Deleting someone else's listing is indistinguishable from a missing one.
pub fn delete_listing(conn: &Connection, agent_id: i64, listing_id: i64) -> Result<(), ServerError> {
    let deleted = conn
        .execute(
            "delete from properties where id = ? and agent_id = ?",
            params![listing_id, agent_id],
        )
        .map_err(|e| ServerError::DbError(format!("delete listing failed: {e}")))?;

    if deleted == 0 {
        return Err(ServerError::NotFound);
    }
    Ok(())
}
