// src/db/analytics.rs
use rusqlite::{params, Connection};

use crate::domain::analytics::{window_start, DailyViews, ViewCounts, ViewKind, VIEW_WINDOW_DAYS};
use crate::errors::ServerError;

pub fn record_view(
    conn: &Connection,
    agent_id: i64,
    kind: ViewKind,
    path: &str,
    now: i64,
) -> Result<(), ServerError> {
    conn.execute(
        "insert into page_views (agent_id, kind, path, created_at) values (?, ?, ?, ?)",
        params![agent_id, kind.as_str(), path, now],
    )
    .map_err(|e| ServerError::DbError(format!("record view failed: {e}")))?;
    Ok(())
}

/// Profile and property views in the trailing 30 days. Recomputed per call.
pub fn view_counts_last_30d(
    conn: &Connection,
    agent_id: i64,
    now: i64,
) -> Result<ViewCounts, ServerError> {
    let since = window_start(now, VIEW_WINDOW_DAYS);

    conn.query_row(
        r#"
        select
            coalesce(sum(case when kind = 'profile' then 1 else 0 end), 0),
            coalesce(sum(case when kind = 'property' then 1 else 0 end), 0)
        from page_views
        where agent_id = ? and created_at >= ?
        "#,
        params![agent_id, since],
        |r| {
            Ok(ViewCounts {
                profile_views_30d: r.get(0)?,
                page_views_30d: r.get(1)?,
            })
        },
    )
    .map_err(|e| ServerError::DbError(format!("count views failed: {e}")))
}

/// Per-day totals for the last `days` days, oldest first. Empty days are omitted.
pub fn daily_views(
    conn: &Connection,
    agent_id: i64,
    now: i64,
    days: i64,
) -> Result<Vec<DailyViews>, ServerError> {
    let since = window_start(now, days);

    let mut stmt = conn
        .prepare(
            r#"
            select
                date(created_at, 'unixepoch') as day,
                sum(case when kind = 'profile' then 1 else 0 end),
                sum(case when kind = 'property' then 1 else 0 end)
            from page_views
            where agent_id = ? and created_at >= ?
            group by day
            order by day
            "#,
        )
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map(params![agent_id, since], |r| {
            Ok(DailyViews {
                day: r.get(0)?,
                profile: r.get(1)?,
                property: r.get(2)?,
            })
        })
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r.map_err(|e| ServerError::DbError(e.to_string()))?);
    }
    Ok(out)
}
