use chrono::DateTime;
use rust_xlsxwriter::Workbook;

use crate::domain::lead::Lead;
use crate::errors::ServerError;

const HEADERS: [&str; 7] = ["Received", "Name", "Email", "Phone", "Property", "Status", "Message"];

fn received_label(ts: i64) -> String {
    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

/// Render an agent's leads into an in-memory workbook.
pub fn export_leads_xlsx(leads: &[Lead]) -> Result<Vec<u8>, ServerError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let xlsx_err = |what: &str, e: rust_xlsxwriter::XlsxError| {
        ServerError::XlsxError(format!("Failed to write {what}: {e}"))
    };

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .map_err(|e| xlsx_err("header", e))?;
    }

    for (i, lead) in leads.iter().enumerate() {
        let r = (i + 1) as u32;
        let property = lead.property_id.map(|id| id.to_string()).unwrap_or_default();
        let cells = [
            received_label(lead.created_at),
            lead.name.clone(),
            lead.email.clone().unwrap_or_default(),
            lead.phone.clone().unwrap_or_default(),
            property,
            lead.status.as_str().to_string(),
            lead.message.clone(),
        ];

        for (col, value) in cells.iter().enumerate() {
            worksheet
                .write_string(r, col as u16, value)
                .map_err(|e| xlsx_err(HEADERS[col], e))?;
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {e}")))
}
