//! Wound report export.
//!
//! The log is laid out as a plain table (date, skin, pain, fluid), rendered
//! to an HTML document and handed to the share transport. No filtering or
//! sorting: the report mirrors the log as it stands.

use thiserror::Error;

use crate::observation::ObservationRecord;
use crate::platform::{DocumentRenderer, FileRef, RenderError, ShareError, ShareTransport};

pub const REPORT_TITLE: &str = "Data Monitoring Luka";
pub const HEADER: [&str; 4] = ["Tanggal", "Kulit", "Nyeri", "Cairan"];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("rendering report failed")]
    Render(#[from] RenderError),
    #[error("sharing report failed")]
    Share(#[from] ShareError),
}

/// Header plus one row per record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTable {
    pub header: [&'static str; 4],
    pub rows: Vec<[String; 4]>,
}

impl ReportTable {
    pub fn from_records(records: &[ObservationRecord], timestamp_format: &str) -> Self {
        let rows = records
            .iter()
            .map(|r| {
                [
                    r.timestamp.format(timestamp_format).to_string(),
                    r.skin.label().to_string(),
                    r.pain.label().to_string(),
                    r.fluid.label().to_string(),
                ]
            })
            .collect();

        Self { header: HEADER, rows }
    }

    pub fn to_html(&self) -> String {
        let mut html = format!("<h1>{}</h1><table border='1'><tr>", REPORT_TITLE);
        for label in self.header {
            html.push_str(&format!("<th>{}</th>", label));
        }
        html.push_str("</tr>");

        for row in &self.rows {
            html.push_str("<tr>");
            for cell in row {
                html.push_str(&format!("<td>{}</td>", escape_html(cell)));
            }
            html.push_str("</tr>");
        }

        html.push_str("</table>");
        html
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Render the records and offer the file to the user.
///
/// Whatever the user does in the share step (open, save, dismiss) counts
/// as success here.
pub async fn export(
    records: &[ObservationRecord],
    timestamp_format: &str,
    renderer: &dyn DocumentRenderer,
    share: &dyn ShareTransport,
) -> Result<FileRef, ExportError> {
    let table = ReportTable::from_records(records, timestamp_format);
    tracing::info!("Exporting {} observation(s)", table.rows.len());

    let file = renderer.render(&table.to_html()).await?;
    share.share(&file).await?;
    Ok(file)
}
