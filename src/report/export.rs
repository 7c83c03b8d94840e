//! CSV export of a payout batch.
//!
//! Columns: `member_id,self,direct,passive,total`, decimals in canonical form.

use super::{PayoutRow, ReportError};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Serialize)]
struct CsvRecord {
    member_id: u64,
    #[serde(rename = "self")]
    self_rebate: String,
    direct: String,
    passive: String,
    total: String,
}

impl From<&PayoutRow> for CsvRecord {
    fn from(row: &PayoutRow) -> Self {
        CsvRecord {
            member_id: row.member_id.as_u64(),
            self_rebate: row.self_rebate.to_canonical_string(),
            direct: row.direct.to_canonical_string(),
            passive: row.passive.to_canonical_string(),
            total: row.total.to_canonical_string(),
        }
    }
}

const HEADER: [&str; 5] = ["member_id", "self", "direct", "passive", "total"];

pub fn write_payout_csv<W: Write>(rows: &[PayoutRow], writer: W) -> Result<(), ReportError> {
    let mut out = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    // Written explicitly so an empty batch still carries the header.
    out.write_record(HEADER)?;
    for row in rows {
        out.serialize(CsvRecord::from(row))?;
    }
    out.flush()?;
    Ok(())
}

pub fn payout_csv_string(rows: &[PayoutRow]) -> Result<String, ReportError> {
    let mut buf = Vec::new();
    write_payout_csv(rows, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write the batch to `path`, creating parent directories as needed.
pub fn export_payout_csv(rows: &[PayoutRow], path: &Path) -> Result<(), ReportError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    write_payout_csv(rows, file)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "exported payout batch");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Decimal, MemberId};

    fn row(id: u64, s: &str, direct: &str, passive: &str) -> PayoutRow {
        let s = Decimal::from_str_canonical(s).unwrap();
        let direct = Decimal::from_str_canonical(direct).unwrap();
        let passive = Decimal::from_str_canonical(passive).unwrap();
        PayoutRow {
            member_id: MemberId::new(id),
            self_rebate: s,
            direct,
            passive,
            total: s + direct + passive,
        }
    }

    #[test]
    fn test_csv_layout() {
        let rows = vec![row(1, "0", "0", "2"), row(2, "0", "6.00", "2")];
        let csv = payout_csv_string(&rows).unwrap();
        assert_eq!(
            csv,
            "member_id,self,direct,passive,total\n1,0,0,2,2\n2,0,6,2,8\n"
        );
    }

    #[test]
    fn test_empty_batch_has_header_only() {
        let csv = payout_csv_string(&[]).unwrap();
        assert_eq!(csv, "member_id,self,direct,passive,total\n");
    }
}
