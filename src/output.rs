// src/output.rs

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{OUTPUT_FILE_PREFIX, OUTPUT_TIMESTAMP_FORMAT};
use crate::models::ClusterRow;

/// `normalized_entities<YYYYmmdd-HHMMSS>.csv` for the given moment.
pub fn output_file_name(timestamp: &DateTime<Local>) -> String {
    format!(
        "{}{}.csv",
        OUTPUT_FILE_PREFIX,
        timestamp.format(OUTPUT_TIMESTAMP_FORMAT)
    )
}

/// Writes the cluster table as CSV with the header
/// `cluster_id,representative,mentions`.
pub fn write_rows(rows: &[ClusterRow], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    if rows.is_empty() {
        // serde only emits the header alongside the first record
        writer.write_record(["cluster_id", "representative", "mentions"])?;
    }
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("Failed to write cluster {}", row.cluster_id))?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;
    Ok(())
}

/// Saves the cluster table into `dir` under a timestamped file name.
///
/// # Returns
/// * `Result<PathBuf>` - Full path of the written file
pub fn write_cluster_csv(rows: &[ClusterRow], dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let path = dir.join(output_file_name(&Local::now()));
    write_rows(rows, &path)?;

    info!("Saved {} clusters to {}", rows.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn row(cluster_id: usize, representative: &str, mentions: &str) -> ClusterRow {
        ClusterRow {
            cluster_id,
            representative: representative.to_string(),
            mentions: mentions.to_string(),
        }
    }

    #[test]
    fn test_output_file_name() {
        let timestamp = Local.with_ymd_and_hms(2024, 1, 31, 23, 59, 58).unwrap();
        assert_eq!(
            output_file_name(&timestamp),
            "normalized_entities20240131-235958.csv"
        );
    }

    #[test]
    fn test_write_cluster_csv() {
        let dir = tempdir().unwrap();
        let rows = vec![
            row(0, "acme", "Acme Inc.; ACME Incorporated"),
            row(1, "sn00123", "SN-001-23; SN00123"),
        ];

        let path = write_cluster_csv(&rows, dir.path()).unwrap();
        let file_name = path.file_name().unwrap().to_str().unwrap();
        assert!(file_name.starts_with("normalized_entities"));
        assert!(file_name.ends_with(".csv"));

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "cluster_id,representative,mentions\n\
             0,acme,Acme Inc.; ACME Incorporated\n\
             1,sn00123,SN-001-23; SN00123\n"
        );

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let read_back: Vec<ClusterRow> = reader.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(read_back, rows);
    }

    #[test]
    fn test_fields_with_commas_are_quoted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_rows(&[row(0, "12 main st", "12 Main St, Springfield")], &path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"12 Main St, Springfield\""));
    }

    #[test]
    fn test_empty_table_still_has_a_header() {
        let dir = tempdir().unwrap();
        let path = write_cluster_csv(&[], &dir.path().join("nested")).unwrap();
        assert_eq!(
            fs::read_to_string(path).unwrap(),
            "cluster_id,representative,mentions\n"
        );
    }
}
