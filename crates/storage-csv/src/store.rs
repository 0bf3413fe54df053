use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, OwnedMutexGuard};

use cotizaciones_core::errors::{Result, StorageError};
use cotizaciones_core::quotes::{format_canonical, parse_quote_date, sort_entries_by_date};
use cotizaciones_core::{QuoteType, SeriesEntry, SeriesStore};

#[derive(Debug, Deserialize, Serialize)]
struct CsvRow {
    fecha: String,
    valor: String,
}

/// Series store backed by one CSV file per quote type.
///
/// Writes take a store-wide lock and replace the file through a temp file
/// and rename, so readers never observe a partially written file. The lock
/// is held by the blocking write itself, so it stays taken even if the
/// calling future is dropped mid-write.
pub struct CsvSeriesStore {
    dir: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl CsvSeriesStore {
    /// Opens (and creates if needed) the data directory.
    pub fn open(dir: impl Into<PathBuf>) -> std::result::Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            StorageError::InvalidLocation(format!("{}: {}", dir.display(), e))
        })?;
        Ok(Self {
            dir,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, quote_type: QuoteType) -> PathBuf {
        self.dir.join(format!("{}.csv", quote_type.as_str()))
    }

    async fn lock_writes(&self) -> OwnedMutexGuard<()> {
        self.write_lock.clone().lock_owned().await
    }
}

fn read_file(path: &Path) -> std::result::Result<Vec<SeriesEntry>, StorageError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| StorageError::Io(format!("{}: {}", path.display(), e)))?;

    let mut entries = Vec::new();
    for (i, row) in reader.deserialize::<CsvRow>().enumerate() {
        let row = row.map_err(|e| {
            StorageError::Corrupt(format!("{} row {}: {}", path.display(), i + 1, e))
        })?;
        if row.valor.is_empty() || row.valor.eq_ignore_ascii_case("nan") {
            warn!("{} row {}: empty value, skipped", path.display(), i + 1);
            continue;
        }
        let value = Decimal::from_str(&row.valor)
            .or_else(|_| Decimal::from_scientific(&row.valor))
            .map_err(|_| {
                StorageError::Corrupt(format!(
                    "{} row {}: invalid value '{}'",
                    path.display(),
                    i + 1,
                    row.valor
                ))
            })?;
        entries.push(SeriesEntry::new(row.fecha, value));
    }

    sort_entries_by_date(&mut entries);
    Ok(entries)
}

fn write_file_atomic(path: &Path, entries: &[SeriesEntry]) -> std::result::Result<(), StorageError> {
    let tmp_path = path.with_extension("csv.tmp");
    {
        let file = File::create(&tmp_path)?;
        let mut writer = csv::Writer::from_writer(file);
        for entry in entries {
            writer
                .serialize(CsvRow {
                    fecha: entry.date.clone(),
                    valor: entry.value.to_string(),
                })
                .map_err(|e| StorageError::Io(format!("{}: {}", tmp_path.display(), e)))?;
        }
        let file = writer
            .into_inner()
            .map_err(|e| StorageError::Io(format!("{}: {}", tmp_path.display(), e)))?;
        file.sync_all()?;
    }
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Replaces any entry for `date` (in either date spelling) and writes the file.
fn upsert_file(path: &Path, date: NaiveDate, value: Decimal) -> std::result::Result<(), StorageError> {
    let mut entries = read_file(path)?;
    let before = entries.len();
    entries.retain(|entry| parse_quote_date(&entry.date).ok() != Some(date));
    if entries.len() != before {
        debug!("{}: overwriting {}", path.display(), format_canonical(date));
    }
    entries.push(SeriesEntry::new(format_canonical(date), value));
    sort_entries_by_date(&mut entries);
    write_file_atomic(path, &entries)
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> std::result::Result<T, StorageError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StorageError::Internal(e.to_string()))?
        .map_err(Into::into)
}

#[async_trait]
impl SeriesStore for CsvSeriesStore {
    fn backend(&self) -> &'static str {
        "csv"
    }

    async fn read(&self, quote_type: QuoteType) -> Result<Vec<SeriesEntry>> {
        let path = self.path_for(quote_type);
        blocking(move || read_file(&path)).await
    }

    async fn upsert(&self, quote_type: QuoteType, date: NaiveDate, value: Decimal) -> Result<()> {
        let guard = self.lock_writes().await;
        let path = self.path_for(quote_type);
        blocking(move || {
            let _guard = guard;
            upsert_file(&path, date, value)
        })
        .await
    }

    async fn upsert_many(
        &self,
        quote_type: QuoteType,
        points: &[(NaiveDate, Decimal)],
    ) -> Result<usize> {
        let guard = self.lock_writes().await;
        let path = self.path_for(quote_type);
        let points = points.to_vec();
        blocking(move || {
            let _guard = guard;
            let mut entries = read_file(&path)?;
            for (date, _) in &points {
                entries.retain(|entry| parse_quote_date(&entry.date).ok() != Some(*date));
            }
            // A later point for the same day wins.
            let mut seen = std::collections::HashSet::new();
            for (date, value) in points.iter().rev() {
                if seen.insert(*date) {
                    entries.push(SeriesEntry::new(format_canonical(*date), *value));
                }
            }
            sort_entries_by_date(&mut entries);
            write_file_atomic(&path, &entries)?;
            Ok(points.len())
        })
        .await
    }
}
