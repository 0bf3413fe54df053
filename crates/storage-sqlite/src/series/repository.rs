use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use log::debug;
use rust_decimal::Decimal;
use std::sync::Arc;

use super::model::{NewQuoteSeriesDB, QuoteSeriesDB};
use crate::db::{self, get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::quote_series::dsl;
use cotizaciones_core::errors::{Result, StorageError};
use cotizaciones_core::quotes::{sort_entries_by_date, LONG_DATE_FORMAT};
use cotizaciones_core::{QuoteType, SeriesEntry, SeriesStore};

pub struct SqliteSeriesStore {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SqliteSeriesStore {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }

    /// Opens the database at `db_path`, applies migrations and starts the writer.
    ///
    /// Must be called from within a tokio runtime.
    pub fn open(db_path: &str) -> Result<Self> {
        let db_path = db::init(db_path)?;
        let pool = db::create_pool(&db_path)?;
        db::run_migrations(&pool)?;
        let writer = db::spawn_writer(&pool)?;
        Ok(Self::new(pool, writer))
    }
}

/// Upserts one day, folding the legacy `DD-MM-YYYY` spelling of the same day into the canonical row.
fn upsert_row(conn: &mut SqliteConnection, row: NewQuoteSeriesDB, date: NaiveDate) -> Result<()> {
    let legacy = date.format(LONG_DATE_FORMAT).to_string();
    let replaced = diesel::delete(
        dsl::quote_series
            .filter(dsl::quote_type.eq(&row.quote_type))
            .filter(dsl::date.eq(&legacy)),
    )
    .execute(conn)
    .into_core()?;

    if replaced > 0 {
        debug!(
            "Replaced legacy row {} for {} with {}",
            legacy, row.quote_type, row.date
        );
    }

    diesel::insert_into(dsl::quote_series)
        .values(&row)
        .on_conflict((dsl::quote_type, dsl::date))
        .do_update()
        .set((
            dsl::value.eq(&row.value),
            dsl::updated_at.eq(&row.updated_at),
        ))
        .execute(conn)
        .into_core()?;
    Ok(())
}

#[async_trait]
impl SeriesStore for SqliteSeriesStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn read(&self, quote_type: QuoteType) -> Result<Vec<SeriesEntry>> {
        let pool = self.pool.clone();
        let rows = tokio::task::spawn_blocking(move || -> Result<Vec<QuoteSeriesDB>> {
            let mut conn = get_connection(&pool)?;
            dsl::quote_series
                .filter(dsl::quote_type.eq(quote_type.as_str()))
                .order(dsl::id.asc())
                .select(QuoteSeriesDB::as_select())
                .load::<QuoteSeriesDB>(&mut conn)
                .into_core()
        })
        .await
        .map_err(|e| StorageError::Internal(e.to_string()))??;

        let mut entries = rows
            .into_iter()
            .map(SeriesEntry::try_from)
            .collect::<std::result::Result<Vec<_>, StorageError>>()?;
        sort_entries_by_date(&mut entries);
        Ok(entries)
    }

    async fn upsert(&self, quote_type: QuoteType, date: NaiveDate, value: Decimal) -> Result<()> {
        let row = NewQuoteSeriesDB::new(quote_type, date, value);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> { upsert_row(conn, row, date) })
            .await
    }

    async fn upsert_many(
        &self,
        quote_type: QuoteType,
        points: &[(NaiveDate, Decimal)],
    ) -> Result<usize> {
        if points.is_empty() {
            return Ok(0);
        }
        let points = points.to_vec();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                for (date, value) in &points {
                    upsert_row(conn, NewQuoteSeriesDB::new(quote_type, *date, *value), *date)?;
                }
                Ok(points.len())
            })
            .await
    }
}
