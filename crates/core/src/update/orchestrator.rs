//! Update orchestration.
//!
//! For each quote type, independently: fetch today's value through the
//! adapter registry and upsert it. A failure for one type is recorded in the
//! report and never stops the others.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use futures::future::join_all;
use log::{error, info};

use super::model::{HealthReport, QuoteUpdateOutcome, SourceStatus, UpdateReport};
use crate::quotes::{format_canonical, QuoteType, SeriesStore};
use cotizaciones_market_data::{argentina_today, AdapterRegistry};

pub struct UpdateOrchestrator {
    store: Arc<dyn SeriesStore>,
    registry: Arc<AdapterRegistry>,
}

impl UpdateOrchestrator {
    pub fn new(store: Arc<dyn SeriesStore>, registry: Arc<AdapterRegistry>) -> Self {
        Self { store, registry }
    }

    /// Runs the update for today in Argentina.
    pub async fn run(&self) -> UpdateReport {
        self.run_for_date(argentina_today()).await
    }

    /// Runs the update, storing fetched values under `date`.
    pub async fn run_for_date(&self, date: NaiveDate) -> UpdateReport {
        let canonical = format_canonical(date);
        info!("Starting quote update for {}", canonical);

        let mut per_type = BTreeMap::new();
        for quote_type in QuoteType::ALL {
            let outcome = self.update_one(quote_type, date, &canonical).await;
            per_type.insert(quote_type, outcome);
        }

        let report = UpdateReport {
            date: canonical,
            per_type,
        };
        info!(
            "Quote update for {} finished: {}/{} succeeded",
            report.date,
            report.succeeded(),
            report.per_type.len()
        );
        report
    }

    async fn update_one(
        &self,
        quote_type: QuoteType,
        date: NaiveDate,
        canonical: &str,
    ) -> QuoteUpdateOutcome {
        let value = match self.registry.fetch(quote_type).await {
            Ok(value) => value,
            Err(e) => {
                error!("Failed to fetch {} for {}: {}", quote_type, canonical, e);
                return QuoteUpdateOutcome::failure(e.to_string());
            }
        };

        match self.store.upsert(quote_type, date, value).await {
            Ok(()) => {
                info!("Stored {} = {} for {}", quote_type, value, canonical);
                QuoteUpdateOutcome::success(value)
            }
            Err(e) => {
                error!(
                    "Failed to store {} = {} for {}: {}",
                    quote_type, value, canonical, e
                );
                QuoteUpdateOutcome::failure(e.to_string())
            }
        }
    }

    /// Probes every source live without persisting anything.
    pub async fn check_sources(&self) -> HealthReport {
        let probes = QuoteType::ALL.map(|quote_type| async move {
            let status = match self.registry.fetch(quote_type).await {
                Ok(value) => SourceStatus {
                    ok: true,
                    value: Some(value),
                    error: None,
                },
                Err(e) => SourceStatus {
                    ok: false,
                    value: None,
                    error: Some(e.to_string()),
                },
            };
            (quote_type, status)
        });

        let sources: BTreeMap<QuoteType, SourceStatus> = join_all(probes).await.into_iter().collect();
        HealthReport::from_sources(sources)
    }
}
