use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::quotes::QuoteType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateStatus {
    Success,
    Failure,
}

/// What happened to one quote type during an update run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteUpdateOutcome {
    pub status: UpdateStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QuoteUpdateOutcome {
    pub fn success(value: Decimal) -> Self {
        Self {
            status: UpdateStatus::Success,
            value: Some(value),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            status: UpdateStatus::Failure,
            value: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == UpdateStatus::Success
    }
}

/// Result of one update run. `date` is the canonical `DD-MM-YY` day that was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateReport {
    pub date: String,
    pub per_type: BTreeMap<QuoteType, QuoteUpdateOutcome>,
}

impl UpdateReport {
    pub fn succeeded(&self) -> usize {
        self.per_type.values().filter(|o| o.is_success()).count()
    }

    pub fn all_succeeded(&self) -> bool {
        self.succeeded() == self.per_type.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Live probe result for one upstream source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceStatus {
    pub ok: bool,
    pub value: Option<Decimal>,
    pub error: Option<String>,
}

/// Health of all upstream sources; healthy only if every source answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub sources: BTreeMap<QuoteType, SourceStatus>,
    pub errors: Vec<String>,
}

impl HealthReport {
    pub fn from_sources(sources: BTreeMap<QuoteType, SourceStatus>) -> Self {
        let errors: Vec<String> = sources
            .iter()
            .filter_map(|(qt, s)| s.error.as_ref().map(|e| format!("{}: {}", qt, e)))
            .collect();
        let status = if sources.values().all(|s| s.ok) {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy
        };
        Self {
            status,
            sources,
            errors,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_report_serialization_shape() {
        let mut per_type = BTreeMap::new();
        per_type.insert(QuoteType::Uva, QuoteUpdateOutcome::success(dec!(1500.5)));
        per_type.insert(QuoteType::DolarMep, QuoteUpdateOutcome::failure("Timeout: DOLARHOY"));
        let report = UpdateReport {
            date: "18-10-26".to_string(),
            per_type,
        };

        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({
                "date": "18-10-26",
                "per_type": {
                    "uva": {"status": "success", "value": 1500.5},
                    "dolar_mep": {"status": "failure", "error": "Timeout: DOLARHOY"}
                }
            })
        );
        assert_eq!(report.succeeded(), 1);
        assert!(!report.all_succeeded());
    }

    #[test]
    fn test_health_is_unhealthy_if_any_source_fails() {
        let mut sources = BTreeMap::new();
        sources.insert(
            QuoteType::Uva,
            SourceStatus {
                ok: true,
                value: Some(dec!(1)),
                error: None,
            },
        );
        sources.insert(
            QuoteType::DolarMayorista,
            SourceStatus {
                ok: false,
                value: None,
                error: Some("boom".to_string()),
            },
        );
        let report = HealthReport::from_sources(sources);
        assert!(!report.is_healthy());
        assert_eq!(report.errors, vec!["dolar_mayorista: boom".to_string()]);
    }
}
