use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use cotizaciones_core::SeriesStore;
use cotizaciones_market_data::{
    AdapterRegistry, MarketDataError, QuoteType, RetryPolicy, SiteAdapter,
};
use cotizaciones_server::{
    api::app_router,
    build_state, build_state_with,
    config::{Config, StoreLocation},
};
use cotizaciones_storage_csv::CsvSeriesStore;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

struct FixedAdapter {
    quote_type: QuoteType,
    value: Option<Decimal>,
}

#[async_trait]
impl SiteAdapter for FixedAdapter {
    fn id(&self) -> &'static str {
        "FIXED"
    }

    fn quote_type(&self) -> QuoteType {
        self.quote_type
    }

    async fn fetch(&self) -> Result<Decimal, MarketDataError> {
        self.value.ok_or_else(|| MarketDataError::UnexpectedResponse {
            provider: "FIXED".to_string(),
            message: "value block missing".to_string(),
        })
    }
}

/// Answers with an error only after `delay`.
struct SlowAdapter {
    quote_type: QuoteType,
    delay: Duration,
}

#[async_trait]
impl SiteAdapter for SlowAdapter {
    fn id(&self) -> &'static str {
        "SLOW"
    }

    fn quote_type(&self) -> QuoteType {
        self.quote_type
    }

    async fn fetch(&self) -> Result<Decimal, MarketDataError> {
        tokio::time::sleep(self.delay).await;
        Err(MarketDataError::Timeout {
            provider: "SLOW".to_string(),
        })
    }
}

fn adapter(quote_type: QuoteType, value: Option<Decimal>) -> Arc<dyn SiteAdapter> {
    Arc::new(FixedAdapter { quote_type, value })
}

struct TestApp {
    router: Router,
    store: Arc<CsvSeriesStore>,
    dir: TempDir,
}

fn build_test_app(adapters: Vec<Arc<dyn SiteAdapter>>) -> TestApp {
    build_test_app_with_timeout(adapters, Config::default().request_timeout)
}

fn build_test_app_with_timeout(
    adapters: Vec<Arc<dyn SiteAdapter>>,
    request_timeout: Duration,
) -> TestApp {
    let dir = tempdir().unwrap();
    let config = Config {
        store: StoreLocation::Csv(dir.path().to_path_buf()),
        projection_years: 1,
        scheduler_enabled: false,
        request_timeout,
        ..Config::default()
    };
    let store = Arc::new(CsvSeriesStore::open(dir.path()).unwrap());
    let registry = AdapterRegistry::new(adapters).with_retry_policy(RetryPolicy::no_retry());
    let state = build_state_with(&config, store.clone(), registry);
    TestApp {
        router: app_router(state, &config),
        store,
        dir,
    }
}

fn healthy_adapters() -> Vec<Arc<dyn SiteAdapter>> {
    vec![
        adapter(QuoteType::Uva, Some(dec!(1512.34))),
        adapter(QuoteType::DolarMayorista, Some(dec!(1450.5))),
        adapter(QuoteType::DolarMep, Some(dec!(1480))),
    ]
}

async fn send(router: &Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

async fn upload(router: &Router, uri: &str, filename: &str, content: &str) -> (StatusCode, Value) {
    let boundary = "cotizaciones-test-boundary";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
         Content-Type: text/csv\r\n\r\n\
         {content}\r\n\
         --{boundary}--\r\n"
    );
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn date(day: u32, month: u32, year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[tokio::test]
async fn series_is_projected_one_year_past_last_entry() {
    let app = build_test_app(healthy_adapters());
    app.store
        .upsert(QuoteType::Uva, date(31, 12, 2023), dec!(99.5))
        .await
        .unwrap();
    app.store
        .upsert(QuoteType::Uva, date(1, 1, 2024), dec!(100))
        .await
        .unwrap();

    let (status, body) = send(&app.router, Method::GET, "/api/uva").await;
    assert_eq!(status, StatusCode::OK);

    let points = body.as_array().unwrap();
    assert_eq!(points.len(), 2 + 365);
    assert_eq!(points[0]["date"], "31-12-23");
    assert_eq!(points[1]["date"], "01-01-24");
    assert_eq!(points[1]["value"].as_f64(), Some(100.0));
    assert_eq!(points[2]["date"], "02-01-24");
    assert_eq!(points[2]["value"].as_f64(), Some(1.0));
    assert_eq!(points[366]["date"], "31-12-24");
}

#[tokio::test]
async fn empty_series_is_empty_array() {
    let app = build_test_app(healthy_adapters());
    let (status, body) = send(&app.router, Method::GET, "/api/dolar-mep").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Array(vec![]));
}

#[tokio::test]
async fn unreadable_last_date_serves_real_series_only() {
    let app = build_test_app(healthy_adapters());
    std::fs::write(
        app.dir.path().join("dolar_mayorista.csv"),
        "fecha,valor\n2024/01/05,1005.5\n",
    )
    .unwrap();

    let (status, body) = send(&app.router, Method::GET, "/api/dolar-mayorista").await;
    assert_eq!(status, StatusCode::OK);
    let points = body.as_array().unwrap();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0]["date"], "2024/01/05");
}

#[tokio::test]
async fn corrupt_store_file_is_server_error() {
    let app = build_test_app(healthy_adapters());
    std::fs::write(app.dir.path().join("uva.csv"), "fecha,valor\n01-01-24,abc\n").unwrap();

    let (status, body) = send(&app.router, Method::GET, "/api/uva").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], 500);
    assert!(body["message"].as_str().unwrap().contains("Corrupt record"));
}

#[tokio::test]
async fn run_now_stores_todays_values() {
    let app = build_test_app(vec![
        adapter(QuoteType::Uva, Some(dec!(1512.34))),
        adapter(QuoteType::DolarMayorista, None),
        adapter(QuoteType::DolarMep, Some(dec!(1480))),
    ]);

    let (status, report) = send(&app.router, Method::POST, "/api/scheduler/run-now").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["per_type"]["uva"]["status"], "success");
    assert_eq!(report["per_type"]["uva"]["value"].as_f64(), Some(1512.34));
    assert_eq!(report["per_type"]["dolar_mayorista"]["status"], "failure");
    assert!(report["per_type"]["dolar_mayorista"]["error"]
        .as_str()
        .unwrap()
        .contains("value block missing"));
    assert_eq!(report["per_type"]["dolar_mep"]["status"], "success");

    let (_, latest) = send(&app.router, Method::GET, "/api/uva/latest").await;
    assert_eq!(latest["date"], report["date"]);
    assert_eq!(latest["value"].as_f64(), Some(1512.34));

    let (_, latest) = send(&app.router, Method::GET, "/api/dolar-mayorista/latest").await;
    assert_eq!(latest, Value::Null);
}

#[tokio::test]
async fn run_now_twice_keeps_one_row_per_day() {
    let app = build_test_app(healthy_adapters());
    send(&app.router, Method::POST, "/api/scheduler/run-now").await;
    send(&app.router, Method::POST, "/api/scheduler/run-now").await;

    let entries = app.store.read(QuoteType::DolarMep).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].value, dec!(1480));
}

#[tokio::test]
async fn health_reports_failing_source_without_writing() {
    let app = build_test_app(vec![
        adapter(QuoteType::Uva, Some(dec!(1512.34))),
        adapter(QuoteType::DolarMayorista, Some(dec!(1450.5))),
        adapter(QuoteType::DolarMep, None),
    ]);

    let (status, body) = send(&app.router, Method::GET, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["sources"]["uva"]["ok"], true);
    assert_eq!(body["sources"]["dolar_mep"]["ok"], false);
    assert_eq!(body["errors"].as_array().unwrap().len(), 1);

    assert!(app.store.read(QuoteType::Uva).await.unwrap().is_empty());
}

#[tokio::test]
async fn health_outlasting_request_timeout_still_reports_sources() {
    let app = build_test_app_with_timeout(
        vec![
            adapter(QuoteType::Uva, Some(dec!(1512.34))),
            adapter(QuoteType::DolarMayorista, Some(dec!(1450.5))),
            Arc::new(SlowAdapter {
                quote_type: QuoteType::DolarMep,
                delay: Duration::from_millis(500),
            }),
        ],
        Duration::from_millis(100),
    );

    let (status, body) = send(&app.router, Method::GET, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["sources"]["uva"]["ok"], true);
    assert_eq!(body["sources"]["dolar_mep"]["ok"], false);

    // Store reads stay bounded by the same timeout and answer well within it.
    let (status, _) = send(&app.router, Method::GET, "/api/uva").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn health_is_healthy_when_all_sources_answer() {
    let app = build_test_app(healthy_adapters());
    let (_, body) = send(&app.router, Method::GET, "/api/health").await;
    assert_eq!(body["status"], "healthy");
    assert!(body["errors"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn scheduler_status_describes_daily_job() {
    let app = build_test_app(healthy_adapters());
    let (status, body) = send(&app.router, Method::GET, "/api/scheduler/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["running"], false);
    assert_eq!(body["next_run"], Value::Null);
    assert_eq!(body["timezone"], "America/Argentina/Buenos_Aires");
    assert_eq!(body["cron"], "10 16 * * *");
    assert_eq!(body["job_id"], "update_daily");
    assert!(body["current_time"].as_str().unwrap().ends_with("-03:00"));
}

#[tokio::test]
async fn import_upserts_rows_under_canonical_dates() {
    let app = build_test_app(healthy_adapters());
    app.store
        .upsert(QuoteType::Uva, date(5, 1, 2024), dec!(1))
        .await
        .unwrap();

    let (status, body) = upload(
        &app.router,
        "/api/import/uva",
        "uva.csv",
        "fecha,valor\n05-01-2024,512.30\n06-01-24,513.10\n07-01-24,\n",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["imported"], 2);
    assert_eq!(body["skipped"], 1);

    let entries = app.store.read(QuoteType::Uva).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].date, "05-01-24");
    assert_eq!(entries[0].value, dec!(512.30));
    assert_eq!(entries[1].date, "06-01-24");
}

#[tokio::test]
async fn import_rejects_bad_dates_with_row_numbers() {
    let app = build_test_app(healthy_adapters());
    let (status, body) = upload(
        &app.router,
        "/api/import/dolar-mep",
        "mep.csv",
        "fecha,valor\n05-01-24,1\n2024-01-06,2\n07/01/24,3\n",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
    assert!(body["message"].as_str().unwrap().contains("2, 3"));
    assert!(app.store.read(QuoteType::DolarMep).await.unwrap().is_empty());
}

#[tokio::test]
async fn import_rejects_non_csv_and_unknown_types() {
    let app = build_test_app(healthy_adapters());

    let (status, _) = upload(&app.router, "/api/import/uva", "uva.xlsx", "fecha,valor\n").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = upload(&app.router, "/api/import/blue", "blue.csv", "fecha,valor\n").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn root_lists_endpoints() {
    let app = build_test_app(healthy_adapters());
    let (status, body) = send(&app.router, Method::GET, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "cotizaciones");
    let series = body["endpoints"]["series"].as_array().unwrap();
    assert!(series.contains(&Value::from("/api/dolar-mayorista")));
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = build_test_app(healthy_adapters());
    let (status, _) = send(&app.router, Method::GET, "/api/dolar-blue").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn sqlite_store_from_config() {
    let tmp = tempdir().unwrap();
    let db_path = tmp.path().join("db").join("cotizaciones.db");
    let config = Config {
        store: StoreLocation::Sqlite(db_path.to_string_lossy().to_string()),
        scheduler_enabled: false,
        ..Config::default()
    };
    let state = build_state(&config).await.unwrap();
    state
        .store
        .upsert(QuoteType::DolarMep, date(2, 1, 2024), dec!(1100))
        .await
        .unwrap();
    let router = app_router(state, &config);

    let (status, body) = send(&router, Method::GET, "/api/dolar-mep").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1 + 3650);
    assert!(db_path.exists());
}
