// Tests for HistoricalDataFetcher against a mocked archive endpoint

mod common;

use chrono::NaiveDate;
use flood_forecast_service::fetch_error::FetchError;
use mockito::{Matcher, Server};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn test_fetch_concatenates_years_oldest_first() {
    let mut server = Server::new_async().await;

    let mut mocks = Vec::new();
    for (i, year) in (2020..=2024).enumerate() {
        let base = 10.0 + i as f64;
        let mock = server
            .mock("GET", common::ARCHIVE_PATH)
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("start_date".into(), format!("{year}-06-12")),
                Matcher::UrlEncoded("end_date".into(), format!("{year}-06-18")),
                Matcher::UrlEncoded(
                    "hourly".into(),
                    "temperature_2m,soil_moisture_0_to_7cm".into(),
                ),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(common::archive_body(&[base, base + 0.5], &[0.25, 0.35]))
            .expect(1)
            .create_async()
            .await;
        mocks.push(mock);
    }

    let fetcher = common::historical_fetcher(&server.url(), 5);
    let sample = fetcher
        .fetch(47.5, 19.0, date(2025, 6, 15))
        .await
        .expect("Expected historical sample");

    assert_eq!(
        sample.temperatures,
        vec![10.0, 10.5, 11.0, 11.5, 12.0, 12.5, 13.0, 13.5, 14.0, 14.5]
    );
    let moisture = sample.soil_moisture.expect("Expected moisture series");
    assert_eq!(moisture.len(), 10);
    assert!((moisture[0] - 25.0).abs() < 1e-9);
    assert!((moisture[1] - 35.0).abs() < 1e-9);

    for mock in mocks {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_fetch_fails_closed_on_upstream_error() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", common::ARCHIVE_PATH)
        .match_query(Matcher::Any)
        .with_status(500)
        .expect(2)
        .create_async()
        .await;

    let fetcher = common::historical_fetcher(&server.url(), 1);
    assert!(fetcher.fetch(47.5, 19.0, date(2025, 6, 15)).await.is_none());

    let err = fetcher
        .try_fetch(47.5, 19.0, date(2025, 6, 15))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Status(500)));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_fails_closed_on_malformed_payload() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", common::ARCHIVE_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"hourly": {"time": ["2024-06-12T00:00"], "temperature_2m": []}}"#)
        .create_async()
        .await;

    let fetcher = common::historical_fetcher(&server.url(), 1);
    let err = fetcher
        .try_fetch(47.5, 19.0, date(2025, 6, 15))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Malformed(_)));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_without_moisture_column() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", common::ARCHIVE_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{"hourly": {"time": ["2024-01-01T00:00", "2024-01-01T01:00"], "temperature_2m": [1.5, 2.5]}}"#,
        )
        .create_async()
        .await;

    let fetcher = common::historical_fetcher(&server.url(), 1);
    let sample = fetcher.fetch(47.5, 19.0, date(2025, 1, 4)).await.unwrap();

    assert_eq!(sample.temperatures, vec![1.5, 2.5]);
    assert!(sample.soil_moisture.is_none());

    mock.assert_async().await;
}
