use std::time::Duration;

use serde_json::json;
use tokio::sync::mpsc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use wxboard::fetcher::{Fetcher, Update};
use wxboard::locate::Coords;
use wxboard::openweather::{FetchError, Query, WeatherClient};

fn current_body(city: &str) -> serde_json::Value {
    json!({
        "name": city,
        "timezone": 0,
        "main": {"temp": 21.4, "feels_like": 20.9, "humidity": 40, "pressure": 1015},
        "weather": [{"main": "Clear", "description": "clear sky", "icon": "01d"}],
        "wind": {"speed": 3.1},
        "sys": {"sunrise": 1716526980, "sunset": 1716584400}
    })
}

fn forecast_body() -> serde_json::Value {
    // 2024-05-24T00:00:00Z, every 3 hours
    let list: Vec<_> = (0..40)
        .map(|i| {
            json!({
                "dt": 1716508800 + i * 3 * 3600,
                "main": {"temp": 10.0 + i as f64},
                "wind": {"speed": 2.0},
                "weather": [{"icon": "03d"}]
            })
        })
        .collect();
    json!({"list": list, "city": {"timezone": 0}})
}

fn client(server: &MockServer) -> WeatherClient {
    WeatherClient::new(server.uri(), "test-key", Duration::from_secs(5)).unwrap()
}

async fn recv(rx: &mut mpsc::UnboundedReceiver<Update>) -> Update {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for update")
        .expect("channel closed")
}

#[tokio::test]
async fn test_current_by_city() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "New York"))
        .and(query_param("units", "metric"))
        .and(query_param("appid", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("New York")))
        .mount(&server)
        .await;

    let snapshot = client(&server)
        .current(&Query::City("New York".to_string()))
        .await
        .unwrap();
    assert_eq!(snapshot.city, "New York");
    assert_eq!(snapshot.sunrise_label(), "5:03 AM");
}

#[tokio::test]
async fn test_current_by_coords() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("lat", "48.85"))
        .and(query_param("lon", "2.35"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Paris")))
        .mount(&server)
        .await;

    let snapshot = client(&server)
        .current(&Query::Coords {
            lat: 48.85,
            lon: 2.35,
        })
        .await
        .unwrap();
    assert_eq!(snapshot.city, "Paris");
}

#[tokio::test]
async fn test_not_found_distinct_from_other_failures() {
    let server = MockServer::start().await;
    Mock::given(path("/weather"))
        .and(query_param("q", "Atlantis"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(path("/weather"))
        .and(query_param("q", "Boom"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client(&server);
    let not_found = client
        .current(&Query::City("Atlantis".to_string()))
        .await
        .unwrap_err();
    let failed = client
        .current(&Query::City("Boom".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(not_found, FetchError::NotFound));
    assert!(matches!(failed, FetchError::Status { status: 503, .. }));
    assert_eq!(not_found.to_string(), "City not found");
    assert_ne!(not_found.to_string(), failed.to_string());
}

#[tokio::test]
async fn test_missing_fields_are_malformed() {
    let server = MockServer::start().await;
    Mock::given(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "Nowhere"})))
        .mount(&server)
        .await;

    let err = client(&server)
        .current(&Query::City("Nowhere".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Malformed { .. }));
    assert!(!err.is_user_visible());
}

#[tokio::test]
async fn test_pipeline_fetches_forecasts_for_echoed_city() {
    let server = MockServer::start().await;
    Mock::given(path("/weather"))
        .and(query_param("q", "london"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("London")))
        .mount(&server)
        .await;
    Mock::given(path("/forecast"))
        .and(query_param("q", "London"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .expect(2)
        .mount(&server)
        .await;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut fetcher = Fetcher::new(client(&server), tx);
    let generation = fetcher.search(Query::City("london".to_string()));

    match recv(&mut rx).await {
        Update::Current {
            generation: g,
            result,
        } => {
            assert_eq!(g, generation);
            assert_eq!(result.unwrap().city, "London");
        }
        other => panic!("expected current conditions first, got {other:?}"),
    }

    let mut daily = false;
    let mut hourly = false;
    for _ in 0..2 {
        match recv(&mut rx).await {
            Update::Daily { result, .. } => {
                assert_eq!(result.unwrap().len(), 40);
                daily = true;
            }
            Update::Hourly { result, .. } => {
                assert_eq!(result.unwrap().len(), 40);
                hourly = true;
            }
            other => panic!("unexpected update {other:?}"),
        }
    }
    assert!(daily && hourly);
}

#[tokio::test]
async fn test_failed_current_skips_forecasts() {
    let server = MockServer::start().await;
    Mock::given(path("/weather"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .expect(0)
        .mount(&server)
        .await;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut fetcher = Fetcher::new(client(&server), tx);
    fetcher.search(Query::City("Atlantis".to_string()));

    match recv(&mut rx).await {
        Update::Current { result, .. } => assert!(matches!(result, Err(FetchError::NotFound))),
        other => panic!("unexpected update {other:?}"),
    }
    // Give a stray forecast request a chance to show up
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_new_search_supersedes_old() {
    let server = MockServer::start().await;
    Mock::given(path("/weather"))
        .and(query_param("q", "Slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(current_body("Slow"))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;
    Mock::given(path("/weather"))
        .and(query_param("q", "Fast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Fast")))
        .mount(&server)
        .await;
    Mock::given(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(&server)
        .await;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut fetcher = Fetcher::new(client(&server), tx);
    let first = fetcher.search(Query::City("Slow".to_string()));
    let second = fetcher.search(Query::City("Fast".to_string()));
    assert!(second > first);

    let update = recv(&mut rx).await;
    assert!(fetcher.is_current(&update));
    match update {
        Update::Current { result, .. } => assert_eq!(result.unwrap().city, "Fast"),
        other => panic!("unexpected update {other:?}"),
    }

    // The slow pipeline was aborted and never reports
    tokio::time::sleep(Duration::from_millis(2500)).await;
    while let Ok(update) = rx.try_recv() {
        assert_eq!(update.generation(), second);
    }
}

#[tokio::test]
async fn test_search_makes_pending_location_stale() {
    let server = MockServer::start().await;
    Mock::given(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Paris")))
        .mount(&server)
        .await;
    Mock::given(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(&server)
        .await;

    let (tx, _rx) = mpsc::unbounded_channel();
    let mut fetcher = Fetcher::new(client(&server), tx);
    let located = |generation| Update::Located {
        generation,
        result: Ok(Coords { lat: 1.0, lon: 2.0 }),
    };

    // Location asked for before any search
    let asked_at = fetcher.generation();
    assert!(fetcher.is_current(&located(asked_at)));

    // The user searches a city before the lookup answers
    let searched = fetcher.search(Query::City("Paris".to_string()));
    assert!(!fetcher.is_current(&located(asked_at)));
    assert!(fetcher.is_current(&located(searched)));
}
