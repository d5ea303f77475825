use std::time::Duration;

use defituna_api::{Client, Error, TimeWindowQuery, TopWalletsQuery};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

#[tokio::test]
async fn get_revenue_success() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("revenue.json");

    Mock::given(method("GET"))
        .and(path("/revenue"))
        .and(query_param("startTime", "1704067200"))
        .and(query_param("endTime", "1704240000"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let query = TimeWindowQuery::default()
        .with_start_time(1704067200)
        .with_end_time(1704240000);
    let rows = client.get_revenue(&query).await.unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].sol_amount, Some(2.5));
}

#[tokio::test]
async fn get_liquidations_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/liquidations"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("liquidations.json")))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let rows = client
        .get_liquidations(&TimeWindowQuery::default())
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn get_top_wallets_passes_limit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wallets/top"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("top_wallets.json")))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let rows = client
        .get_top_wallets(&TopWalletsQuery::default().with_limit(5))
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn get_pools_orders_users_and_config() {
    let mock_server = MockServer::start().await;

    for (p, fixture) in [
        ("/pools", "pools.json"),
        ("/orders", "orders.json"),
        ("/users/activity", "user_activity.json"),
        ("/users/metrics", "user_metrics.json"),
        ("/config/wallets", "tracked_wallets.json"),
    ] {
        Mock::given(method("GET"))
            .and(path(p))
            .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture(fixture)))
            .mount(&mock_server)
            .await;
    }

    let client = Client::with_base_url(&mock_server.uri());
    assert_eq!(client.get_pools().await.unwrap().len(), 2);
    assert_eq!(client.get_orders().await.unwrap().len(), 2);
    assert_eq!(
        client
            .get_user_activity(&TimeWindowQuery::default())
            .await
            .unwrap()
            .len(),
        2
    );
    assert_eq!(client.get_user_metrics().await.unwrap().dau, Some(150.0));
    assert_eq!(client.get_tracked_wallets().await.unwrap().len(), 2);
}

#[tokio::test]
async fn server_error_maps_to_http_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/revenue"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let err = client
        .get_revenue(&TimeWindowQuery::default())
        .await
        .unwrap_err();
    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "Internal Server Error");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_json_maps_to_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pools"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not valid json}"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let err = client.get_pools().await.unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
}

#[tokio::test]
async fn slow_response_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("[]")
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let client =
        Client::with_base_url(&mock_server.uri()).with_timeout(Duration::from_millis(50));
    let err = client.get_orders().await.unwrap_err();
    assert!(matches!(err, Error::Timeout));
}
