use std::sync::Arc;
use std::time::Duration;

use fanhub::cache::{
    CacheConfig, CacheError, CacheProvider, FALLBACK_PING, FALLBACK_WARNING, SetOptions,
};
use fanhub::infra::logging::{LogLevel, Logger, MemorySink};
use httpmock::{Mock, MockServer};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

const TOKEN: &str = "test-token";

fn provider_for(url: &str, token: &str) -> (Arc<MemorySink>, CacheProvider) {
    let sink = Arc::new(MemorySink::new());
    let provider = CacheProvider::new(CacheConfig::new(url, token), Logger::new(sink.clone()));
    (sink, provider)
}

async fn expect_command<'a>(server: &'a MockServer, command: Value, reply: Value) -> Mock<'a> {
    server
        .mock_async(|when, then| {
            when.method("POST")
                .path("/")
                .header("authorization", format!("Bearer {TOKEN}"))
                .json_body(command);
            then.status(200).json_body(reply);
        })
        .await
}

#[tokio::test]
async fn live_client_forwards_commands_verbatim() {
    let server = MockServer::start_async().await;
    let ping = expect_command(&server, json!(["PING"]), json!({ "result": "PONG" })).await;
    let set_with_expiry = expect_command(
        &server,
        json!(["SET", "session:42", "payload", "EX", "90"]),
        json!({ "result": "OK" }),
    )
    .await;
    let set_plain = expect_command(
        &server,
        json!(["SET", "flag", "on"]),
        json!({ "result": "OK" }),
    )
    .await;
    let get_hit = expect_command(
        &server,
        json!(["GET", "session:42"]),
        json!({ "result": "payload" }),
    )
    .await;
    let get_miss =
        expect_command(&server, json!(["GET", "missing"]), json!({ "result": null })).await;
    let incr = expect_command(
        &server,
        json!(["INCRBY", "views:post-7", "5"]),
        json!({ "result": 17 }),
    )
    .await;

    let (sink, provider) = provider_for(&server.base_url(), TOKEN);
    let client = provider.client();

    assert!(client.enabled());
    assert_eq!(client.ping().await.expect("ping"), "PONG");
    assert_eq!(
        client
            .set("session:42", "payload", SetOptions::expire_in(90))
            .await
            .expect("set with expiry"),
        Some("OK".to_string())
    );
    assert_eq!(
        client
            .set("flag", "on", SetOptions::default())
            .await
            .expect("set"),
        Some("OK".to_string())
    );
    assert_eq!(
        client.get("session:42").await.expect("get"),
        Some("payload".to_string())
    );
    assert_eq!(client.get("missing").await.expect("get"), None);
    assert_eq!(
        client.increment("views:post-7", 5).await.expect("incr"),
        17
    );
    assert!(sink.records().is_empty());

    for mock in [ping, set_with_expiry, set_plain, get_hit, get_miss, incr] {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn negative_increment_is_sent_as_is() {
    let server = MockServer::start_async().await;
    let incr = expect_command(
        &server,
        json!(["INCRBY", "credits", "-3"]),
        json!({ "result": -3 }),
    )
    .await;

    let (_sink, provider) = provider_for(&server.base_url(), TOKEN);
    assert_eq!(
        provider
            .client()
            .increment("credits", -3)
            .await
            .expect("incr"),
        -3
    );
    incr.assert_async().await;
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Leaderboard {
    top: Vec<String>,
}

#[tokio::test]
async fn json_helpers_store_serialized_values() {
    let server = MockServer::start_async().await;
    let board = Leaderboard {
        top: vec!["ana".to_string(), "bo".to_string()],
    };
    let encoded = serde_json::to_string(&board).expect("encode");
    let set = expect_command(
        &server,
        json!(["SET", "board", encoded.clone(), "EX", "60"]),
        json!({ "result": "OK" }),
    )
    .await;
    let get = expect_command(&server, json!(["GET", "board"]), json!({ "result": encoded })).await;

    let (_sink, provider) = provider_for(&server.base_url(), TOKEN);
    let client = provider.client();

    client
        .set_json("board", &board, SetOptions::expire_in(60))
        .await
        .expect("set_json");
    let loaded: Option<Leaderboard> = client.get_json("board").await.expect("get_json");

    assert_eq!(loaded, Some(board));
    set.assert_async().await;
    get.assert_async().await;
}

#[tokio::test]
async fn runtime_errors_reach_the_caller() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method("POST");
            then.status(400)
                .json_body(json!({ "error": "ERR value is not an integer" }));
        })
        .await;

    let (sink, provider) = provider_for(&server.base_url(), TOKEN);
    let client = provider.client();

    let err = client
        .increment("name", 1)
        .await
        .expect_err("remote rejects command");
    match err {
        CacheError::Remote {
            command,
            status,
            message,
        } => {
            assert_eq!(command, "INCRBY");
            assert_eq!(status, 400);
            assert_eq!(message, "ERR value is not an integer");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(client.enabled());
    assert!(sink.records().is_empty());
}

#[tokio::test]
async fn unauthorized_reply_without_json_is_reported() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method("POST");
            then.status(401).body("Unauthorized");
        })
        .await;

    let (_sink, provider) = provider_for(&server.base_url(), "wrong-token");
    let err = provider.client().ping().await.expect_err("rejected token");

    assert!(matches!(
        err,
        CacheError::Remote { status: 401, ref message, .. } if message == "Unauthorized"
    ));
}

#[tokio::test]
async fn slow_service_times_out_as_transport_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method("POST");
            then.status(200)
                .json_body(json!({ "result": "PONG" }))
                .delay(Duration::from_millis(500));
        })
        .await;

    let config = CacheConfig::new(server.base_url(), TOKEN)
        .with_request_timeout(Duration::from_millis(50));
    let provider = CacheProvider::new(config, Logger::new(Arc::new(MemorySink::new())));

    let err = provider.client().ping().await.expect_err("timeout");
    assert!(matches!(err, CacheError::Transport(_)));
}

#[tokio::test]
async fn invalid_configuration_degrades_to_noop_client() {
    let (sink, provider) = provider_for("ftp://cache.example.com", TOKEN);

    let client = provider.client();
    let again = provider.client();

    assert!(Arc::ptr_eq(&client, &again));
    assert!(!client.enabled());
    assert_eq!(client.ping().await.expect("ping"), FALLBACK_PING);
    assert_eq!(client.get("any").await.expect("get"), None);
    assert_eq!(
        client
            .set("any", "value", SetOptions::expire_in(5))
            .await
            .expect("set"),
        None
    );
    assert_eq!(client.increment("any", 10).await.expect("incr"), 0);

    let warnings = sink.records_at(LogLevel::Warn);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].message(), FALLBACK_WARNING);
    assert_eq!(
        warnings[0].get("error"),
        Some(&json!("unsupported cache url scheme `ftp`"))
    );
    assert!(warnings[0].get("timestamp").is_some());
}

#[tokio::test]
async fn missing_token_degrades_to_noop_client() {
    let (sink, provider) = provider_for("https://cache.example.com", "");

    let client = provider.client();

    assert!(!client.enabled());
    assert_eq!(client.ping().await.expect("ping"), FALLBACK_PING);
    let warnings = sink.records_at(LogLevel::Warn);
    assert_eq!(warnings.len(), 1);
    assert_eq!(
        warnings[0].get("error"),
        Some(&json!("cache token is not configured"))
    );
}
