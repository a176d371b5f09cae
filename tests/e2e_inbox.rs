//! E2E tests for inbox browsing

mod common;

use chrono::Utc;
use common::TestServer;
use serde_json::Value;
use smishguard::data::{Channel, Message};

async fn get_json(server: &TestServer, path: &str) -> Value {
    let response = server.client.get(&server.url(path)).send().await.unwrap();
    assert_eq!(response.status(), 200, "GET {path}");
    response.json().await.unwrap()
}

async fn get_status(server: &TestServer, path: &str) -> u16 {
    server
        .client
        .get(&server.url(path))
        .send()
        .await
        .unwrap()
        .status()
        .as_u16()
}

fn ids(page: &Value) -> Vec<String> {
    page["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_default_channel_is_sms_newest_first() {
    let server = TestServer::new().await;

    let json = get_json(&server, "/v1/inbox").await;

    assert_eq!(
        ids(&json),
        vec!["msg_sms_001", "msg_sms_002", "msg_sms_003", "msg_sms_004"]
    );
    assert!(json["nextCursor"].is_null());

    let first = &json["items"][0];
    assert_eq!(first["channel"], "sms");
    assert_eq!(first["senderName"], "CJ대한통운");
    assert_eq!(first["riskHint"], "warn");
    assert!(first["preview"].as_str().unwrap().ends_with("..."));
    assert!(json["items"][3]["riskHint"].is_null());
}

#[tokio::test]
async fn test_every_channel_is_listable() {
    let server = TestServer::new().await;

    for channel in Channel::ALL {
        let json = get_json(&server, &format!("/v1/inbox?channel={channel}")).await;
        let items = json["items"].as_array().unwrap();
        assert!(!items.is_empty(), "{channel} has demo messages");
        assert!(items.iter().all(|item| item["channel"] == channel.as_str()));
    }
}

#[tokio::test]
async fn test_pagination_walks_all_messages() {
    let server = TestServer::unseeded().await;
    server.insert_messages(Channel::Email, 45).await;

    let first = get_json(&server, "/v1/inbox?channel=email").await;
    assert_eq!(first["items"].as_array().unwrap().len(), 20);
    assert_eq!(first["items"][0]["id"], "email-044");
    assert_eq!(first["nextCursor"], "eyJvIjoyMH0");

    let second = get_json(
        &server,
        &format!(
            "/v1/inbox?channel=email&cursor={}",
            first["nextCursor"].as_str().unwrap()
        ),
    )
    .await;
    assert_eq!(second["items"].as_array().unwrap().len(), 20);
    assert_eq!(second["items"][0]["id"], "email-024");

    let third = get_json(
        &server,
        &format!(
            "/v1/inbox?channel=email&cursor={}",
            second["nextCursor"].as_str().unwrap()
        ),
    )
    .await;
    assert_eq!(
        ids(&third),
        vec!["email-004", "email-003", "email-002", "email-001", "email-000"]
    );
    assert!(third["nextCursor"].is_null());
}

#[tokio::test]
async fn test_full_last_page_still_offers_cursor() {
    let server = TestServer::unseeded().await;
    server.insert_messages(Channel::Kakao, 10).await;

    let first = get_json(&server, "/v1/inbox?channel=kakao&limit=10").await;
    assert_eq!(first["items"].as_array().unwrap().len(), 10);
    let cursor = first["nextCursor"].as_str().unwrap().to_string();

    let second = get_json(&server, &format!("/v1/inbox?channel=kakao&cursor={cursor}")).await;
    assert!(second["items"].as_array().unwrap().is_empty());
    assert!(second["nextCursor"].is_null());
}

#[tokio::test]
async fn test_preview_truncates_at_sixty_characters() {
    let server = TestServer::unseeded().await;
    let now = Utc::now();
    for (id, content) in [
        ("long", "가".repeat(60)),
        ("short", "나".repeat(59)),
    ] {
        server
            .state
            .db
            .insert_message(&Message {
                id: id.to_string(),
                channel: Channel::Instagram,
                sender_name: "someone".to_string(),
                sender_id: "someone".to_string(),
                content,
                ts: now,
                risk_hint: None,
            })
            .await
            .unwrap();
    }

    let json = get_json(&server, "/v1/inbox?channel=instagram").await;
    let by_id = |id: &str| {
        json["items"]
            .as_array()
            .unwrap()
            .iter()
            .find(|item| item["id"] == id)
            .unwrap()["preview"]
            .as_str()
            .unwrap()
            .to_string()
    };

    assert_eq!(by_id("long"), format!("{}...", "가".repeat(60)));
    assert_eq!(by_id("short"), "나".repeat(59));
}

#[tokio::test]
async fn test_invalid_query_parameters_are_rejected() {
    let server = TestServer::new().await;

    assert_eq!(get_status(&server, "/v1/inbox?channel=telegram").await, 400);
    assert_eq!(get_status(&server, "/v1/inbox?cursor=%%%").await, 400);
    assert_eq!(get_status(&server, "/v1/inbox?cursor=bm90LWpzb24").await, 400);
    assert_eq!(get_status(&server, "/v1/inbox?limit=0").await, 400);
    assert_eq!(get_status(&server, "/v1/inbox?limit=101").await, 400);
}

#[tokio::test]
async fn test_error_body_carries_message() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(&server.url("/v1/inbox?limit=0"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let json: Value = response.json().await.unwrap();
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_non_numeric_limit_has_json_error_body() {
    let server = TestServer::new().await;

    for path in ["/v1/inbox?limit=abc", "/v1/analysis?limit=abc"] {
        let response = server.client.get(&server.url(path)).send().await.unwrap();

        assert_eq!(response.status(), 400, "GET {path}");
        let json: Value = response.json().await.unwrap();
        assert!(json["error"].is_string(), "GET {path}");
    }
}

#[tokio::test]
async fn test_message_detail_has_full_content() {
    let server = TestServer::new().await;

    let json = get_json(&server, "/v1/messages/msg_sms_003").await;

    assert_eq!(json["id"], "msg_sms_003");
    assert_eq!(json["channel"], "sms");
    assert_eq!(json["senderId"], "1588-9999");
    assert!(
        json["content"]
            .as_str()
            .unwrap()
            .ends_with("https://kb-secure-login.com")
    );
    assert!(json["ts"].is_string());
}

#[tokio::test]
async fn test_unknown_message_is_404() {
    let server = TestServer::new().await;

    assert_eq!(get_status(&server, "/v1/messages/nope").await, 404);
}
