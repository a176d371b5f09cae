//! Common test utilities for E2E tests

#![allow(dead_code)]

pub mod schema_validator;

use smishguard::{AppState, config};
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance
pub struct TestServer {
    pub addr: String,
    pub state: AppState,
    pub _temp_dir: TempDir,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Server with the demo inbox seeded and no remote model
    pub async fn new() -> Self {
        Self::start(|_| {}).await
    }

    /// Server with an empty database
    pub async fn unseeded() -> Self {
        Self::start(|config| config.database.seed_demo_messages = false).await
    }

    /// Server delegating analysis to `model_url`
    pub async fn with_model(model_url: &str, timeout_seconds: f64) -> Self {
        let model_url = model_url.to_string();
        Self::start(move |config| {
            config.model.url = model_url;
            config.model.timeout_seconds = timeout_seconds;
        })
        .await
    }

    /// Start a server from the test configuration after `customize` ran on it
    pub async fn start(customize: impl FnOnce(&mut config::AppConfig)) -> Self {
        // Create temporary directory for test database
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        // Create test configuration
        let mut config = config::AppConfig {
            server: config::ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Let OS assign port
                allowed_origins: "https://app.test.example.com".to_string(),
                max_body_bytes: 64 * 1024,
            },
            database: config::DatabaseConfig {
                path: db_path,
                seed_demo_messages: true,
            },
            model: config::ModelConfig {
                url: String::new(),
                timeout_seconds: 2.0,
            },
            share: config::ShareConfig {
                ttl_seconds: 600,
                max_entries: 100,
                redirect_path: "/".to_string(),
                max_body_bytes: 1024 * 1024,
            },
            logging: config::LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        };
        customize(&mut config);

        // Initialize app state
        let state = AppState::new(config).await.unwrap();

        // Redirects are asserted on, never followed
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let addr_str = format!("http://{}", addr);

        let app = smishguard::build_router(state.clone());

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait a bit for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Self {
            addr: addr_str,
            state,
            _temp_dir: temp_dir,
            client,
        }
    }

    /// Get base URL for API requests
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    /// Insert `count` messages on `channel`, one minute apart, newest last
    pub async fn insert_messages(
        &self,
        channel: smishguard::data::Channel,
        count: usize,
    ) -> Vec<smishguard::data::Message> {
        use chrono::{Duration, Utc};
        use smishguard::data::Message;

        let base = Utc::now() - Duration::days(1);
        let mut inserted = Vec::with_capacity(count);
        for i in 0..count {
            let message = Message {
                id: format!("{}-{i:03}", channel.as_str()),
                channel,
                sender_name: format!("Sender {i}"),
                sender_id: format!("sender-{i}"),
                content: format!("Message body number {i}"),
                ts: base + Duration::minutes(i as i64),
                risk_hint: None,
            };
            self.state.db.insert_message(&message).await.unwrap();
            inserted.push(message);
        }
        inserted
    }

    /// Save an analysis for `client_id` through the API
    pub async fn save_analysis(&self, client_id: &str, message_id: &str) -> serde_json::Value {
        let response = self
            .client
            .post(self.url("/v1/analysis"))
            .header("X-Client-Id", client_id)
            .json(&serde_json::json!({
                "messageId": message_id,
                "analysis": {
                    "label": "스미싱",
                    "score": 0.9,
                    "explanation": "Matched shortened_url, urgency",
                    "patterns": ["shortened_url", "urgency"],
                    "recommended_actions": ["Do not open links"]
                }
            }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        response.json().await.unwrap()
    }
}

/// Serve `app` on a random local port as a stand-in prediction server.
///
/// Returns the full URL of its `/predict` route.
pub async fn spawn_stub_model(app: axum::Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/predict", addr)
}
