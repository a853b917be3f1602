//! Integration test harness for the Fitova storefront.
//!
//! [`TestApp::spawn`] boots the real router on `127.0.0.1:0` against a fresh
//! [`MemoryStore`] and returns a `reqwest` client with a cookie jar, so tests
//! drive the service exactly as a browser would. The store handle stays
//! available for seeding rows and injecting failures.
//!
//! ```bash
//! cargo test -p fitova-integration-tests
//! ```

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::Utc;
use reqwest::{Client, Response, StatusCode};
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde_json::{Value, json};

use fitova_core::{CurrencyCode, Price, ProductId, UserId};
use fitova_storefront::config::{FitovaConfig, LogFormat, SentryConfig, StoreBackend};
use fitova_storefront::db::{MemoryStore, Store};
use fitova_storefront::middleware::create_session_layer;
use fitova_storefront::models::Product;
use fitova_storefront::state::AppState;

/// A running storefront plus handles to poke at it.
pub struct TestApp {
    /// `http://127.0.0.1:<port>`
    pub base_url: String,
    /// The store the server reads and writes.
    pub store: Arc<MemoryStore>,
    /// Client with a cookie jar; redirects are not followed.
    pub client: Client,
}

fn test_config() -> FitovaConfig {
    FitovaConfig {
        store: StoreBackend::Memory,
        database_url: None,
        host: "127.0.0.1".parse().expect("valid ip"),
        port: 0,
        base_url: "http://127.0.0.1".to_string(),
        session_secret: SecretString::from("q7Lm2Vx9Rt4Kp8Zw3Nc6Bh1Yf5Dj0Gs"),
        log_format: LogFormat::Pretty,
        sentry: SentryConfig::default(),
    }
}

impl TestApp {
    /// Boot the storefront on an ephemeral port.
    pub async fn spawn() -> Self {
        let store = Arc::new(MemoryStore::new());
        let config = test_config();

        let sessions = create_session_layer(tower_sessions::MemoryStore::default(), &config);
        let shared: Arc<dyn Store> = store.clone();
        let app = fitova_storefront::app(AppState::new(config, shared), sessions);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");

        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("server error");
        });

        Self {
            base_url: format!("http://{addr}"),
            store,
            client: Self::client(),
        }
    }

    /// A fresh client with its own cookie jar.
    pub fn client() -> Client {
        Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("build http client")
    }

    /// Absolute URL for `path`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET with the shared client.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("send request")
    }

    /// POST a JSON body with the shared client.
    pub async fn post(&self, path: &str, body: &Value) -> Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("send request")
    }

    /// Register and sign in `email` on the shared client. Returns the new
    /// user's id.
    pub async fn sign_up(&self, email: &str) -> UserId {
        let response = self
            .post(
                "/auth/register",
                &json!({ "email": email, "password": "correct horse battery" }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = envelope(response).await;
        serde_json::from_value(body["data"]["id"].clone()).expect("user id in response")
    }

    /// Register, sign in and grant the admin flag.
    pub async fn sign_up_admin(&self, email: &str) -> UserId {
        let id = self.sign_up(email).await;
        assert!(self.store.set_admin(id, true).await);
        id
    }

    /// Seed an active product and return its id.
    pub async fn seed_product(&self, slug: &str, affiliate_url: &str) -> ProductId {
        let now = Utc::now();
        let id = ProductId::generate();
        self.store
            .seed_product(Product {
                id,
                category_id: None,
                name: slug.replace('-', " "),
                slug: slug.to_string(),
                brand: Some("Maison Verte".to_string()),
                description: None,
                price: Price::new(Decimal::new(4999, 2), CurrencyCode::USD),
                original_price: None,
                image_url: None,
                affiliate_url: affiliate_url.to_string(),
                is_active: true,
                is_featured: false,
                click_count: 0,
                created_at: now,
                updated_at: now,
            })
            .await;
        id
    }
}

/// Parse a response body as JSON.
pub async fn envelope(response: Response) -> Value {
    response.json().await.expect("JSON body")
}

/// A slide payload that passes validation.
pub fn valid_slide() -> Value {
    json!({
        "title": "Linen season",
        "subtitle": "New arrivals",
        "description": "Breathable pieces for warm days.",
        "button_text": "Shop linen",
        "button_link": "/collections/linen",
        "image_url": "https://cdn.fitova.shop/slides/linen.jpg",
        "sort_order": 1
    })
}
