use std::sync::Arc;

use auth::Authenticator;
use auth::AuthenticatorConfig;
use auth::HashingCost;
use auth::JwtHandler;
use identity_service::domain::identity::service::AuthService;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::repositories::InMemoryIdentityRepository;
use serde_json::json;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const TEST_ISSUER: &str = "legiscounsel-test";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub repository: Arc<InMemoryIdentityRepository>,
    pub api_client: reqwest::Client,
    pub jwt_handler: JwtHandler,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        Self::spawn_with_token_ttl(chrono::Duration::hours(24)).await
    }

    /// Spawn with a custom session lifetime (zero yields tokens that are expired on issue)
    pub async fn spawn_with_token_ttl(token_ttl: chrono::Duration) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryIdentityRepository::new());

        // Minimal Argon2 cost keeps the suite fast
        let authenticator = Arc::new(
            Authenticator::new(AuthenticatorConfig {
                secret: TEST_SECRET.to_vec(),
                issuer: TEST_ISSUER.to_string(),
                token_ttl,
                hashing_cost: HashingCost {
                    memory_kib: 8,
                    iterations: 1,
                    parallelism: 1,
                },
            })
            .expect("Failed to create authenticator"),
        );

        let auth_service = Arc::new(AuthService::new(Arc::clone(&repository), authenticator));
        let router = create_router(auth_service);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            repository,
            api_client: reqwest::Client::new(),
            jwt_handler: JwtHandler::new(TEST_SECRET, TEST_ISSUER),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Register an identity and return the response
    pub async fn register(
        &self,
        email: &str,
        display_name: &str,
        password: &str,
        role: &str,
    ) -> reqwest::Response {
        self.post("/api/auth/register")
            .json(&json!({
                "email": email,
                "display_name": display_name,
                "password": password,
                "role": role
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log in and return the response
    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/login")
            .json(&json!({
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log in and return the session token, panicking on failure
    pub async fn login_token(&self, email: &str, password: &str) -> String {
        let response = self.login(email, password).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["token"]
            .as_str()
            .expect("Missing token")
            .to_string()
    }
}
