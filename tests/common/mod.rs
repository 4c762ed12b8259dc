#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

static SERVER: OnceLock<TestServer> = OnceLock::new();
static SECURED_SERVER: OnceLock<TestServer> = OnceLock::new();

pub const TEST_SECRET: &str = "integration-test-secret";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn(require_auth: bool) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Always the in-memory store with the sample data loaded
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_cardatabase"));
        cmd.env_remove("DATABASE_URL")
            .env_remove("APP_ENV")
            .env("CARDB_BIND", "127.0.0.1")
            .env("CARDB_PORT", port.to_string())
            .env("SEED_ENABLED", "true")
            .env("SECURITY_REQUIRE_AUTH", require_auth.to_string())
            .env("SECURITY_JWT_SECRET", TEST_SECRET)
            .env("RUST_LOG", "warn")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

/// Server with open data routes
pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn(false).expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(30)).await?;
    Ok(server)
}

/// Server whose data routes require a bearer token
pub async fn ensure_secured_server() -> Result<&'static TestServer> {
    let server =
        SECURED_SERVER.get_or_init(|| TestServer::spawn(true).expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(30)).await?;
    Ok(server)
}

/// POST /login and return the raw response
pub async fn login(server: &TestServer, username: &str, password: &str) -> Result<reqwest::Response> {
    let res = reqwest::Client::new()
        .post(format!("{}/login", server.base_url))
        .json(&serde_json::json!({ "username": username, "password": password }))
        .send()
        .await?;
    Ok(res)
}

/// Log in and return the full `Authorization` header value
pub async fn bearer(server: &TestServer, username: &str, password: &str) -> Result<String> {
    let res = login(server, username, password).await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());
    let value = res
        .headers()
        .get(reqwest::header::AUTHORIZATION)
        .context("missing Authorization header")?
        .to_str()?
        .to_string();
    Ok(value)
}
