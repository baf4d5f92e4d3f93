#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub const PASSWORD: &str = "secret";
pub const ADMIN_ROLE: &str = "administrador";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);
        let upload_dir = std::env::temp_dir().join(format!("catalogo-it-{}", uuid::Uuid::new_v4().simple()));

        // Cargo builds the server binary for integration tests
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_catalogo-api"));
        cmd.env("CATALOGO_API_PORT", port.to_string())
            .env("HOST", "127.0.0.1")
            .env("APP_ENV", "development")
            .env("JWT_SECRET", "integration-test-secret")
            .env("UPLOAD_DIR", &upload_dir)
            .env("API_ENABLE_REQUEST_LOGGING", "false")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // DATABASE_URL is inherited from the environment or .env
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

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Shared server for this test binary, or `None` when no database is configured
pub async fn ensure_server() -> Result<Option<&'static TestServer>> {
    let _ = dotenvy::dotenv();
    if std::env::var("DATABASE_URL").map(|v| v.trim().is_empty()).unwrap_or(true) {
        eprintln!("DATABASE_URL not set, skipping integration test");
        return Ok(None);
    }

    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(20)).await?;
    Ok(Some(server))
}

/// Name with a random suffix so runs never collide on unique columns
pub fn unique(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("{}_{}", prefix, &id[..10])
}

pub async fn register(client: &reqwest::Client, server: &TestServer, username: &str, role: &str) -> Result<StatusCode> {
    let res = client
        .post(server.url("/usuario"))
        .json(&json!({ "username": username, "password": PASSWORD, "role": role }))
        .send()
        .await?;
    Ok(res.status())
}

pub async fn login(client: &reqwest::Client, server: &TestServer, username: &str, role: &str) -> Result<String> {
    let res = client
        .post(server.url("/login"))
        .json(&json!({ "username": username, "password": PASSWORD, "role": role }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "login failed with {}", res.status());

    let body: Value = res.json().await?;
    body["token"]
        .as_str()
        .map(str::to_string)
        .context("login response without token")
}

/// Register a fresh administrator and return its token
pub async fn admin_token(client: &reqwest::Client, server: &TestServer) -> Result<String> {
    let username = unique("admin");
    let status = register(client, server, &username, ADMIN_ROLE).await?;
    anyhow::ensure!(status == StatusCode::CREATED, "registration failed with {}", status);
    login(client, server, &username, ADMIN_ROLE).await
}

/// Create a category and return its id
pub async fn create_category(client: &reqwest::Client, server: &TestServer, token: &str, name: &str) -> Result<i64> {
    let res = client
        .post(server.url(&format!("/categoria/{}", name)))
        .bearer_auth(token)
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::CREATED, "category create failed with {}", res.status());

    let categories: Vec<Value> = client.get(server.url("/obtenerCategorias")).send().await?.json().await?;
    categories
        .iter()
        .find(|c| c["nombre"] == name)
        .and_then(|c| c["id"].as_i64())
        .context("created category not listed")
}

/// Find a movie by exact name through the public search
pub async fn find_movie(client: &reqwest::Client, server: &TestServer, name: &str) -> Result<Option<Value>> {
    let movies: Vec<Value> = client
        .get(server.url(&format!("/buscarPelicula/{}", name)))
        .send()
        .await?
        .json()
        .await?;
    Ok(movies.into_iter().find(|m| m["nombre"] == name))
}
