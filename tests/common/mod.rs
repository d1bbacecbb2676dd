#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use sqlx::PgPool;

use petfriendly_api::database::DatabaseManager;

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_petfriendly-api"));
        cmd.arg("serve")
            .env("API_PORT", port.to_string())
            .env("DATABASE_CONNECTION_TIMEOUT", "2")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Without a database there is nothing to migrate or seed
        if std::env::var("DATABASE_URL").is_err() {
            cmd.env("DATABASE_RUN_MIGRATIONS", "false").env("SEED_DEMO_ACCOUNTS", "false");
        }

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
            let url = format!("{}/actuator/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                // A missing database still means the server is up
                if resp.status() == StatusCode::OK || resp.status() == StatusCode::SERVICE_UNAVAILABLE {
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

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(30)).await?;
    Ok(server)
}

/// Migrated pool for `DATABASE_URL`, or `None` when no database is configured
/// or reachable. Database-backed tests return early on `None`.
pub async fn test_pool() -> Option<PgPool> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let pool = match PgPool::connect(&url).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("skipping database test, cannot connect: {}", e);
            return None;
        }
    };
    if let Err(e) = DatabaseManager::migrate(&pool).await {
        eprintln!("skipping database test, migration failed: {}", e);
        return None;
    }
    Some(pool)
}

/// Email that will not collide across test runs.
pub fn unique_email(prefix: &str) -> String {
    format!("{}.{}@petfriendly.test", prefix, uuid::Uuid::new_v4().simple())
}
