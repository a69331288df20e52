//! Spawns the app against a fresh database and wraps the HTTP calls the tests make.
use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::OnceLock,
};

use anyhow::Result;
use email_registry::{
    config::get_or_init_config, database::DbManager, init_dbg_tracing, App, AppState,
};
use reqwest::Response;
use serde_json::Value;
use tokio::net::TcpListener;
use tracing::info;
use uuid::Uuid;

/// Trying to bind port 0 will trigger an OS scan for an available port
/// which will then be bound to the application.
const TEST_SOCK_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 0);

pub struct TestApp {
    pub addr: SocketAddr,
    pub dm: DbManager,
    pub http_client: reqwest::Client,
}

fn _init_test_subscriber() {
    static SUBSCRIBER: OnceLock<()> = OnceLock::new();
    SUBSCRIBER.get_or_init(|| {
        init_dbg_tracing();
    });
}

impl TestApp {
    /// Serves the app on a random port, backed by its own randomly named database.
    pub async fn spawn() -> Result<Self> {
        // _init_test_subscriber();

        let mut db_config = get_or_init_config().db_config.clone();
        db_config.db_name = Uuid::new_v4().to_string();
        let dm = DbManager::configure_for_test(&db_config).await?;

        let listener = TcpListener::bind(&TEST_SOCK_ADDR).await?;
        let app = App::new(AppState::new(dm.clone()), listener);
        let addr = app.local_addr()?;
        info!("Listening on {addr}");

        tokio::spawn(email_registry::serve(app));

        Ok(TestApp {
            addr,
            dm,
            http_client: reqwest::Client::new(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub async fn emails_list(&self) -> Result<Response> {
        Ok(self.http_client.get(self.url("/emails")).send().await?)
    }

    pub async fn email_get(&self, id: i64) -> Result<Response> {
        Ok(self
            .http_client
            .get(self.url(&format!("/emails/{id}")))
            .send()
            .await?)
    }

    pub async fn email_post(&self, body: &Value) -> Result<Response> {
        Ok(self
            .http_client
            .post(self.url("/emails"))
            .json(body)
            .send()
            .await?)
    }

    pub async fn email_put(&self, id: i64, body: &Value) -> Result<Response> {
        Ok(self
            .http_client
            .put(self.url(&format!("/emails/{id}")))
            .json(body)
            .send()
            .await?)
    }

    pub async fn email_delete(&self, id: i64) -> Result<Response> {
        Ok(self
            .http_client
            .delete(self.url(&format!("/emails/{id}")))
            .send()
            .await?)
    }

    pub async fn export_get(&self) -> Result<Response> {
        Ok(self.http_client.get(self.url("/export")).send().await?)
    }

    /// Creates a record and returns its id, failing the test if the API refuses.
    pub async fn email_create(&self, email: &str) -> Result<i64> {
        let res = self
            .email_post(&serde_json::json!({ "email_name": email }))
            .await?;
        anyhow::ensure!(
            res.status() == reqwest::StatusCode::CREATED,
            "creating {email} returned {}",
            res.status()
        );
        let body: Value = res.json().await?;
        body["id"]
            .as_i64()
            .ok_or_else(|| anyhow::anyhow!("created record has no id: {body}"))
    }
}

/// Reads the `detail` field of an error body.
pub async fn error_detail(res: Response) -> Result<String> {
    let body: Value = res.json().await?;
    Ok(body["detail"].as_str().unwrap_or_default().to_string())
}
