// Shared fixtures: a mocked Mist cloud with token endpoints, and an
// in-memory capture of the tracing stream.
#![allow(dead_code, clippy::unwrap_used)]

use std::io;
use std::sync::{Arc, Mutex};

use secrecy::SecretString;
use serde_json::json;
use tracing::subscriber::DefaultGuard;
use url::Url;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mistly_api::{ClientSettings, Cloud, MistClient, TransportConfig};

pub const ORG: &str = "o1";

pub async fn setup() -> (MockServer, MistClient) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/self/apitokens"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "tok1", "key": "eph" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path_regex(r"^/api/v1/self/apitokens/.+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let settings = ClientSettings {
        cloud: Cloud::Global,
        org_id: ORG.into(),
        master_token: SecretString::from("master".to_owned()),
        transport: TransportConfig::default(),
    };
    let base = Url::parse(&server.uri()).unwrap();
    let client = MistClient::connect_at(base, &settings).await.unwrap();
    (server, client)
}

/// Thread-local capture of every record emitted while the guard lives.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn install() -> (Self, DefaultGuard) {
        let capture = Self::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (capture, guard)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Lines at `level` (`"INFO"`, `"WARN"`, `"ERROR"`) containing `needle`.
    pub fn has(&self, level: &str, needle: &str) -> bool {
        self.contents()
            .lines()
            .any(|line| line.contains(level) && line.contains(needle))
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
