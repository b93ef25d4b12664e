#![allow(clippy::unwrap_used)]
// WLAN reconciler against a mocked Mist cloud.

mod common;

use serde_json::{Value, json};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mistly_core::{AuthMode, CoreError, CreateOutcome, Wlan, WlanSettings};

use common::{LogCapture, setup};

fn settings(value: Value) -> WlanSettings {
    serde_json::from_value(value).unwrap()
}

async fn mount_wlans(server: &MockServer, wlans: Value) {
    Mock::given(method("GET"))
        .and(path("/api/v1/sites/s1/wlans"))
        .respond_with(ResponseTemplate::new(200).set_body_json(wlans))
        .mount(server)
        .await;
}

// ── Construction-time validation ────────────────────────────────────

#[tokio::test]
async fn test_eap_without_servers_fails_before_any_call() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/sites/s1/wlans"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let (logs, _guard) = LogCapture::install();
    let wlan_settings = settings(json!({
        "ssid": "Corp-1X",
        "auth": { "type": "eap" },
        "auth_servers": []
    }));
    let err = Wlan::lookup_or_build_pending(&client, "s1", &wlan_settings)
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Validation { .. }));
    assert!(err.is_config());
    assert!(logs.has("ERROR", "WLAN Corp-1X rejected"));
}

#[tokio::test]
async fn test_psk_without_passphrase_is_missing_field() {
    let (_server, client) = setup().await;

    let (logs, _guard) = LogCapture::install();
    let wlan_settings = settings(json!({ "ssid": "Guest", "auth": { "type": "psk" } }));
    let err = Wlan::lookup_or_build_pending(&client, "s1", &wlan_settings)
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::MissingField { .. }));
    assert!(logs.has("ERROR", "PSK authentication without a passphrase"));
}

#[tokio::test]
async fn test_refused_wlan_listing_fails_without_posting() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/sites/s1/wlans"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/sites/s1/wlans"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "w1", "ssid": "Corp" })),
        )
        .expect(0)
        .mount(&server)
        .await;

    let wlan_settings = settings(json!({ "ssid": "Corp", "auth": { "type": "open" } }));
    let err = Wlan::lookup_or_build_pending(&client, "s1", &wlan_settings)
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::ListingRefused { ref kind, .. } if kind == "WLAN"));
}

#[tokio::test]
async fn test_empty_psk_is_accepted_with_warning() {
    let (server, client) = setup().await;
    mount_wlans(&server, json!([])).await;

    let (logs, _guard) = LogCapture::install();
    let wlan_settings = settings(json!({ "ssid": "Guest", "auth": { "type": "psk", "psk": "" } }));
    let wlan = Wlan::lookup_or_build_pending(&client, "s1", &wlan_settings)
        .await
        .unwrap();

    assert!(wlan.remote_id().is_none());
    assert!(logs.has("WARN", "weak configuration"));
}

// ── Create / probe / delete ─────────────────────────────────────────

#[tokio::test]
async fn test_create_payload_always_enables_wlan() {
    let (server, client) = setup().await;
    mount_wlans(&server, json!([])).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/sites/s1/wlans"))
        .and(body_json(json!({
            "enabled": true,
            "ssid": "Corp",
            "band": "both",
            "auth": { "type": "psk", "psk": "correct-horse" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "w1", "ssid": "Corp", "enabled": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let wlan_settings = settings(json!({
        "ssid": "Corp",
        "band": "both",
        "auth": { "type": "psk", "psk": "correct-horse" }
    }));
    let mut wlan = Wlan::lookup_or_build_pending(&client, "s1", &wlan_settings)
        .await
        .unwrap();
    let outcome = wlan.create().await.unwrap();

    assert!(matches!(outcome, CreateOutcome::Created(_)));
    assert_eq!(wlan.remote_id(), Some("w1"));
}

#[tokio::test]
async fn test_probe_adopts_remote_wlan() {
    let (server, client) = setup().await;
    mount_wlans(
        &server,
        json!([{
            "id": "w7",
            "ssid": "Corp-1X",
            "enabled": true,
            "band": "5",
            "interface": "all",
            "hostname_ie": true,
            "roam_mode": "11r",
            "auth": { "type": "eap", "pairwise": ["wpa2-ccmp"] },
            "auth_servers": [{ "host": "10.0.0.5", "port": 1812 }],
            "rateset": { "24": { "template": "high-density" } }
        }]),
    )
    .await;

    let wlan_settings = settings(json!({
        "ssid": "Corp-1X",
        "auth": { "type": "eap" },
        "auth_servers": [{ "host": "10.0.0.9", "port": 1812 }]
    }));
    let wlan = Wlan::lookup_or_build_pending(&client, "s1", &wlan_settings)
        .await
        .unwrap();

    let attrs = wlan.attributes();
    assert_eq!(wlan.remote_id(), Some("w7"));
    assert_eq!(attrs.enabled, Some(true));
    assert_eq!(attrs.band.as_deref(), Some("5"));
    assert_eq!(attrs.interface.as_deref(), Some("all"));
    assert_eq!(attrs.hostname_ie, Some(true));
    assert_eq!(attrs.roam_mode.as_deref(), Some("11r"));
    assert_eq!(
        attrs.auth_servers,
        Some(vec![json!({ "host": "10.0.0.5", "port": 1812 })])
    );
    assert_eq!(attrs.rateset, Some(json!({ "24": { "template": "high-density" } })));

    let auth = attrs.auth.as_ref().unwrap();
    assert!(matches!(auth.mode, AuthMode::Eap));
    assert_eq!(auth.options.get("pairwise"), Some(&json!(["wpa2-ccmp"])));
}

#[tokio::test]
async fn test_create_existing_wlan_is_a_no_op() {
    let (server, client) = setup().await;
    mount_wlans(&server, json!([{ "id": "w1", "ssid": "Corp" }])).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/sites/s1/wlans"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "w2", "ssid": "Corp" })),
        )
        .expect(0)
        .mount(&server)
        .await;

    let wlan_settings = settings(json!({ "ssid": "Corp", "auth": { "type": "open" } }));
    let mut wlan = Wlan::lookup_or_build_pending(&client, "s1", &wlan_settings)
        .await
        .unwrap();
    let outcome = wlan.create().await.unwrap();

    assert_eq!(outcome.existing_id(), Some("w1"));
}

#[tokio::test]
async fn test_delete_wlan() {
    let (server, client) = setup().await;
    mount_wlans(&server, json!([{ "id": "w1", "ssid": "Corp" }])).await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/sites/s1/wlans/w1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let (logs, _guard) = LogCapture::install();
    let wlan_settings = settings(json!({ "ssid": "Corp" }));
    let mut wlan = Wlan::lookup_or_build_pending(&client, "s1", &wlan_settings)
        .await
        .unwrap();

    assert!(wlan.delete().await.unwrap());
    assert!(wlan.state().is_retired());
    assert!(logs.has("INFO", "WLAN Corp deleted"));
}
