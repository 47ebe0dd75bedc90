//! Bootstrap and status queries against the mock admin store.

mod common;

use caddyctl::manager::{CaddyManager, Error, SetupOptions};
use caddyctl::settings::Settings;
use serde_json::json;

async fn fresh_manager() -> (CaddyManager, common::MockStore) {
    let store = common::MockStore::new();
    let url = common::start_mock_admin(store.clone()).await;
    (CaddyManager::new(Settings::new(url, "srv0")), store)
}

#[tokio::test]
async fn test_setup_local_is_idempotent() {
    let (manager, store) = fresh_manager().await;
    let opts = SetupOptions { local: true, install_trust: Some(true), ..Default::default() };

    manager.setup(&opts).await.unwrap();
    manager.setup(&opts).await.unwrap();

    let snapshot = store.snapshot();
    let servers = snapshot.pointer("/apps/http/servers").unwrap().as_object().unwrap();
    assert_eq!(servers.len(), 1);
    assert_eq!(servers["srv0"]["listen"], json!([":80", ":443"]));
    assert_eq!(servers["srv0"]["routes"], json!([]));

    let policies = snapshot.pointer("/apps/tls/automation/policies").unwrap().as_array().unwrap();
    assert_eq!(policies.len(), 1);
    assert_eq!(policies[0]["issuers"][0]["module"], "internal");

    assert_eq!(
        snapshot.pointer("/apps/pki/certificate_authorities/local/install_trust"),
        Some(&json!(true))
    );
}

#[tokio::test]
async fn test_setup_acme_uses_cloudflare_dns_challenge() {
    let (manager, store) = fresh_manager().await;
    let opts = SetupOptions { cf_token: Some("token-123".to_owned()), ..Default::default() };

    manager.setup(&opts).await.unwrap();

    let snapshot = store.snapshot();
    let issuer = snapshot.pointer("/apps/tls/automation/policies/0/issuers/0").unwrap();
    assert_eq!(issuer["module"], "acme");
    assert_eq!(issuer["challenges"]["dns"]["provider"]["name"], "cloudflare");
    assert_eq!(issuer["challenges"]["dns"]["provider"]["api_token"], "token-123");
}

#[tokio::test]
async fn test_setup_acme_without_token_fails_before_writing() {
    let (manager, store) = fresh_manager().await;
    // Only the explicit option is consulted here; the env fallback is not
    // set under test.
    std::env::remove_var("CADDY_CF_TOKEN");

    let err = manager.setup(&SetupOptions::default()).await.unwrap_err();
    assert!(matches!(err, Error::MissingToken));
    assert_eq!(store.snapshot(), json!({}));
}

#[tokio::test]
async fn test_status_reflects_present_subtrees() {
    let (manager, _store) = fresh_manager().await;

    let status = manager.status().await.unwrap();
    assert!(!status.http_servers);
    assert!(!status.tls_automation);
    assert!(!status.pki);

    let opts = SetupOptions { local: true, install_trust: Some(false), ..Default::default() };
    manager.setup(&opts).await.unwrap();

    let status = manager.status().await.unwrap();
    assert!(status.http_servers);
    assert!(status.tls_automation);
    assert!(status.pki);
}

#[tokio::test]
async fn test_ensure_path_creates_each_prefix() {
    let (manager, store) = fresh_manager().await;

    manager.ensure_path("/apps/layer4/servers").await.unwrap();
    assert_eq!(store.snapshot(), json!({"apps": {"layer4": {"servers": {}}}}));

    // Re-running touches nothing.
    manager.ensure_path("/apps/layer4/servers").await.unwrap();
    assert_eq!(store.snapshot(), json!({"apps": {"layer4": {"servers": {}}}}));
}

#[tokio::test]
async fn test_get_config_and_has_path_passthrough() {
    let (manager, _store) = fresh_manager().await;
    let opts = SetupOptions { local: true, ..Default::default() };
    manager.setup(&opts).await.unwrap();

    assert!(manager.has_path("/apps/http/servers/srv0").await.unwrap());
    assert!(!manager.has_path("/apps/http/servers/srv1").await.unwrap());

    let listen = manager.get_config("/apps/http/servers/srv0/listen").await.unwrap();
    assert_eq!(listen, Some(json!([":80", ":443"])));
    assert_eq!(manager.get_config("/apps/nope").await.unwrap(), None);
}
