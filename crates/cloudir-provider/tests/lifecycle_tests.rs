//! Integration tests for plan/apply/import across the provider surface.

mod helpers;

use cloudir_provider::{PlanAction, ProviderError};
use helpers::{attrs, MockDirectory};
use serde_json::json;

#[tokio::test]
async fn test_replace_deletes_then_creates() {
    let mock = MockDirectory::start().await;
    mock.mock_delete("/api/v2/policies/p1").await;
    mock.mock_create_expecting(
        "/api/v2/policies",
        json!({"template": {"id": "tpl-2"}}),
        json!({"id": "p2", "name": "disable-usb", "template": {"id": "tpl-2"}}),
    )
    .await;

    let provider = mock.provider();
    let prior = attrs(json!({
        "id": "p1",
        "name": "disable-usb",
        "template_id": "tpl-1",
        "notes": null,
        "values": null
    }));
    let config = attrs(json!({"name": "disable-usb", "template_id": "tpl-2"}));

    let plan = provider
        .plan("cloudir_policy", Some(&prior), Some(&config))
        .unwrap();
    assert_eq!(plan.action, PlanAction::Replace);

    let state = provider
        .apply("cloudir_policy", Some(&prior), Some(&config))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(state["id"], "p2");
    assert_eq!(state["template_id"], "tpl-2");
}

#[tokio::test]
async fn test_update_keeps_identifier() {
    let mock = MockDirectory::start().await;
    mock.mock_update(
        "PUT",
        "/api/v2/password-policies/pp1",
        json!({"id": "pp1", "name": "strict", "minLength": 16}),
    )
    .await;

    let provider = mock.provider();
    let prior = attrs(json!({
        "id": "pp1",
        "name": "strict",
        "min_length": 12,
        "require_uppercase": false,
        "require_lowercase": false,
        "require_number": false,
        "require_symbol": false
    }));
    let config = attrs(json!({"name": "strict", "min_length": 16}));

    let plan = provider
        .plan("cloudir_password_policy", Some(&prior), Some(&config))
        .unwrap();
    assert_eq!(plan.action, PlanAction::Update);
    assert_eq!(plan.field_changes.len(), 1);

    let state = provider
        .apply("cloudir_password_policy", Some(&prior), Some(&config))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(state["id"], "pp1");
    assert_eq!(state["min_length"], 16);
}

#[tokio::test]
async fn test_no_op_returns_prior_state_without_calls() {
    let mock = MockDirectory::start().await;
    let provider = mock.provider();
    let prior = attrs(json!({"id": "ip1", "name": "office", "description": null, "ips": null}));
    let config = attrs(json!({"name": "office"}));

    let state = provider
        .apply("cloudir_ip_list", Some(&prior), Some(&config))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(state, prior);
    assert!(mock.server().received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_import_existing_object() {
    let mock = MockDirectory::start().await;
    mock.mock_get(
        "/api/commands/c1",
        json!({
            "_id": "c1",
            "name": "uptime",
            "command": "uptime",
            "commandType": "linux",
            "launchType": "manual",
            "timeout": "60",
            "sudo": false
        }),
    )
    .await;

    let provider = mock.provider();
    let state = provider.import("cloudir_command", "c1").await.unwrap();

    assert_eq!(state["id"], "c1");
    assert_eq!(state["timeout"], 60);
}

#[tokio::test]
async fn test_import_missing_object_fails() {
    let mock = MockDirectory::start().await;
    mock.mock_status("GET", "/api/systemusers/nope", 404, "Not Found")
        .await;

    let provider = mock.provider();
    let err = provider.import("cloudir_user", "nope").await.unwrap_err();

    assert!(matches!(err, ProviderError::ImportNotFound { .. }));
}

#[tokio::test]
async fn test_refresh_without_id_is_gone() {
    let provider = MockDirectory::start().await.provider();
    let state = attrs(json!({"name": "orphan"}));
    assert!(provider
        .refresh("cloudir_user_group", &state)
        .await
        .unwrap()
        .is_none());
}
