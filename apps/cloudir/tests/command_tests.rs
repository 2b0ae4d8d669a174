//! Integration tests for plan/apply/destroy/import against a mock API
//!
//! Tests cover:
//! - Apply creates in manifest order and records state
//! - A second apply with unchanged objects is a no-op
//! - Dry run makes no changes and writes no state
//! - Removed resources are deleted after everything else
//! - A failed change keeps the progress made so far
//! - Plan refreshes without writing state
//! - Destroy and import

mod common;

use cloudir::commands::{apply, destroy, import, plan};
use cloudir::error::CliError;
use cloudir::state::{StateEntry, StateFile};
use cloudir_provider::PlanAction;
use common::TestContext;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

const TWO_GROUPS: &str = r#"
resources:
  - name: engineering
    type: cloudir_user_group
    config:
      name: engineering
  - name: laptops
    type: cloudir_system_group
    config:
      name: laptops
      description: Company laptops
"#;

fn group_entry(id: &str, name: &str) -> StateEntry {
    StateEntry::new(
        "cloudir_user_group",
        json!({"id": id, "name": name, "description": null, "email": null})
            .as_object()
            .cloned()
            .unwrap(),
    )
}

fn seed_state(ctx: &TestContext, entries: &[(&str, StateEntry)]) {
    let mut state = StateFile::default();
    for (name, entry) in entries {
        state.insert(*name, entry.clone());
    }
    state.save(&ctx.state_path()).unwrap();
}

// =========================================================================
// apply
// =========================================================================

#[tokio::test]
async fn test_apply_creates_and_records_state() {
    let ctx = TestContext::new().await;
    ctx.mock_create(
        "/api/v2/usergroups",
        "engineering",
        json!({"id": "g1", "name": "engineering"}),
    )
    .await;
    ctx.mock_create(
        "/api/v2/systemgroups",
        "laptops",
        json!({"id": "sg1", "name": "laptops", "description": "Company laptops"}),
    )
    .await;

    let provider = ctx.provider();
    let manifest = ctx.manifest(TWO_GROUPS);

    let report = apply::run(&provider, &manifest, &ctx.state_path(), false)
        .await
        .unwrap();
    assert_eq!(report.summary.create, 2);
    assert!(!report.dry_run);

    assert_eq!(
        ctx.request_log().await,
        vec!["POST /api/v2/usergroups", "POST /api/v2/systemgroups"]
    );

    let state = ctx.load_state();
    assert_eq!(state.get("engineering").unwrap().id(), Some("g1"));
    assert_eq!(state.get("laptops").unwrap().type_name, "cloudir_system_group");
    assert_eq!(
        state.get("laptops").unwrap().attributes["description"],
        "Company laptops"
    );
}

#[tokio::test]
async fn test_second_apply_is_a_no_op() {
    let ctx = TestContext::new().await;
    ctx.mock_create(
        "/api/v2/usergroups",
        "engineering",
        json!({"id": "g1", "name": "engineering"}),
    )
    .await;
    ctx.mock_create(
        "/api/v2/systemgroups",
        "laptops",
        json!({"id": "sg1", "name": "laptops", "description": "Company laptops"}),
    )
    .await;
    ctx.mock_get("/api/v2/usergroups/g1", json!({"id": "g1", "name": "engineering"}))
        .await;
    ctx.mock_get(
        "/api/v2/systemgroups/sg1",
        json!({"id": "sg1", "name": "laptops", "description": "Company laptops"}),
    )
    .await;

    let provider = ctx.provider();
    let manifest = ctx.manifest(TWO_GROUPS);

    apply::run(&provider, &manifest, &ctx.state_path(), false)
        .await
        .unwrap();
    let first = ctx.load_state();

    let report = apply::run(&provider, &manifest, &ctx.state_path(), false)
        .await
        .unwrap();
    assert!(!report.summary.has_changes());
    assert_eq!(report.summary.unchanged, 2);
    assert_eq!(ctx.load_state(), first);
}

#[tokio::test]
async fn test_dry_run_changes_nothing() {
    let ctx = TestContext::new().await;
    let provider = ctx.provider();
    let manifest = ctx.manifest(TWO_GROUPS);

    let report = apply::run(&provider, &manifest, &ctx.state_path(), true)
        .await
        .unwrap();

    assert!(report.dry_run);
    assert_eq!(report.summary.create, 2);
    assert!(ctx.request_log().await.is_empty());
    assert!(!ctx.state_path().exists());
}

#[tokio::test]
async fn test_removed_resources_are_deleted_last() {
    let ctx = TestContext::new().await;
    seed_state(&ctx, &[("old", group_entry("g0", "old"))]);

    ctx.mock_get("/api/v2/usergroups/g0", json!({"id": "g0", "name": "old"}))
        .await;
    ctx.mock_create(
        "/api/v2/usergroups",
        "engineering",
        json!({"id": "g1", "name": "engineering"}),
    )
    .await;
    ctx.mock_delete("/api/v2/usergroups/g0").await;

    let provider = ctx.provider();
    let manifest = ctx.manifest(
        "resources:\n  - { name: engineering, type: cloudir_user_group, config: { name: engineering } }\n",
    );

    let report = apply::run(&provider, &manifest, &ctx.state_path(), false)
        .await
        .unwrap();
    assert_eq!(report.summary.create, 1);
    assert_eq!(report.summary.delete, 1);
    assert_eq!(report.changes[1].change.action, PlanAction::Delete);

    let writes: Vec<String> = ctx
        .request_log()
        .await
        .into_iter()
        .filter(|r| !r.starts_with("GET"))
        .collect();
    assert_eq!(
        writes,
        vec!["POST /api/v2/usergroups", "DELETE /api/v2/usergroups/g0"]
    );

    let state = ctx.load_state();
    assert!(state.contains("engineering"));
    assert!(!state.contains("old"));
}

#[tokio::test]
async fn test_failed_change_keeps_earlier_progress() {
    let ctx = TestContext::new().await;
    ctx.mock_create(
        "/api/v2/usergroups",
        "engineering",
        json!({"id": "g1", "name": "engineering"}),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/api/v2/systemgroups"))
        .and(body_partial_json(json!({"name": "laptops"})))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
        .mount(&ctx.server)
        .await;

    let provider = ctx.provider();
    let manifest = ctx.manifest(TWO_GROUPS);

    let err = apply::run(&provider, &manifest, &ctx.state_path(), false)
        .await
        .unwrap_err();
    assert_eq!(err.exit_code(), 5);

    let state = ctx.load_state();
    assert!(state.contains("engineering"));
    assert!(!state.contains("laptops"));
}

#[tokio::test]
async fn test_apply_reads_data_sources() {
    let ctx = TestContext::new().await;
    ctx.mock_get("/api/v2/usergroups", json!([{"id": "g9", "name": "ops"}]))
        .await;

    let provider = ctx.provider();
    let manifest = ctx.manifest(
        "data:\n  - { name: ops, type: cloudir_user_group, config: { name: ops } }\n",
    );

    let report = apply::run(&provider, &manifest, &ctx.state_path(), false)
        .await
        .unwrap();
    assert_eq!(report.data["ops"]["id"], "g9");
    assert!(ctx.load_state().is_empty());
}

#[tokio::test]
async fn test_type_change_is_rejected() {
    let ctx = TestContext::new().await;
    seed_state(&ctx, &[("laptops", group_entry("g1", "laptops"))]);
    ctx.mock_get("/api/v2/usergroups/g1", json!({"id": "g1", "name": "laptops"}))
        .await;

    let provider = ctx.provider();
    let manifest = ctx.manifest(
        "resources:\n  - { name: laptops, type: cloudir_system_group, config: { name: laptops } }\n",
    );

    let err = apply::run(&provider, &manifest, &ctx.state_path(), false)
        .await
        .unwrap_err();
    assert!(matches!(err, CliError::Validation(_)));
    assert!(err.to_string().contains("changed type"));
}

#[tokio::test]
async fn test_invalid_config_fails_before_any_change() {
    let ctx = TestContext::new().await;
    let provider = ctx.provider();
    let manifest = ctx.manifest(
        "resources:\n  - { name: bob, type: cloudir_user, config: { username: bob } }\n",
    );

    let err = apply::run(&provider, &manifest, &ctx.state_path(), false)
        .await
        .unwrap_err();
    assert_eq!(err.exit_code(), 4);
    assert!(err.to_string().contains("missing required attribute 'email'"));
    assert!(ctx.request_log().await.is_empty());
}

#[tokio::test]
async fn test_invalid_attribute_value_fails_before_any_change() {
    let ctx = TestContext::new().await;
    let provider = ctx.provider();
    let manifest = ctx.manifest(
        r#"resources:
  - { name: engineering, type: cloudir_user_group, config: { name: engineering } }
  - { name: strict, type: cloudir_auth_policy, config: { name: strict, effect: maybe } }
"#,
    );

    let err = plan::run(&provider, &manifest, &ctx.state_path())
        .await
        .unwrap_err();
    assert_eq!(err.exit_code(), 4);

    let err = apply::run(&provider, &manifest, &ctx.state_path(), false)
        .await
        .unwrap_err();
    assert_eq!(err.exit_code(), 4);
    assert!(err.to_string().contains("effect"));
    assert!(ctx.request_log().await.is_empty());
    assert!(!ctx.load_state().contains("engineering"));
}

#[tokio::test]
async fn test_invalid_data_block_fails_before_any_change() {
    let ctx = TestContext::new().await;
    let provider = ctx.provider();
    let manifest = ctx.manifest(
        r#"resources:
  - { name: engineering, type: cloudir_user_group, config: { name: engineering } }
data:
  - { name: someone, type: cloudir_user, config: { email: someone@example.com } }
"#,
    );

    let err = plan::run(&provider, &manifest, &ctx.state_path())
        .await
        .unwrap_err();
    assert_eq!(err.exit_code(), 4);

    let err = apply::run(&provider, &manifest, &ctx.state_path(), false)
        .await
        .unwrap_err();
    assert_eq!(err.exit_code(), 4);
    assert!(err.to_string().contains("username"));
    assert!(ctx.request_log().await.is_empty());
    assert!(!ctx.load_state().contains("engineering"));
}

// =========================================================================
// plan
// =========================================================================

#[tokio::test]
async fn test_plan_refreshes_without_writing_state() {
    let ctx = TestContext::new().await;
    seed_state(&ctx, &[("engineering", group_entry("g1", "engineering"))]);
    ctx.mock_status("GET", "/api/v2/usergroups/g1", 404).await;

    let provider = ctx.provider();
    let manifest = ctx.manifest(
        "resources:\n  - { name: engineering, type: cloudir_user_group, config: { name: engineering } }\n",
    );

    let entries = plan::run(&provider, &manifest, &ctx.state_path())
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].change.action, PlanAction::Create);

    // The object vanished remotely, but plan leaves the file alone.
    assert!(ctx.load_state().contains("engineering"));
}

#[tokio::test]
async fn test_plan_report_masks_sensitive_values() {
    let ctx = TestContext::new().await;
    let provider = ctx.provider();
    let manifest = ctx.manifest(
        r#"
resources:
  - name: vpn
    type: cloudir_radius_server
    config:
      name: vpn
      network_source_ip: 10.0.0.1
      shared_secret: s3cr3t
"#,
    );

    let entries = plan::run(&provider, &manifest, &ctx.state_path())
        .await
        .unwrap();
    let report = serde_json::to_string(&plan::PlanReport::new(entries)).unwrap();

    assert!(!report.contains("s3cr3t"));
    assert!(report.contains("(sensitive)"));
}

// =========================================================================
// destroy
// =========================================================================

#[tokio::test]
async fn test_destroy_deletes_in_reverse_order() {
    let ctx = TestContext::new().await;
    seed_state(
        &ctx,
        &[
            ("engineering", group_entry("g1", "engineering")),
            ("design", group_entry("g2", "design")),
        ],
    );
    ctx.mock_delete("/api/v2/usergroups/g1").await;
    ctx.mock_delete("/api/v2/usergroups/g2").await;

    let provider = ctx.provider();
    let manifest = ctx.manifest(
        r#"
resources:
  - { name: engineering, type: cloudir_user_group, config: { name: engineering } }
  - { name: design, type: cloudir_user_group, config: { name: design } }
"#,
    );

    let destroyed = destroy::run(&provider, &manifest, &ctx.state_path())
        .await
        .unwrap();
    assert_eq!(destroyed, vec!["design", "engineering"]);
    assert!(ctx.load_state().is_empty());
}

#[tokio::test]
async fn test_destroy_failure_keeps_remaining_entries() {
    let ctx = TestContext::new().await;
    seed_state(
        &ctx,
        &[
            ("engineering", group_entry("g1", "engineering")),
            ("design", group_entry("g2", "design")),
        ],
    );
    ctx.mock_delete("/api/v2/usergroups/g2").await;
    ctx.mock_status("DELETE", "/api/v2/usergroups/g1", 403).await;

    let provider = ctx.provider();
    let manifest = ctx.manifest(
        r#"
resources:
  - { name: engineering, type: cloudir_user_group, config: { name: engineering } }
  - { name: design, type: cloudir_user_group, config: { name: design } }
"#,
    );

    let err = destroy::run(&provider, &manifest, &ctx.state_path())
        .await
        .unwrap_err();
    assert_eq!(err.exit_code(), 2);

    let state = ctx.load_state();
    assert!(state.contains("engineering"));
    assert!(!state.contains("design"));
}

// =========================================================================
// import
// =========================================================================

#[tokio::test]
async fn test_import_records_state() {
    let ctx = TestContext::new().await;
    ctx.mock_get(
        "/api/v2/usergroups/g1",
        json!({"id": "g1", "name": "engineering", "email": "eng@example.com"}),
    )
    .await;

    let provider = ctx.provider();
    let attributes = import::run(
        &provider,
        "engineering",
        "cloudir_user_group",
        "g1",
        &ctx.state_path(),
    )
    .await
    .unwrap();
    assert_eq!(attributes["email"], "eng@example.com");

    let state = ctx.load_state();
    assert_eq!(state.get("engineering").unwrap().id(), Some("g1"));

    let err = import::run(
        &provider,
        "engineering",
        "cloudir_user_group",
        "g1",
        &ctx.state_path(),
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("already managed"));
}

#[tokio::test]
async fn test_import_missing_object() {
    let ctx = TestContext::new().await;
    ctx.mock_status("GET", "/api/v2/usergroups/nope", 404).await;

    let provider = ctx.provider();
    let err = import::run(
        &provider,
        "ghost",
        "cloudir_user_group",
        "nope",
        &ctx.state_path(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, CliError::NotFound(_)));
    assert!(!ctx.state_path().exists());
}
