//! End-to-end lint runs over artifact directories on disk

mod fixtures;

use std::fs;

use cheddar_lint::config::EffectiveConfig;
use cheddar_lint::lineage::{compute_hash, Invariant};
use cheddar_lint::loader::read_document;
use cheddar_lint::report::{ExitCode, HashAction};
use cheddar_lint::{HumanReport, LintConfig, LintError, Linter};
use fixtures::{hash_of, initiative, mission, sealed, track, Workspace};
use serde_json::{json, Value};

fn write_chain(ws: &Workspace) -> (Value, Value, Value) {
    let m = mission();
    let i = initiative(&m);
    let t = track(&i);
    ws.write_artifact("artifacts/mission.yaml", &m);
    ws.write_artifact("artifacts/initiative.yaml", &i);
    ws.write_artifact("artifacts/track.yaml", &t);
    (m, i, t)
}

// =============================================================================
// Full check
// =============================================================================

#[test]
fn test_valid_chain_passes_every_check() {
    let ws = Workspace::new();
    write_chain(&ws);
    let linter = ws.linter();
    let artifacts = vec![ws.path("artifacts")];

    let validation = linter.validate_paths(&artifacts, None).unwrap();
    assert_eq!(validation.len(), 3);
    assert!(validation.iter().all(|r| r.passed), "{:?}", validation);

    let chain = linter.verify_paths(&artifacts, false).unwrap();
    assert!(chain.passed, "{:?}", chain.errors);
    assert_eq!(chain.artifacts_checked, 3);

    let combined = linter.check_paths(&artifacts, false).unwrap();
    assert!(combined.passed);
    assert_eq!(combined.exit_code(), ExitCode::Success);
    assert_eq!(combined.summary.total_errors, 0);
}

#[test]
fn test_tampered_content_fails_hash_check_only_when_hashes_verified() {
    let ws = Workspace::new();
    let (_, _, mut t) = write_chain(&ws);
    t["title"] = json!("Signup funnel (edited)");
    ws.write_artifact("artifacts/track.yaml", &t);
    let linter = ws.linter();
    let artifacts = vec![ws.path("artifacts")];

    let chain = linter.verify_paths(&artifacts, false).unwrap();
    assert!(!chain.passed);
    assert_eq!(chain.errors.len(), 1);
    assert_eq!(chain.errors[0].invariant, Some(Invariant::ContentHash));
    assert_eq!(chain.errors[0].artifact, "track_signup_v2");
    assert!(chain.errors[0].file.ends_with("track.yaml"));

    // The combined run skips own-hash checks unless configured
    assert!(linter.check_paths(&artifacts, false).unwrap().passed);
}

#[test]
fn test_stale_upstream_hash_after_parent_edit() {
    let ws = Workspace::new();
    let (m, _, _) = write_chain(&ws);

    // Re-seal the mission with new content; the initiative still points at the old hash
    let mut edited = m.clone();
    edited["title"] = json!("Grow faster");
    let edited = sealed(edited);
    ws.write_artifact("artifacts/mission.yaml", &edited);

    let chain = ws.linter().verify_paths(&[ws.path("artifacts")], false).unwrap();
    assert_eq!(chain.errors.len(), 1);
    let error = &chain.errors[0];
    assert_eq!(error.invariant, Some(Invariant::ChainLink));
    assert_eq!(error.artifact, "initiative_onboarding_v1");
    assert!(error.message.contains("upstream_hash mismatch"));
    assert!(error.message.contains(&hash_of(&m)));
    assert!(error.message.contains(&hash_of(&edited)));
}

#[test]
fn test_cycle_on_disk_terminates() {
    let ws = Workspace::new();
    ws.write_artifact(
        "loop/a.yaml",
        &json!({
            "id": "track_a_v1",
            "level": "cheddar_track",
            "supports_upper_layer": "track_b_v1",
            "lineage": {"hash": "sha256:aaaa...", "upstream_hash": "sha256:bbbb..."}
        }),
    );
    ws.write_artifact(
        "loop/b.yaml",
        &json!({
            "id": "track_b_v1",
            "level": "cheddar_track",
            "supports_upper_layer": "track_a_v1",
            "lineage": {"hash": "sha256:bbbb...", "upstream_hash": "sha256:aaaa..."}
        }),
    );

    let chain = ws.linter().verify_paths(&[ws.path("loop")], false).unwrap();
    assert!(!chain.passed);
    assert_eq!(chain.errors.len(), 2);
    assert!(chain
        .errors
        .iter()
        .all(|e| e.message.starts_with("Circular reference detected involving")));
}

#[test]
fn test_documentation_log_in_batch() {
    let ws = Workspace::new();
    write_chain(&ws);
    let log = sealed(json!({
        "documentation_log": {
            "id": "log_rollout_v1",
            "entries": ["kickoff", "pilot"],
            "lineage": {"upstream_hash": null}
        }
    }));
    ws.write_artifact("artifacts/log.yaml", &log);
    let linter = ws.linter();
    let artifacts = vec![ws.path("artifacts")];

    let chain = linter.verify_paths(&artifacts, false).unwrap();
    assert!(chain.passed, "{:?}", chain.errors);
    assert_eq!(chain.artifacts_checked, 4);

    let validation = linter.validate_paths(&artifacts, None).unwrap();
    assert!(validation.iter().all(|r| r.passed), "{:?}", validation);
}

// =============================================================================
// Validation details
// =============================================================================

#[test]
fn test_validation_errors_are_tagged() {
    let ws = Workspace::new();
    let path = ws.write_artifact(
        "bad_track.yaml",
        &json!({
            "id": "track_nover",
            "level": "cheddar_track",
            "title": "No version",
            "cheddar_state": "lost",
            "lineage": {"upstream_hash": null}
        }),
    );

    let results = ws.linter().validate_paths(&[path], None).unwrap();
    assert_eq!(results.len(), 1);
    let result = &results[0];
    assert!(!result.passed);

    let tagged: Vec<_> = result
        .errors
        .iter()
        .map(|e| (e.invariant, e.field.as_str()))
        .collect();
    assert!(tagged.contains(&(Some(Invariant::CheddarState), "cheddar_state")));
    assert!(tagged.contains(&(Some(Invariant::VersionedId), "id")));
    assert!(tagged.contains(&(Some(Invariant::UpstreamReference), "supports_upper_layer")));

    let text = results.to_human();
    assert!(text.contains("[INV-040] cheddar_state"));
    assert!(text.ends_with("Passed: 0/1\n"));
}

#[test]
fn test_non_artifact_yaml_in_directory() {
    let ws = Workspace::new();
    write_chain(&ws);
    ws.write_raw("artifacts/settings.yaml", "colour: blue\n");
    let linter = ws.linter();
    let artifacts = vec![ws.path("artifacts")];

    let validation = linter.validate_paths(&artifacts, None).unwrap();
    let settings = validation
        .iter()
        .find(|r| r.file.ends_with("settings.yaml"))
        .unwrap();
    assert_eq!(settings.errors[0].field, "level");
    assert!(settings.errors[0].message.starts_with("Cannot detect artifact type"));

    // Not an artifact, so chain verification never sees it
    let chain = linter.verify_paths(&artifacts, false).unwrap();
    assert!(chain.passed);
    assert_eq!(chain.artifacts_checked, 3);
}

#[test]
fn test_invalid_yaml_does_not_stop_the_batch() {
    let ws = Workspace::new();
    write_chain(&ws);
    ws.write_raw("artifacts/broken.yaml", "id: [unclosed\n");
    let linter = ws.linter();
    let artifacts = vec![ws.path("artifacts")];

    let validation = linter.validate_paths(&artifacts, None).unwrap();
    assert_eq!(validation.len(), 4);
    assert_eq!(validation.iter().filter(|r| !r.passed).count(), 1);

    let chain = linter.verify_paths(&artifacts, false).unwrap();
    assert_eq!(chain.artifacts_checked, 3);
    assert_eq!(chain.errors.len(), 1);
    assert_eq!(chain.errors[0].invariant, None);
}

// =============================================================================
// Hash workflow
// =============================================================================

#[test]
fn test_hash_update_then_verify() {
    let ws = Workspace::new();
    let path = ws.write_raw(
        "draft.yaml",
        "id: mission_draft_v1\nlevel: mission\ntitle: Draft\nlineage:\n  upstream_hash: null\n",
    );
    let linter = ws.linter();

    let before = linter.hash_file(&path, HashAction::Verify).unwrap();
    assert_eq!(before.existing_hash, None);
    assert_eq!(before.exit_code(), ExitCode::ValidationFailed);

    let updated = linter.hash_file(&path, HashAction::Update).unwrap();
    let document = read_document(&path).unwrap();
    assert_eq!(document["lineage"]["hash"], json!(updated.computed_hash));
    assert_eq!(compute_hash(&document).unwrap(), updated.computed_hash);

    // Key order survives the rewrite
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.find("id:").unwrap() < text.find("level:").unwrap());
    assert!(text.find("level:").unwrap() < text.find("lineage:").unwrap());

    let after = linter.hash_file(&path, HashAction::Verify).unwrap();
    assert_eq!(after.matches, Some(true));
    assert_eq!(after.exit_code(), ExitCode::Success);
}

#[test]
fn test_hash_update_documentation_log() {
    let ws = Workspace::new();
    let path = ws.write_raw(
        "log.yaml",
        "documentation_log:\n  id: log_v1\n  entries: [a]\n  lineage:\n    upstream_hash: null\n",
    );
    let linter = ws.linter();

    let updated = linter.hash_file(&path, HashAction::Update).unwrap();
    let document = read_document(&path).unwrap();
    assert!(document.get("lineage").is_none());
    assert_eq!(
        document["documentation_log"]["lineage"]["hash"],
        json!(updated.computed_hash)
    );
}

#[test]
fn test_hash_on_directory_is_usage_error() {
    let ws = Workspace::new();
    let err = ws.linter().hash_file(ws.root(), HashAction::Compute).unwrap_err();
    assert!(matches!(err, LintError::NotAFile(_)));
    assert_eq!(err.exit_code(), ExitCode::Usage);
}

// =============================================================================
// Discovery and configuration
// =============================================================================

#[test]
fn test_recursive_discovery_follows_config() {
    let ws = Workspace::new();
    let m = mission();
    ws.write_artifact("tree/mission.yaml", &m);
    ws.write_artifact("tree/nested/initiative.yaml", &initiative(&m));

    let flat = ws.linter().verify_paths(&[ws.path("tree")], false).unwrap();
    assert_eq!(flat.artifacts_checked, 1);

    let deep = Linter::new(LintConfig {
        recursive: true,
        ..ws.config()
    })
    .verify_paths(&[ws.path("tree")], false)
    .unwrap();
    assert_eq!(deep.artifacts_checked, 2);
    assert!(deep.passed, "{:?}", deep.errors);
}

#[test]
fn test_config_file_layers_excludes() {
    let ws = Workspace::new();
    write_chain(&ws);
    ws.write_raw("artifacts/drafts/wip.yaml", "id: [\n");
    let config_path = ws.write_raw(
        "lint.toml",
        &format!(
            "schema_dir = {:?}\nrecursive = true\nexclude = [\"drafts/**\"]\n",
            ws.path("schemas").display().to_string()
        ),
    );

    let effective = EffectiveConfig::build(Some(&config_path), None).unwrap();
    assert!(effective.config.recursive);
    assert_eq!(effective.sources.len(), 2);

    let report = Linter::new(effective.config)
        .check_paths(&[ws.path("artifacts")], false)
        .unwrap();
    assert!(report.passed, "{}", report.to_human());
    assert_eq!(
        report.checks.validate_artifact.as_ref().unwrap().files_checked,
        3
    );
}

#[test]
fn test_missing_paths_are_usage_errors() {
    let ws = Workspace::new();
    let linter = ws.linter();
    let missing = vec![ws.path("nowhere")];

    for err in [
        linter.validate_paths(&missing, None).unwrap_err(),
        linter.verify_paths(&missing, false).unwrap_err(),
        linter.check_paths(&missing, false).unwrap_err(),
    ] {
        assert!(matches!(err, LintError::PathNotFound(_)));
        assert_eq!(err.exit_code(), ExitCode::Usage);
    }
}

#[test]
fn test_examples_with_placeholder_hashes() {
    let ws = Workspace::new();
    ws.write_raw(
        "schemas/examples/mission.yaml",
        "id: mission_demo_v1\nlevel: mission\ntitle: Demo\nowner: dana\nlineage:\n  hash: \"sha256:a1b2c3...\"\n  upstream_hash: null\n",
    );
    ws.write_raw(
        "schemas/examples/initiative.yaml",
        "id: initiative_demo_v1\nlevel: flow_initiative\ntitle: Demo\nsupports_upper_layer: mission_demo_v1\nlineage:\n  hash: \"sha256:d4e5f6...\"\n  upstream_hash: \"sha256:a1b2c3...\"\n",
    );
    let linter = ws.linter();

    let examples = linter.examples_dir().unwrap();
    let report = linter.check_paths(&[examples.clone()], false).unwrap();
    assert!(report.passed, "{}", report.to_human());

    // Placeholders pass even with own-hash checks on
    assert!(linter.verify_paths(&[examples], false).unwrap().passed);
}

#[test]
fn test_combined_json_shape() {
    let ws = Workspace::new();
    write_chain(&ws);
    let report = ws.linter().check_paths(&[ws.path("artifacts")], true).unwrap();
    let value: Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

    assert_eq!(value["passed"], json!(true));
    assert_eq!(value["checks"]["validate_artifact"]["files_checked"], json!(3));
    assert!(value["checks"].get("verify_lineage").is_none());
    assert_eq!(
        value["checks"]["validate_artifact"]["results"][0]["linter"],
        json!("validate_artifact")
    );
}
