//! Settings form workflow integration tests
//!
//! Exercises the full edit-screen lifecycle against the in-memory API fake:
//! loading and merging, typed edits, revert/undo, destructive toggles,
//! validation gating, atomic submit, and category-wide revert.

mod common;

use common::{
    Failure, MockApi, authentication_options, authentication_values, jobs_options, jobs_values,
    logging_options, logging_values,
};
use serde_json::json;
use setforge::{
    ENCRYPTED_PLACEHOLDER, Error, ExecutionEnvironment, FormController, RevertAction,
    ToggleOutcome,
};

fn logging_controller() -> FormController<MockApi> {
    let api = MockApi::new().with_category("logging", logging_options(), logging_values());
    FormController::new(api, "logging").unwrap()
}

// =============================================================================
// Loading
// =============================================================================

#[test]
fn test_load_builds_one_field_per_known_key() {
    let controller = logging_controller();
    let form = controller.load().unwrap();

    assert_eq!(form.len(), 6);
    let host = form.field("LOG_AGGREGATOR_HOST").unwrap();
    assert_eq!(host.metadata().label, "Logging Aggregator");
    assert_eq!(host.value(), &json!("logs.example.org"));
}

#[test]
fn test_load_failure_yields_single_error() {
    let controller = logging_controller();
    controller.api().fail_next(Failure::ReadOptions);

    let err = controller.load().unwrap_err();
    assert!(matches!(err, Error::Fetch { ref slug, .. } if slug == "logging"));

    // the next load works again
    assert!(controller.load().is_ok());
}

#[test]
fn test_hidden_key_survives_submit_round_trip() {
    let api = MockApi::new().with_category(
        "authentication",
        authentication_options(),
        authentication_values(),
    );
    let controller = FormController::new(api, "authentication").unwrap();
    let mut form = controller.load().unwrap();

    // hidden key is not a field
    assert!(form.field("INSTALL_UUID").is_none());

    form.set_value("SESSION_COOKIE_AGE", json!(3600)).unwrap();
    controller.submit(&mut form).unwrap();

    let updates = controller.api().updates.lock().unwrap();
    let (_, payload) = &updates[0];
    // but it round-trips in the payload untouched
    assert_eq!(
        payload["INSTALL_UUID"],
        json!("00000000-aaaa-bbbb-cccc-000000000000")
    );
}

// =============================================================================
// Revert / Undo
// =============================================================================

#[test]
fn test_loaded_custom_value_reverts_then_undoes() {
    let controller = logging_controller();
    let mut form = controller.load().unwrap();

    // port loaded at 6514, default 514
    let port = form.field("LOG_AGGREGATOR_PORT").unwrap();
    assert_eq!(port.revert_action(), Some(RevertAction::Revert));

    assert_eq!(form.revert_field("LOG_AGGREGATOR_PORT").unwrap(), Some(json!(514)));
    assert_eq!(form.field("LOG_AGGREGATOR_PORT").unwrap().text(), "514");

    // at the default now, the control flips to Undo
    let port = form.field("LOG_AGGREGATOR_PORT").unwrap();
    assert_eq!(port.revert_action(), Some(RevertAction::Undo));
    assert_eq!(form.revert_field("LOG_AGGREGATOR_PORT").unwrap(), Some(json!(6514)));
}

#[test]
fn test_revert_all_is_one_call_behind_confirmation() {
    let controller = logging_controller();

    assert!(controller.revert_all(false).unwrap().is_none());
    assert!(controller.api().reverts.lock().unwrap().is_empty());

    let nav = controller.revert_all(true).unwrap().unwrap();
    assert_eq!(nav.route, "/settings/logging/details");
    assert_eq!(controller.api().reverts.lock().unwrap().as_slice(), ["logging"]);
}

// =============================================================================
// Visibility
// =============================================================================

#[test]
fn test_logging_protocol_drives_dependent_fields() {
    let controller = logging_controller();
    let mut form = controller.load().unwrap();

    // loaded with udp: timeout and cert verification hidden
    assert!(!form.is_visible("LOG_AGGREGATOR_TCP_TIMEOUT"));
    assert!(!form.is_visible("LOG_AGGREGATOR_VERIFY_CERT"));

    form.set_value("LOG_AGGREGATOR_PROTOCOL", json!("https")).unwrap();
    assert!(form.is_visible("LOG_AGGREGATOR_TCP_TIMEOUT"));
    assert!(form.is_visible("LOG_AGGREGATOR_VERIFY_CERT"));

    // hidden fields stay out of the submit payload
    form.set_value("LOG_AGGREGATOR_PROTOCOL", json!("udp")).unwrap();
    controller.submit(&mut form).unwrap();
    let updates = controller.api().updates.lock().unwrap();
    let (_, payload) = &updates[0];
    assert!(!payload.contains_key("LOG_AGGREGATOR_TCP_TIMEOUT"));
    assert!(!payload.contains_key("LOG_AGGREGATOR_VERIFY_CERT"));
}

// =============================================================================
// Validation gating
// =============================================================================

#[test]
fn test_invalid_field_blocks_submit_without_api_call() {
    let controller = logging_controller();
    let mut form = controller.load().unwrap();

    form.set_text("LOG_AGGREGATOR_PORT", "70000").unwrap();
    let err = controller.submit(&mut form).unwrap_err();
    assert!(matches!(err, Error::Validation { ref key, .. } if key == "LOG_AGGREGATOR_PORT"));
    assert!(controller.api().updates.lock().unwrap().is_empty());

    // fixing the field lets the submit through
    form.set_text("LOG_AGGREGATOR_PORT", "6514").unwrap();
    controller.submit(&mut form).unwrap();
    assert_eq!(controller.api().updates.lock().unwrap().len(), 1);
}

#[test]
fn test_submit_navigates_to_details_exactly_once() {
    let controller = logging_controller();
    let mut form = controller.load().unwrap();
    form.set_text("LOG_AGGREGATOR_HOST", "other.example.org").unwrap();

    let nav = controller.submit(&mut form).unwrap();
    assert_eq!(nav.route, "/settings/logging/details");
    assert_eq!(controller.api().updates.lock().unwrap().len(), 1);
}

#[test]
fn test_failed_submit_stays_inline() {
    let controller = logging_controller();
    let mut form = controller.load().unwrap();
    controller.api().fail_next(Failure::UpdateAll);

    let err = controller.submit(&mut form).unwrap_err();
    assert!(matches!(err, Error::Submit { .. }));
    assert!(err.is_inline());
}

// =============================================================================
// Structured fields
// =============================================================================

#[test]
fn test_list_field_submits_decoded_array() {
    let api = MockApi::new().with_category("jobs", jobs_options(), jobs_values());
    let controller = FormController::new(api, "jobs").unwrap();
    let mut form = controller.load().unwrap();

    // loaded text is pretty-printed JSON
    let text = form.field("AD_HOC_COMMANDS").unwrap().text().to_string();
    assert!(text.contains("\"command\""));

    form.set_text("AD_HOC_COMMANDS", r#"["command", "shell", "win_ping"]"#)
        .unwrap();
    controller.submit(&mut form).unwrap();

    let updates = controller.api().updates.lock().unwrap();
    let (_, payload) = &updates[0];
    // a real array, not a string holding JSON
    assert_eq!(payload["AD_HOC_COMMANDS"], json!(["command", "shell", "win_ping"]));
}

#[test]
fn test_nested_object_parse_error_is_local() {
    let api = MockApi::new().with_category("jobs", jobs_options(), jobs_values());
    let controller = FormController::new(api, "jobs").unwrap();
    let mut form = controller.load().unwrap();

    form.set_text("AWX_TASK_ENV", "{not json").unwrap();
    assert!(form.field("AWX_TASK_ENV").unwrap().error().is_some());
    // the rest of the form still edits fine
    form.set_text("MAX_FORKS", "100").unwrap();
    assert!(form.field("MAX_FORKS").unwrap().error().is_none());

    let err = controller.submit(&mut form).unwrap_err();
    assert!(matches!(err, Error::Parse { ref key, .. } if key == "AWX_TASK_ENV"));
}

// =============================================================================
// Destructive toggles & quick save
// =============================================================================

#[test]
fn test_disable_local_auth_needs_confirmation() {
    let api = MockApi::new().with_category(
        "authentication",
        authentication_options(),
        authentication_values(),
    );
    let controller = FormController::new(api, "authentication").unwrap();
    let mut form = controller.load().unwrap();

    let outcome = form.request_toggle("DISABLE_LOCAL_AUTH").unwrap();
    assert!(matches!(outcome, ToggleOutcome::NeedsConfirmation { .. }));
    assert_eq!(form.value("DISABLE_LOCAL_AUTH"), Some(&json!(false)));

    form.confirm_toggle().unwrap();
    assert_eq!(form.value("DISABLE_LOCAL_AUTH"), Some(&json!(true)));
}

#[test]
fn test_quick_toggle_saves_single_key() {
    let controller = logging_controller();
    let mut form = controller.load().unwrap();

    let target = controller
        .quick_toggle(&mut form, "LOG_AGGREGATOR_ENABLED")
        .unwrap();
    assert!(target);

    let updates = controller.api().updates.lock().unwrap();
    let (slug, payload) = &updates[0];
    assert_eq!(slug, "logging");
    assert_eq!(payload.len(), 1);
    assert_eq!(payload["LOG_AGGREGATOR_ENABLED"], json!(true));
}

#[test]
fn test_quick_toggle_rolls_back_on_api_failure() {
    let controller = logging_controller();
    let mut form = controller.load().unwrap();
    controller.api().fail_next(Failure::UpdateAll);

    assert!(controller.quick_toggle(&mut form, "LOG_AGGREGATOR_ENABLED").is_err());
    assert_eq!(form.value("LOG_AGGREGATOR_ENABLED"), Some(&json!(false)));
}

// =============================================================================
// Encrypted fields
// =============================================================================

#[test]
fn test_untouched_secret_never_resubmits() {
    let api = MockApi::new().with_category(
        "authentication",
        authentication_options(),
        authentication_values(),
    );
    let controller = FormController::new(api, "authentication").unwrap();
    let mut form = controller.load().unwrap();

    controller.submit(&mut form).unwrap();
    let updates = controller.api().updates.lock().unwrap();
    let (_, payload) = &updates[0];
    assert!(!payload.contains_key("SOCIAL_AUTH_GITHUB_SECRET"));
    drop(updates);

    // a typed replacement does submit
    form.focus("SOCIAL_AUTH_GITHUB_SECRET");
    form.set_text("SOCIAL_AUTH_GITHUB_SECRET", "hunter2").unwrap();
    controller.submit(&mut form).unwrap();
    let updates = controller.api().updates.lock().unwrap();
    let (_, payload) = &updates[1];
    assert_eq!(payload["SOCIAL_AUTH_GITHUB_SECRET"], json!("hunter2"));
}

#[test]
fn test_secret_placeholder_restores_on_blur() {
    let api = MockApi::new().with_category(
        "authentication",
        authentication_options(),
        authentication_values(),
    );
    let controller = FormController::new(api, "authentication").unwrap();
    let mut form = controller.load().unwrap();

    form.focus("SOCIAL_AUTH_GITHUB_SECRET");
    assert_eq!(form.field("SOCIAL_AUTH_GITHUB_SECRET").unwrap().text(), "");
    form.blur("SOCIAL_AUTH_GITHUB_SECRET");
    assert_eq!(
        form.field("SOCIAL_AUTH_GITHUB_SECRET").unwrap().text(),
        ENCRYPTED_PLACEHOLDER
    );
}

// =============================================================================
// Detail view
// =============================================================================

#[test]
fn test_detail_view_resolves_execution_environment_name() {
    let api = MockApi::new()
        .with_category("jobs", jobs_options(), jobs_values())
        .with_environment(ExecutionEnvironment {
            id: 1,
            name: "AWX EE (latest)".to_string(),
            image: Some("quay.io/ansible/awx-ee:latest".to_string()),
        });
    let controller = FormController::new(api, "jobs").unwrap();

    let view = controller.details().unwrap();
    let row = view
        .rows
        .iter()
        .find(|r| r.key == "DEFAULT_EXECUTION_ENVIRONMENT")
        .unwrap();
    assert_eq!(row.display, "AWX EE (latest)");
}

#[test]
fn test_detail_view_falls_back_to_raw_id() {
    // no environments registered, lookup 404s
    let api = MockApi::new().with_category("jobs", jobs_options(), jobs_values());
    let controller = FormController::new(api, "jobs").unwrap();

    let view = controller.details().unwrap();
    let row = view
        .rows
        .iter()
        .find(|r| r.key == "DEFAULT_EXECUTION_ENVIRONMENT")
        .unwrap();
    assert_eq!(row.display, "1");
}
