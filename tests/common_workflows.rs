//! Integration tests for common Fieldwork workflows.
//!
//! These tests drive the validator the way a form handler would, and
//! combine it with the optional crates when their features are enabled.

use fieldwork::prelude::*;

// =============================================================================
// Form Handling
// =============================================================================

#[test]
fn test_signup_form() {
    let mut v = Validator::new([
        ("username", "  ann_lee "),
        ("email", "ann@example.com"),
        ("password", "s3cret!pass"),
        ("confirm", "s3cret!pass"),
        ("age", "34"),
        ("plan", "pro"),
    ]);
    v.registry_mut()
        .register_pattern("username", r"^\w+$", "notValid")
        .unwrap();

    v.field_as("username", "Username")
        .required(None, None)
        .unwrap()
        .length(3, 20, None)
        .unwrap()
        .apply_named_rule("username", None)
        .unwrap();
    v.field("email").required(None, None).unwrap().email(None).unwrap();
    v.field("password").required(None, None).unwrap().length(8, 64, None).unwrap();
    v.field_as("confirm", "Confirmation")
        .match_field("password", None)
        .unwrap();
    v.field("age").to_int().unwrap().int_range(13, 130, None).unwrap();
    v.field("plan").one_of(["free", "pro"], None).unwrap();

    assert!(v.all_valid(), "unexpected errors: {}", v.errors());
    assert_eq!(v.get("username", true).unwrap(), &Value::from("ann_lee"));
    assert_eq!(v.get("age", true).unwrap(), &Value::Int(34));
}

#[test]
fn test_form_errors_are_reported_per_field() {
    let mut v = Validator::new([("email", "nope"), ("age", "9"), ("plan", "gold")]);

    v.field_as("email", "Email").email(None).unwrap();
    v.field_as("age", "Age").to_int().unwrap().int_range(13, 130, None).unwrap();
    v.field_as("plan", "Plan").one_of(["free", "pro"], None).unwrap();
    v.field_as("name", "Name").required(None, None).unwrap();

    let errors = v.errors();
    assert_eq!(errors.len(), 4);
    assert_eq!(errors.get("email"), Some("Email is not valid"));
    assert_eq!(errors.get("name"), Some("Name is required"));
    assert!(errors.contains("age"));
    assert!(errors.contains("plan"));
}

#[test]
fn test_json_submission_round_trip() {
    let input = serde_json::json!({
        "title": " Quarterly report ",
        "starts": "2021-03-01",
        "ends": "2021-02-01",
    });

    let mut v = Validator::from_json(input, ValidatorConfig::default()).unwrap();
    v.field("title").required(None, None).unwrap();
    v.field("starts")
        .to_date_time(Some("Y-m-d"), None, None)
        .unwrap();
    v.field_as("ends", "End date")
        .to_date_time(Some("Y-m-d"), None, None)
        .unwrap()
        .after_field("starts", None)
        .unwrap();

    assert!(!v.all_valid());
    assert!(v.errors().contains("ends"));
    assert_eq!(v.to_json(true)["title"], "Quarterly report");
}

#[test]
fn test_escaped_output() {
    let mut v = Validator::new([("comment", "<b>\"hi\"</b> & bye")]);
    v.field("comment").required(None, None).unwrap();

    assert_eq!(
        v.escape("comment", true).unwrap(),
        "&lt;b&gt;&quot;hi&quot;&lt;/b&gt; &amp; bye"
    );
}

#[test]
fn test_unknown_field_is_a_usage_error() {
    let v = Validator::new([("a", "1")]);
    assert!(matches!(
        v.get("b", true),
        Err(ValidationError::UnknownField(_))
    ));
}

// =============================================================================
// Optional Crates
// =============================================================================

#[cfg(all(feature = "auth", feature = "events"))]
#[test]
fn test_signup_hashes_password_and_notifies() {
    use fieldwork::fieldwork_auth::MIN_COST;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    let mut v = Validator::new([("password", "Tr1cky!pass")]);
    v.field("password")
        .required(None, None)
        .unwrap()
        .func(
            |value| {
                check_password_complexity(&value.to_text(), &PasswordPolicy::default())
                    .unwrap_or(false)
            },
            Some("Password is too simple"),
        )
        .unwrap();
    assert!(v.all_valid());

    let emitter = EventEmitter::<String>::new();
    let notified = Arc::new(AtomicUsize::new(0));
    let counter = notified.clone();
    emitter.add_listener("user.created", move |hash: &String| {
        counter.fetch_add(1, Ordering::SeqCst);
        hash.starts_with("$2")
    });

    let helper = PasswordHelper::with_cost(MIN_COST).unwrap();
    let password = v.get("password", true).unwrap().to_text();
    let hash = helper.hash(&password).unwrap();

    assert!(emitter.fire_event("user.created", &hash));
    assert_eq!(notified.load(Ordering::SeqCst), 1);
}

#[cfg(feature = "utils")]
#[test]
fn test_weighted_choice_passes_one_of() {
    let selector =
        WeightedRandomSelector::from_items([("red", Some(3)), ("green", Some(1))]).unwrap();
    let choice = *selector.get().unwrap();

    let mut v = Validator::new([("colour", choice)]);
    v.field("colour").one_of(["red", "green"], None).unwrap();
    assert!(v.all_valid());
}

#[cfg(feature = "console")]
#[test]
fn test_console_options_feed_validator() {
    let console = Console::builder()
        .long_options(["email:"])
        .writer(Box::new(std::io::sink()))
        .parse_from(["script", "--email=ops@example.com"])
        .unwrap();

    let email = console
        .get_arg("email")
        .and_then(ArgValue::as_str)
        .unwrap_or_default()
        .to_string();

    let mut v = Validator::new([("email", email)]);
    v.field("email").email(None).unwrap();
    assert!(v.all_valid());
}
