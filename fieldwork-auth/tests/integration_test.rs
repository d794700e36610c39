//! Integration tests for fieldwork-auth

use fieldwork_auth::*;

#[test]
fn test_generated_password_round_trips_through_hash() {
    let helper = PasswordHelper::with_cost(MIN_COST).unwrap();
    let password = PasswordHelper::generate_random_password(DEFAULT_PASSWORD_LENGTH);

    let hash = helper.hash(&password).unwrap();
    assert!(PasswordHelper::compare_to_hash(&password, &hash).unwrap());
    assert!(!PasswordHelper::compare_to_hash(&format!("{}x", password), &hash).unwrap());
}

#[test]
fn test_hashes_are_salted() {
    let a = PasswordHelper::generate_hash("same", MIN_COST).unwrap();
    let b = PasswordHelper::generate_hash("same", MIN_COST).unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_hash_records_cost() {
    let hash = PasswordHelper::generate_hash("pw", 5).unwrap();
    assert!(hash.contains("$05$"));
}

#[test]
fn test_custom_random_string() {
    let s = PasswordHelper::generate_random_string(32, "0123456789abcdef").unwrap();
    assert_eq!(s.len(), 32);
    assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn test_policy_builder() {
    let policy = PasswordPolicy::default().length(4, 6).min_pattern_matches(2);

    assert!(check_password_complexity("ab12", &policy).unwrap());
    assert!(!check_password_complexity("abcd", &policy).unwrap());
    assert!(!check_password_complexity("ab12345", &policy).unwrap());
}
