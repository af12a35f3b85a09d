// Unit tests for the bcrypt password hasher

use calendar_backend::auth::password::PasswordHasher;

#[test]
fn test_hash_is_salted() {
    let hasher = PasswordHasher::with_cost(4).unwrap();

    let first = hasher.hash("hunter22").unwrap();
    let second = hasher.hash("hunter22").unwrap();

    assert_ne!(first, second, "Each hash should use a fresh salt");
    assert!(hasher.verify("hunter22", &first));
    assert!(hasher.verify("hunter22", &second));
}

#[test]
fn test_hash_does_not_contain_plaintext() {
    let hasher = PasswordHasher::with_cost(4).unwrap();
    let digest = hasher.hash("plaintext-password").unwrap();

    assert!(!digest.contains("plaintext-password"));
    assert!(digest.starts_with("$2"));
}

#[test]
fn test_verify_wrong_password() {
    let hasher = PasswordHasher::with_cost(4).unwrap();
    let digest = hasher.hash("right").unwrap();

    assert!(!hasher.verify("wrong", &digest));
}

#[test]
fn test_verify_malformed_digest_is_false() {
    let hasher = PasswordHasher::with_cost(4).unwrap();

    assert!(!hasher.verify("anything", "not-a-bcrypt-digest"));
    assert!(!hasher.verify("anything", ""));
}

#[test]
fn test_verify_dummy_always_false() {
    let hasher = PasswordHasher::with_cost(4).unwrap();

    assert!(!hasher.verify_dummy("calendar-backend-dummy-password"));
    assert!(!hasher.verify_dummy("whatever"));
}

#[test]
fn test_invalid_cost_rejected() {
    let result = PasswordHasher::with_cost(2);
    let err = result.err().unwrap();
    assert_eq!(err.status_code(), 500);
}
