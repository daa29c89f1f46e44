//! Tests for the credential verifier.

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{MockPasswordHashVerifier, PasswordHashError};
use rstest::{fixture, rstest};

const ALICE_HASH: &str = "$2b$04$stored-alice-hash";
const DUMMY_HASH: &str = "$2b$04$timing-dummy-hash";

#[fixture]
fn directory() -> UserDirectory {
    UserDirectory::new(vec![
        UserRecord::new("alice", Some(ALICE_HASH.to_owned())),
        UserRecord::new("bob", None),
        UserRecord::new("alice", Some("$2b$04$shadowed".to_owned())),
    ])
}

fn verifier(
    directory: Result<UserDirectory, UserDirectoryError>,
    hashes: MockPasswordHashVerifier,
) -> CredentialVerifier<MockPasswordHashVerifier> {
    CredentialVerifier::new(directory, Arc::new(hashes))
}

fn matching_hasher(expected_password: &'static str) -> MockPasswordHashVerifier {
    let mut hashes = MockPasswordHashVerifier::new();
    hashes
        .expect_verify()
        .withf(|_, stored| stored == ALICE_HASH)
        .times(1)
        .returning(move |password, _| Ok(password == expected_password));
    hashes
}

#[rstest]
#[tokio::test]
async fn accepts_matching_password(directory: UserDirectory) {
    let verifier = verifier(Ok(directory), matching_hasher("secret"));
    assert_eq!(
        verifier.verify("alice", "secret").await,
        VerificationOutcome::Accepted
    );
}

#[rstest]
#[tokio::test]
async fn rejects_wrong_password(directory: UserDirectory) {
    let verifier = verifier(Ok(directory), matching_hasher("secret"));
    assert_eq!(
        verifier.verify("alice", "wrong").await,
        VerificationOutcome::Rejected
    );
}

#[rstest]
#[case("mallory")]
#[case("ALICE")]
#[case("bob")]
#[tokio::test]
async fn rejects_without_comparison_when_no_hash_is_known(
    directory: UserDirectory,
    #[case] username: &str,
) {
    let mut hashes = MockPasswordHashVerifier::new();
    hashes.expect_verify().never();
    let verifier = verifier(Ok(directory), hashes);

    assert_eq!(
        verifier.verify(username, "secret").await,
        VerificationOutcome::Rejected
    );
}

#[rstest]
#[case("", "secret", LoginValidationError::EmptyUsername)]
#[case("alice", "", LoginValidationError::EmptyPassword)]
#[tokio::test]
async fn missing_fields_are_malformed_even_without_configuration(
    #[case] username: &str,
    #[case] password: &str,
    #[case] expected: LoginValidationError,
) {
    let mut hashes = MockPasswordHashVerifier::new();
    hashes.expect_verify().never();
    let verifier = verifier(Err(UserDirectoryError::Missing), hashes);

    assert_eq!(
        verifier.verify(username, password).await,
        VerificationOutcome::MalformedRequest(expected)
    );
}

#[rstest]
#[case(UserDirectoryError::Missing)]
#[case(UserDirectoryError::Malformed { message: "expected array".into() })]
#[tokio::test]
async fn unusable_directory_is_a_configuration_error(#[case] failure: UserDirectoryError) {
    let mut hashes = MockPasswordHashVerifier::new();
    hashes.expect_verify().never();
    let verifier = verifier(Err(failure), hashes);

    assert!(matches!(
        verifier.verify("alice", "secret").await,
        VerificationOutcome::ConfigurationError(_)
    ));
}

#[rstest]
#[case(PasswordHashError::unsupported_scheme("md5"))]
#[case(PasswordHashError::malformed_hash("invalid salt length"))]
#[tokio::test]
async fn incomparable_stored_hash_is_rejected(
    directory: UserDirectory,
    #[case] failure: PasswordHashError,
) {
    let mut hashes = MockPasswordHashVerifier::new();
    hashes
        .expect_verify()
        .times(1)
        .returning(move |_, _| Err(failure.clone()));
    let verifier = verifier(Ok(directory), hashes);

    assert_eq!(
        verifier.verify("alice", "secret").await,
        VerificationOutcome::Rejected
    );
}

#[rstest]
#[tokio::test]
async fn failed_comparison_worker_is_a_configuration_error(directory: UserDirectory) {
    let mut hashes = MockPasswordHashVerifier::new();
    hashes
        .expect_verify()
        .times(1)
        .returning(|_, _| Err(PasswordHashError::worker("task panicked")));
    let verifier = verifier(Ok(directory), hashes);

    assert!(matches!(
        verifier.verify("alice", "secret").await,
        VerificationOutcome::ConfigurationError(_)
    ));
}

#[rstest]
#[tokio::test]
async fn timing_dummy_is_compared_for_unknown_users(directory: UserDirectory) {
    let mut hashes = MockPasswordHashVerifier::new();
    hashes
        .expect_verify()
        .withf(|_, stored| stored == DUMMY_HASH)
        .times(1)
        .returning(|_, _| Ok(true));
    let verifier =
        verifier(Ok(directory), hashes).with_timing_dummy(DUMMY_HASH.to_owned());

    assert_eq!(
        verifier.verify("mallory", "secret").await,
        VerificationOutcome::Rejected,
        "a dummy match must never authenticate"
    );
}

#[rstest]
#[tokio::test]
async fn authenticate_hides_which_check_failed(directory: UserDirectory) {
    let mut hashes = MockPasswordHashVerifier::new();
    hashes
        .expect_verify()
        .times(1)
        .returning(|_, _| Ok(false));
    let verifier = verifier(Ok(directory), hashes);

    let unknown = LoginCredentials::try_from_parts("mallory", "secret").expect("shape");
    let wrong = LoginCredentials::try_from_parts("alice", "wrong").expect("shape");
    let unknown_err = verifier.authenticate(&unknown).await.expect_err("unknown user");
    let wrong_err = verifier.authenticate(&wrong).await.expect_err("wrong password");

    assert_eq!(unknown_err.code(), ErrorCode::Unauthorized);
    assert_eq!(unknown_err, wrong_err);
    assert_eq!(unknown_err.message(), REJECTED_MESSAGE);
}

#[rstest]
#[tokio::test]
async fn authenticate_maps_configuration_errors_to_internal() {
    let mut hashes = MockPasswordHashVerifier::new();
    hashes.expect_verify().never();
    let verifier = verifier(Err(UserDirectoryError::Missing), hashes);

    let credentials = LoginCredentials::try_from_parts("alice", "secret").expect("shape");
    let error = verifier.authenticate(&credentials).await.expect_err("misconfigured");

    assert_eq!(error.code(), ErrorCode::InternalError);
}

#[test]
fn validation_errors_name_the_field() {
    let error = login_validation_error(&LoginValidationError::EmptyPassword);
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    let details = error.details().expect("details");
    assert_eq!(details.get("field").and_then(|v| v.as_str()), Some("password"));
}
