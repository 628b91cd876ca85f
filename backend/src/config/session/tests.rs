//! Unit tests for session configuration parsing.

use std::collections::HashMap;
use std::io::Write;

use super::*;
use mockable::MockEnv;
use rstest::{fixture, rstest};
use tempfile::NamedTempFile;

fn key_file(len: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create key file");
    file.write_all(&vec![b'k'; len]).expect("write key bytes");
    file
}

fn env_from(vars: HashMap<&'static str, String>) -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |name| vars.get(name).cloned());
    env
}

fn path_of(file: &NamedTempFile) -> String {
    file.path().to_string_lossy().into_owned()
}

#[fixture]
fn good_key() -> NamedTempFile {
    key_file(SESSION_KEY_MIN_LEN)
}

fn release_vars(key: &NamedTempFile) -> HashMap<&'static str, String> {
    HashMap::from([
        (KEY_FILE_ENV, path_of(key)),
        (COOKIE_SECURE_ENV, "1".to_owned()),
        (SAMESITE_ENV, "Strict".to_owned()),
        (ALLOW_EPHEMERAL_ENV, "0".to_owned()),
    ])
}

fn release_error(vars: HashMap<&'static str, String>) -> SessionConfigError {
    match session_settings_from_env(&env_from(vars), BuildMode::Release) {
        Ok(_) => panic!("release settings should be rejected"),
        Err(error) => error,
    }
}

#[rstest]
fn release_accepts_complete_settings(good_key: NamedTempFile) {
    let settings = session_settings_from_env(&env_from(release_vars(&good_key)), BuildMode::Release)
        .expect("valid settings");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
    assert_eq!(settings.key_fingerprint().len(), 16);
}

#[rstest]
#[case(COOKIE_SECURE_ENV)]
#[case(SAMESITE_ENV)]
#[case(ALLOW_EPHEMERAL_ENV)]
fn release_requires_every_toggle(good_key: NamedTempFile, #[case] missing: &'static str) {
    let mut vars = release_vars(&good_key);
    vars.remove(missing);
    let err = release_error(vars);
    assert!(matches!(err, SessionConfigError::MissingEnv { name } if name == missing));
}

#[rstest]
#[case(COOKIE_SECURE_ENV, "maybe")]
#[case(ALLOW_EPHEMERAL_ENV, "")]
#[case(SAMESITE_ENV, "sometimes")]
fn release_rejects_malformed_values(
    good_key: NamedTempFile,
    #[case] name: &'static str,
    #[case] value: &str,
) {
    let mut vars = release_vars(&good_key);
    vars.insert(name, value.to_owned());
    let err = release_error(vars);
    assert!(matches!(err, SessionConfigError::InvalidEnv { name: got, .. } if got == name));
}

#[rstest]
fn release_rejects_ephemeral_keys(good_key: NamedTempFile) {
    let mut vars = release_vars(&good_key);
    vars.insert(ALLOW_EPHEMERAL_ENV, "yes".to_owned());
    assert!(matches!(
        release_error(vars),
        SessionConfigError::EphemeralNotAllowed
    ));
}

#[rstest]
fn release_rejects_missing_key_file(good_key: NamedTempFile) {
    let mut vars = release_vars(&good_key);
    vars.insert(KEY_FILE_ENV, "/nonexistent/session_key".to_owned());
    assert!(matches!(
        release_error(vars),
        SessionConfigError::KeyRead { .. }
    ));
}

#[rstest]
fn release_rejects_short_keys() {
    let short = key_file(32);
    let err = release_error(release_vars(&short));
    assert!(matches!(
        err,
        SessionConfigError::KeyTooShort { length: 32, min_len: SESSION_KEY_MIN_LEN, .. }
    ));
}

#[rstest]
fn release_rejects_insecure_same_site_none(good_key: NamedTempFile) {
    let mut vars = release_vars(&good_key);
    vars.insert(COOKIE_SECURE_ENV, "0".to_owned());
    vars.insert(SAMESITE_ENV, "None".to_owned());
    assert!(matches!(
        release_error(vars),
        SessionConfigError::InsecureSameSiteNone
    ));
}

#[rstest]
fn debug_falls_back_when_nothing_is_set() {
    let settings = session_settings_from_env(&env_from(HashMap::new()), BuildMode::Debug)
        .expect("debug defaults");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
fn debug_tolerates_short_keys_and_bad_values() {
    let short = key_file(10);
    let vars = HashMap::from([
        (KEY_FILE_ENV, path_of(&short)),
        (COOKIE_SECURE_ENV, "0".to_owned()),
        (SAMESITE_ENV, "whatever".to_owned()),
        (ALLOW_EPHEMERAL_ENV, "1".to_owned()),
    ]);
    let settings =
        session_settings_from_env(&env_from(vars), BuildMode::Debug).expect("debug fallback");
    assert!(!settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
fn fingerprint_tracks_key_material() {
    let first = Key::derive_from(&[b'a'; 64]);
    let second = Key::derive_from(&[b'b'; 64]);
    assert_eq!(key_fingerprint(&first), key_fingerprint(&first));
    assert_ne!(key_fingerprint(&first), key_fingerprint(&second));
    let fingerprint = key_fingerprint(&first);
    assert!(
        fingerprint
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
    );
}
