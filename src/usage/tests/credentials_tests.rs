use super::*;
use serial_test::serial;
use std::time::Instant;
use tempfile::TempDir;

const VALID_PAYLOAD: &str = r#"{
    "claudeAiOauth": {
        "accessToken": "sk-ant-oat01-abc",
        "refreshToken": "sk-ant-ort01-def",
        "expiresAt": 4102444800000,
        "scopes": ["user:inference", "user:profile"],
        "subscriptionType": "max"
    },
    "organizationUuid": "7f1c9a7e-0000-4000-8000-000000000001"
}"#;

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_parse_credentials_valid() {
    let creds = parse_credentials(VALID_PAYLOAD).unwrap();
    assert_eq!(creds.access_token, "sk-ant-oat01-abc");
    assert_eq!(creds.refresh_token.as_deref(), Some("sk-ant-ort01-def"));
    assert_eq!(creds.expires_at, Some(4_102_444_800_000));
    assert_eq!(creds.subscription_type.as_deref(), Some("max"));
    assert_eq!(
        creds.organization_id.as_deref(),
        Some("7f1c9a7e-0000-4000-8000-000000000001")
    );
}

#[test]
fn test_parse_credentials_trims_trailing_newline() {
    let payload = format!("{}\n", VALID_PAYLOAD);
    assert!(parse_credentials(&payload).is_some());
}

#[test]
fn test_parse_credentials_rejects_unusable_payloads() {
    assert!(parse_credentials("not json").is_none());
    assert!(parse_credentials("").is_none());
    assert!(parse_credentials(r#"{"organizationUuid": "x"}"#).is_none());
    assert!(parse_credentials(r#"{"claudeAiOauth": null}"#).is_none());
    assert!(parse_credentials(r#"{"claudeAiOauth": {"refreshToken": "r"}}"#).is_none());
    assert!(parse_credentials(r#"{"claudeAiOauth": {"accessToken": ""}}"#).is_none());
}

#[test]
fn test_parse_credentials_optional_fields_absent() {
    let creds = parse_credentials(r#"{"claudeAiOauth": {"accessToken": "tok"}}"#).unwrap();
    assert_eq!(creds.access_token, "tok");
    assert_eq!(creds.refresh_token, None);
    assert_eq!(creds.expires_at, None);
    assert_eq!(creds.organization_id, None);
}

#[tokio::test]
async fn test_locate_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, ".credentials.json", VALID_PAYLOAD);

    let locator = CredentialLocator::new(vec![CredentialSource::File(path)], LOOKUP_TIMEOUT);
    let creds = locator.locate().await.unwrap();
    assert_eq!(creds.access_token, "sk-ant-oat01-abc");
}

#[tokio::test]
async fn test_locate_missing_file_is_none() {
    let dir = TempDir::new().unwrap();
    let locator = CredentialLocator::new(
        vec![CredentialSource::File(dir.path().join("absent.json"))],
        LOOKUP_TIMEOUT,
    );
    assert!(locator.locate().await.is_none());
}

#[tokio::test]
async fn test_locate_invalid_json_is_none() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, ".credentials.json", "{ definitely not json");
    let locator = CredentialLocator::new(vec![CredentialSource::File(path)], LOOKUP_TIMEOUT);
    assert!(locator.locate().await.is_none());
}

#[tokio::test]
async fn test_locate_skips_expired_credentials() {
    let dir = TempDir::new().unwrap();
    let expired = write_file(
        &dir,
        "expired.json",
        r#"{"claudeAiOauth": {"accessToken": "old", "expiresAt": 1000}}"#,
    );
    let fresh = write_file(&dir, "fresh.json", VALID_PAYLOAD);

    let only_expired =
        CredentialLocator::new(vec![CredentialSource::File(expired.clone())], LOOKUP_TIMEOUT);
    assert!(only_expired.locate().await.is_none());

    let both = CredentialLocator::new(
        vec![CredentialSource::File(expired), CredentialSource::File(fresh)],
        LOOKUP_TIMEOUT,
    );
    assert_eq!(both.locate().await.unwrap().access_token, "sk-ant-oat01-abc");
}

#[tokio::test]
async fn test_locate_with_no_sources_is_none() {
    let locator = CredentialLocator::new(Vec::new(), LOOKUP_TIMEOUT);
    assert!(locator.locate().await.is_none());
}

#[test]
fn test_keychain_source_defaults() {
    assert_eq!(
        CredentialSource::keychain(),
        CredentialSource::Keychain {
            program: PathBuf::from("/usr/bin/security"),
            service: "Claude Code-credentials".to_string(),
        }
    );
}

#[cfg(unix)]
mod keychain {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    /// Writes a stand-in for `/usr/bin/security` that runs `body`.
    fn fake_security(dir: &TempDir, body: &str) -> PathBuf {
        let path = write_file(dir, "security", &format!("#!/bin/sh\n{}\n", body));
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn keychain_locator(program: PathBuf, timeout: Duration) -> CredentialLocator {
        CredentialLocator::new(
            vec![CredentialSource::Keychain {
                program,
                service: KEYCHAIN_SERVICE.to_string(),
            }],
            timeout,
        )
    }

    #[tokio::test]
    #[serial]
    async fn test_keychain_lookup_success() {
        let dir = TempDir::new().unwrap();
        let payload_path = write_file(&dir, "payload.json", VALID_PAYLOAD);
        let program = fake_security(&dir, &format!("cat '{}'", payload_path.display()));

        let creds = keychain_locator(program, LOOKUP_TIMEOUT)
            .locate()
            .await
            .unwrap();
        assert_eq!(creds.access_token, "sk-ant-oat01-abc");
    }

    #[tokio::test]
    #[serial]
    async fn test_keychain_receives_service_name() {
        let dir = TempDir::new().unwrap();
        let args_path = dir.path().join("args.txt");
        let payload_path = write_file(&dir, "payload.json", VALID_PAYLOAD);
        let program = fake_security(
            &dir,
            &format!(
                "echo \"$@\" > '{}'\ncat '{}'",
                args_path.display(),
                payload_path.display()
            ),
        );

        assert!(keychain_locator(program, LOOKUP_TIMEOUT)
            .locate()
            .await
            .is_some());
        let args = std::fs::read_to_string(&args_path).unwrap();
        assert_eq!(
            args.trim(),
            "find-generic-password -s Claude Code-credentials -w"
        );
    }

    #[tokio::test]
    #[serial]
    async fn test_keychain_missing_entry_is_none() {
        let dir = TempDir::new().unwrap();
        // `security` exits 44 when the item is not found
        let program = fake_security(&dir, "exit 44");
        assert!(keychain_locator(program, LOOKUP_TIMEOUT)
            .locate()
            .await
            .is_none());
    }

    #[tokio::test]
    #[serial]
    async fn test_keychain_timeout_is_none() {
        let dir = TempDir::new().unwrap();
        let program = fake_security(&dir, "sleep 10");

        let start = Instant::now();
        let result = keychain_locator(program, Duration::from_millis(200))
            .locate()
            .await;
        assert!(result.is_none());
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    #[serial]
    async fn test_keychain_program_missing_is_none() {
        let dir = TempDir::new().unwrap();
        let program = dir.path().join("no-such-security");
        assert!(keychain_locator(program, LOOKUP_TIMEOUT)
            .locate()
            .await
            .is_none());
    }

    #[tokio::test]
    #[serial]
    async fn test_falls_back_to_file_when_keychain_fails() {
        let dir = TempDir::new().unwrap();
        let program = fake_security(&dir, "exit 44");
        let file = write_file(&dir, ".credentials.json", VALID_PAYLOAD);

        let locator = CredentialLocator::new(
            vec![
                CredentialSource::Keychain {
                    program,
                    service: KEYCHAIN_SERVICE.to_string(),
                },
                CredentialSource::File(file),
            ],
            LOOKUP_TIMEOUT,
        );
        assert!(locator.locate().await.is_some());
    }
}

#[test]
#[serial]
fn test_platform_default_uses_claude_config_dir() {
    let dir = TempDir::new().unwrap();
    std::env::set_var("CLAUDE_CONFIG_DIR", dir.path());
    let locator = CredentialLocator::platform_default();
    std::env::remove_var("CLAUDE_CONFIG_DIR");

    assert_eq!(
        locator.sources().last(),
        Some(&CredentialSource::File(dir.path().join(".credentials.json")))
    );
    assert_eq!(
        locator.sources().contains(&CredentialSource::keychain()),
        cfg!(target_os = "macos")
    );
}
