use std::fs;

use skucheck_config::{
    AIRTABLE_TOKEN_SECRET, ConfigError, DRIVE_API_KEY_SECRET, JsonFileSecretStore, SecretProvider,
    apply_credentials, load, read_credential,
};

#[test]
fn environment_overrides_file_values() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("skucheck.json");
    fs::write(
        &path,
        r#"{
            "record_store": { "base_id": "appFromFile", "product_table": "tblFile" },
            "storage": { "api_url": "http://127.0.0.1:9000", "page_size": 20 },
            "http": { "timeout_secs": 3 }
        }"#,
    )?;

    let config = load(Some(&path), |name| match name {
        "SKUCHECK_AIRTABLE_BASE_ID" => Some("appFromEnv".to_string()),
        "SKUCHECK_DRIVE_PAGE_SIZE" => Some("5".to_string()),
        _ => None,
    })?;

    assert_eq!(config.record_store.base_id, "appFromEnv");
    assert_eq!(config.record_store.product_table, "tblFile");
    assert_eq!(config.storage.api_url.as_str(), "http://127.0.0.1:9000/");
    assert_eq!(config.storage.page_size, 5);
    assert_eq!(config.http.timeout_secs, 3);
    Ok(())
}

#[test]
fn unreadable_and_malformed_files_are_reported() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let missing = dir.path().join("absent.json");
    assert!(matches!(
        load(Some(&missing), |_| None),
        Err(ConfigError::Io { .. })
    ));

    let malformed = dir.path().join("bad.json");
    fs::write(&malformed, r#"{"storage": {"page_size": "many"}}"#)?;
    assert!(matches!(
        load(Some(&malformed), |_| None),
        Err(ConfigError::Json { .. })
    ));
    Ok(())
}

#[test]
fn out_of_range_page_size_is_rejected() {
    let result = load(None, |name| {
        (name == "SKUCHECK_DRIVE_PAGE_SIZE").then(|| "0".to_string())
    });
    assert!(matches!(
        result,
        Err(ConfigError::InvalidField {
            field: "storage.page_size",
            ..
        })
    ));
}

#[test]
fn credentials_survive_reopening_the_store() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("secrets.json");

    let store = JsonFileSecretStore::new(&path);
    apply_credentials(&store, "patExample.123", Some("AIzaKey"))?;

    let reopened = JsonFileSecretStore::new(&path);
    assert_eq!(
        read_credential(&reopened, AIRTABLE_TOKEN_SECRET).as_deref(),
        Some("patExample.123")
    );
    assert_eq!(
        read_credential(&reopened, DRIVE_API_KEY_SECRET).as_deref(),
        Some("AIzaKey")
    );

    apply_credentials(&reopened, "patExample.123", None)?;
    assert_eq!(store.get(DRIVE_API_KEY_SECRET), None);
    Ok(())
}
