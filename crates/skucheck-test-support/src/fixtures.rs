//! Wire bodies, typed records, and configuration for tests.

use std::sync::Arc;

use serde_json::{Value, json};
use skucheck_config::{
    AIRTABLE_TOKEN_SECRET, ConfigOverrides, ConfigResult, DRIVE_API_KEY_SECRET, MemorySecretStore,
    RecordStoreOverrides, SkuCheckConfig, StorageOverrides,
};
use skucheck_core::{LinkedRecord, ProductRecord, RemoteFile};

/// Record store token accepted by credential validation.
pub const TEST_TOKEN: &str = "patTestToken.0001";
/// Storage API key.
pub const TEST_API_KEY: &str = "AIzaTestKey";
/// Base id used by mock record stores.
pub const TEST_BASE: &str = "appTestBase";
/// Product table id used by mock record stores.
pub const TEST_PRODUCT_TABLE: &str = "tblProducts";
/// Linked table id used by mock record stores.
pub const TEST_LINKED_TABLE: &str = "tblRawData";

/// Configuration pointing both adapters at local mock servers.
///
/// # Errors
///
/// Returns an error when either URL fails validation.
pub fn config_for(record_store_url: &str, storage_url: &str) -> ConfigResult<SkuCheckConfig> {
    ConfigOverrides {
        record_store: RecordStoreOverrides {
            api_url: Some(record_store_url.to_string()),
            base_id: Some(TEST_BASE.to_string()),
            product_table: Some(TEST_PRODUCT_TABLE.to_string()),
            linked_table: Some(TEST_LINKED_TABLE.to_string()),
        },
        storage: StorageOverrides {
            api_url: Some(storage_url.to_string()),
            page_size: None,
        },
        ..ConfigOverrides::default()
    }
    .resolve()
}

/// Secret store holding both test credentials.
#[must_use]
pub fn credentials() -> Arc<MemorySecretStore> {
    Arc::new(MemorySecretStore::with_entries([
        (AIRTABLE_TOKEN_SECRET, TEST_TOKEN),
        (DRIVE_API_KEY_SECRET, TEST_API_KEY),
    ]))
}

/// Product record document as returned by the record store.
#[must_use]
pub fn product_json(id: &str, fields: Value) -> Value {
    json!({
        "id": id,
        "createdTime": "2024-05-01T09:30:00.000Z",
        "fields": fields,
    })
}

/// Product fields with a direct folder and both expected photos.
#[must_use]
pub fn product_fields(sku: &str, folder_id: &str, front: &str, back: &str) -> Value {
    json!({
        "SKU": sku,
        "Product_Status": "Ready",
        "AI_Status": "AI_DONE",
        "AI_Quality_Check": "Approved",
        "Listing_Status": "Published",
        "Brand_TXT": "Acme",
        "Category": "Shoes",
        "Size (INT)": 42,
        "Colors": ["Red", "Black"],
        "RAW_FolderID": folder_id,
        "rawID_FRONT": front,
        "rawID_BACK": [back],
    })
}

/// List envelope for product lookups.
#[must_use]
pub fn list_body(records: &[Value]) -> Value {
    json!({ "records": records })
}

/// Linked raw-data record document.
#[must_use]
pub fn linked_json(id: &str, folder_id: &str) -> Value {
    json!({
        "id": id,
        "createdTime": "2024-05-01T09:30:00.000Z",
        "fields": {
            "Folder_ID": [folder_id],
            "Folder_Link": format!("https://drive.google.com/drive/folders/{folder_id}"),
            "Photo_Count": 2,
        },
    })
}

/// One storage file document.
#[must_use]
pub fn drive_file_json(id: &str, name: &str, mime_type: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "mimeType": mime_type,
        "size": "204800",
        "thumbnailLink": format!("https://lh3.googleusercontent.com/{id}=s220"),
    })
}

/// Storage listing envelope.
#[must_use]
pub fn drive_list_body(files: &[Value]) -> Value {
    json!({ "files": files })
}

/// Storage error document carrying a structured reason.
#[must_use]
pub fn drive_error_body(code: u16, reason: &str) -> Value {
    json!({
        "error": {
            "code": code,
            "message": format!("request failed: {reason}"),
            "errors": [{ "domain": "global", "reason": reason, "message": reason }],
        }
    })
}

/// Typed product record.
///
/// # Errors
///
/// Returns an error when `fields` does not decode as product columns.
pub fn product_record(id: &str, fields: Value) -> serde_json::Result<ProductRecord> {
    serde_json::from_value(product_json(id, fields))
}

/// Typed linked record.
///
/// # Errors
///
/// Returns an error when the document does not decode.
pub fn linked_record(id: &str, folder_id: &str) -> serde_json::Result<LinkedRecord> {
    serde_json::from_value(linked_json(id, folder_id))
}

/// JPEG file with the given id and name.
#[must_use]
pub fn image(id: &str, name: &str) -> RemoteFile {
    RemoteFile {
        id: id.to_string(),
        name: name.to_string(),
        mime_type: "image/jpeg".to_string(),
        size: Some(204_800),
        thumbnail_link: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_decode_into_domain_types() -> anyhow::Result<()> {
        let record = product_record("recA", product_fields("MF-2411", "F1", "fr", "bk"))?;
        assert_eq!(record.direct_folder_id(), Some("F1"));
        assert_eq!(record.back_file_id(), Some("bk"));

        let linked = linked_record("recRaw", "F123")?;
        assert_eq!(linked.folder_id().as_deref(), Some("F123"));
        Ok(())
    }

    #[test]
    fn config_targets_mock_servers() -> anyhow::Result<()> {
        let config = config_for("http://127.0.0.1:1234", "http://127.0.0.1:5678")?;
        assert_eq!(config.record_store.base_id, TEST_BASE);
        assert_eq!(config.storage.api_url.port(), Some(5678));
        Ok(())
    }
}
