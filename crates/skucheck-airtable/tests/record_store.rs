use std::sync::Arc;
use std::time::Duration;

use httpmock::prelude::*;
use serde_json::json;
use skucheck_airtable::AirtableClient;
use skucheck_config::{AIRTABLE_TOKEN_SECRET, MemorySecretStore};
use skucheck_core::{MissingTarget, RecordStore, RecordStoreError, normalize};
use skucheck_test_support::fixtures::{
    TEST_BASE, TEST_LINKED_TABLE, TEST_PRODUCT_TABLE, TEST_TOKEN, config_for, credentials,
    linked_json, list_body, product_fields, product_json,
};

fn client_for(server: &MockServer) -> anyhow::Result<AirtableClient> {
    let config = config_for(&server.base_url(), "http://127.0.0.1:9")?;
    Ok(AirtableClient::new(
        config.record_store,
        Duration::from_secs(5),
        credentials(),
    )?)
}

fn products_path() -> String {
    format!("/{TEST_BASE}/{TEST_PRODUCT_TABLE}")
}

#[tokio::test]
async fn fetch_by_sku_returns_first_matching_record() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path(products_path())
            .query_param("filterByFormula", "{SKU}='MF-2411'")
            .query_param("fields[]", "RAW_FolderID")
            .header("authorization", format!("Bearer {TEST_TOKEN}"));
        then.status(200).json_body(list_body(&[
            product_json("recFirst", product_fields("MF-2411", "F1", "fr", "bk")),
            product_json("recSecond", product_fields("MF-2411", "F2", "fr", "bk")),
        ]));
    });

    let record = client_for(&server)?
        .fetch_by_sku(&normalize(" mf-2411 ")?)
        .await?;

    mock.assert();
    assert_eq!(record.id, "recFirst");
    assert_eq!(record.direct_folder_id(), Some("F1"));
    Ok(())
}

#[tokio::test]
async fn empty_result_is_sku_not_found() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path(products_path());
        then.status(200).json_body(json!({ "records": [] }));
    });

    let result = client_for(&server)?
        .fetch_by_sku(&normalize("MF-9999")?)
        .await;
    assert_eq!(
        result,
        Err(RecordStoreError::NotFound {
            target: MissingTarget::Sku("MF-9999".to_string())
        })
    );
    Ok(())
}

#[tokio::test]
async fn http_statuses_map_to_record_store_errors() -> anyhow::Result<()> {
    let cases = [
        (401, RecordStoreError::Unauthorized),
        (
            404,
            RecordStoreError::NotFound {
                target: MissingTarget::Table,
            },
        ),
        (429, RecordStoreError::RateLimited),
    ];
    for (status, expected) in cases {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path(products_path());
            then.status(status).json_body(json!({ "error": "nope" }));
        });
        let result = client_for(&server)?
            .fetch_by_sku(&normalize("MF-2411")?)
            .await;
        assert_eq!(result, Err(expected));
    }

    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path(products_path());
        then.status(503);
    });
    let result = client_for(&server)?
        .fetch_by_sku(&normalize("MF-2411")?)
        .await;
    assert!(matches!(
        result,
        Err(RecordStoreError::TransportError {
            status: Some(503),
            ..
        })
    ));
    Ok(())
}

#[tokio::test]
async fn undecodable_body_is_transport_error() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path(products_path());
        then.status(200).body("not json");
    });
    let result = client_for(&server)?
        .fetch_by_sku(&normalize("MF-2411")?)
        .await;
    assert!(matches!(
        result,
        Err(RecordStoreError::TransportError {
            status: Some(200),
            ..
        })
    ));
    Ok(())
}

#[tokio::test]
async fn fetch_linked_reads_folder_id() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path(format!("/{TEST_BASE}/{TEST_LINKED_TABLE}/recRaw"))
            .query_param("fields[]", "Folder_ID");
        then.status(200).json_body(linked_json("recRaw", "F123"));
    });

    let linked = client_for(&server)?.fetch_linked("recRaw").await;

    mock.assert();
    assert_eq!(
        linked.and_then(|record| record.folder_id()).as_deref(),
        Some("F123")
    );
    Ok(())
}

#[tokio::test]
async fn odd_id_column_values_do_not_fail_the_fetch() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let mut fields = product_fields("MF-2411", "F1", "fr", "bk");
    fields["rawID_FRONT"] = json!({ "error": "#ERROR!" });
    fields["RAW_FolderID"] = json!([12345]);
    server.mock(|when, then| {
        when.method(GET).path(products_path());
        then.status(200)
            .json_body(list_body(&[product_json("recOdd", fields)]));
    });

    let record = client_for(&server)?
        .fetch_by_sku(&normalize("MF-2411")?)
        .await?;

    assert_eq!(record.id, "recOdd");
    assert_eq!(record.front_file_id(), None);
    assert_eq!(record.direct_folder_id(), None);
    assert_eq!(record.back_file_id(), Some("bk"));
    Ok(())
}

#[tokio::test]
async fn linked_folder_link_stands_in_for_missing_folder_id() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET)
            .path(format!("/{TEST_BASE}/{TEST_LINKED_TABLE}/recRaw"));
        then.status(200).json_body(json!({
            "id": "recRaw",
            "fields": { "Folder_Link": "https://drive.google.com/drive/folders/0BxYz-folder_01" }
        }));
    });

    let linked = client_for(&server)?.fetch_linked("recRaw").await;

    assert_eq!(
        linked.and_then(|record| record.folder_id()).as_deref(),
        Some("0BxYz-folder_01")
    );
    Ok(())
}

#[tokio::test]
async fn fetch_linked_swallows_failures() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET)
            .path(format!("/{TEST_BASE}/{TEST_LINKED_TABLE}/recGone"));
        then.status(404);
    });
    let client = client_for(&server)?;
    assert_eq!(client.fetch_linked("recGone").await, None);
    assert_eq!(client.fetch_linked("").await, None);
    Ok(())
}

#[tokio::test]
async fn missing_token_is_reported_before_contacting_the_store() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let config = config_for(&server.base_url(), "http://127.0.0.1:9")?;
    let secrets = Arc::new(MemorySecretStore::with_entries([(AIRTABLE_TOKEN_SECRET, " ")]));
    let client = AirtableClient::new(config.record_store, Duration::from_secs(5), secrets)?;

    let result = client.fetch_by_sku(&normalize("MF-2411")?).await;
    assert_eq!(result, Err(RecordStoreError::CredentialMissing));
    Ok(())
}
