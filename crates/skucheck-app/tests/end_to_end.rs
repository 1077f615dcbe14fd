use std::sync::Arc;

use httpmock::prelude::*;
use serde_json::json;
use skucheck_app::{SearchFailure, SearchPipeline, build_pipeline};
use skucheck_core::{
    Degradation, EnumerationError, MissingTarget, RecordStoreError, Verdict,
};
use skucheck_test_support::fixtures::{
    TEST_BASE, TEST_LINKED_TABLE, TEST_PRODUCT_TABLE, config_for, credentials, drive_error_body,
    drive_file_json, drive_list_body, linked_json, list_body, product_fields, product_json,
};

const FILES_PATH: &str = "/drive/v3/files";

fn products_path() -> String {
    format!("/{TEST_BASE}/{TEST_PRODUCT_TABLE}")
}

fn pipeline_for(records: &MockServer, storage: &MockServer) -> anyhow::Result<SearchPipeline> {
    let config = config_for(&records.base_url(), &storage.base_url())?;
    Ok(build_pipeline(&config, credentials())?)
}

#[tokio::test]
async fn both_photos_verified_through_real_clients() -> anyhow::Result<()> {
    let records = MockServer::start_async().await;
    let storage = MockServer::start_async().await;
    records.mock(|when, then| {
        when.method(GET)
            .path(products_path())
            .query_param("filterByFormula", "{SKU}='MF-2411'");
        then.status(200).json_body(list_body(&[product_json(
            "recA",
            product_fields("MF-2411", "F1", "fr", "bk"),
        )]));
    });
    let listing = storage.mock(|when, then| {
        when.method(GET).path(FILES_PATH);
        then.status(200).json_body(drive_list_body(&[
            drive_file_json("fr", "front.jpg", "image/jpeg"),
            drive_file_json("bk", "back.jpg", "image/jpeg"),
        ]));
    });

    let result = pipeline_for(&records, &storage)?.run("mf-2411").await?;

    listing.assert();
    assert_eq!(result.front(), Verdict::Verified);
    assert_eq!(result.back(), Verdict::Verified);
    assert_eq!(result.degradation(), None);
    let names: Vec<&str> = result
        .files()
        .unwrap_or_default()
        .iter()
        .map(|file| file.name.as_str())
        .collect();
    assert_eq!(names, ["back.jpg", "front.jpg"]);
    Ok(())
}

#[tokio::test]
async fn linked_record_supplies_the_folder() -> anyhow::Result<()> {
    let records = MockServer::start_async().await;
    let storage = MockServer::start_async().await;
    records.mock(|when, then| {
        when.method(GET).path(products_path());
        then.status(200).json_body(list_body(&[product_json(
            "recA",
            json!({ "SKU": "MF-2411", "RAW": ["recRaw"], "rawID_FRONT": "fr" }),
        )]));
    });
    let linked = records.mock(|when, then| {
        when.method(GET)
            .path(format!("/{TEST_BASE}/{TEST_LINKED_TABLE}/recRaw"));
        then.status(200).json_body(linked_json("recRaw", "F123"));
    });
    storage.mock(|when, then| {
        when.method(GET).path(FILES_PATH).query_param(
            "q",
            "'F123' in parents and mimeType contains 'image' and trashed = false",
        );
        then.status(200)
            .json_body(drive_list_body(&[drive_file_json("fr", "front.jpg", "image/jpeg")]));
    });

    let result = pipeline_for(&records, &storage)?.run("MF-2411").await?;

    linked.assert();
    assert_eq!(result.folder(), Some("F123"));
    assert_eq!(result.front(), Verdict::Verified);
    assert_eq!(result.back(), Verdict::Missing);
    Ok(())
}

#[tokio::test]
async fn access_denied_degrades_but_keeps_the_record() -> anyhow::Result<()> {
    let records = MockServer::start_async().await;
    let storage = MockServer::start_async().await;
    records.mock(|when, then| {
        when.method(GET).path(products_path());
        then.status(200).json_body(list_body(&[product_json(
            "recA",
            product_fields("MF-2411", "F1", "fr", "bk"),
        )]));
    });
    storage.mock(|when, then| {
        when.method(GET).path(FILES_PATH);
        then.status(403).json_body(drive_error_body(403, "forbidden"));
    });

    let result = pipeline_for(&records, &storage)?.run("MF-2411").await?;

    assert_eq!(result.record().id, "recA");
    assert_eq!(result.files(), None);
    assert_eq!(result.front(), Verdict::Unverifiable);
    assert_eq!(result.back(), Verdict::Unverifiable);
    assert_eq!(
        result.degradation(),
        Some(&Degradation::Enumeration {
            error: EnumerationError::AccessDenied {
                reason: Some("forbidden".to_string())
            }
        })
    );
    Ok(())
}

#[tokio::test]
async fn unknown_sku_is_fatal_and_skips_storage() -> anyhow::Result<()> {
    let records = MockServer::start_async().await;
    let storage = MockServer::start_async().await;
    records.mock(|when, then| {
        when.method(GET).path(products_path());
        then.status(200).json_body(json!({ "records": [] }));
    });

    let result = pipeline_for(&records, &storage)?.run("MF-9999").await;

    assert_eq!(
        result,
        Err(SearchFailure::Fatal {
            source: RecordStoreError::NotFound {
                target: MissingTarget::Sku("MF-9999".to_string())
            }
        })
    );
    Ok(())
}

#[tokio::test]
async fn identical_backends_give_identical_results() -> anyhow::Result<()> {
    let records = MockServer::start_async().await;
    let storage = MockServer::start_async().await;
    records.mock(|when, then| {
        when.method(GET).path(products_path());
        then.status(200).json_body(list_body(&[product_json(
            "recA",
            product_fields("MF-2411", "F1", "fr", "bk"),
        )]));
    });
    storage.mock(|when, then| {
        when.method(GET).path(FILES_PATH);
        then.status(200)
            .json_body(drive_list_body(&[drive_file_json("fr", "front.jpg", "image/jpeg")]));
    });
    let pipeline = Arc::new(pipeline_for(&records, &storage)?);

    let first = pipeline.run("MF-2411").await?;
    let second = pipeline.run("MF-2411").await?;

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_value(&first)?,
        serde_json::to_value(&second)?
    );
    Ok(())
}
