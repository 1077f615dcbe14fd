use anyhow::anyhow;
use skucheck_app::{SearchFailure, SearchPipeline, build_pipeline, load_config};

use crate::cli::{LookupArgs, OutputFormat};
use crate::client::{CliContext, CliError, CliResult};
use crate::output::format_result;

pub(crate) fn pipeline_for(ctx: &CliContext) -> CliResult<SearchPipeline> {
    let config = load_config(ctx.config_path()).map_err(CliError::failure)?;
    build_pipeline(&config, ctx.credentials()).map_err(CliError::failure)
}

pub(crate) async fn handle_lookup(ctx: &CliContext, args: LookupArgs) -> CliResult<()> {
    let pipeline = pipeline_for(ctx)?;
    let text = lookup(&pipeline, &args.sku, ctx.output).await?;
    println!("{text}");
    Ok(())
}

async fn lookup(pipeline: &SearchPipeline, sku: &str, format: OutputFormat) -> CliResult<String> {
    match pipeline.run(sku).await {
        Ok(result) => format_result(&result, format),
        Err(SearchFailure::Fatal { source }) => Err(CliError::from_search(&source)),
        Err(SearchFailure::Superseded { generation }) => Err(CliError::failure(anyhow!(
            "search {generation} was superseded"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;
    use skucheck_test_support::fixtures::{
        TEST_BASE, TEST_PRODUCT_TABLE, config_for, credentials, drive_file_json, drive_list_body,
        list_body, product_fields, product_json,
    };

    #[tokio::test]
    async fn lookup_renders_verified_result() -> anyhow::Result<()> {
        let records = MockServer::start_async().await;
        let storage = MockServer::start_async().await;
        records.mock(|when, then| {
            when.method(GET)
                .path(format!("/{TEST_BASE}/{TEST_PRODUCT_TABLE}"));
            then.status(200).json_body(list_body(&[product_json(
                "recA",
                product_fields("MF-2411", "F1", "fr", "bk"),
            )]));
        });
        storage.mock(|when, then| {
            when.method(GET).path("/drive/v3/files");
            then.status(200).json_body(drive_list_body(&[
                drive_file_json("fr", "front.jpg", "image/jpeg"),
                drive_file_json("bk", "back.jpg", "image/jpeg"),
            ]));
        });
        let config = config_for(&records.base_url(), &storage.base_url())?;
        let pipeline = build_pipeline(&config, credentials())?;

        let text = lookup(&pipeline, "mf-2411", OutputFormat::Table).await?;

        assert!(text.contains("front: verified (fr)"));
        assert!(text.contains("back: verified (bk)"));
        Ok(())
    }

    #[tokio::test]
    async fn missing_sku_exits_with_failure() -> anyhow::Result<()> {
        let records = MockServer::start_async().await;
        let storage = MockServer::start_async().await;
        records.mock(|when, then| {
            when.method(GET)
                .path(format!("/{TEST_BASE}/{TEST_PRODUCT_TABLE}"));
            then.status(200).json_body(json!({ "records": [] }));
        });
        let config = config_for(&records.base_url(), &storage.base_url())?;
        let pipeline = build_pipeline(&config, credentials())?;

        let err = lookup(&pipeline, "MF-9999", OutputFormat::Json)
            .await
            .err()
            .ok_or_else(|| anyhow!("lookup should fail"))?;

        assert_eq!(err.exit_code(), 3);
        assert!(err.display_message().contains("MF-9999"));
        Ok(())
    }

    #[tokio::test]
    async fn invalid_sku_is_a_validation_error() -> anyhow::Result<()> {
        let config = config_for("http://127.0.0.1:9", "http://127.0.0.1:9")?;
        let pipeline = build_pipeline(&config, credentials())?;

        let err = lookup(&pipeline, "not a sku", OutputFormat::Table)
            .await
            .err()
            .ok_or_else(|| anyhow!("lookup should fail"))?;

        assert_eq!(err.exit_code(), 2);
        Ok(())
    }
}
