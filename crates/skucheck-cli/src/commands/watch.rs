use std::sync::Arc;

use anyhow::anyhow;
use skucheck_app::{SearchController, SearchDisposition};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::client::{CliContext, CliError, CliResult};
use crate::commands::lookup::pipeline_for;
use crate::output::TerminalPresenter;

pub(crate) async fn handle_watch(ctx: &CliContext) -> CliResult<()> {
    let pipeline = Arc::new(pipeline_for(ctx)?);
    let presenter = Arc::new(TerminalPresenter::new(ctx.output));
    let controller = SearchController::new(pipeline, presenter);
    let stdin = BufReader::new(tokio::io::stdin());
    watch_lines(&controller, stdin).await?;
    Ok(())
}

/// Start a search for every non-blank line. Returns how many searches were
/// applied once input ends and all of them have settled.
async fn watch_lines(
    controller: &SearchController,
    input: impl AsyncBufRead + Unpin,
) -> CliResult<usize> {
    let mut lines = input.lines();
    let mut pending: Vec<JoinHandle<SearchDisposition>> = Vec::new();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|err| CliError::failure(anyhow!("failed to read stdin: {err}")))?
    {
        let sku = line.trim();
        if sku.is_empty() {
            continue;
        }
        pending.retain(|handle| !handle.is_finished());
        pending.push(controller.spawn(sku));
    }

    let mut applied = 0;
    for handle in pending {
        let disposition = handle
            .await
            .map_err(|err| CliError::failure(anyhow!("search task failed: {err}")))?;
        debug!(?disposition, "search settled");
        if disposition == SearchDisposition::Applied {
            applied += 1;
        }
    }
    Ok(applied)
}
