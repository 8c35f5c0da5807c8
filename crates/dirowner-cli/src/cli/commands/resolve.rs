//! `resolve <PATH>...` - extract and resolve in one process.

use anyhow::Result;
use dirowner::{single_stage, DirectoryClient};
use tracing::debug;

use super::Context;
use crate::output;

pub async fn execute(ctx: Context, paths: Vec<String>) -> Result<()> {
    let extractor = ctx.extractor()?;
    let mut resolver = ctx.resolver().await?;

    let report = single_stage(&extractor, &mut resolver, &paths).await?;
    output::write_json(&report, ctx.output_style)?;

    disconnect(resolver.into_inner()).await;
    Ok(())
}

/// Unbind once the report is out; a failure here cannot change the result.
pub(super) async fn disconnect(client: DirectoryClient) {
    if let Err(e) = client.unbind().await {
        debug!(error = %e, "unbind failed");
    }
}
