//! `resolve --uid-map <FILE|->` - resolution half of the two-stage topology.

use anyhow::Result;
use dirowner::{resolve_stage, UidMapSource};
use tracing::info;

use super::resolve::disconnect;
use super::Context;
use crate::output;

pub async fn execute(ctx: Context, source: UidMapSource) -> Result<()> {
    let map = source.load()?;
    info!(source = %source, entries = map.len(), "resolving UID map");

    let mut resolver = ctx.resolver().await?;
    let report = resolve_stage(&mut resolver, map).await;
    output::write_json(&report, ctx.output_style)?;

    disconnect(resolver.into_inner()).await;
    Ok(())
}
