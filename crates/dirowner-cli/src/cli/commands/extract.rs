//! `resolve --extract-only <PATH>...` - host half of the two-stage topology.

use anyhow::Result;
use dirowner::extract_stage;

use super::Context;
use crate::output;

pub fn execute(ctx: &Context, paths: &[String]) -> Result<()> {
    let extractor = ctx.extractor()?;
    let map = extract_stage(&extractor, paths)?;
    output::write_json(&map, ctx.output_style)?;
    Ok(())
}
