//! Changelog template command

use std::io::Write;

use crate::context::Context;
use crate::error::Result;

/// Print a remote template exactly as fetched
pub fn run_template_fetch(ctx: &Context, reference: &str, fresh: bool) -> Result<()> {
    let template = ctx.loader()?.load_remote_template(reference, fresh)?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(template.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
