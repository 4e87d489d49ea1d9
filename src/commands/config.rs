//! Implementation of the `git flow config` command.

use crate::context::FlowContext;
use crate::error::Result;
use crate::git::Verbosity;

/// Print the resolved configuration as YAML.
pub fn cmd_config(verbosity: Verbosity) -> Result<()> {
    let ctx = FlowContext::resolve(verbosity)?;
    print!("{}", ctx.config.to_yaml()?);
    Ok(())
}
