//! Pull the database image of the current project.

use std::path::Path;

use anyhow::Result;

use crate::resolve;
use crate::runner::{self, ShellRunner};

/// Options of the `db-refresh` command.
pub struct Options<'a> {
    pub directory: &'a Path,
    pub docker_tag: Option<&'a str>,
    pub git_remote: &'a str,
    pub docker: &'a str,
    pub dry_run: bool,
}

/// Execute the `db-refresh` command.
pub fn command(opts: Options<'_>) -> Result<()> {
    let image = resolve::resolve_in(opts.directory, opts.docker_tag, opts.git_remote)?;
    if opts.dry_run {
        println!("{image}");
        return Ok(());
    }
    let image = runner::shell_quote(&image.to_string());
    runner::execute(&ShellRunner, &format!("{} pull {image}", opts.docker))
}
