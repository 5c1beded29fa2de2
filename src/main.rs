mod error;
mod logging;
mod refresh;
mod registry;
mod repo;
mod resolve;
mod runner;
mod shell_completions;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use crate::logging::Verbosity;

/// Pull the Docker image of this project's database
#[derive(Parser)]
#[command(name = "db-refresh", author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Args {
    /// The Docker tag to pull, defaults to the current branch name
    #[arg(short = 't', long, env = "DB_REFRESH_DOCKER_TAG")]
    docker_tag: Option<String>,

    /// The git remote to use to determine the image name
    #[arg(
        short = 'r',
        long,
        env = "DB_REFRESH_GIT_REMOTE",
        default_value = "origin"
    )]
    git_remote: String,

    /// Resolve the image from this directory instead of the current one
    #[arg(short = 'C', long, default_value = ".")]
    directory: PathBuf,

    /// The docker program to pull with
    #[arg(long, env = "DB_REFRESH_DOCKER", default_value = "docker")]
    docker: String,

    /// Print the resolved image name instead of pulling it
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Increase output verbosity, repeat for debug output
    #[arg(short = 'v', long, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only print errors
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Additional actions
    #[command(subcommand)]
    action: Option<Action>,
}

#[derive(Subcommand)]
enum Action {
    /// Generate shell completions
    ShellCompletions {
        /// The shell to generate completions for
        shell: clap_complete::aot::Shell,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(Verbosity::from_flags(args.quiet, args.verbose));

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            let code = err
                .downcast_ref::<error::Error>()
                .map_or(1, error::Error::exit_code);
            ExitCode::from(code)
        }
    }
}

fn run(args: Args) -> Result<()> {
    match args.action {
        Some(Action::ShellCompletions { shell }) => shell_completions::command(shell),
        None => refresh::command(refresh::Options {
            directory: &args.directory,
            docker_tag: args.docker_tag.as_deref(),
            git_remote: &args.git_remote,
            docker: &args.docker,
            dry_run: args.dry_run,
        }),
    }
}
