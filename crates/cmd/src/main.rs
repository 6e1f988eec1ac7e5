use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use cmd::commands::{
    clear_command, find_command, history_command, inherit_command, ls_command, pull_command,
    read_command, recover_command, remove_command, restore_command, revert_command, write_command,
};
use cmd::common::MetaContext;

/// Meta keeps typed metadata beside your directories. Every directory can
/// hold named values, remember what they used to be, and inherit values
/// from the directories above it.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "meta")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory whose metadata to use (default: current directory)
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,

    /// YAML configuration file (default: $METASTORE_CONFIG)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Show more detail in command output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read prints the live value of an entry and its type.
    Read {
        metapath: String,

        /// Require this type instead of the metapath's suffix
        #[arg(short = 't', long = "type")]
        suffix: Option<String>,

        /// List the entry's children instead
        #[arg(long)]
        children: bool,
    },

    /// Write stores a value, keeping the previous one in history.
    Write {
        metapath: String,

        /// JSON value; anything that is not JSON is written as a string
        value: Option<String>,

        #[arg(short = 't', long = "type")]
        suffix: Option<String>,
    },

    /// Pull reads an entry, falling back to parent directories.
    Pull {
        metapath: String,

        /// Number of parent directories to consult; 0 reads locally only
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        depth: i64,

        /// Stop at the first value without reporting shadowed ones
        #[arg(long)]
        lazy: bool,
    },

    /// Inherit reads an entry from the closest directory defining it.
    Inherit {
        metapath: String,

        /// Merge the entry's children over every parent directory instead
        #[arg(long)]
        children: bool,
    },

    /// Find prints the stored name of an entry, whatever its type.
    Find { name: String },

    /// List prints the entries of the directory or of an entry.
    #[clap(visible_alias = "list")]
    Ls { metapath: Option<String> },

    /// Clear moves the live value of an entry into its history.
    Clear { metapath: String },

    /// Remove moves an entry with its children and history to the trash.
    #[clap(visible_alias = "rm")]
    Remove {
        metapath: String,

        /// Only delete the history, keeping the live value
        #[arg(long, conflicts_with = "permanent")]
        history: bool,

        /// Delete for good instead of moving to the trash
        #[arg(long)]
        permanent: bool,
    },

    /// Recover brings back the last removed entry of a name.
    Recover { metapath: String },

    /// History prints the superseded values of an entry, oldest first.
    History { metapath: String },

    /// Restore prints a historical value without changing anything.
    Restore { metapath: String, ordinal: usize },

    /// Revert makes a historical value live again.
    Revert { metapath: String, ordinal: usize },
}

#[allow(clippy::print_stderr)]
fn main() {
    diagnostics::init_diagnostics();

    if let Err(err) = main_result() {
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }
}

fn main_result() -> Result<()> {
    let cli = Cli::parse();
    let mut ctx = MetaContext::new(cli.root, cli.config);
    ctx.verbose = cli.verbose;

    #[allow(clippy::print_stdout)]
    let print = |line: String| println!("{}", line);

    match cli.command {
        Commands::Read {
            metapath,
            suffix,
            children,
        } => read_command(&ctx, &metapath, suffix.as_deref(), children, print),

        Commands::Write {
            metapath,
            value,
            suffix,
        } => write_command(&ctx, &metapath, value.as_deref(), suffix.as_deref(), print),

        Commands::Pull {
            metapath,
            depth,
            lazy,
        } => pull_command(&ctx, &metapath, depth, lazy, print),

        Commands::Inherit { metapath, children } => inherit_command(&ctx, &metapath, children, print),

        Commands::Find { name } => find_command(&ctx, &name, print),

        Commands::Ls { metapath } => ls_command(&ctx, metapath.as_deref(), print),

        Commands::Clear { metapath } => clear_command(&ctx, &metapath, print),

        Commands::Remove {
            metapath,
            history,
            permanent,
        } => remove_command(&ctx, &metapath, history, permanent, print),

        Commands::Recover { metapath } => recover_command(&ctx, &metapath, print),

        Commands::History { metapath } => history_command(&ctx, &metapath, print),

        Commands::Restore { metapath, ordinal } => restore_command(&ctx, &metapath, ordinal, print),

        Commands::Revert { metapath, ordinal } => revert_command(&ctx, &metapath, ordinal, print),
    }
}
