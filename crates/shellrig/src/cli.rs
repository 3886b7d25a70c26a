use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    author,
    version = env!("CARGO_PKG_VERSION"),
    about = "Back up, restore and check shell configuration",
    long_about = None
)]
pub struct Cli {
    /// Treat this directory as the home directory
    #[arg(long, global = true, value_name = "DIR")]
    pub home: Option<PathBuf>,

    /// Store archives here instead of ~/.config
    #[arg(long, global = true, value_name = "DIR")]
    pub backup_root: Option<PathBuf>,

    /// Mirror debug logging to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Snapshot shell configuration into a new archive
    Backup {
        /// Shell whose configuration should be backed up
        #[arg(short, long, conflicts_with = "paths")]
        shell: Option<String>,

        /// Archive category used for explicit paths
        #[arg(short, long, default_value = "shell")]
        category: String,

        /// Delete old archives of the same category afterwards
        #[arg(long)]
        prune: bool,

        /// Home-relative paths to back up
        paths: Vec<String>,
    },

    /// List archives, newest first
    List {
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Put an archive's contents back in place
    Restore {
        /// Archive name as printed by `list`, or `latest`
        name: String,

        /// Category searched when resolving `latest`
        #[arg(short, long)]
        category: Option<String>,

        /// Restore only these entries
        #[arg(long, value_delimiter = ',', num_args = 1..)]
        only: Vec<String>,
    },

    /// Delete all but the newest archives of a category
    Clean {
        #[arg(short, long, default_value = "shell")]
        category: String,

        /// Number of archives to keep (defaults to the `keep_count` setting)
        #[arg(short, long)]
        keep: Option<usize>,
    },

    /// Show an archive's size and contents
    Info { name: String },

    /// Check a shell's config files for problems
    Validate {
        #[arg(short, long)]
        shell: Option<String>,
    },

    /// Show which shells are installed
    Shells,
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands};
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_overrides_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["shellrig", "list", "--home", "/tmp/h", "-v"])
            .expect("parse list command");

        assert!(cli.verbose);
        assert_eq!(cli.home.as_deref(), Some(std::path::Path::new("/tmp/h")));
        assert!(matches!(cli.command, Commands::List { category: None }));
    }

    #[test]
    fn restore_only_accepts_comma_separated_names() {
        let cli = Cli::try_parse_from(["shellrig", "restore", "latest", "--only", ".zshrc,.p10k.zsh"])
            .expect("parse restore command");

        let Commands::Restore { name, only, .. } = cli.command else {
            panic!("expected restore command");
        };
        assert_eq!(name, "latest");
        assert_eq!(only, vec![".zshrc", ".p10k.zsh"]);
    }

    #[test]
    fn backup_rejects_shell_together_with_paths() {
        let result = Cli::try_parse_from(["shellrig", "backup", "--shell", "zsh", ".zshrc"]);

        assert!(result.is_err());
    }
}
