// Command line definition. Also included by build.rs to render the man page,
// so it may only depend on clap and std.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

const LONG_ABOUT: &str = r#"
Rebuilds tag provider hierarchies from a gateway configuration backup and
resolves UDT inheritance, so every instance shows the tags it really has.

COMMANDS:
    tagtree providers <IDB>                  List tag providers
    tagtree stats <IDB>                      Statistics for every provider
    tagtree tree <IDB> -p default            Print a provider's tag tree
    tagtree export <IDB> -p default -o F     Export a provider as JSON

LOGGING:
    Set TAGTREE_LOG (e.g. TAGTREE_LOG=debug) to see what gets dropped,
    orphaned or left unresolved. Warnings are shown by default.

CONFIGURATION:
    Read from $TAGTREE_HOME/config.toml, or the platform config directory.
"#;

/// Tag hierarchy and UDT inheritance resolution for gateway backups
#[derive(Parser, Debug)]
#[command(name = "tagtree")]
#[command(author, version)]
#[command(about = "Tag hierarchy and UDT inheritance resolution for gateway backups")]
#[command(long_about = LONG_ABOUT)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (default: $TAGTREE_HOME/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the tag providers in a backup
    #[command(visible_alias = "p")]
    Providers(ProvidersArgs),

    /// Tag statistics per provider, with totals
    #[command(visible_alias = "s")]
    Stats(StatsArgs),

    /// Print a provider's resolved tag tree
    #[command(visible_alias = "t")]
    Tree(TreeArgs),

    /// Export a provider's resolved tags as JSON
    #[command(visible_alias = "e")]
    Export(ExportArgs),
}

/// Arguments for the providers command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:
    tagtree providers config.idb           Table of providers
    tagtree providers config.idb --json    JSON output")]
pub struct ProvidersArgs {
    /// Gateway configuration database (.idb)
    pub database: PathBuf,

    /// JSON output
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the stats command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:
    tagtree stats config.idb               All providers plus totals
    tagtree stats config.idb -p default    One provider
    tagtree stats config.idb --json        JSON output")]
pub struct StatsArgs {
    /// Gateway configuration database (.idb)
    pub database: PathBuf,

    /// Only this provider (case-insensitive)
    #[arg(short, long)]
    pub provider: Option<String>,

    /// JSON output
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the tree command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:
    tagtree tree config.idb -p default             Whole tree
    tagtree tree config.idb -p default --depth 2   Two levels
    tagtree tree config.idb -p default --orphans   Include orphaned tags

Nodes marked with * are inherited from a UDT definition.")]
pub struct TreeArgs {
    /// Gateway configuration database (.idb)
    pub database: PathBuf,

    /// Provider name (case-insensitive)
    #[arg(short, long)]
    pub provider: String,

    /// Levels to print below the provider
    #[arg(short, long)]
    pub depth: Option<usize>,

    /// Also print tags whose parent folder couldn't be found
    #[arg(long)]
    pub orphans: bool,
}

/// Arguments for the export command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:
    tagtree export config.idb -p default -o default.json
    tagtree export config.idb -p default -o tags.json --no-types")]
pub struct ExportArgs {
    /// Gateway configuration database (.idb)
    pub database: PathBuf,

    /// Provider name (case-insensitive)
    #[arg(short, long)]
    pub provider: String,

    /// Output file
    #[arg(short, long)]
    pub output: PathBuf,

    /// Leave out the UDT definitions (_types_ folder)
    #[arg(long)]
    pub no_types: bool,
}
