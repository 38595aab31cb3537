//! Tree command implementation

use crate::cli::TreeArgs;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::output::human::{format_tree, TreeOptions};
use crate::source::SqliteSource;
use crate::tags::resolve_named;

/// Run the tree command
pub fn run(args: TreeArgs, config: &Config) -> Result<()> {
    let source = SqliteSource::open(&args.database)?;
    let provider = resolve_named(&source, &args.provider, config)?;
    let options = TreeOptions {
        max_depth: args.depth,
    };

    print!("{}", format_tree(&provider.root, options));

    if args.orphans {
        let orphans = &provider.statistics.orphaned_tags;
        println!("\nOrphaned tags: {}", provider.statistics.total_orphaned_tags());
        for orphan in orphans {
            println!(
                "(folder {})",
                orphan.folder_id.as_deref().unwrap_or("<none>")
            );
            print!("{}", format_tree(orphan, options));
        }
    }

    Ok(())
}
