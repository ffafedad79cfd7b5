use crate::cli::GenerateArgs;
use crate::config::PageMode;
use crate::extract::{Extractor, write_document};
use crate::fs::{FileSystem, default_fs};
use crate::style;

use super::{CommandContext, report_error};

pub fn cmd_generate(args: GenerateArgs) -> i32 {
    let ctx = CommandContext::new();
    cmd_generate_with_fs(args, ctx, default_fs())
}

pub fn cmd_generate_with_fs(args: GenerateArgs, ctx: CommandContext, fs: &dyn FileSystem) -> i32 {
    let mut config = ctx.config;
    if args.all_pages {
        config.extract.pages = PageMode::All;
    }

    let extraction = match Extractor::with_fs(&config, fs).extract(&args.dist) {
        Ok(e) => e,
        Err(e) => {
            report_error("Graph extraction failed", &e);
            if !args.dist.is_dir() {
                style::hint("Build the site first, or pass --dist to point at its output");
            }
            return 1;
        }
    };

    if let Err(e) = write_document(&extraction.document, &args.out, fs) {
        report_error("Could not write graph", &e);
        return 1;
    }

    let stats = extraction.stats;
    style::success(&format!(
        "{} generated: {} nodes, {} links",
        style::path(&args.out),
        extraction.document.nodes.len(),
        extraction.document.links.len()
    ));
    println!("{}", style::metric("Pages scanned", stats.pages));
    println!("{}", style::metric("Hrefs seen", stats.hrefs));
    println!(
        "{}",
        style::metric(
            "Skipped",
            format!(
                "{} assets, {} ignored, {} excluded, {} nav",
                stats.assets, stats.ignored, stats.excluded, stats.nav_suppressed
            )
        )
    );

    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::fs::mock::MockFs;
    use std::path::PathBuf;

    fn ctx() -> CommandContext {
        CommandContext {
            config: Config::default(),
        }
    }

    #[test]
    fn test_missing_dist_fails() {
        let args = GenerateArgs {
            dist: PathBuf::from("/no/such/dist/dir"),
            out: PathBuf::from("/out/graph.json"),
            all_pages: false,
        };
        let fs = MockFs::new();
        assert_eq!(cmd_generate_with_fs(args, ctx(), &fs), 1);
        assert!(fs.files().is_empty());
    }
}
