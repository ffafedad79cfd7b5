mod generate;
mod init;
mod layout;
mod neighborhood;
mod serve;

pub use generate::{cmd_generate, cmd_generate_with_fs};
pub use init::{cmd_init, cmd_init_with_fs};
pub use layout::cmd_layout;
pub use neighborhood::cmd_neighborhood;
pub use serve::cmd_serve;

use crate::config::Config;
use crate::fs::FileSystem;
use crate::graph::{GraphSource, LinkGraph};
use crate::style;
use std::error::Error;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Shared context for command execution, reducing boilerplate across commands.
pub struct CommandContext {
    pub config: Config,
}

impl CommandContext {
    /// Load `.sitegraph.toml` from the working directory. A broken config
    /// is reported and replaced by defaults.
    pub fn new() -> Self {
        Self::in_dir(Path::new("."))
    }

    pub fn in_dir(dir: &Path) -> Self {
        let config = Config::load(dir).unwrap_or_else(|e| {
            style::warning(&format!("Failed to load config: {}. Using defaults.", e));
            Config::default()
        });
        Self { config }
    }

    /// Fetch and index the graph document. Returns Err(exit_code) on failure.
    pub fn load_graph(&self, location: &str) -> Result<LinkGraph, i32> {
        let source = GraphSource::parse(location);
        let rt = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                style::error(&format!("Failed to start async runtime: {}", e));
                return Err(1);
            }
        };
        match rt.block_on(source.fetch()) {
            Ok(document) => Ok(LinkGraph::build(document)),
            Err(e) => {
                report_error(&format!("Graph not available from {}", source), &e);
                if matches!(source, GraphSource::File(_)) {
                    style::hint("Run `sitegraph generate` to build the graph artifact first");
                }
                Err(1)
            }
        }
    }
}

impl Default for CommandContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Print an error with its source chain.
pub fn report_error(context: &str, err: &dyn Error) {
    style::error(&format!("{}: {}", context, err));
    let mut source = err.source();
    while let Some(cause) = source {
        style::hint(&format!("caused by: {}", cause));
        source = cause.source();
    }
}

/// Write command output to a file or stdout. Markdown on a terminal is
/// rendered; files and pipes get plain text.
pub fn emit(
    content: &str,
    output: Option<&PathBuf>,
    markdown: bool,
    fs: &dyn FileSystem,
) -> Result<(), i32> {
    let result = match output {
        Some(path) => fs.write(path, &format!("{}\n", content)),
        None if markdown => style::render_markdown(content, &mut io::stdout()),
        None => writeln!(io::stdout(), "{}", content),
    };
    result.map_err(|e| {
        style::error(&format!("Failed to write output: {}", e));
        1
    })
}
