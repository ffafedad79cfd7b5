use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_DIST: &str = "dist";
pub const DEFAULT_OUT: &str = "public/graph.json";
pub const DEFAULT_GRAPH: &str = "public/graph.json";

#[derive(Parser, Debug)]
#[command(name = "sitegraph")]
#[command(about = "Extract the link graph of a built static site and explore page neighborhoods")]
#[command(version)]
pub struct Cli {
    /// With no subcommand, generates ./public/graph.json from ./dist
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Extract the link graph from a build output directory
    Generate(GenerateArgs),

    /// Show the pages within a hop limit of a location
    Neighborhood(NeighborhoodArgs),

    /// Lay out a neighborhood headlessly and print node positions
    Layout(LayoutArgs),

    /// Serve the interactive neighborhood viewer
    Serve(ServeArgs),

    /// Generate a starter .sitegraph.toml configuration file
    Init(InitArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateArgs {
    /// Build output directory to scan
    #[arg(long, default_value = DEFAULT_DIST)]
    pub dist: PathBuf,

    /// Where to write the graph artifact
    #[arg(long, default_value = DEFAULT_OUT)]
    pub out: PathBuf,

    /// Scan every .html file instead of only index.html pages
    #[arg(long)]
    pub all_pages: bool,
}

impl Default for GenerateArgs {
    fn default() -> Self {
        Self {
            dist: PathBuf::from(DEFAULT_DIST),
            out: PathBuf::from(DEFAULT_OUT),
            all_pages: false,
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct NeighborhoodArgs {
    /// Browsing location to start from (e.g. /blog/my-post/)
    pub location: String,

    /// Graph artifact path or URL
    #[arg(long, default_value = DEFAULT_GRAPH)]
    pub graph: String,

    /// Hop limit (defaults to the configured default_hops)
    #[arg(long)]
    pub hops: Option<usize>,

    /// Output format
    #[arg(short, long, default_value = "markdown")]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct LayoutArgs {
    /// Browsing location to start from
    pub location: String,

    /// Graph artifact path or URL
    #[arg(long, default_value = DEFAULT_GRAPH)]
    pub graph: String,

    /// Hop limit (defaults to the configured default_hops)
    #[arg(long)]
    pub hops: Option<usize>,

    /// Viewport width
    #[arg(long, default_value = "800")]
    pub width: f64,

    /// Viewport height
    #[arg(long, default_value = "600")]
    pub height: f64,

    /// Maximum simulation ticks
    #[arg(long, default_value = "300")]
    pub ticks: usize,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    /// Graph artifact path or URL
    #[arg(long, default_value = DEFAULT_GRAPH)]
    pub graph: String,

    /// Port for HTTP server
    #[arg(long, default_value = "3000")]
    pub port: u16,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Path where to create .sitegraph.toml (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand() {
        let cli = Cli::try_parse_from(["sitegraph"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_generate_defaults() {
        let cli = Cli::try_parse_from(["sitegraph", "generate"]).unwrap();
        let Some(Command::Generate(args)) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.dist, PathBuf::from("dist"));
        assert_eq!(args.out, PathBuf::from("public/graph.json"));
        assert!(!args.all_pages);
    }

    #[test]
    fn test_neighborhood_args() {
        let cli = Cli::try_parse_from([
            "sitegraph",
            "neighborhood",
            "/blog/",
            "--hops",
            "3",
            "--format",
            "json",
        ])
        .unwrap();
        let Some(Command::Neighborhood(args)) = cli.command else {
            panic!("expected neighborhood");
        };
        assert_eq!(args.location, "/blog/");
        assert_eq!(args.hops, Some(3));
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn test_serve_port() {
        let cli = Cli::try_parse_from(["sitegraph", "serve", "--port", "8080"]).unwrap();
        let Some(Command::Serve(args)) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.port, 8080);
        assert_eq!(args.graph, DEFAULT_GRAPH);
    }
}
