use clap::Parser;
use sitegraph::cli::{Cli, Command, GenerateArgs};
use sitegraph::{cmd_generate, cmd_init, cmd_layout, cmd_neighborhood, cmd_serve};
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Some(Command::Generate(args)) => cmd_generate(args),
        Some(Command::Neighborhood(args)) => cmd_neighborhood(args),
        Some(Command::Layout(args)) => cmd_layout(args),
        Some(Command::Serve(args)) => cmd_serve(args),
        Some(Command::Init(args)) => cmd_init(args),
        // Bare invocation: ./dist -> ./public/graph.json
        None => cmd_generate(GenerateArgs::default()),
    };

    std::process::exit(exit_code);
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sitegraph=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
