pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod extract;
pub mod fs;
pub mod graph;
pub mod model;
pub mod style;

pub use api::{
    GenerateOptions, NeighborhoodOptions, SitegraphError, extract_site, generate, layout_of,
    load_graph, neighborhood_of,
};
pub use cli::Cli;
pub use commands::{cmd_generate, cmd_init, cmd_layout, cmd_neighborhood, cmd_serve};
pub use config::Config;
pub use model::{GraphDocument, Link, LinkKind, Node};
