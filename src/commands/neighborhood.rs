use crate::cli::{NeighborhoodArgs, OutputFormat};
use crate::fs::default_fs;
use crate::graph::{
    Neighborhood, format_neighborhood_json, format_neighborhood_markdown, neighborhood,
    resolve_start,
};
use crate::style;

use super::{CommandContext, emit};

pub fn cmd_neighborhood(args: NeighborhoodArgs) -> i32 {
    let ctx = CommandContext::new();
    let graph = match ctx.load_graph(&args.graph) {
        Ok(g) => g,
        Err(code) => return code,
    };

    let viewer = &ctx.config.viewer;
    let hops = args.hops.unwrap_or(viewer.default_hops);
    let hood = match resolve_start(&graph, &args.location, &viewer.section_root) {
        Some(start) => neighborhood(&graph, start, hops),
        None => {
            style::warning(&format!("No page matches {}", args.location));
            Neighborhood::empty(hops)
        }
    };

    let (content, markdown) = match args.format {
        OutputFormat::Markdown => (format_neighborhood_markdown(&hood, &args.location), true),
        OutputFormat::Json => (format_neighborhood_json(&hood, &args.location), false),
    };

    match emit(&content, args.output.as_ref(), markdown, default_fs()) {
        Ok(()) => 0,
        Err(code) => code,
    }
}
