use crate::cli::LayoutArgs;
use crate::fs::default_fs;
use crate::graph::layout::{Viewport, settle};
use crate::graph::{Neighborhood, neighborhood, resolve_start};
use crate::style;

use super::{CommandContext, emit};

pub fn cmd_layout(args: LayoutArgs) -> i32 {
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

    let snapshot = settle(&hood, Viewport::new(args.width, args.height), args.ticks);
    if !snapshot.settled {
        style::hint(&format!(
            "Layout did not settle within {} ticks; pass --ticks to run longer",
            args.ticks
        ));
    }

    let json = match serde_json::to_string_pretty(&snapshot) {
        Ok(j) => j,
        Err(e) => {
            style::error(&format!("Failed to serialize layout: {}", e));
            return 1;
        }
    };

    match emit(&json, args.output.as_ref(), false, default_fs()) {
        Ok(()) => 0,
        Err(code) => code,
    }
}
