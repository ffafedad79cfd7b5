use crate::cli::ServeArgs;
use crate::graph::{AppState, GraphSource, LinkGraph};
use crate::style;

use super::{CommandContext, report_error};

pub fn cmd_serve(args: ServeArgs) -> i32 {
    let ctx = CommandContext::new();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            style::error(&format!("Failed to start async runtime: {}", e));
            return 1;
        }
    };

    let source = GraphSource::parse(&args.graph);
    let document = match rt.block_on(source.fetch()) {
        Ok(d) => d,
        Err(e) => {
            report_error(&format!("Graph not available from {}", source), &e);
            return 1;
        }
    };

    let state = AppState::new(LinkGraph::build(document), ctx.config.viewer);
    if let Err(e) = rt.block_on(crate::graph::serve(state, args.port, args.open)) {
        style::error(&format!("Server failed: {}", e));
        return 1;
    }

    0
}
