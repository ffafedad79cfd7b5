mod assets;
mod index;
pub mod layout;
mod neighborhood;
mod routes;
mod source;
pub mod viewer;

pub use index::LinkGraph;
pub use neighborhood::{
    Neighborhood, format_neighborhood_json, format_neighborhood_markdown, neighborhood,
    resolve_start,
};
pub use routes::{AppState, LayoutQuery, NeighborhoodQuery, router, serve};
pub use source::GraphSource;
pub use viewer::{LoadState, LoadTicket, Viewer, ViewerSettings};
