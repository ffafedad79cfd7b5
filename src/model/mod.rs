mod graph;

pub use graph::{DocumentError, DocumentIssue, GraphDocument, HOME_LABEL, Link, LinkKind, Node};
