#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("traversal exceeded the depth limit of {limit} at node \"{id}\"")]
    DepthLimitExceeded { id: String, limit: usize },
    #[error("node \"{id}\" is not defined in the process flow")]
    UnknownNode { id: String },
    #[error("slot for \"{id}\" refers to missing ancestor slot {ancestor}")]
    MissingAncestor { id: String, ancestor: usize },
}
