/// Conditions reported by grid edits and by the search engine. None of them leave the grid or the
/// solver in an inconsistent state; the caller fixes the cause and retries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("start or goal not set")]
    MissingEndpoints,
    #[error("a search is already in progress or finished, reset it first")]
    AlreadyActive,
    #[error("no search has been started")]
    NotStarted,
    #[error("goal is unreachable from start")]
    Unreachable,
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    InvalidCoordinate {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },
}
