use std::fmt;

#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    StartOutsideGrid,
    GoalOutsideGrid,
    /// A coordinate inside the grid lies outside the search context.
    VisitOutsideContext,
    NoPath,
    /// Path extraction stalled or revisited a cell even though the search
    /// reported the start as resolved.
    InternalInconsistency,
    InvalidWeight,
    /// `replan` was called on a context with no active query.
    NoQuery,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let message = match self {
            Error::StartOutsideGrid => "start is outside the grid",
            Error::GoalOutsideGrid => "goal is outside the grid",
            Error::VisitOutsideContext => "cell is outside the search context",
            Error::NoPath => "no path from start to goal",
            Error::InternalInconsistency => "search state is inconsistent",
            Error::InvalidWeight => "heuristic weight must be finite and at least 1",
            Error::NoQuery => "no active query to replan",
        };
        f.write_str(message)
    }
}

impl std::error::Error for Error {}
