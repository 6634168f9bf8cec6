use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Indicates a reference to a vertex id that is unknown or already removed from the graph.
    VertexNotFound(usize),

    /// Indicates that the input cannot be turned into a directed graph (e.g. an edge endpoint
    /// does not name a vertex).
    InvalidGraph(String),

    /// The cycle length limit is not an integer.
    InvalidLimit(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::VertexNotFound(v) => {
                write!(f, "Vertex {} is not present in the graph.", v)
            }

            Error::InvalidGraph(reason) => write!(f, "Graph is invalid: {}.", reason),

            Error::InvalidLimit(raw) => {
                write!(f, "Cycle limit '{}' is not an integer.", raw)
            }
        }
    }
}

impl std::error::Error for Error {}
