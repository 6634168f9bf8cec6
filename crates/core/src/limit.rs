use super::csr::GraphCSR;
use common::{error::Error, types::VertexId};

/// Bound on the size of the cycles a search may produce.
///
/// - `max_len = None`: unbounded.
/// - `max_len = Some(n)`, no category: at most `n` vertices in the cycle.
/// - `max_len = Some(n)`, `category = Some(c)`: at most `n` vertices of category `c`
///   in the cycle; vertices of other categories are not counted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleLimit {
    pub max_len: Option<usize>,
    pub category: Option<String>,
}

impl CycleLimit {
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Builds a limit from a signed length; any negative value means unbounded.
    pub fn new(limit_len: i64, category: Option<String>) -> Self {
        CycleLimit {
            max_len: usize::try_from(limit_len).ok(),
            category,
        }
    }

    /// Parses the textual form of the length limit (e.g. a command-line argument).
    ///
    /// # Errors
    /// Returns `Error::InvalidLimit` if `limit_len` is not an integer.
    pub fn parse(limit_len: &str, category: Option<String>) -> Result<Self, Error> {
        let value: i64 = limit_len
            .trim()
            .parse()
            .map_err(|_| Error::InvalidLimit(limit_len.to_string()))?;

        Ok(Self::new(value, category))
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_len.is_none()
    }

    /// Whether the (partial) cycle `path` still satisfies the limit.
    ///
    /// Each vertex of `path` is counted once; the start vertex closing the cycle is
    /// not counted a second time. With a category limit the count stops as soon as
    /// it exceeds the bound, so long paths are rejected on their first offending prefix.
    pub fn admits(&self, path: &[VertexId], graph: &GraphCSR) -> Result<bool, Error> {
        let Some(max_len) = self.max_len else {
            return Ok(true);
        };

        let Some(category) = self.category.as_deref() else {
            return Ok(path.len() <= max_len);
        };

        let mut count = 0;
        for &vertex in path {
            if graph.category(vertex)? == category {
                count += 1;
                if count > max_len {
                    return Ok(false);
                }
            }
        }

        Ok(true)
    }
}
