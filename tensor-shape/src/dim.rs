use crate::common::*;

/// A dimension that is either a fixed size or left to be inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dim {
    Size(usize),
    Infer,
}

impl Dim {
    /// Checks if a concrete size satisfies this dimension.
    pub fn matches(&self, size: usize) -> bool {
        match *self {
            Self::Size(expect) => expect == size,
            Self::Infer => true,
        }
    }
}

impl From<Option<usize>> for Dim {
    fn from(from: Option<usize>) -> Self {
        match from {
            Some(size) => Self::Size(size),
            None => Self::Infer,
        }
    }
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Size(size) => write!(f, "{}", size),
            Self::Infer => f.write_str("_"),
        }
    }
}
