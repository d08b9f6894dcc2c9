use crate::{common::*, dim::Dim};

/// A shape pattern. Each dimension is either fixed or inferred.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape(Vec<Dim>);

impl Shape {
    /// Builds a pattern where `None` stands for an inferred dimension.
    pub fn new(dims: &[Option<usize>]) -> Self {
        dims.iter().cloned().map(Dim::from).collect()
    }

    /// Checks a concrete shape against the pattern.
    pub fn matches(&self, sizes: &[usize]) -> bool {
        self.0.len() == sizes.len()
            && self
                .0
                .iter()
                .zip(sizes.iter())
                .all(|(dim, &size)| dim.matches(size))
    }
}

impl<const SIZE: usize> From<[Dim; SIZE]> for Shape {
    fn from(from: [Dim; SIZE]) -> Self {
        Self(from.into())
    }
}

impl FromIterator<Dim> for Shape {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = Dim>,
    {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (index, dim) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", dim)?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_matches() {
        let pattern = Shape::new(&[None, Some(3), Some(28), Some(28)]);
        assert!(pattern.matches(&[1, 3, 28, 28]));
        assert!(pattern.matches(&[32, 3, 28, 28]));
        assert!(!pattern.matches(&[32, 1, 28, 28]));
        assert!(!pattern.matches(&[3, 28, 28]));
    }

    #[test]
    fn shape_display() {
        let pattern = Shape::new(&[None, Some(1), Some(4)]);
        assert_eq!(pattern.to_string(), "[_, 1, 4]");
        assert_eq!(Shape::from([Dim::Size(2), Dim::Size(3)]).to_string(), "[2, 3]");
    }
}
