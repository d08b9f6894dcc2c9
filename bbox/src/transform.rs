use crate::common::*;

/// Axis-aligned scaling followed by translation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transform<T> {
    pub sy: T,
    pub sx: T,
    pub ty: T,
    pub tx: T,
}

impl<T> Transform<T>
where
    T: Copy + Num,
{
    pub fn from_scale(scale: T) -> Self {
        Self {
            sy: scale,
            sx: scale,
            ty: T::zero(),
            tx: T::zero(),
        }
    }

    /// Maps a `[y, x]` point.
    pub fn apply(&self, point: [T; 2]) -> [T; 2] {
        let [y, x] = point;
        [y * self.sy + self.ty, x * self.sx + self.tx]
    }
}
