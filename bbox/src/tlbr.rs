use super::Rect;
use crate::{common::*, Transform};

/// Bounding box in TLBR format.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TLBR<T> {
    t: T,
    l: T,
    b: T,
    r: T,
}

impl<T> TLBR<T>
where
    T: Copy + Num + PartialOrd,
{
    /// Builds a box from a corner and a signed size.
    ///
    /// A negative width or height extends the box to the left or the top of
    /// the corner, so the result is always well-formed.
    pub fn from_signed_xywh(xywh: [T; 4]) -> Self {
        let [x, y, w, h] = xywh;
        let (l, r) = min_max(x, x + w);
        let (t, b) = min_max(y, y + h);
        Self { t, l, b, r }
    }

    pub fn transform(&self, transform: &Transform<T>) -> Self {
        let [t, l] = transform.apply([self.t, self.l]);
        let [b, r] = transform.apply([self.b, self.r]);
        let (t, b) = min_max(t, b);
        let (l, r) = min_max(l, r);
        Self { t, l, b, r }
    }
}

impl<T> Rect for TLBR<T>
where
    T: Copy,
{
    type Type = T;

    fn t(&self) -> Self::Type {
        self.t
    }

    fn l(&self) -> Self::Type {
        self.l
    }

    fn b(&self) -> Self::Type {
        self.b
    }

    fn r(&self) -> Self::Type {
        self.r
    }
}

fn min_max<T>(lhs: T, rhs: T) -> (T, T)
where
    T: PartialOrd,
{
    if lhs <= rhs {
        (lhs, rhs)
    } else {
        (rhs, lhs)
    }
}
