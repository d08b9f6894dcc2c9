pub use std::{fmt, iter::FromIterator};
