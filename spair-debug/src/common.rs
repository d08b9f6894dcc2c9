//! Common imports from external crates.

pub use anyhow::{bail, ensure, format_err, Context, Result};
pub use bbox::{prelude::*, Transform, TLBR};
pub use image::{ImageFormat, Rgb, RgbImage};
pub use itertools::{iproduct, izip, Itertools};
pub use ndarray::{
    s, Array2, Array3, Array4, ArrayBase, ArrayD, ArrayView3, ArrayView4, ArrayViewD, Axis, Data,
    Dimension, Ix2, Ix3, Ix4, IxDyn,
};
pub use noisy_float::prelude::*;
pub use serde::{Deserialize, Serialize};
pub use std::{
    fmt, fs,
    num::NonZeroUsize,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};
pub use tensor_shape::{Dim, Shape};
pub use tracing::{debug, info, trace};
