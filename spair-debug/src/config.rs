//! Debug plotting configuration format.

use crate::{
    common::*,
    sink::{FigureSink, LocalSink},
};

pub use layout::*;
pub use output::*;

/// The main configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub sink: SinkConfig,
    #[serde(default)]
    pub plot: PlotConfig,
}

impl Config {
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let text = std::fs::read_to_string(path)?;
        let config = json5::from_str(&text)?;
        Ok(config)
    }
}

mod layout {
    use super::*;

    /// Layout and scaling options shared by all debug views.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct PlotConfig {
        /// The factorization of the flattened per-cell dimension.
        #[serde(default)]
        pub grid: GridLayout,
        /// The factor that maps normalized box coordinates to input image pixels.
        #[serde(default = "default_image_size")]
        pub image_size: R64,
        /// Pixels per inch of rendered figures.
        #[serde(default = "default_dpi")]
        pub dpi: NonZeroUsize,
    }

    impl Default for PlotConfig {
        fn default() -> Self {
            Self {
                grid: GridLayout::default(),
                image_size: default_image_size(),
                dpi: default_dpi(),
            }
        }
    }

    /// The (batch, rows, cols) factorization of per-cell tensors.
    ///
    /// Per-cell tensors are flattened to `batch_size * rows * cols` entries in
    /// the leading dimension.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct GridLayout {
        pub batch_size: NonZeroUsize,
        pub rows: NonZeroUsize,
        pub cols: NonZeroUsize,
    }

    impl GridLayout {
        pub fn new(batch_size: usize, rows: usize, cols: usize) -> Result<Self> {
            let nonzero = |value: usize, name: &str| {
                NonZeroUsize::new(value).ok_or_else(|| format_err!("{} must be positive", name))
            };
            Ok(Self {
                batch_size: nonzero(batch_size, "batch_size")?,
                rows: nonzero(rows, "rows")?,
                cols: nonzero(cols, "cols")?,
            })
        }

        /// The number of cells over all batch elements.
        pub fn len(&self) -> usize {
            self.batch_size.get() * self.cells_per_sample()
        }

        pub fn cells_per_sample(&self) -> usize {
            self.rows.get() * self.cols.get()
        }

        pub fn dims(&self) -> [usize; 3] {
            [self.batch_size.get(), self.rows.get(), self.cols.get()]
        }
    }

    impl Default for GridLayout {
        fn default() -> Self {
            Self {
                batch_size: NonZeroUsize::new(32).unwrap(),
                rows: NonZeroUsize::new(11).unwrap(),
                cols: NonZeroUsize::new(11).unwrap(),
            }
        }
    }

    impl fmt::Display for GridLayout {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let [batch_size, rows, cols] = self.dims();
            write!(f, "({}, {}, {})", batch_size, rows, cols)
        }
    }

    fn default_image_size() -> R64 {
        r64(128.0)
    }

    fn default_dpi() -> NonZeroUsize {
        NonZeroUsize::new(100).unwrap()
    }
}

mod output {
    use super::*;

    /// Where rendered figures go.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(tag = "type")]
    pub enum SinkConfig {
        /// Save figures as PNG files under a directory.
        Local { dir: PathBuf },
        /// Write figures to tensorboard event files under a directory.
        Tensorboard { dir: PathBuf },
    }

    impl SinkConfig {
        /// Create the configured sink.
        pub fn build(&self) -> Result<Box<dyn FigureSink>> {
            let sink: Box<dyn FigureSink> = match self {
                Self::Local { dir } => Box::new(LocalSink::new(dir)?),
                #[cfg(feature = "tensorboard")]
                Self::Tensorboard { dir } => Box::new(crate::sink::EventSink::new(dir)?),
                #[cfg(not(feature = "tensorboard"))]
                Self::Tensorboard { .. } => {
                    bail!("the tensorboard sink requires the 'tensorboard' feature")
                }
            };
            Ok(sink)
        }
    }
}
