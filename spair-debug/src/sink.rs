//! Destinations of rendered figures.

use crate::{common::*, figure::Figure};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};

/// Characters escaped when a tag becomes a directory name.
const TAG_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'_').remove(b'-');

/// A collaborator that displays or persists a figure under a tag at a step.
pub trait FigureSink: Send {
    fn record(&mut self, tag: &str, figure: &Figure, step: i64) -> Result<()>;
}

impl<S> FigureSink for Box<S>
where
    S: FigureSink + ?Sized,
{
    fn record(&mut self, tag: &str, figure: &Figure, step: i64) -> Result<()> {
        (**self).record(tag, figure, step)
    }
}

impl<S> FigureSink for &mut S
where
    S: FigureSink + ?Sized,
{
    fn record(&mut self, tag: &str, figure: &Figure, step: i64) -> Result<()> {
        (**self).record(tag, figure, step)
    }
}

/// Saves figures as PNG files under `<dir>/<tag>/<step>.png`.
#[derive(Debug)]
pub struct LocalSink {
    dir: PathBuf,
}

impl LocalSink {
    pub fn new<P>(dir: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let dir = dir.as_ref().to_owned();
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file a figure is written to.
    pub fn figure_path(&self, tag: &str, step: i64) -> PathBuf {
        let tag_dir = percent_encoding::utf8_percent_encode(tag, TAG_ENCODE_SET).to_string();
        self.dir.join(tag_dir).join(format!("{:08}.png", step))
    }
}

impl FigureSink for LocalSink {
    fn record(&mut self, tag: &str, figure: &Figure, step: i64) -> Result<()> {
        let path = self.figure_path(tag, step);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }

        figure
            .render()
            .save_with_format(&path, ImageFormat::Png)
            .with_context(|| format!("failed to save figure to {}", path.display()))?;
        debug!("saved figure to {}", path.display());
        info!("figure '{}' displayed at step {}", tag, step);
        Ok(())
    }
}

#[cfg(feature = "tensorboard")]
pub use event::*;

#[cfg(feature = "tensorboard")]
mod event {
    use super::*;
    use image::DynamicImage;
    use std::{fs::File, io::BufWriter};
    use tfrecord::{EventWriter, EventWriterConfig};

    /// Writes figures as image summaries to tensorboard event files.
    #[derive(Debug)]
    pub struct EventSink {
        event_writer: EventWriter<BufWriter<File>>,
    }

    impl EventSink {
        pub fn new<P>(dir: P) -> Result<Self>
        where
            P: AsRef<Path>,
        {
            let dir = dir.as_ref();
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create directory {}", dir.display()))?;
            let event_path_prefix = dir
                .join("spair-debug")
                .into_os_string()
                .into_string()
                .map_err(|path| format_err!("non-unicode path {:?}", path))?;

            let event_writer =
                EventWriter::from_prefix(event_path_prefix, "", EventWriterConfig::default())?;
            Ok(Self { event_writer })
        }
    }

    impl FigureSink for EventSink {
        fn record(&mut self, tag: &str, figure: &Figure, step: i64) -> Result<()> {
            let image = DynamicImage::ImageRgb8(figure.render());
            self.event_writer.write_image(tag, step, image)?;
            self.event_writer.flush()?;
            debug!("wrote figure '{}' at step {} to event file", tag, step);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::{ImageData, Panel};

    fn sample_figure() -> Result<Figure> {
        let mut figure = Figure::new(40, 20, 1, 2)?;
        figure.add_panel(0, 0, Panel::image(ImageData::Gray(Array2::ones((3, 3)))))?;
        Ok(figure)
    }

    #[test]
    fn figure_path_encodes_tag() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let sink = LocalSink::new(dir.path())?;
        assert_eq!(
            sink.figure_path("z_attr/heatmap", 7),
            dir.path().join("z_attr%2Fheatmap").join("00000007.png")
        );
        assert_eq!(
            sink.figure_path("out_image", 12),
            dir.path().join("out_image").join("00000012.png")
        );
        Ok(())
    }

    #[test]
    fn local_sink_writes_one_file_per_record() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut sink = LocalSink::new(dir.path().join("figures"))?;
        let figure = sample_figure()?;

        sink.record("renderer_analysis", &figure, 3)?;
        let path = sink.figure_path("renderer_analysis", 3);
        assert!(path.is_file());
        let files = fs::read_dir(path.parent().unwrap())?.count();
        assert_eq!(files, 1);

        let saved = image::open(&path)?.to_rgb8();
        assert_eq!(saved.dimensions(), (40, 20));
        assert_eq!(saved, figure.render());
        Ok(())
    }

    #[test]
    fn boxed_sink_forwards() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut sink: Box<dyn FigureSink> = Box::new(LocalSink::new(dir.path())?);
        sink.record("boxed", &sample_figure()?, 0)?;
        assert!(dir.path().join("boxed").join("00000000.png").is_file());
        Ok(())
    }

    #[cfg(feature = "tensorboard")]
    #[test]
    fn event_sink_writes_event_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut sink = EventSink::new(dir.path().join("events"))?;
        sink.record("renderer_analysis", &sample_figure()?, 1)?;

        let file_names: Vec<_> = fs::read_dir(dir.path().join("events"))?
            .map(|entry| Ok(entry?.file_name().to_string_lossy().into_owned()))
            .collect::<Result<_>>()?;
        assert_eq!(file_names.len(), 1);
        assert!(file_names[0].starts_with("spair-debug.out.tfevents."));
        Ok(())
    }
}
