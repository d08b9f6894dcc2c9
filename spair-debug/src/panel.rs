//! Image, heatmap and bounding box panels.

use crate::{
    canvas::{blit_with, draw_outline, Placement, BLACK, RED, WHITE},
    colormap::{ColorMap, Normalize},
    common::*,
};

/// The width of the colorbar relative to the panel width.
const COLORBAR_FRACTION: f32 = 0.03;
/// The gap between a heatmap and its colorbar relative to the panel width.
const COLORBAR_PAD: f32 = 0.04;
const MIN_COLORBAR_WIDTH: u32 = 4;

/// Image data with values in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub enum ImageData {
    Gray(Array2<f32>),
    Rgb(Array3<f32>),
}

impl ImageData {
    /// Accepts `(height, width)` gray images and `(height, width, 3)` RGB images.
    pub fn from_array(array: ArrayD<f32>) -> Result<Self> {
        let shape = array.shape().to_vec();
        let image = match shape.as_slice() {
            [_, _] => Self::Gray(array.into_dimensionality::<Ix2>()?),
            [_, _, 3] => Self::Rgb(array.into_dimensionality::<Ix3>()?),
            shape => bail!(
                "image has shape {:?}, but expect [_, _] or [_, _, 3]",
                shape
            ),
        };
        ensure!(
            image.height() > 0 && image.width() > 0,
            "image must not be empty"
        );
        Ok(image)
    }

    pub fn height(&self) -> usize {
        match self {
            Self::Gray(array) => array.nrows(),
            Self::Rgb(array) => array.shape()[0],
        }
    }

    pub fn width(&self) -> usize {
        match self {
            Self::Gray(array) => array.ncols(),
            Self::Rgb(array) => array.shape()[1],
        }
    }

    fn hw(&self) -> [usize; 2] {
        [self.height(), self.width()]
    }

    fn color(&self, row: usize, col: usize) -> Rgb<u8> {
        match self {
            Self::Gray(array) => ColorMap::Gray.color(array[[row, col]]),
            Self::Rgb(array) => {
                let channel = |index: usize| ColorMap::Gray.color(array[[row, col, index]])[0];
                Rgb([channel(0), channel(1), channel(2)])
            }
        }
    }
}

/// A panel of a figure.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: Option<String>,
    pub kind: PanelKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelKind {
    /// An image shown with values fixed to [0, 1].
    Image(ImageData),
    /// A scalar map normalized to its own range, with a colorbar.
    Heatmap { data: Array2<f32>, cmap: ColorMap },
    /// Unfilled red rectangles over a gray image, in image pixel coordinates.
    BoundingBoxes {
        image: Array2<f32>,
        boxes: Vec<TLBR<f32>>,
    },
}

impl Panel {
    pub fn image(image: ImageData) -> Self {
        Self {
            title: None,
            kind: PanelKind::Image(image),
        }
    }

    pub fn heatmap<S>(title: S, data: Array2<f32>, cmap: ColorMap) -> Result<Self>
    where
        S: Into<String>,
    {
        let title = title.into();
        ensure!(!data.is_empty(), "heatmap '{}' must not be empty", title);
        Ok(Self {
            title: Some(title),
            kind: PanelKind::Heatmap { data, cmap },
        })
    }

    /// Builds an overlay from a `(rows, cols, 4)` grid of `(x, y, w, h)` boxes.
    ///
    /// Box coordinates are multiplied by `scale` to get image pixels.
    pub fn bounding_boxes<S>(
        title: S,
        image: Array2<f32>,
        boxes: ArrayView3<'_, f32>,
        scale: f32,
    ) -> Result<Self>
    where
        S: Into<String>,
    {
        let title = title.into();
        ensure!(!image.is_empty(), "image of '{}' must not be empty", title);
        ensure!(
            boxes.shape()[2] == 4,
            "boxes of '{}' has shape {:?}, but expect [_, _, 4]",
            title,
            boxes.shape()
        );

        let transform = Transform::from_scale(scale);
        let boxes: Vec<_> = boxes
            .rows()
            .into_iter()
            .map(|xywh| {
                TLBR::from_signed_xywh([xywh[0], xywh[1], xywh[2], xywh[3]]).transform(&transform)
            })
            .collect();

        Ok(Self {
            title: Some(title),
            kind: PanelKind::BoundingBoxes { image, boxes },
        })
    }

    pub fn with_title<S>(mut self, title: S) -> Self
    where
        S: Into<String>,
    {
        self.title = Some(title.into());
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Renders the panel into a `width × height` raster with white background.
    pub fn render(&self, width: u32, height: u32) -> RgbImage {
        let mut canvas = RgbImage::from_pixel(width, height, WHITE);

        match &self.kind {
            PanelKind::Image(image) => {
                if let Some(placement) = Placement::fit(image.hw(), [height, width]) {
                    blit_with(&mut canvas, &placement, image.hw(), |row, col| {
                        image.color(row, col)
                    });
                }
            }
            PanelKind::Heatmap { data, cmap } => {
                render_heatmap(&mut canvas, data, *cmap);
            }
            PanelKind::BoundingBoxes { image, boxes } => {
                render_bounding_boxes(&mut canvas, image, boxes);
            }
        }

        canvas
    }
}

fn render_heatmap(canvas: &mut RgbImage, data: &Array2<f32>, cmap: ColorMap) {
    let (width, height) = canvas.dimensions();
    let bar_width = ((width as f32 * COLORBAR_FRACTION).ceil() as u32).max(MIN_COLORBAR_WIDTH);
    let pad = (width as f32 * COLORBAR_PAD).round() as u32;
    let map_width = match width.checked_sub(bar_width + pad) {
        Some(map_width) if map_width > 0 => map_width,
        _ => {
            trace!("panel is too narrow for a colorbar");
            return;
        }
    };

    let data_hw = [data.nrows(), data.ncols()];
    let placement = match Placement::fit(data_hw, [height, map_width]) {
        Some(placement) => placement,
        None => return,
    };
    let norm = Normalize::from_data(data.iter());
    blit_with(canvas, &placement, data_hw, |row, col| {
        cmap.color(norm.apply(data[[row, col]]))
    });

    // colorbar with the maximum on top
    let bar_left = placement.left + placement.width + pad;
    let bar_top = placement.top;
    let bar_height = placement.height;
    let colorbar = RgbImage::from_fn(bar_width, bar_height, |_, y| {
        cmap.color(1.0 - (y as f32 + 0.5) / bar_height as f32)
    });
    image::imageops::replace(canvas, &colorbar, bar_left as i64, bar_top as i64);
    draw_outline(
        canvas,
        [
            bar_top as f32,
            bar_left as f32,
            (bar_top + bar_height) as f32,
            (bar_left + bar_width) as f32,
        ],
        BLACK,
    );
}

fn render_bounding_boxes(canvas: &mut RgbImage, base: &Array2<f32>, boxes: &[TLBR<f32>]) {
    let (width, height) = canvas.dimensions();
    let image_hw = [base.nrows(), base.ncols()];
    let placement = match Placement::fit(image_hw, [height, width]) {
        Some(placement) => placement,
        None => return,
    };
    blit_with(canvas, &placement, image_hw, |row, col| {
        ColorMap::Gray.color(base[[row, col]])
    });

    // boxes are clipped to the image area
    let mut overlay = image::imageops::crop_imm(
        &*canvas,
        placement.left,
        placement.top,
        placement.width,
        placement.height,
    )
    .to_image();
    let to_overlay = Transform::from_scale(placement.scale);

    for tlbr in boxes {
        let tlbr = tlbr.transform(&to_overlay).tlbr();
        if !tlbr.iter().all(|value| value.is_finite()) {
            debug!("skip non-finite bounding box {:?}", tlbr);
            continue;
        }
        draw_outline(&mut overlay, tlbr, RED);
    }

    image::imageops::replace(canvas, &overlay, placement.left as i64, placement.top as i64);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array;

    fn count_color(image: &RgbImage, color: Rgb<u8>) -> usize {
        image.pixels().filter(|&&pixel| pixel == color).count()
    }

    #[test]
    fn image_data_from_array() -> Result<()> {
        let gray = ImageData::from_array(ArrayD::zeros(IxDyn(&[28, 20])))?;
        assert!(matches!(gray, ImageData::Gray(_)));
        assert_eq!((gray.height(), gray.width()), (28, 20));

        let rgb = ImageData::from_array(ArrayD::zeros(IxDyn(&[28, 20, 3])))?;
        assert!(matches!(rgb, ImageData::Rgb(_)));

        assert!(ImageData::from_array(ArrayD::zeros(IxDyn(&[28, 20, 2]))).is_err());
        assert!(ImageData::from_array(ArrayD::zeros(IxDyn(&[0, 20]))).is_err());
        Ok(())
    }

    #[test]
    fn image_panel_fixed_range() {
        let data = Array::from_shape_vec((1, 3), vec![-1.0, 0.5, 2.0]).unwrap();
        let panel = Panel::image(ImageData::Gray(data)).with_title("rendered_obj");
        assert_eq!(panel.title(), Some("rendered_obj"));

        let raster = panel.render(3, 1);
        assert_eq!(*raster.get_pixel(0, 0), Rgb([0, 0, 0]));
        assert_eq!(*raster.get_pixel(1, 0), Rgb([128, 128, 128]));
        assert_eq!(*raster.get_pixel(2, 0), Rgb([255, 255, 255]));
    }

    #[test]
    fn heatmap_panel_normalizes_and_adds_colorbar() -> Result<()> {
        let data = Array::from_shape_vec((2, 2), vec![1.0, 2.0, 3.0, 5.0]).unwrap();
        let panel = Panel::heatmap("z_depth", data, ColorMap::Autumn)?;
        let raster = panel.render(100, 60);

        // minimum at the top-left cell, maximum at the bottom-right cell
        let placement = Placement::fit([2, 2], [60, 100 - 4 - 4]).unwrap();
        let (top, left) = (placement.top, placement.left);
        let last = placement.height - 1;
        assert_eq!(*raster.get_pixel(left, top), ColorMap::Autumn.color(0.0));
        assert_eq!(
            *raster.get_pixel(left + last, top + last),
            ColorMap::Autumn.color(1.0)
        );

        // colorbar outline
        let bar_left = left + placement.width + 4;
        assert_eq!(*raster.get_pixel(bar_left, top + 5), BLACK);
        assert_ne!(*raster.get_pixel(bar_left + 1, top + 5), WHITE);

        assert!(Panel::heatmap("empty", Array2::zeros((0, 3)), ColorMap::Spring).is_err());
        Ok(())
    }

    #[test]
    fn unit_bounding_box_covers_image() -> Result<()> {
        let image = Array2::<f32>::zeros((128, 128));
        let boxes = Array::from_shape_vec((1, 1, 4), vec![0.0, 0.0, 1.0, 1.0]).unwrap();
        let panel = Panel::bounding_boxes("bounding boxes", image, boxes.view(), 128.0)?;

        match &panel.kind {
            PanelKind::BoundingBoxes { boxes, .. } => {
                assert_eq!(boxes.len(), 1);
                assert_eq!(boxes[0].tlbr(), [0.0, 0.0, 128.0, 128.0]);
            }
            _ => unreachable!(),
        }

        let raster = panel.render(128, 128);
        assert_eq!(*raster.get_pixel(0, 0), RED);
        assert_eq!(*raster.get_pixel(127, 0), RED);
        assert_eq!(*raster.get_pixel(0, 127), RED);
        assert_eq!(*raster.get_pixel(127, 127), RED);
        assert_eq!(*raster.get_pixel(64, 64), Rgb([0, 0, 0]));
        assert_eq!(count_color(&raster, RED), 4 * 127);
        Ok(())
    }

    #[test]
    fn bounding_boxes_follow_grid_order() -> Result<()> {
        let image = Array2::<f32>::zeros((10, 10));
        let boxes = Array::from_shape_fn((2, 3, 4), |(row, col, index)| match index {
            0 => col as f32,
            1 => row as f32,
            _ => 0.5,
        });
        let panel = Panel::bounding_boxes("bounding boxes", image, boxes.view(), 2.0)?;

        match &panel.kind {
            PanelKind::BoundingBoxes { boxes, .. } => {
                assert_eq!(boxes.len(), 6);
                assert_eq!(boxes[5].tlbr(), [2.0, 4.0, 3.0, 5.0]);
            }
            _ => unreachable!(),
        }

        let wrong = Array3::<f32>::zeros((2, 3, 5));
        assert!(
            Panel::bounding_boxes("bounding boxes", Array2::zeros((4, 4)), wrong.view(), 1.0)
                .is_err()
        );
        Ok(())
    }

    #[test]
    fn huge_bounding_box_is_clipped_away() -> Result<()> {
        let image = Array2::<f32>::zeros((32, 32));
        let boxes = Array::from_shape_vec((1, 1, 4), vec![1e17, 1e17, 0.5, 0.5]).unwrap();
        let panel = Panel::bounding_boxes("bounding boxes", image, boxes.view(), 128.0)?;

        let raster = panel.render(32, 32);
        assert_eq!(count_color(&raster, RED), 0);
        Ok(())
    }
}
