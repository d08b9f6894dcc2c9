//! Composite debug views of the object model.
//!
//! Each view has a pure builder returning a [Figure] and a [Plotter] method
//! that builds the figure and records it to the sink at a step.

use crate::{
    colormap::{ColorMap, Normalize},
    common::*,
    config::{GridLayout, PlotConfig},
    convert::{add_border, chw_to_hwc, ensure_shape, tile_cells, to_grid_array, IntoHostArray},
    figure::Figure,
    panel::{ImageData, Panel},
    sink::FigureSink,
};

pub const RENDERER_ANALYSIS_TAG: &str = "renderer_analysis";
pub const CROPPED_INPUT_TAG: &str = "debug_cropped_input_images";
pub const ATTR_LATENT_TAG: &str = "z_attr/heatmap";
pub const OUTPUT_IMAGE_TAG: &str = "out_image";

/// The per-cell outputs of the object model before rendering.
#[derive(Debug)]
pub struct PrerenderComponents<'a, T>
where
    T: ?Sized,
{
    /// Object appearance, alpha and importance, `(cells, glimpse, glimpse, 3)`.
    pub obj_vec: &'a T,
    /// Presence, `(cells,)` or `(cells, 1)`.
    pub z_pres: &'a T,
    /// Depth, `(cells,)` or `(cells, 1)`.
    pub z_depth: &'a T,
    /// Normalized `(x, y, w, h)` boxes, `(cells, 4)`.
    pub bounding_box: &'a T,
    /// Input images, `(batch, 1, height, width)`.
    pub input_image: &'a T,
}

/// Builds the 2×3 overview of the rendering components of batch element 0.
pub fn prerender_components_figure<T>(
    config: &PlotConfig,
    components: &PrerenderComponents<'_, T>,
) -> Result<Figure>
where
    T: IntoHostArray + ?Sized,
{
    let PlotConfig {
        grid,
        image_size,
        dpi,
    } = *config;
    let PrerenderComponents {
        obj_vec,
        z_pres,
        z_depth,
        bounding_box,
        input_image,
    } = *components;

    // object mosaic, (rows * glimpse, cols * glimpse, 3)
    let obj_vec = to_grid_array(obj_vec, &grid)?;
    ensure_shape(
        "obj_vec",
        obj_vec.shape(),
        &Shape::from([Dim::Infer, Dim::Infer, Dim::Infer, Dim::Infer, Dim::Infer, Dim::Size(3)]),
    )?;
    let mosaic = tile_cells(obj_vec.index_axis(Axis(0), 0))?.into_dimensionality::<Ix3>()?;
    let channel = |index: usize| mosaic.index_axis(Axis(2), index).to_owned();

    let z_pres = first_cell_map("z_pres", z_pres, &grid)?;
    let z_depth = first_cell_map("z_depth", z_depth, &grid)?;

    let bounding_box = to_grid_array(bounding_box, &grid)?;
    ensure_shape(
        "bounding_box",
        bounding_box.shape(),
        &Shape::from([Dim::Infer, Dim::Infer, Dim::Infer, Dim::Size(4)]),
    )?;
    let boxes = bounding_box
        .index_axis(Axis(0), 0)
        .into_dimensionality::<Ix3>()?;

    let input_image = input_image.to_host_array()?;
    ensure_shape(
        "input_image",
        input_image.shape(),
        &Shape::from([Dim::Infer, Dim::Size(1), Dim::Infer, Dim::Infer]),
    )?;
    let input_image = chw_to_hwc(input_image.view(), 0)?.into_dimensionality::<Ix2>()?;

    let mut figure = Figure::with_inches(10.0, 7.0, dpi, 2, 3)?;
    figure.add_panel(
        0,
        0,
        Panel::image(ImageData::Gray(channel(0))).with_title("rendered_obj"),
    )?;
    figure.add_panel(0, 1, Panel::heatmap("alpha", channel(1), ColorMap::Spring)?)?;
    figure.add_panel(0, 2, Panel::heatmap("importance", channel(2), ColorMap::Summer)?)?;
    figure.add_panel(
        1,
        0,
        Panel::bounding_boxes(
            "bounding boxes",
            input_image,
            boxes,
            image_size.raw() as f32,
        )?,
    )?;
    figure.add_panel(1, 1, Panel::heatmap("z_depth", z_depth, ColorMap::Autumn)?)?;
    figure.add_panel(1, 2, Panel::heatmap("z_presence", z_pres, ColorMap::Winter)?)?;

    Ok(figure)
}

/// Builds the bordered mosaic of the per-object crops of batch element 0.
///
/// The input has shape `(batch, 1, crop_h, crop_w, rows, cols)`.
pub fn cropped_input_figure<T>(config: &PlotConfig, cropped_input_images: &T) -> Result<Figure>
where
    T: IntoHostArray + ?Sized,
{
    let crops = cropped_input_images.to_host_array()?;
    ensure_shape(
        "cropped_input_images",
        crops.shape(),
        &Shape::from([
            Dim::Infer,
            Dim::Size(1),
            Dim::Infer,
            Dim::Infer,
            Dim::Infer,
            Dim::Infer,
        ]),
    )?;

    // (crop_h, crop_w, rows, cols) -> (rows, cols, crop_h, crop_w)
    let cells = crops
        .index_axis(Axis(0), 0)
        .index_axis_move(Axis(0), 0)
        .permuted_axes(IxDyn(&[2, 3, 0, 1]))
        .into_dimensionality::<Ix4>()?;
    let bordered = add_border(cells, 1.0);
    let mosaic = tile_cells(bordered.view().into_dyn())?.into_dimensionality::<Ix2>()?;

    let mut figure = Figure::with_inches(10.0, 10.0, config.dpi, 1, 1)?;
    figure.add_panel(0, 0, Panel::image(ImageData::Gray(mosaic)))?;
    Ok(figure)
}

/// Builds the max, mean and min maps over the attribute channels of batch element 0.
///
/// The input has shape `(batch, attr_dim, height, width)`.
pub fn attr_latent_figure<T>(config: &PlotConfig, z_attr: &T) -> Result<Figure>
where
    T: IntoHostArray + ?Sized,
{
    let z_attr = z_attr.to_host_array()?;
    ensure_shape("z_attr", z_attr.shape(), &Shape::new(&[None; 4]))?;
    ensure!(
        z_attr.shape()[0] > 0 && z_attr.shape()[1] > 0,
        "z_attr has shape {:?}, but expect non-empty batch and attribute dimensions",
        z_attr.shape()
    );
    let z_attr = z_attr.index_axis(Axis(0), 0).into_dimensionality::<Ix3>()?;

    // NaN in any channel yields NaN in the reduced maps
    let max = z_attr.fold_axis(Axis(0), f32::NEG_INFINITY, |&lhs, &rhs| {
        if lhs.is_nan() || rhs.is_nan() {
            f32::NAN
        } else {
            lhs.max(rhs)
        }
    });
    let mean = z_attr
        .mean_axis(Axis(0))
        .ok_or_else(|| format_err!("cannot average over empty attributes"))?;
    let min = z_attr.fold_axis(Axis(0), f32::INFINITY, |&lhs, &rhs| {
        if lhs.is_nan() || rhs.is_nan() {
            f32::NAN
        } else {
            lhs.min(rhs)
        }
    });

    let mut figure = Figure::with_inches(7.0, 2.5, config.dpi, 1, 3)?;
    for (col, (title, map)) in izip!(["Max", "Mean", "Min"], [max, mean, min]).enumerate() {
        figure.add_panel(0, col, Panel::heatmap(title, map, ColorMap::Spring)?)?;
    }
    Ok(figure)
}

/// Builds the view of an output image, optionally followed by the input image.
///
/// Images have shape `(batch, channel, height, width)`. Single-channel images
/// are stretched over their own value range, RGB images are shown as is.
pub fn output_image_figure<T>(
    config: &PlotConfig,
    output: &T,
    input: Option<&T>,
    batch_index: usize,
) -> Result<Figure>
where
    T: IntoHostArray + ?Sized,
{
    let to_image = |tensor: &T| -> Result<ImageData> {
        let images = tensor.to_host_array()?;
        let image = match ImageData::from_array(chw_to_hwc(images.view(), batch_index)?)? {
            ImageData::Gray(gray) => {
                let norm = Normalize::from_data(&gray);
                ImageData::Gray(gray.mapv(|value| norm.apply(value)))
            }
            rgb => rgb,
        };
        Ok(image)
    };

    let output = Panel::image(to_image(output)?).with_title(OUTPUT_IMAGE_TAG);
    let input = input.map(to_image).transpose()?.map(Panel::image);
    let cols = if input.is_some() { 2 } else { 1 };

    let mut figure = Figure::with_inches(6.4 * cols as f64, 4.8, config.dpi, 1, cols)?;
    figure.add_panel(0, 0, output)?;
    if let Some(input) = input {
        figure.add_panel(0, 1, input)?;
    }
    Ok(figure)
}

/// Takes the `(rows, cols)` map of batch element 0 from a per-cell scalar.
fn first_cell_map<T>(name: &str, tensor: &T, grid: &GridLayout) -> Result<Array2<f32>>
where
    T: IntoHostArray + ?Sized,
{
    let array = to_grid_array(tensor, grid)?;
    let map = match array.ndim() {
        3 => array.index_axis_move(Axis(0), 0),
        _ => {
            ensure_shape(
                name,
                array.shape(),
                &Shape::from([Dim::Infer, Dim::Infer, Dim::Infer, Dim::Size(1)]),
            )?;
            array
                .index_axis_move(Axis(0), 0)
                .index_axis_move(Axis(2), 0)
        }
    };
    Ok(map.into_dimensionality::<Ix2>()?)
}

/// Builds debug views and records them to a sink.
#[derive(Debug)]
pub struct Plotter<S = Box<dyn FigureSink>>
where
    S: FigureSink,
{
    config: PlotConfig,
    sink: S,
}

impl<S> Plotter<S>
where
    S: FigureSink,
{
    pub fn new(config: PlotConfig, sink: S) -> Self {
        Self { config, sink }
    }

    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn plot_prerender_components<T>(
        &mut self,
        components: &PrerenderComponents<'_, T>,
        step: i64,
    ) -> Result<()>
    where
        T: IntoHostArray + ?Sized,
    {
        let figure = prerender_components_figure(&self.config, components)?;
        self.sink.record(RENDERER_ANALYSIS_TAG, &figure, step)
    }

    pub fn plot_cropped_input_images<T>(&mut self, cropped_input_images: &T, step: i64) -> Result<()>
    where
        T: IntoHostArray + ?Sized,
    {
        let figure = cropped_input_figure(&self.config, cropped_input_images)?;
        self.sink.record(CROPPED_INPUT_TAG, &figure, step)
    }

    pub fn plot_object_attr_latent<T>(&mut self, z_attr: &T, step: i64) -> Result<()>
    where
        T: IntoHostArray + ?Sized,
    {
        self.plot_object_attr_latent_with_tag(z_attr, step, ATTR_LATENT_TAG)
    }

    pub fn plot_object_attr_latent_with_tag<T>(
        &mut self,
        z_attr: &T,
        step: i64,
        tag: &str,
    ) -> Result<()>
    where
        T: IntoHostArray + ?Sized,
    {
        let figure = attr_latent_figure(&self.config, z_attr)?;
        self.sink.record(tag, &figure, step)
    }

    pub fn plot_output_image<T>(
        &mut self,
        output: &T,
        input: Option<&T>,
        batch_index: usize,
        step: i64,
    ) -> Result<()>
    where
        T: IntoHostArray + ?Sized,
    {
        let figure = output_image_figure(&self.config, output, input, batch_index)?;
        self.sink.record(OUTPUT_IMAGE_TAG, &figure, step)
    }

    /// Reserved for the rendered output. Records nothing.
    pub fn plot_debug_rendered_output<T>(&mut self, rendered: &T, step: i64) -> Result<()>
    where
        T: IntoHostArray + ?Sized,
    {
        let _ = (rendered, step);
        Ok(())
    }
}
