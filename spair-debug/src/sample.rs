//! Random model outputs used to exercise the debug views without a model.

use crate::{
    common::*,
    config::PlotConfig,
    plot::{Plotter, PrerenderComponents},
    sink::FigureSink,
    stopwatch::Stopwatch,
};
use rand::prelude::*;

/// The side length of object glimpses.
pub const GLIMPSE_SIZE: usize = 28;
/// The length of the object attribute vectors.
pub const ATTR_DIM: usize = 8;

/// A full set of tensors accepted by the debug views.
#[derive(Debug, Clone)]
pub struct SampleInputs {
    pub obj_vec: ArrayD<f32>,
    pub z_pres: ArrayD<f32>,
    pub z_depth: ArrayD<f32>,
    pub bounding_box: ArrayD<f32>,
    pub input_image: ArrayD<f32>,
    pub cropped_input_images: ArrayD<f32>,
    pub z_attr: ArrayD<f32>,
    pub output_image: ArrayD<f32>,
}

impl SampleInputs {
    /// Draws uniform values shaped after the grid layout and image size.
    pub fn random<R>(config: &PlotConfig, rng: &mut R) -> Self
    where
        R: Rng,
    {
        let PlotConfig {
            grid, image_size, ..
        } = *config;
        let [batch_size, rows, cols] = grid.dims();
        let cells = grid.len();
        let image_size = (image_size.raw().round() as usize).max(1);

        let mut uniform = |dims: &[usize], high: f32| -> ArrayD<f32> {
            ArrayD::from_shape_fn(IxDyn(dims), |_| rng.gen_range(0.0..high))
        };

        let obj_vec = uniform(&[cells, GLIMPSE_SIZE, GLIMPSE_SIZE, 3], 1.0);
        let z_pres = uniform(&[cells, 1], 1.0);
        let z_depth = uniform(&[cells, 1], 4.0);
        let mut bounding_box = uniform(&[cells, 4], 1.0);
        // keep boxes small relative to the image
        for mut xywh in bounding_box.rows_mut() {
            xywh[2] *= 0.2;
            xywh[3] *= 0.2;
        }
        let input_image = uniform(&[batch_size, 1, image_size, image_size], 1.0);
        let cropped_input_images =
            uniform(&[batch_size, 1, GLIMPSE_SIZE, GLIMPSE_SIZE, rows, cols], 1.0);
        let z_attr = uniform(&[batch_size, ATTR_DIM, rows, cols], 1.0);
        let output_image = uniform(&[batch_size, 1, image_size, image_size], 1.0);

        Self {
            obj_vec,
            z_pres,
            z_depth,
            bounding_box,
            input_image,
            cropped_input_images,
            z_attr,
            output_image,
        }
    }

    /// Records every debug view of the inputs at a step.
    pub fn plot_all<S>(&self, plotter: &mut Plotter<S>, step: i64) -> Result<()>
    where
        S: FigureSink,
    {
        let mut stopwatch = Stopwatch::new();

        plotter.plot_prerender_components(
            &PrerenderComponents {
                obj_vec: &self.obj_vec,
                z_pres: &self.z_pres,
                z_depth: &self.z_depth,
                bounding_box: &self.bounding_box,
                input_image: &self.input_image,
            },
            step,
        )?;
        stopwatch.lap("prerender components");

        plotter.plot_cropped_input_images(&self.cropped_input_images, step)?;
        stopwatch.lap("cropped input images");

        plotter.plot_object_attr_latent(&self.z_attr, step)?;
        stopwatch.lap("object attribute latent");

        plotter.plot_output_image(&self.output_image, Some(&self.input_image), 0, step)?;
        stopwatch.lap("output image");

        plotter.plot_debug_rendered_output(&self.output_image, step)?;
        stopwatch.report();

        Ok(())
    }
}
