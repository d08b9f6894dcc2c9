//! Debug visualization of the per-cell outputs of a SPAIR-style object model.

mod common;

pub mod canvas;
pub mod colormap;
pub mod config;
pub mod convert;
pub mod figure;
pub mod panel;
pub mod plot;
pub mod sample;
pub mod sink;
pub mod stopwatch;

pub use convert::{to_host_array, IntoHostArray};
pub use figure::Figure;
pub use plot::{Plotter, PrerenderComponents};
pub use sink::{FigureSink, LocalSink};
pub use stopwatch::Stopwatch;

use crate::{common::*, config::Config, sample::SampleInputs};

/// Renders every debug view from random inputs into the configured sink.
pub fn start(config: &Config, steps: usize) -> Result<()> {
    let sink = config.sink.build()?;
    let mut plotter = Plotter::new(config.plot.clone(), sink);
    let mut rng = rand::thread_rng();

    info!(
        "render {} steps with grid layout {}",
        steps, config.plot.grid
    );

    for step in 0..steps {
        let stopwatch = run_step(&mut plotter, &mut rng, step as i64)?;
        stopwatch.report();
    }

    Ok(())
}

/// Samples inputs and records all views at one step, timing both phases.
fn run_step<S, R>(plotter: &mut Plotter<S>, rng: &mut R, step: i64) -> Result<Stopwatch>
where
    S: FigureSink,
    R: rand::Rng,
{
    let mut stopwatch = Stopwatch::new();
    let inputs = SampleInputs::random(plotter.config(), rng);
    stopwatch.lap(format!("sample inputs at step {}", step));
    inputs.plot_all(plotter, step)?;
    stopwatch.lap(format!("plot step {}", step));
    Ok(stopwatch)
}
