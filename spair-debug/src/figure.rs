//! A grid of panels rendered to a single raster.

use crate::{canvas::WHITE, common::*, panel::Panel};
use image::imageops;

/// A figure holding panels in a `rows × cols` grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    width: u32,
    height: u32,
    rows: usize,
    cols: usize,
    panels: Vec<(usize, usize, Panel)>,
}

impl Figure {
    pub fn new(width: u32, height: u32, rows: usize, cols: usize) -> Result<Self> {
        ensure!(
            width > 0 && height > 0,
            "figure size must be positive, but get {}x{}",
            width,
            height
        );
        ensure!(
            rows > 0 && cols > 0,
            "figure grid must be positive, but get {}x{}",
            rows,
            cols
        );
        ensure!(
            width as usize >= cols && height as usize >= rows,
            "figure of {}x{} pixels is too small for a {}x{} grid",
            width,
            height,
            rows,
            cols
        );

        Ok(Self {
            width,
            height,
            rows,
            cols,
            panels: vec![],
        })
    }

    /// Creates a figure sized in inches at the given resolution.
    pub fn with_inches(
        width_in: f64,
        height_in: f64,
        dpi: NonZeroUsize,
        rows: usize,
        cols: usize,
    ) -> Result<Self> {
        ensure!(
            width_in > 0.0 && height_in > 0.0,
            "figure size must be positive, but get {}x{} inches",
            width_in,
            height_in
        );
        let dpi = dpi.get() as f64;
        let width = (width_in * dpi).round() as u32;
        let height = (height_in * dpi).round() as u32;
        Self::new(width, height, rows, cols)
    }

    /// Places a panel at a grid slot. Each slot holds at most one panel.
    pub fn add_panel(&mut self, row: usize, col: usize, panel: Panel) -> Result<()> {
        ensure!(
            row < self.rows && col < self.cols,
            "slot ({}, {}) is out of the {}x{} grid",
            row,
            col,
            self.rows,
            self.cols
        );
        ensure!(
            self.panel(row, col).is_none(),
            "slot ({}, {}) is already occupied",
            row,
            col
        );
        self.panels.push((row, col, panel));
        Ok(())
    }

    pub fn panel(&self, row: usize, col: usize) -> Option<&Panel> {
        self.panels
            .iter()
            .find(|(r, c, _)| *r == row && *c == col)
            .map(|(_, _, panel)| panel)
    }

    pub fn panels(&self) -> impl Iterator<Item = (usize, usize, &Panel)> {
        self.panels.iter().map(|(row, col, panel)| (*row, *col, panel))
    }

    /// The panel titles in insertion order.
    pub fn titles(&self) -> Vec<&str> {
        self.panels
            .iter()
            .filter_map(|(_, _, panel)| panel.title())
            .collect()
    }

    /// The `(width, height)` in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The `(rows, cols)` of the panel grid.
    pub fn grid(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Renders all panels onto a white raster of the figure size.
    pub fn render(&self) -> RgbImage {
        let mut canvas = RgbImage::from_pixel(self.width, self.height, WHITE);
        let slot_w = self.width / self.cols as u32;
        let slot_h = self.height / self.rows as u32;
        let margin = slot_w.min(slot_h) / 16;
        let panel_w = slot_w.saturating_sub(2 * margin).max(1);
        let panel_h = slot_h.saturating_sub(2 * margin).max(1);

        for (row, col, panel) in self.panels() {
            let top = row as u32 * slot_h + margin;
            let left = col as u32 * slot_w + margin;
            trace!(
                "render panel {:?} at ({}, {}) with size {}x{}",
                panel.title(),
                top,
                left,
                panel_w,
                panel_h
            );
            let raster = panel.render(panel_w, panel_h);
            imageops::replace(&mut canvas, &raster, left as i64, top as i64);
        }

        canvas
    }
}
