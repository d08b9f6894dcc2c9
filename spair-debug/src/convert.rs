//! Conversion from tensors to host arrays.

use crate::{common::*, config::GridLayout};

/// Types that can be copied into a host-memory `f32` array.
pub trait IntoHostArray {
    fn to_host_array(&self) -> Result<ArrayD<f32>>;
}

impl<S, D> IntoHostArray for ArrayBase<S, D>
where
    S: Data<Elem = f32>,
    D: Dimension,
{
    fn to_host_array(&self) -> Result<ArrayD<f32>> {
        Ok(self.view().into_dyn().as_standard_layout().into_owned())
    }
}

#[cfg(feature = "with-tch")]
mod with_tch {
    use super::*;
    use std::convert::TryFrom;
    use tch::{Device, Kind, Tensor};

    impl IntoHostArray for Tensor {
        fn to_host_array(&self) -> Result<ArrayD<f32>> {
            let tensor = tch::no_grad(|| {
                self.detach()
                    .to_device(Device::Cpu)
                    .to_kind(Kind::Float)
                    .contiguous()
            });
            let array = ArrayD::<f32>::try_from(&tensor)?;
            Ok(array)
        }
    }
}

/// Copies a tensor to the host.
///
/// With a grid layout, the leading dimension is split into
/// `(batch_size, rows, cols)` and all singleton dimensions are then removed.
pub fn to_host_array<T>(tensor: &T, grid: Option<&GridLayout>) -> Result<ArrayD<f32>>
where
    T: IntoHostArray + ?Sized,
{
    let array = tensor.to_host_array()?;
    match grid {
        Some(grid) => Ok(squeeze(reshape_grid(array, grid)?)),
        None => Ok(array),
    }
}

/// Copies a tensor to the host and splits its leading dimension by the grid
/// layout, keeping singleton dimensions.
pub fn to_grid_array<T>(tensor: &T, grid: &GridLayout) -> Result<ArrayD<f32>>
where
    T: IntoHostArray + ?Sized,
{
    reshape_grid(tensor.to_host_array()?, grid)
}

/// Splits the leading dimension into `(batch_size, rows, cols)`.
pub fn reshape_grid(array: ArrayD<f32>, grid: &GridLayout) -> Result<ArrayD<f32>> {
    let (&len, rest) = array
        .shape()
        .split_first()
        .ok_or_else(|| format_err!("cannot split the leading dimension of a scalar"))?;
    ensure!(
        len == grid.len(),
        "the leading dimension {} does not match the grid layout {} of {} cells",
        len,
        grid,
        grid.len()
    );

    let dims: Vec<usize> = grid
        .dims()
        .into_iter()
        .chain(rest.iter().cloned())
        .collect();
    let array = if array.is_standard_layout() {
        array
    } else {
        array.as_standard_layout().into_owned()
    };
    let array = array.into_shape(IxDyn(&dims))?;
    Ok(array)
}

/// Removes all dimensions of size one.
pub fn squeeze(mut array: ArrayD<f32>) -> ArrayD<f32> {
    for axis in (0..array.ndim()).rev() {
        if array.shape()[axis] == 1 {
            array = array.index_axis_move(Axis(axis), 0);
        }
    }
    array
}

/// Selects an image from a `(batch, channel, height, width)` array and
/// reorders it to `(height, width, channel)` with singleton dimensions removed.
pub fn chw_to_hwc(images: ArrayViewD<'_, f32>, batch_index: usize) -> Result<ArrayD<f32>> {
    ensure_shape("images", images.shape(), &Shape::new(&[None; 4]))?;
    let batch_size = images.shape()[0];
    ensure!(
        batch_index < batch_size,
        "batch index {} is out of range for batch size {}",
        batch_index,
        batch_size
    );

    let image = images
        .index_axis_move(Axis(0), batch_index)
        .permuted_axes(IxDyn(&[1, 2, 0]));
    Ok(squeeze(image.as_standard_layout().into_owned()))
}

/// Fails with a labeled error if `actual` does not match the pattern.
pub fn ensure_shape(name: &str, actual: &[usize], expect: &Shape) -> Result<()> {
    ensure!(
        expect.matches(actual),
        "{} has shape {:?}, but expect {}",
        name,
        actual,
        expect
    );
    Ok(())
}

/// Tiles a `(rows, cols, height, width, ..)` grid of cells into a
/// `(rows * height, cols * width, ..)` mosaic.
pub fn tile_cells(cells: ArrayViewD<'_, f32>) -> Result<ArrayD<f32>> {
    ensure!(
        cells.ndim() >= 4,
        "cells has shape {:?}, but expect at least four dimensions",
        cells.shape()
    );
    let shape = cells.shape().to_vec();
    let (rows, cols, height, width) = (shape[0], shape[1], shape[2], shape[3]);

    // (rows, cols, height, width, ..) -> (rows, height, cols, width, ..)
    let axes: Vec<usize> = [0, 2, 1, 3].into_iter().chain(4..shape.len()).collect();
    let dims: Vec<usize> = [rows * height, cols * width]
        .into_iter()
        .chain(shape[4..].iter().cloned())
        .collect();

    let mosaic = cells
        .permuted_axes(IxDyn(&axes))
        .as_standard_layout()
        .into_owned()
        .into_shape(IxDyn(&dims))?;
    Ok(mosaic)
}

/// Surrounds every cell of a `(rows, cols, height, width)` grid with a
/// one-pixel border.
pub fn add_border(cells: ArrayView4<'_, f32>, value: f32) -> Array4<f32> {
    let (rows, cols, height, width) = cells.dim();
    let mut output = Array4::from_elem((rows, cols, height + 2, width + 2), value);
    output
        .slice_mut(s![.., .., 1..height + 1, 1..width + 1])
        .assign(&cells);
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array;

    fn iota(dims: &[usize]) -> ArrayD<f32> {
        let len: usize = dims.iter().product();
        Array::from_iter((0..len).map(|value| value as f32))
            .into_shape(IxDyn(dims))
            .unwrap()
    }

    #[test]
    fn host_array_from_permuted_view() -> Result<()> {
        let array = iota(&[2, 3]);
        let transposed = array.t();
        let host = transposed.to_host_array()?;
        assert_eq!(host.shape(), &[3, 2]);
        assert!(host.is_standard_layout());
        assert_eq!(host[[2, 1]], array[[1, 2]]);
        Ok(())
    }

    #[test]
    fn reshape_and_squeeze_by_grid() -> Result<()> {
        let grid = GridLayout::new(2, 3, 4)?;
        let z_pres = iota(&[24, 1]);

        let kept = to_grid_array(&z_pres, &grid)?;
        assert_eq!(kept.shape(), &[2, 3, 4, 1]);

        let squeezed = to_host_array(&z_pres, Some(&grid))?;
        assert_eq!(squeezed.shape(), &[2, 3, 4]);
        assert_eq!(squeezed[[1, 2, 3]], 23.0);
        assert_eq!(squeezed[[1, 0, 0]], 12.0);

        let untouched = to_host_array(&z_pres, None)?;
        assert_eq!(untouched.shape(), &[24, 1]);
        Ok(())
    }

    #[test]
    fn reshape_rejects_mismatched_grid() -> Result<()> {
        let grid = GridLayout::new(2, 3, 4)?;
        let error = to_grid_array(&iota(&[25, 4]), &grid).unwrap_err();
        assert!(error.to_string().contains("does not match the grid layout"));
        Ok(())
    }

    #[test]
    fn squeeze_removes_all_singletons() {
        let array = iota(&[1, 5, 1, 2, 1]);
        assert_eq!(squeeze(array).shape(), &[5, 2]);
    }

    #[test]
    fn chw_image_to_hwc() -> Result<()> {
        let images = iota(&[2, 3, 28, 28]);
        let image = chw_to_hwc(images.view(), 1)?;
        assert_eq!(image.shape(), &[28, 28, 3]);
        assert_eq!(image[[4, 5, 2]], images[[1, 2, 4, 5]]);

        let gray = iota(&[4, 1, 28, 28]);
        assert_eq!(chw_to_hwc(gray.view(), 0)?.shape(), &[28, 28]);

        assert!(chw_to_hwc(images.view(), 2).is_err());
        assert!(chw_to_hwc(iota(&[3, 28, 28]).view(), 0).is_err());
        Ok(())
    }

    #[test]
    fn tile_cells_into_mosaic() -> Result<()> {
        let cells = iota(&[2, 3, 4, 5, 3]);
        let mosaic = tile_cells(cells.view())?;
        assert_eq!(mosaic.shape(), &[8, 15, 3]);

        for (row, col, y, x, c) in iproduct!(0..2, 0..3, 0..4, 0..5, 0..3) {
            assert_eq!(mosaic[[row * 4 + y, col * 5 + x, c]], cells[[row, col, y, x, c]]);
        }
        Ok(())
    }

    #[test]
    fn border_surrounds_each_cell() {
        let cells = Array4::<f32>::zeros((2, 2, 3, 3));
        let bordered = add_border(cells.view(), 1.0);
        assert_eq!(bordered.dim(), (2, 2, 5, 5));
        assert_eq!(bordered[[1, 1, 0, 2]], 1.0);
        assert_eq!(bordered[[1, 1, 4, 4]], 1.0);
        assert_eq!(bordered[[1, 1, 2, 2]], 0.0);
        assert_eq!(bordered.sum(), (2 * 2 * (25 - 9)) as f32);
    }

    #[test]
    fn labeled_shape_error() {
        let error = ensure_shape("z_attr", &[3, 4], &Shape::new(&[None, None, None])).unwrap_err();
        assert_eq!(error.to_string(), "z_attr has shape [3, 4], but expect [_, _, _]");
    }
}
