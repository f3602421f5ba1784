//! Slope-derived traversal costs from an elevation raster.
//!
//! Costs run from [`FLAT_COST`] on level ground to [`STEEPEST_COST`] on the
//! steepest cell of the raster.

use crate::error::{Result, RouteError};
use crate::grid::CostGrid;
use serde::{Deserialize, Serialize};

pub const FLAT_COST: f64 = 1.0;
pub const STEEPEST_COST: f64 = 10.0;

/// Row-major elevation samples, already read from whatever source holds them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElevationRaster {
    pub rows: usize,
    pub cols: usize,
    pub elevations_m: Vec<f64>,
    /// Marker for missing samples. NaN samples are always treated as missing.
    #[serde(default)]
    pub nodata: Option<f64>,
}

impl ElevationRaster {
    fn value_at(&self, row: isize, col: isize) -> Option<f64> {
        // Edges repeat the nearest sample.
        let row = row.clamp(0, self.rows as isize - 1) as usize;
        let col = col.clamp(0, self.cols as isize - 1) as usize;
        let value = self.elevations_m[row * self.cols + col];
        let missing = value.is_nan() || self.nodata.is_some_and(|nodata| value == nodata);
        (!missing).then_some(value)
    }

    /// Sobel gradient magnitude at one cell; `None` when any sample in the
    /// 3x3 neighborhood is missing.
    fn slope_at(&self, row: usize, col: usize) -> Option<f64> {
        const SMOOTH: [f64; 3] = [1.0, 2.0, 1.0];
        let (r, c) = (row as isize, col as isize);
        let mut dx = 0.0;
        let mut dy = 0.0;
        for (i, weight) in (-1..=1).zip(SMOOTH) {
            dx += weight * (self.value_at(r + i, c + 1)? - self.value_at(r + i, c - 1)?);
            dy += weight * (self.value_at(r + 1, c + i)? - self.value_at(r - 1, c + i)?);
            // The derivative kernel's center tap is zero but still reads the sample.
            self.value_at(r + i, c)?;
        }
        Some(dx.hypot(dy))
    }
}

/// Build a cost grid where cost grows linearly with terrain slope.
///
/// Cells next to missing samples count as flat. A raster with no slope at
/// all comes back as uniform [`FLAT_COST`].
pub fn cost_grid_from_elevation(raster: &ElevationRaster) -> Result<CostGrid> {
    let expected = raster.rows.saturating_mul(raster.cols);
    if raster.rows == 0 || raster.cols == 0 || raster.elevations_m.len() != expected {
        return Err(RouteError::InvalidGrid(format!(
            "{}x{} raster needs {} samples, got {}",
            raster.rows,
            raster.cols,
            expected,
            raster.elevations_m.len()
        )));
    }

    let mut slopes = Vec::with_capacity(expected);
    for row in 0..raster.rows {
        for col in 0..raster.cols {
            slopes.push(raster.slope_at(row, col).unwrap_or(0.0));
        }
    }

    let max_slope = slopes.iter().copied().fold(0.0, f64::max);
    let costs = if max_slope > 0.0 {
        slopes
            .iter()
            .map(|slope| FLAT_COST + slope / max_slope * (STEEPEST_COST - FLAT_COST))
            .collect()
    } else {
        vec![FLAT_COST; expected]
    };

    CostGrid::new(raster.rows, raster.cols, costs)
}
