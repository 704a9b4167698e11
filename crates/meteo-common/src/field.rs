//! Physical fields: a 2-D value array plus the grid it is defined on.

use crate::grid::GeoGrid;
use crate::rect::Rectangle;

/// A 2-D array of physical values (row-major, top-to-bottom) with its grid
/// geometry. The unit of exchange between reader, interpolators, resampler
/// and resolver. Missing cells are NaN.
#[derive(Debug, Clone)]
pub struct PhysicalField {
    data: Vec<f32>,
    width: usize,
    height: usize,
    grid: GeoGrid,
}

impl PhysicalField {
    pub fn new(
        data: Vec<f32>,
        width: usize,
        height: usize,
        grid: GeoGrid,
    ) -> Result<Self, FieldShapeError> {
        if data.len() != width * height {
            return Err(FieldShapeError {
                expected: width * height,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            grid,
        })
    }

    /// A field of constant value on the given grid.
    pub fn filled(value: f32, width: usize, height: usize, grid: GeoGrid) -> Self {
        Self {
            data: vec![value; width * height],
            width,
            height,
            grid,
        }
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn grid(&self) -> &GeoGrid {
        &self.grid
    }

    pub fn get(&self, col: usize, row: usize) -> Option<f32> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.data.get(row * self.width + col).copied()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Apply a unary function to every cell, keeping the grid.
    pub fn map(&self, f: impl Fn(f32) -> f32) -> PhysicalField {
        PhysicalField {
            data: self.data.iter().map(|&v| f(v)).collect(),
            width: self.width,
            height: self.height,
            grid: self.grid,
        }
    }

    /// Combine two fields on the same grid cell by cell.
    ///
    /// Panics if the shapes differ; callers pair fields read from the same
    /// archive variable set.
    pub fn zip_map(&self, other: &PhysicalField, f: impl Fn(f32, f32) -> f32) -> PhysicalField {
        assert_eq!(self.data.len(), other.data.len(), "field shape mismatch");
        PhysicalField {
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
            width: self.width,
            height: self.height,
            grid: self.grid,
        }
    }

    /// Extract a pixel sub-window. The window's grid origin is shifted so the
    /// cropped field stays georeferenced.
    pub fn crop(&self, rect: &Rectangle) -> Result<PhysicalField, crate::rect::RectangleError> {
        if !rect.fits(self.width, self.height) {
            return Err(crate::rect::RectangleError::OutOfBounds {
                rect: *rect,
                parent_width: self.width,
                parent_height: self.height,
            });
        }
        let mut data = Vec::with_capacity(rect.width() * rect.height());
        for row in rect.y_off()..rect.y_off() + rect.height() {
            let start = row * self.width + rect.x_off();
            data.extend_from_slice(&self.data[start..start + rect.width()]);
        }
        Ok(PhysicalField {
            data,
            width: rect.width(),
            height: rect.height(),
            grid: self.grid.windowed(rect),
        })
    }
}

#[derive(Debug, thiserror::Error)]
#[error("field data length {actual} does not match {expected} grid cells")]
pub struct FieldShapeError {
    pub expected: usize,
    pub actual: usize,
}
