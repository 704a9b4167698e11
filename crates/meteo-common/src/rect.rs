//! Pixel-space sub-windows of a grid.

use serde::{Deserialize, Serialize};

/// An integer sub-window in pixel coordinates of a specific grid.
///
/// Used both to request a cropped read from the archive and to request a
/// cropped region of a target grid. Invariants are checked at construction:
/// width and height are positive and the window lies within the parent grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rectangle {
    x_off: usize,
    y_off: usize,
    width: usize,
    height: usize,
}

impl Rectangle {
    /// Create a rectangle, validating that it is non-degenerate.
    pub fn new(
        x_off: usize,
        y_off: usize,
        width: usize,
        height: usize,
    ) -> Result<Self, RectangleError> {
        if width == 0 || height == 0 {
            return Err(RectangleError::EmptyWindow { width, height });
        }
        Ok(Self {
            x_off,
            y_off,
            width,
            height,
        })
    }

    /// Create a rectangle and check it against the parent grid's dimensions.
    pub fn within(
        x_off: usize,
        y_off: usize,
        width: usize,
        height: usize,
        parent_width: usize,
        parent_height: usize,
    ) -> Result<Self, RectangleError> {
        let rect = Self::new(x_off, y_off, width, height)?;
        if x_off + width > parent_width || y_off + height > parent_height {
            return Err(RectangleError::OutOfBounds {
                rect,
                parent_width,
                parent_height,
            });
        }
        Ok(rect)
    }

    pub fn x_off(&self) -> usize {
        self.x_off
    }

    pub fn y_off(&self) -> usize {
        self.y_off
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Check that the window fits inside a grid of the given dimensions.
    pub fn fits(&self, parent_width: usize, parent_height: usize) -> bool {
        self.x_off + self.width <= parent_width && self.y_off + self.height <= parent_height
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RectangleError {
    #[error("window dimensions must be positive, got {width}x{height}")]
    EmptyWindow { width: usize, height: usize },

    #[error("window {rect:?} exceeds parent grid {parent_width}x{parent_height}")]
    OutOfBounds {
        rect: Rectangle,
        parent_width: usize,
        parent_height: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_rejects_empty() {
        assert!(matches!(
            Rectangle::new(0, 0, 0, 5),
            Err(RectangleError::EmptyWindow { .. })
        ));
        assert!(matches!(
            Rectangle::new(0, 0, 5, 0),
            Err(RectangleError::EmptyWindow { .. })
        ));
    }

    #[test]
    fn test_rectangle_within_bounds() {
        let rect = Rectangle::within(2, 3, 4, 5, 10, 10).unwrap();
        assert_eq!(rect.x_off(), 2);
        assert_eq!(rect.width(), 4);
        assert!(rect.fits(10, 10));

        assert!(matches!(
            Rectangle::within(8, 0, 4, 4, 10, 10),
            Err(RectangleError::OutOfBounds { .. })
        ));
    }
}
