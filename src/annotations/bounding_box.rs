use serde::{Deserialize, Serialize};
use std::fmt;

/// A struct representing a bounding box in pixel space.
///
/// A bounding box is the rectangle an object detection model places around an object it found
/// in the image. This project uses the standard convention of the left side of the image being
/// x=0 and the top of the image being y=0.
///
/// Geometry is taken as the network produced it. A box with a non-positive width or height, or
/// a non-finite coordinate, is not rejected, it simply has zero area and therefore never overlaps anything.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct BoundingBox {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        BoundingBox {
            left,
            top,
            width,
            height,
        }
    }

    /// Builds a box from its center point and size.
    pub fn from_center(center_x: f32, center_y: f32, width: f32, height: f32) -> Self {
        BoundingBox::new(
            center_x - (width / 2.0),
            center_y - (height / 2.0),
            width,
            height,
        )
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (
            self.left + (self.width / 2.0),
            self.top + (self.height / 2.0),
        )
    }

    pub fn as_xyxy(&self) -> (f32, f32, f32, f32) {
        (self.left, self.top, self.right(), self.bottom())
    }

    /// Area of the box, zero for degenerate or non-finite geometry.
    pub fn area(&self) -> f32 {
        let finite = self.left.is_finite()
            && self.top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite();
        if finite && self.width > 0.0 && self.height > 0.0 {
            self.width * self.height
        } else {
            0.0
        }
    }

    pub fn intersection_area(&self, other: &BoundingBox) -> f32 {
        if self.area() == 0.0 || other.area() == 0.0 {
            return 0.0;
        }
        let overlap_width = (self.right().min(other.right()) - self.left.max(other.left)).max(0.0);
        let overlap_height =
            (self.bottom().min(other.bottom()) - self.top.max(other.top)).max(0.0);
        overlap_width * overlap_height
    }

    /// Intersection area divided by union area.
    ///
    /// Returns 0.0 whenever either box has zero area, so degenerate boxes never suppress or get
    /// suppressed by anything.
    pub fn intersection_over_union(&self, other: &BoundingBox) -> f32 {
        let intersection = self.intersection_area(other);
        if !(intersection > 0.0) {
            return 0.0;
        }
        let union = self.area() + other.area() - intersection;
        if union > 0.0 {
            intersection / union
        } else {
            0.0
        }
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.0}, {:.0}, {:.0}x{:.0})",
            self.left, self.top, self.width, self.height
        )
    }
}
