//! Collision shapes and pixel-accurate overlap tests.
//!
//! Shapes live in their own local pixel space with the origin at the top-left
//! corner. Overlap tests take the position of the other shape relative to
//! `self`, so callers only deal with integer offsets.

use geo::{Coord, Rect};
use serde::{Deserialize, Serialize};

/// Something that can be tested for overlap against another shape.
pub trait CollisionShape: std::fmt::Debug + Send + Sync {
    /// Width of the shape's bounding box in pixels.
    fn width(&self) -> i32;

    /// Height of the shape's bounding box in pixels.
    fn height(&self) -> i32;

    /// Whether the local pixel `(x, y)` is solid. Out-of-range pixels are not.
    fn is_solid(&self, x: i32, y: i32) -> bool;

    /// Whether every pixel inside the bounding box is solid.
    fn is_filled(&self) -> bool {
        false
    }

    /// Bounding box of the shape placed with its top-left corner at `(x, y)`.
    fn bounds_at(&self, x: i32, y: i32) -> Rect<i32> {
        Rect::new(
            Coord { x, y },
            Coord {
                x: x + self.width(),
                y: y + self.height(),
            },
        )
    }

    /// Returns `true` if `other`, placed at `offset` relative to `self`,
    /// shares at least one solid pixel with `self`.
    fn overlaps(&self, other: &dyn CollisionShape, offset: (i32, i32)) -> bool {
        let (dx, dy) = offset;
        let Some(region) = intersection(&self.bounds_at(0, 0), &other.bounds_at(dx, dy)) else {
            return false;
        };

        if self.is_filled() && other.is_filled() {
            return true;
        }

        for y in region.min().y..region.max().y {
            for x in region.min().x..region.max().x {
                if self.is_solid(x, y) && other.is_solid(x - dx, y - dy) {
                    return true;
                }
            }
        }
        false
    }
}

/// Intersection of two half-open pixel rectangles.
///
/// Rectangles that only touch along an edge do not intersect.
pub fn intersection(a: &Rect<i32>, b: &Rect<i32>) -> Option<Rect<i32>> {
    let min_x = a.min().x.max(b.min().x);
    let min_y = a.min().y.max(b.min().y);
    let max_x = a.max().x.min(b.max().x);
    let max_y = a.max().y.min(b.max().y);

    (min_x < max_x && min_y < max_y).then(|| {
        Rect::new(
            Coord { x: min_x, y: min_y },
            Coord { x: max_x, y: max_y },
        )
    })
}

/// A completely solid rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hitbox {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Hitbox {
    /// Creates a solid rectangle of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl CollisionShape for Hitbox {
    fn width(&self) -> i32 {
        self.width as i32
    }

    fn height(&self) -> i32 {
        self.height as i32
    }

    fn is_solid(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width() && y < self.height()
    }

    fn is_filled(&self) -> bool {
        true
    }
}

/// A bitmap of solid pixels, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl PixelMask {
    /// Builds a mask by evaluating `solid(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut solid: impl FnMut(u32, u32) -> bool) -> Self {
        let mut bits = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                bits.push(solid(x, y));
            }
        }
        Self {
            width,
            height,
            bits,
        }
    }

    /// Ellipse inscribed in a `width` x `height` box.
    ///
    /// Approximates a sprite whose corners are transparent padding.
    pub fn ellipse(width: u32, height: u32) -> Self {
        let rx = width as f32 / 2.0;
        let ry = height as f32 / 2.0;
        Self::from_fn(width, height, |x, y| {
            let nx = (x as f32 + 0.5 - rx) / rx;
            let ny = (y as f32 + 0.5 - ry) / ry;
            nx * nx + ny * ny <= 1.0
        })
    }

    /// Number of solid pixels.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }
}

impl CollisionShape for PixelMask {
    fn width(&self) -> i32 {
        self.width as i32
    }

    fn height(&self) -> i32 {
        self.height as i32
    }

    fn is_solid(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width() || y >= self.height() {
            return false;
        }
        self.bits[(y as u32 * self.width + x as u32) as usize]
    }

    fn is_filled(&self) -> bool {
        self.bits.iter().all(|&b| b)
    }
}

/// Backing used for agent collision shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaskKind {
    /// Plain bounding box.
    Hitbox,
    /// Ellipse inscribed in the sprite box.
    Ellipse,
}

impl MaskKind {
    /// Builds a shape of this kind for a sprite of the given size.
    pub fn build(self, width: u32, height: u32) -> Box<dyn CollisionShape> {
        match self {
            MaskKind::Hitbox => Box::new(Hitbox::new(width, height)),
            MaskKind::Ellipse => Box::new(PixelMask::ellipse(width, height)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_rectangles_do_not_intersect() {
        let a = Hitbox::new(10, 10).bounds_at(0, 0);
        let b = Hitbox::new(10, 10).bounds_at(10, 0);
        assert!(intersection(&a, &b).is_none());
    }

    #[test]
    fn intersection_is_clipped() {
        let a = Hitbox::new(10, 10).bounds_at(0, 0);
        let b = Hitbox::new(10, 10).bounds_at(6, 7);
        let region = intersection(&a, &b).unwrap();
        assert_eq!(region.min(), Coord { x: 6, y: 7 });
        assert_eq!(region.max(), Coord { x: 10, y: 10 });
    }
}
