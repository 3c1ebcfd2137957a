//! Cosmetic scrolling ground strip.

use geo::Coord;
use serde::{Deserialize, Serialize};

use super::locatable::Locatable;
use super::params::Params;

/// Two copies of the ground image laid end to end.
///
/// When one copy leaves the screen it is moved behind the other, which makes
/// the strip appear endless. Moves at the obstacle speed so the world scrolls
/// coherently; it has no effect on gameplay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ground {
    /// Vertical position of the strip.
    pub y: f32,
    /// Left edge of the first copy.
    pub x1: f32,
    /// Left edge of the second copy.
    pub x2: f32,
    /// Width of one copy.
    pub width: f32,
}

impl Ground {
    /// Creates the strip with the first copy at the left screen edge.
    pub fn new(params: &Params) -> Self {
        Self {
            y: params.ground_y,
            x1: 0.0,
            x2: params.ground_width,
            width: params.ground_width,
        }
    }
}

impl Locatable for Ground {
    fn pos(&self) -> Coord<f32> {
        Coord {
            x: self.x1.min(self.x2),
            y: self.y,
        }
    }

    fn advance(&mut self, params: &Params) {
        self.x1 -= params.scroll_speed;
        self.x2 -= params.scroll_speed;

        if self.x1 + self.width < 0.0 {
            self.x1 = self.x2 + self.width;
        }
        if self.x2 + self.width < 0.0 {
            self.x2 = self.x1 + self.width;
        }
    }
}
