// src/rendering_lib/viewport.rs

use contour_union::{Bounds, Point2};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PixelRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Splits the rectangle into equal left and right halves.
    pub fn split_horizontal(&self) -> (PixelRect, PixelRect) {
        let half = self.width * 0.5;
        (
            PixelRect::new(self.x, self.y, half, self.height),
            PixelRect::new(self.x + half, self.y, half, self.height),
        )
    }

    pub fn center(&self) -> [f32; 2] {
        [self.x + self.width * 0.5, self.y + self.height * 0.5]
    }
}

/// Maps world coordinates (y up) into a pixel rectangle (y down), keeping an
/// equal aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelViewport {
    pub panel: PixelRect,
    world_center: Point2,
    scale: f64,
}

impl PanelViewport {
    pub fn fit(world: &Bounds, panel: PixelRect, padding: f32) -> Self {
        let usable_w = (panel.width - 2.0 * padding).max(1.0) as f64;
        let usable_h = (panel.height - 2.0 * padding).max(1.0) as f64;
        let world_w = world.width().max(f64::EPSILON);
        let world_h = world.height().max(f64::EPSILON);
        Self {
            panel,
            world_center: world.center(),
            scale: (usable_w / world_w).min(usable_h / world_h),
        }
    }

    pub fn world_to_pixel(&self, p: &Point2) -> [f32; 2] {
        let [cx, cy] = self.panel.center();
        [
            cx + ((p.x - self.world_center.x) * self.scale) as f32,
            cy - ((p.y - self.world_center.y) * self.scale) as f32,
        ]
    }
}
