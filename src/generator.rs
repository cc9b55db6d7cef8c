// src/generator.rs

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, Result};
use crate::geometry::Polygon;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub num_rects: usize,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub width_range: (f64, f64),
    pub height_range: (f64, f64),
    pub allow_rotation: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            num_rects: 25,
            x_range: (0.0, 50.0),
            y_range: (0.0, 50.0),
            width_range: (3.0, 20.0),
            height_range: (3.0, 15.0),
            allow_rotation: true,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<()> {
        check_range("x_range", self.x_range)?;
        check_range("y_range", self.y_range)?;
        check_range("width_range", self.width_range)?;
        check_range("height_range", self.height_range)?;
        if self.width_range.0 <= 0.0 || self.height_range.0 <= 0.0 {
            return Err(GeometryError::invalid_config(
                "rectangle widths and heights must be strictly positive",
            ));
        }
        Ok(())
    }
}

fn check_range(name: &str, (lo, hi): (f64, f64)) -> Result<()> {
    if !lo.is_finite() || !hi.is_finite() {
        return Err(GeometryError::invalid_config(format!(
            "{name} bounds must be finite"
        )));
    }
    if lo > hi {
        return Err(GeometryError::invalid_config(format!(
            "{name} has min {lo} greater than max {hi}"
        )));
    }
    Ok(())
}

pub struct RectangleGenerator;

impl RectangleGenerator {
    pub fn generate_random<R: Rng + ?Sized>(
        config: &GeneratorConfig,
        rng: &mut R,
    ) -> Result<Vec<Polygon>> {
        config.validate()?;

        let mut rectangles = Vec::with_capacity(config.num_rects);
        for _ in 0..config.num_rects {
            let x = rng.gen_range(config.x_range.0..=config.x_range.1);
            let y = rng.gen_range(config.y_range.0..=config.y_range.1);
            let width = rng.gen_range(config.width_range.0..=config.width_range.1);
            let height = rng.gen_range(config.height_range.0..=config.height_range.1);

            let mut rect = Polygon::rectangle(x, y, width, height);
            if config.allow_rotation {
                let angle = rng.gen_range(0.0..360.0);
                rect = rect.rotated(angle);
            }
            rectangles.push(rect);
        }
        log::debug!(
            "generated {} rectangles (rotation: {})",
            rectangles.len(),
            config.allow_rotation
        );
        Ok(rectangles)
    }

    /// Fixed collection used when randomisation is switched off.
    pub fn predefined() -> Vec<Polygon> {
        vec![
            Polygon::rectangle(5.0, 5.0, 15.0, 10.0),
            Polygon::rectangle(25.0, 25.0, 15.0, 10.0),
            Polygon::rectangle(10.0, 30.0, 20.0, 20.0),
        ]
    }
}
