// src/scenario.rs

use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::covering::{covering_rectangle, DEFAULT_MARGIN};
use crate::error::Result;
use crate::generator::{GeneratorConfig, RectangleGenerator};
use crate::geometry::Polygon;
use crate::union_lib::{PolygonUnion, UnionResult};

/// Everything that decides which shapes a run produces. Passed explicitly to
/// the shape source instead of living in process-wide toggles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub randomize: bool,
    pub generator: GeneratorConfig,
    pub include_covering: bool,
    pub covering_margin: f64,
    pub seed: Option<u64>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            randomize: true,
            generator: GeneratorConfig::default(),
            include_covering: false,
            covering_margin: DEFAULT_MARGIN,
            seed: None,
        }
    }
}

impl ScenarioConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

/// The immutable shape collection of one run.
#[derive(Clone, Debug)]
pub struct Scenario {
    shapes: Vec<Polygon>,
    covering: Option<Polygon>,
}

impl Scenario {
    pub fn build(config: &ScenarioConfig) -> Result<Self> {
        let mut shapes = if config.randomize {
            let mut rng = match config.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            RectangleGenerator::generate_random(&config.generator, &mut rng)?
        } else {
            RectangleGenerator::predefined()
        };

        let covering = if config.include_covering {
            let cover = covering_rectangle(&shapes, config.covering_margin)?;
            shapes.push(cover.clone());
            Some(cover)
        } else {
            None
        };

        log::info!(
            "scenario built: {} shapes (random: {}, covering rectangle: {})",
            shapes.len(),
            config.randomize,
            covering.is_some()
        );
        Ok(Self { shapes, covering })
    }

    /// All shapes, the covering rectangle (if any) last.
    pub fn shapes(&self) -> &[Polygon] {
        &self.shapes
    }

    pub fn covering(&self) -> Option<&Polygon> {
        self.covering.as_ref()
    }

    pub fn union(&self) -> Result<UnionResult> {
        PolygonUnion::new().union(&self.shapes)
    }
}
