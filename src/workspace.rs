use crate::error::{NestError, NestResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The rectangle pieces are nested into, anchored at the origin.
/// All values are in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawWorkspace")]
pub struct Workspace {
    width: f64,
    height: f64,
    step: f64,
    tolerance: f64,
}

#[derive(Deserialize)]
struct RawWorkspace {
    width: f64,
    height: f64,
    step: f64,
    tolerance: f64,
}

impl TryFrom<RawWorkspace> for Workspace {
    type Error = NestError;

    fn try_from(raw: RawWorkspace) -> NestResult<Self> {
        Workspace::new(raw.width, raw.height, raw.step, raw.tolerance)
    }
}

impl Workspace {
    pub fn new(width: f64, height: f64, step: f64, tolerance: f64) -> NestResult<Self> {
        for (name, value) in [
            ("width", width),
            ("height", height),
            ("step", step),
            ("tolerance", tolerance),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(NestError::InvalidConfiguration(format!(
                    "workspace {} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        Ok(Self {
            width,
            height,
            step,
            tolerance,
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// Also called the workspace length.
    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Uniform sample of `x ∈ [0, width)`.
    #[inline(always)]
    pub fn sample_x(&self, rng: &mut fastrand::Rng) -> f64 {
        self.width * rng.f64()
    }

    /// Uniform sample of `y ∈ [0, height)`.
    #[inline(always)]
    pub fn sample_y(&self, rng: &mut fastrand::Rng) -> f64 {
        self.height * rng.f64()
    }

    /// True when the point lies inside the workspace widened by the tolerance on every side.
    pub fn admits(&self, x: f64, y: f64) -> bool {
        let t = self.tolerance;
        x >= -t && x <= self.width + t && y >= -t && y <= self.height + t
    }
}

impl fmt::Display for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Workspace {}x{}", self.width, self.height)
    }
}
