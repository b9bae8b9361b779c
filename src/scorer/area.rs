use super::Objective;
use crate::geometry::min_max;

/// Area of the axis-aligned box spanning every placed reference point.
///
/// Rewards compact layouts but says nothing about pieces sitting on top of
/// each other; [`super::PenalizedArea`] adds that.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundingBoxArea;

impl Objective for BoundingBoxArea {
    #[inline(always)]
    fn evaluate(&self, genes: &[f64]) -> f64 {
        bounding_box_area(genes)
    }
}

/// `(max(x) - min(x)) * (max(y) - min(y))` over the even (x) and odd (y) genes.
pub fn bounding_box_area(genes: &[f64]) -> f64 {
    let (x_min, x_max) = min_max(genes.iter().step_by(2).copied());
    let (y_min, y_max) = min_max(genes.iter().skip(1).step_by(2).copied());
    (x_max - x_min) * (y_max - y_min)
}
