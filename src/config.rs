use crate::heuristic::DistanceHeuristic;
use num_traits::Float;

#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DStarLiteConfig<Cost, H> {
    pub allow_diagonal: bool,
    /// Only step diagonally when both cells sharing the crossed corner are
    /// walkable. Has no effect unless `allow_diagonal` is set.
    pub dont_cross_corners: bool,
    pub heuristic: H,
    /// Inflation applied to the heuristic. Must be finite and at least 1.
    pub weight: Cost,
}

impl<Cost: Float, H> DStarLiteConfig<Cost, H> {
    pub fn new(heuristic: H) -> Self {
        Self {
            allow_diagonal: false,
            dont_cross_corners: false,
            heuristic,
            weight: Cost::one(),
        }
    }

    pub fn with_diagonal(self, dont_cross_corners: bool) -> Self {
        Self {
            allow_diagonal: true,
            dont_cross_corners,
            ..self
        }
    }

    pub fn with_weight(self, weight: Cost) -> Self {
        Self { weight, ..self }
    }

    pub(crate) fn is_weight_valid(&self) -> bool {
        self.weight.is_finite() && self.weight >= Cost::one()
    }
}

impl<Cost: Float> Default for DStarLiteConfig<Cost, DistanceHeuristic> {
    fn default() -> Self {
        Self::new(DistanceHeuristic::Manhattan)
    }
}
