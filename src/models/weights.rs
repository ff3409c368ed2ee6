use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

use super::Component;

/// Allowed deviation of the weight sum from 1.0 before renormalizing
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Per-component weights of the final score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub content: f64,
    pub rating: f64,
    pub business: f64,
    pub time: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            content: 0.25,
            rating: 0.40,
            business: 0.20,
            time: 0.15,
        }
    }
}

/// Weights actually applied by a merge run
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EffectiveWeights {
    pub requested: Weights,
    pub applied: Weights,
    /// Sum of the requested weights
    pub requested_sum: f64,
    pub renormalized: bool,
}

impl Weights {
    pub fn get(&self, component: Component) -> f64 {
        match component {
            Component::Content => self.content,
            Component::Rating => self.rating,
            Component::Business => self.business,
            Component::Time => self.time,
        }
    }

    /// Weights in `Component::ALL` order
    pub fn as_array(&self) -> [f64; 4] {
        [self.content, self.rating, self.business, self.time]
    }

    pub fn sum(&self) -> f64 {
        self.as_array().iter().sum()
    }

    /// Returns a copy with any provided overrides applied
    pub fn with_overrides(
        mut self,
        content: Option<f64>,
        rating: Option<f64>,
        business: Option<f64>,
        time: Option<f64>,
    ) -> Self {
        if let Some(w) = content {
            self.content = w;
        }
        if let Some(w) = rating {
            self.rating = w;
        }
        if let Some(w) = business {
            self.business = w;
        }
        if let Some(w) = time {
            self.time = w;
        }
        self
    }

    /// Validates the weights and rescales them to sum to 1.0 when needed
    pub fn resolve(self) -> AppResult<EffectiveWeights> {
        for component in Component::ALL {
            let w = self.get(component);
            if !w.is_finite() || w < 0.0 {
                return Err(AppError::InvalidWeights(format!(
                    "{} weight must be a finite non-negative number, got {}",
                    component, w
                )));
            }
        }

        let sum = self.sum();
        if sum <= 0.0 {
            return Err(AppError::InvalidWeights(
                "weights must sum to a positive value".to_string(),
            ));
        }

        if (sum - 1.0).abs() <= WEIGHT_TOLERANCE {
            return Ok(EffectiveWeights {
                requested: self,
                applied: self,
                requested_sum: sum,
                renormalized: false,
            });
        }

        let applied = Weights {
            content: self.content / sum,
            rating: self.rating / sum,
            business: self.business / sum,
            time: self.time / sum,
        };

        Ok(EffectiveWeights {
            requested: self,
            applied,
            requested_sum: sum,
            renormalized: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        let effective = Weights::default().resolve().unwrap();
        assert!(!effective.renormalized);
        assert!((effective.applied.sum() - 1.0).abs() < WEIGHT_TOLERANCE);
    }

    #[test]
    fn test_equal_weights_renormalize_to_quarter() {
        let weights = Weights {
            content: 0.5,
            rating: 0.5,
            business: 0.5,
            time: 0.5,
        };
        let effective = weights.resolve().unwrap();
        assert!(effective.renormalized);
        assert_eq!(effective.requested_sum, 2.0);
        for w in effective.applied.as_array() {
            assert!((w - 0.25).abs() < 1e-12);
        }
        assert!((effective.applied.sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_small_deviation_is_kept() {
        let weights = Weights {
            content: 0.25 + 1e-9,
            ..Weights::default()
        };
        let effective = weights.resolve().unwrap();
        assert!(!effective.renormalized);
        assert_eq!(effective.applied, weights);
    }

    #[test]
    fn test_negative_weight_rejected() {
        let weights = Weights {
            time: -0.1,
            ..Weights::default()
        };
        assert!(matches!(weights.resolve(), Err(AppError::InvalidWeights(_))));
    }

    #[test]
    fn test_zero_weights_rejected() {
        let weights = Weights {
            content: 0.0,
            rating: 0.0,
            business: 0.0,
            time: 0.0,
        };
        assert!(matches!(weights.resolve(), Err(AppError::InvalidWeights(_))));
    }

    #[test]
    fn test_overrides() {
        let weights = Weights::default().with_overrides(Some(0.4), None, None, Some(0.0));
        assert_eq!(weights.content, 0.4);
        assert_eq!(weights.rating, 0.40);
        assert_eq!(weights.time, 0.0);
    }
}
