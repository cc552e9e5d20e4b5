//! Observation and action spaces.
//!
//! Only what the wrappers and harnesses need: a shape, random sampling for
//! drawing actions, and a membership check.

use ndarray::{Array2, ArrayD, IxDyn};
use rand::Rng;
use rand_distr::{Distribution, Uniform};

/// Space of observations or actions
#[derive(Clone, Debug, PartialEq)]
pub enum DynSpace {
    /// Integers `{0, 1, ..., n-1}`, carried as a single-element array
    Discrete { n: usize },
    /// Continuous values bounded elementwise by `low` and `high`
    Box { low: ArrayD<f32>, high: ArrayD<f32> },
}

impl DynSpace {
    /// Discrete space with `n` values
    pub fn discrete(n: usize) -> Self {
        assert!(n > 0, "Discrete space must have at least 1 element");
        Self::Discrete { n }
    }

    /// Box space with the same bounds for every element
    pub fn uniform(shape: &[usize], low: f32, high: f32) -> Self {
        assert!(low <= high, "Box low bound must not exceed high bound");
        Self::Box {
            low: ArrayD::from_elem(IxDyn(shape), low),
            high: ArrayD::from_elem(IxDyn(shape), high),
        }
    }

    /// Shape of a sample
    pub fn shape(&self) -> Vec<usize> {
        match self {
            Self::Discrete { .. } => vec![1],
            Self::Box { low, .. } => low.shape().to_vec(),
        }
    }

    /// Number of elements in a flattened sample
    pub fn num_elements(&self) -> usize {
        self.shape().iter().product()
    }

    /// Draw a uniformly random sample
    pub fn sample<R: Rng>(&self, rng: &mut R) -> ArrayD<f32> {
        match self {
            Self::Discrete { n } => ArrayD::from_elem(IxDyn(&[1]), rng.gen_range(0..*n) as f32),
            Self::Box { low, high } => {
                let mut sample = ArrayD::zeros(low.raw_dim());
                for ((s, &l), &h) in sample.iter_mut().zip(low.iter()).zip(high.iter()) {
                    *s = if l < h { Uniform::new(l, h).sample(rng) } else { l };
                }
                sample
            }
        }
    }

    /// Draw `n` samples as the flattened rows of a batch, one per
    /// sub-environment
    pub fn sample_batch<R: Rng>(&self, n: usize, rng: &mut R) -> Array2<f32> {
        let mut batch = Array2::zeros((n, self.num_elements()));
        for mut row in batch.rows_mut() {
            for (dst, src) in row.iter_mut().zip(self.sample(rng).iter()) {
                *dst = *src;
            }
        }
        batch
    }

    /// Check if this space contains the value
    pub fn contains(&self, value: &ArrayD<f32>) -> bool {
        match self {
            Self::Discrete { n } => {
                value.len() == 1
                    && value.iter().all(|&v| v >= 0.0 && v.fract() == 0.0 && (v as usize) < *n)
            }
            Self::Box { low, high } => {
                value.shape() == low.shape()
                    && value
                        .iter()
                        .zip(low.iter())
                        .zip(high.iter())
                        .all(|((&v, &l), &h)| v >= l && v <= h)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_discrete_sample() {
        let space = DynSpace::discrete(4);
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let sample = space.sample(&mut rng);
            assert!(space.contains(&sample));
        }
        assert_eq!(space.shape(), vec![1]);
    }

    #[test]
    fn test_box_sample() {
        let space = DynSpace::uniform(&[3], -2.0, 2.0);
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);

        for _ in 0..100 {
            let sample = space.sample(&mut rng);
            assert_eq!(sample.shape(), &[3]);
            assert!(space.contains(&sample));
        }
    }

    #[test]
    fn test_sample_batch_rows() {
        let space = DynSpace::uniform(&[2], -1.0, 1.0);
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);

        let batch = space.sample_batch(4, &mut rng);
        assert_eq!(batch.shape(), &[4, 2]);
        assert!(batch.iter().all(|v| (-1.0..=1.0).contains(v)));
    }

    #[test]
    fn test_contains_rejects_out_of_bounds() {
        let space = DynSpace::uniform(&[2], 0.0, 1.0);
        let outside = ArrayD::from_shape_vec(IxDyn(&[2]), vec![1.5, 0.5]).unwrap();
        assert!(!space.contains(&outside));

        let discrete = DynSpace::discrete(2);
        assert!(!discrete.contains(&ArrayD::from_elem(IxDyn(&[1]), 2.0)));
        assert!(!discrete.contains(&ArrayD::from_elem(IxDyn(&[1]), 0.5)));
    }
}
