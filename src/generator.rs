use crate::format::LabeledMatrix;
use crate::matrix::Matrix;
use anyhow::{ensure, Result};
use rand::distributions::{Distribution, Uniform};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// How synthetic costs are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostPattern {
    /// cost of (i, j) is `i * cols + j`
    Sequential,
    /// integral costs drawn uniformly from `[0, max)`
    Uniform { seed: u64, max: u32 },
}

/// Synthetic cost matrix with `shop{i}` / `off{j}` labels.
pub fn generate(rows: usize, cols: usize, pattern: CostPattern) -> Result<LabeledMatrix> {
    ensure!(rows > 0 && cols > 0, "generated matrix must not be empty");
    let values: Vec<f64> = match pattern {
        CostPattern::Sequential => (0..rows * cols).map(|v| v as f64).collect(),
        CostPattern::Uniform { seed, max } => {
            ensure!(max > 0, "upper cost bound must be positive");
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let between = Uniform::from(0..max);
            (0..rows * cols)
                .map(|_| between.sample(&mut rng) as f64)
                .collect()
        }
    };
    debug!("generated {} x {} matrix, {:?}", rows, cols, pattern);

    Ok(LabeledMatrix::new(
        (0..cols).map(|j| format!("off{}", j)).collect(),
        (0..rows).map(|i| format!("shop{}", i)).collect(),
        Matrix::from_vec(rows, cols, values)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::{generate, CostPattern};

    #[test]
    fn test_sequential() {
        let matrix = generate(3, 2, CostPattern::Sequential).unwrap();
        assert_eq!(matrix.offices, vec!["off0", "off1"]);
        assert_eq!(matrix.shops, vec!["shop0", "shop1", "shop2"]);
        assert_eq!(matrix.values.as_slice(), &[0., 1., 2., 3., 4., 5.]);
    }

    #[test]
    fn test_uniform_is_seeded() {
        let pattern = CostPattern::Uniform { seed: 7, max: 200 };
        let first = generate(20, 4, pattern).unwrap();
        let second = generate(20, 4, pattern).unwrap();
        assert_eq!(first, second);
        assert!(first
            .values
            .as_slice()
            .iter()
            .all(|&v| v >= 0. && v < 200. && v.fract() == 0.));
        assert!(first.integral().is_some());
    }

    #[test]
    fn test_empty_is_rejected() {
        assert!(generate(0, 3, CostPattern::Sequential).is_err());
    }
}
