//! Helpers shared by the unit tests.
use crate::bounds::CapacityBounds;
use crate::cost::Cost;
use crate::matrix::Matrix;
use rand::distributions::{Distribution, Uniform};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub fn cost_matrix<C: Cost>(rows: &[&[i64]]) -> Matrix<C> {
    let rows: Vec<Vec<C>> = rows
        .iter()
        .map(|row| row.iter().map(|&v| C::from(v).unwrap()).collect())
        .collect();
    Matrix::from_rows(&rows).unwrap()
}

/// Minimum total cost over every assignment of rows to columns that respects
/// `bounds`, by enumerating all `cols^rows` candidates.
pub fn brute_force_minimum<C: Cost>(costs: &Matrix<C>, bounds: CapacityBounds) -> Option<f64> {
    let (rows, cols) = (costs.rows(), costs.cols());
    let mut choice = vec![0_usize; rows];
    let mut best: Option<f64> = None;
    loop {
        let mut counts = vec![0_usize; cols];
        choice.iter().for_each(|&j| counts[j] += 1);
        if counts.iter().all(|&c| bounds.contains(c)) {
            let total: f64 = choice
                .iter()
                .enumerate()
                .map(|(i, &j)| costs.get(i, j).as_f64())
                .sum();
            best = Some(best.map_or(total, |b| b.min(total)));
        }

        // next candidate in odometer order
        let mut position = 0;
        loop {
            if position == rows {
                return best;
            }
            choice[position] += 1;
            if choice[position] < cols {
                break;
            }
            choice[position] = 0;
            position += 1;
        }
    }
}

/// Random instance with integral costs and random, possibly infeasible, bounds.
pub fn random_instance<C: Cost>(
    seed: u64,
    max_rows: usize,
    max_cols: usize,
) -> (Matrix<C>, CapacityBounds) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let rows = Uniform::from(1..=max_rows).sample(&mut rng);
    let cols = Uniform::from(1..=max_cols).sample(&mut rng);
    let between = Uniform::from(0..100_i64);
    let values: Vec<C> = (0..rows * cols)
        .map(|_| C::from(between.sample(&mut rng)).unwrap())
        .collect();
    let min = Uniform::from(0..=rows / cols + 1).sample(&mut rng);
    let max = Uniform::from(min.min(rows)..=rows).sample(&mut rng);
    (
        Matrix::from_vec(rows, cols, values).unwrap(),
        CapacityBounds::new(min, max),
    )
}
