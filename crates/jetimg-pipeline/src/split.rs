use jetimg_core::{JetImageError, JetImageResult};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Shuffle `items` and cut them into `(train, test, validation)`.
///
/// Test and validation sizes are `round(n * ratio)`; train gets the rest.
/// A fixed `seed` makes the split reproducible.
pub fn train_test_validation_split<J>(
    mut items: Vec<J>,
    test_ratio: f64,
    validation_ratio: f64,
    seed: Option<u64>,
) -> JetImageResult<(Vec<J>, Vec<J>, Vec<J>)> {
    check_ratios(test_ratio, validation_ratio)?;

    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    items.shuffle(&mut rng);

    let n = items.len();
    let test_size = (n as f64 * test_ratio).round() as usize;
    let validation_size = ((n as f64 * validation_ratio).round() as usize).min(n - test_size);
    let train_size = n - test_size - validation_size;

    let validation = items.split_off(train_size + test_size);
    let test = items.split_off(train_size);
    Ok((items, test, validation))
}

pub(crate) fn check_ratios(test_ratio: f64, validation_ratio: f64) -> JetImageResult<()> {
    let valid = |r: f64| (0.0..1.0).contains(&r);
    if !valid(test_ratio) || !valid(validation_ratio) || test_ratio + validation_ratio >= 1.0 {
        return Err(JetImageError::InvalidConfig(format!(
            "split ratios must be in [0, 1) and sum below 1, got test {} and validation {}",
            test_ratio, validation_ratio
        )));
    }
    Ok(())
}
