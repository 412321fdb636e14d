// ============================================================
// Layer 4 — Stratified Train/Test Splitter
// ============================================================
// Splits labelled rows into a training set and a test set while
// keeping each class's share roughly the same in both.
//
// How the sizes are chosen:
//   n_test   = ceil(n * test_fraction)
//   n_train  = n - n_test                (= floor of the train share)
//   target_c = count_c * (1 - test_fraction)
//   Each class first gets floor(target_c) training rows. The rows
//   still unassigned go one at a time to the classes with the
//   largest fractional part of target_c (lower label first on
//   ties). Since sum(floor) <= n_train <= sum(ceil), every class
//   ends on floor(target_c) or ceil(target_c).
//
// Determinism:
//   A StdRng seeded from `seed` shuffles each class's rows before
//   the cut and then shuffles each finished split once, so the
//   same input and seed always give the same split.
//
// Reference: Rust Book §8 (Vectors)
//            rand crate documentation

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::domain::error::{PipelineError, Result};

/// Slack for products like 0.8 * 15 that land a hair off an integer.
const EPS: f64 = 1e-9;

/// Number of training rows each class receives.
///
/// Fails when the split cannot keep every class represented
/// in the training set.
pub fn train_allocation(class_counts: &[usize], test_fraction: f64) -> Result<Vec<usize>> {
    let total       = class_counts.iter().sum::<usize>();
    let class_count = class_counts.len();

    if let Some((label, &count)) = class_counts.iter().enumerate().find(|(_, &c)| c < 2) {
        return Err(PipelineError::data(format!(
            "class {label} has only {count} member(s); stratified split needs at least 2"
        )));
    }

    let n_test  = ((total as f64) * test_fraction - EPS).ceil() as usize;
    let n_train = total.saturating_sub(n_test);
    if n_train < class_count || n_test < class_count {
        return Err(PipelineError::data(format!(
            "split of {total} rows into {n_train} train / {n_test} test \
             cannot hold all {class_count} classes"
        )));
    }

    // Per-class floor of its own target, then the leftover by largest fraction
    let targets: Vec<f64> = class_counts
        .iter()
        .map(|&c| c as f64 * (1.0 - test_fraction))
        .collect();
    let mut alloc: Vec<usize> = targets.iter().map(|t| (t + EPS).floor() as usize).collect();
    let fraction = |label: usize| targets[label] - alloc[label] as f64;

    let mut order: Vec<usize> = (0..class_count).collect();
    order.sort_by(|&a, &b| fraction(b).total_cmp(&fraction(a)).then(a.cmp(&b)));
    let leftover = n_train.saturating_sub(alloc.iter().sum::<usize>());
    for &label in order.iter().take(leftover) {
        alloc[label] += 1;
    }

    if let Some(label) = alloc.iter().position(|&a| a == 0) {
        return Err(PipelineError::data(format!(
            "class {label} ({} rows) would receive no training rows at test fraction {test_fraction}",
            class_counts[label]
        )));
    }

    Ok(alloc)
}

/// Split `items` into (train, test), stratified by `label_of`.
///
/// # Arguments
/// * `items`         - All labelled items (consumed)
/// * `label_of`      - Extracts the class label in [0, class_count)
/// * `class_count`   - Number of distinct classes
/// * `test_fraction` - Share of rows held out, e.g. 0.2
/// * `seed`          - Seed for the shuffle, fixed for reproducibility
pub fn stratified_split<T>(
    items:         Vec<T>,
    label_of:      impl Fn(&T) -> usize,
    class_count:   usize,
    test_fraction: f64,
    seed:          u64,
) -> Result<(Vec<T>, Vec<T>)> {
    let mut by_class: Vec<Vec<T>> = (0..class_count).map(|_| Vec::new()).collect();
    for item in items {
        let label = label_of(&item);
        let bucket = by_class.get_mut(label).ok_or_else(|| {
            PipelineError::data(format!("label {label} out of range for {class_count} classes"))
        })?;
        bucket.push(item);
    }

    let counts: Vec<usize> = by_class.iter().map(Vec::len).collect();
    let alloc = train_allocation(&counts, test_fraction)?;

    let mut rng   = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test  = Vec::new();

    for (mut bucket, n_train) in by_class.into_iter().zip(alloc) {
        bucket.shuffle(&mut rng);
        let held_out = bucket.split_off(n_train);
        train.extend(bucket);
        test.extend(held_out);
    }

    train.shuffle(&mut rng);
    test.shuffle(&mut rng);

    tracing::debug!(
        "Stratified split: {} training, {} test (per-class counts {:?})",
        train.len(),
        test.len(),
        counts,
    );

    Ok((train, test))
}
