use rand::seq::SliceRandom;
use std::collections::VecDeque;

use crate::error::NetError;

/// Which partition of the dataset to draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetKind {
    Train,
    Test,
}

/// Presentation order when a pool is primed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    Shuffle,
    #[default]
    Static,
}

/// Supplies (features, labels) pairs to a training driver.
///
/// Samples are split once into train and test index sets; each set feeds a
/// pool that is refilled by [`prime`](DataSupply::prime) and drained one
/// presentation at a time by [`next_item`](DataSupply::next_item). The supply
/// never participates in propagation.
#[derive(Debug)]
pub struct DataSupply {
    features: Vec<Vec<f64>>,
    labels: Vec<Vec<f64>>,
    train_factor: f64,
    train_indices: Vec<usize>,
    test_indices: Vec<usize>,
    train_pool: VecDeque<usize>,
    test_pool: VecDeque<usize>,
}

impl DataSupply {
    /// Takes ownership of parallel feature/label lists and splits them.
    /// `train_factor` is clamped to [0, 1].
    pub fn new(
        features: Vec<Vec<f64>>,
        labels: Vec<Vec<f64>>,
        train_factor: f64,
    ) -> Result<DataSupply, NetError> {
        if features.len() != labels.len() {
            return Err(NetError::Construction(
                "features and labels must have the same length",
            ));
        }
        let mut supply = DataSupply {
            features,
            labels,
            train_factor: clamp_factor(train_factor),
            train_indices: Vec::new(),
            test_indices: Vec::new(),
            train_pool: VecDeque::new(),
            test_pool: VecDeque::new(),
        };
        supply.split(None);
        Ok(supply)
    }

    /// Re-partitions the samples into train and test index sets, optionally
    /// under a new train factor. The partition itself is always randomized;
    /// the pools are left untouched until the next `prime`.
    pub fn split(&mut self, new_train_factor: Option<f64>) {
        if let Some(factor) = new_train_factor {
            self.train_factor = clamp_factor(factor);
        }
        let count = self.features.len();
        let train_count = (count as f64 * self.train_factor) as usize;
        let mut indices: Vec<usize> = (0..count).collect();
        indices.shuffle(&mut rand::thread_rng());
        self.test_indices = indices.split_off(train_count);
        self.train_indices = indices;
    }

    /// Refills the chosen pool (or both, for `None`) from its index set,
    /// shuffled or in split order.
    pub fn prime(&mut self, which: Option<SetKind>, order: Order) {
        if matches!(which, Some(SetKind::Train) | None) {
            self.train_pool = make_pool(&self.train_indices, order);
        }
        if matches!(which, Some(SetKind::Test) | None) {
            self.test_pool = make_pool(&self.test_indices, order);
        }
    }

    /// Pops the next presentation from the chosen pool; `None` once the pool
    /// is exhausted.
    pub fn next_item(&mut self, which: SetKind) -> Option<(&[f64], &[f64])> {
        let pool = match which {
            SetKind::Train => &mut self.train_pool,
            SetKind::Test => &mut self.test_pool,
        };
        let index = pool.pop_front()?;
        Some((&self.features[index], &self.labels[index]))
    }

    /// Samples in the chosen partition, or all samples for `None`.
    pub fn sample_count(&self, which: Option<SetKind>) -> usize {
        match which {
            Some(SetKind::Train) => self.train_indices.len(),
            Some(SetKind::Test) => self.test_indices.len(),
            None => self.features.len(),
        }
    }

    pub fn pool_empty(&self, which: SetKind) -> bool {
        match which {
            SetKind::Train => self.train_pool.is_empty(),
            SetKind::Test => self.test_pool.is_empty(),
        }
    }
}

fn make_pool(indices: &[usize], order: Order) -> VecDeque<usize> {
    let mut pool: Vec<usize> = indices.to_vec();
    if order == Order::Shuffle {
        pool.shuffle(&mut rand::thread_rng());
    }
    pool.into()
}

fn clamp_factor(factor: f64) -> f64 {
    factor.clamp(0.0, 1.0)
}
