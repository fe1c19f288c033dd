/// Distance between a predicted vector and an expected vector.
///
/// Injected into [`Rmse`] as a strategy value; each implementation is one
/// method, nothing more.
pub trait Distance {
    fn distance(&self, predicted: &[f64], expected: &[f64]) -> f64;
}

/// L2 distance: sqrt(Σ (p − e)²). Weights errors quadratically.
#[derive(Debug, Default, Clone, Copy)]
pub struct Euclidean;

impl Distance for Euclidean {
    fn distance(&self, predicted: &[f64], expected: &[f64]) -> f64 {
        predicted
            .iter()
            .zip(expected.iter())
            .map(|(p, e)| (p - e) * (p - e))
            .sum::<f64>()
            .sqrt()
    }
}

/// L1 (Manhattan) distance: Σ |p − e|. Weights errors linearly.
#[derive(Debug, Default, Clone, Copy)]
pub struct Taxicab;

impl Distance for Taxicab {
    fn distance(&self, predicted: &[f64], expected: &[f64]) -> f64 {
        predicted
            .iter()
            .zip(expected.iter())
            .map(|(p, e)| (p - e).abs())
            .sum()
    }
}

/// Running root-mean-square error over recorded presentation pairs.
///
/// RMSE = sqrt(Σ distance(predicted, expected)² / n); 0.0 while empty.
#[derive(Debug, Default)]
pub struct Rmse<D: Distance> {
    metric: D,
    predicted: Vec<Vec<f64>>,
    expected: Vec<Vec<f64>>,
}

impl<D: Distance> Rmse<D> {
    pub fn new(metric: D) -> Rmse<D> {
        Rmse {
            metric,
            predicted: Vec::new(),
            expected: Vec::new(),
        }
    }

    /// Appends one (predicted, expected) pair.
    pub fn record(&mut self, predicted: &[f64], expected: &[f64]) {
        self.predicted.push(predicted.to_vec());
        self.expected.push(expected.to_vec());
    }

    /// Discards every recorded pair.
    pub fn reset(&mut self) {
        self.predicted.clear();
        self.expected.clear();
    }

    pub fn sample_count(&self) -> usize {
        self.predicted.len()
    }

    pub fn current_error(&self) -> f64 {
        if self.predicted.is_empty() {
            return 0.0;
        }
        let total: f64 = self
            .predicted
            .iter()
            .zip(self.expected.iter())
            .map(|(p, e)| {
                let d = self.metric.distance(p, e);
                d * d
            })
            .sum();
        (total / self.predicted.len() as f64).sqrt()
    }
}
