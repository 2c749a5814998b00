use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::info;

use crate::error::{ProcessingError, Result};
use crate::models::{Dataset, DatasetSplit, Sample};

/// Collects samples into parallel arrays and splits them reproducibly.
pub struct DatasetAssembler {
    test_fraction: f64,
    random_seed: u64,
}

impl DatasetAssembler {
    pub fn new(test_fraction: f64, random_seed: u64) -> Self {
        Self {
            test_fraction,
            random_seed,
        }
    }

    /// Keeps the order samples were produced in.
    pub fn assemble(&self, samples: Vec<Sample>) -> Result<Dataset> {
        if samples.is_empty() {
            return Err(ProcessingError::EmptyDataset);
        }

        let mut dataset = Dataset {
            x: Vec::with_capacity(samples.len()),
            y: Vec::with_capacity(samples.len()),
        };
        for sample in samples {
            dataset.x.push(sample.features);
            dataset.y.push(sample.target);
        }

        Ok(dataset)
    }

    pub fn train_size(&self, total: usize) -> usize {
        let size = (total as f64 * (1.0 - self.test_fraction)).round() as usize;
        size.min(total)
    }

    /// Shuffle indices with a seeded generator; the first `train_size`
    /// shuffled rows train, the rest test.
    pub fn split(&self, dataset: &Dataset) -> Result<DatasetSplit> {
        if dataset.is_empty() {
            return Err(ProcessingError::EmptyDataset);
        }

        let total = dataset.len();
        let mut indices: Vec<usize> = (0..total).collect();
        let mut rng = StdRng::seed_from_u64(self.random_seed);
        indices.shuffle(&mut rng);

        let (train, test) = indices.split_at(self.train_size(total));
        let pick = |rows: &[Vec<f64>], idx: &[usize]| -> Vec<Vec<f64>> {
            idx.iter().map(|&i| rows[i].clone()).collect()
        };

        let split = DatasetSplit {
            x_train: pick(&dataset.x, train),
            x_test: pick(&dataset.x, test),
            y_train: pick(&dataset.y, train),
            y_test: pick(&dataset.y, test),
        };

        info!(
            "X has {} samples, training set {} / test set {}",
            total,
            split.train_len(),
            split.test_len()
        );

        Ok(split)
    }
}
