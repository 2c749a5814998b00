use rayon::prelude::*;
use tracing::debug;

use crate::error::{ProcessingError, Result};
use crate::models::{Block, FeatureField, ObservationRecord, Sample};

/// Turns blocks into feature/target samples.
pub struct Windower {
    block_length: usize,
    fields: Vec<FeatureField>,
    max_workers: usize,
}

impl Windower {
    pub fn new(block_length: usize, fields: Vec<FeatureField>) -> Self {
        Self {
            block_length,
            fields,
            max_workers: 1,
        }
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }

    pub fn feature_days(&self) -> usize {
        self.block_length - 1
    }

    pub fn feature_width(&self) -> usize {
        self.feature_days() * self.fields.len()
    }

    /// Split one block into features (all but the last record) and target
    /// (the last record).
    pub fn window_block(&self, block: &Block) -> Result<Sample> {
        if block.len() != self.block_length {
            return Err(ProcessingError::InvariantViolation {
                location: block.location().to_string(),
                block: block.key().block,
                expected: self.block_length,
                actual: block.len(),
            });
        }

        let (target, features) = block
            .records()
            .split_last()
            .ok_or_else(|| ProcessingError::InvariantViolation {
                location: block.location().to_string(),
                block: block.key().block,
                expected: self.block_length,
                actual: 0,
            })?;

        Ok(Sample {
            key: block.key().clone(),
            features: self.flatten(features),
            target: target.values(&self.fields),
        })
    }

    /// Window every block, keeping the input order in the output.
    pub fn window_blocks(&self, blocks: &[Block]) -> Result<Vec<Sample>> {
        debug!(
            blocks = blocks.len(),
            workers = self.max_workers,
            "windowing blocks"
        );

        if self.max_workers <= 1 || blocks.len() < 2 {
            return blocks.iter().map(|block| self.window_block(block)).collect();
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| ProcessingError::Config(e.to_string()))?;

        pool.install(|| {
            blocks
                .par_iter()
                .map(|block| self.window_block(block))
                .collect()
        })
    }

    /// Feature vector for a caller-supplied run of exactly `feature_days`
    /// records. Contiguity is the caller's responsibility.
    pub fn window_features(&self, records: &[ObservationRecord]) -> Result<Vec<f64>> {
        if records.len() != self.feature_days() {
            return Err(ProcessingError::WrongSampleLength {
                expected: self.feature_days(),
                actual: records.len(),
            });
        }
        Ok(self.flatten(records))
    }

    fn flatten(&self, records: &[ObservationRecord]) -> Vec<f64> {
        let mut out = Vec::with_capacity(records.len() * self.fields.len());
        for record in records {
            record.extend_values(&self.fields, &mut out);
        }
        out
    }
}
