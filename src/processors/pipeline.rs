use tracing::info;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::{Block, DatasetSplit, ObservationRecord};
use crate::processors::{
    DatasetAssembler, Purger, SegmentationReport, Segmentation, Segmenter, Windower,
};
use crate::utils::progress::ProgressReporter;

/// Runs Segmenter → Purger → Windower → Dataset Assembler under one
/// validated configuration.
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        Ok(Self {
            config: config.checked()?,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Segment and purge; the retained blocks are what gets persisted as the
    /// processed dataset.
    pub fn prepare(
        &self,
        records: &[ObservationRecord],
        progress: Option<&ProgressReporter>,
    ) -> Result<(Vec<Block>, SegmentationReport)> {
        let block_length = self.config.block_length();

        if let Some(p) = progress {
            p.stage("Segmenting day sequences...");
        }
        let Segmentation { blocks, locations } = Segmenter::new(block_length)?.segment(records);
        info!(
            "Segmented {} records from {} locations into {} candidate blocks",
            records.len(),
            locations.len(),
            blocks.len()
        );

        if let Some(p) = progress {
            p.stage("Purging short blocks...");
        }
        let purge = Purger::new(block_length).purge(blocks);
        info!(
            "Kept {} blocks of {} days, purged {}",
            purge.retained.len(),
            block_length,
            purge.purged.len()
        );

        let report = SegmentationReport::from_stages(block_length, &locations, &purge);
        Ok((purge.retained, report))
    }

    /// Window already-purged blocks and split them into train/test sets.
    pub fn build_from_blocks(
        &self,
        blocks: &[Block],
        progress: Option<&ProgressReporter>,
    ) -> Result<DatasetSplit> {
        if let Some(p) = progress {
            p.stage("Windowing blocks...");
        }
        let samples = self.windower().window_blocks(blocks)?;

        if let Some(p) = progress {
            p.stage("Splitting dataset...");
        }
        let assembler = DatasetAssembler::new(self.config.test_fraction, self.config.random_seed);
        let dataset = assembler.assemble(samples)?;
        assembler.split(&dataset)
    }

    pub fn build_dataset(
        &self,
        records: &[ObservationRecord],
        progress: Option<&ProgressReporter>,
    ) -> Result<(DatasetSplit, SegmentationReport)> {
        let (blocks, report) = self.prepare(records, progress)?;
        let split = self.build_from_blocks(&blocks, progress)?;

        if let Some(p) = progress {
            p.finish_with_message(&format!("Built {} samples", split.total()));
        }

        Ok((split, report))
    }

    pub fn window_single_sample(&self, records: &[ObservationRecord]) -> Result<Vec<f64>> {
        self.windower().window_features(records)
    }

    fn windower(&self) -> Windower {
        Windower::new(self.config.block_length(), self.config.field_order.clone())
            .with_max_workers(self.config.max_workers)
    }
}

/// Segment, purge, window and split `records` in one call.
pub fn build_dataset(
    records: &[ObservationRecord],
    config: &PipelineConfig,
) -> Result<(DatasetSplit, SegmentationReport)> {
    Pipeline::new(config.clone())?.build_dataset(records, None)
}

/// Segment and purge only; the blocks are the processed dataset.
pub fn prepare_dataset(
    records: &[ObservationRecord],
    config: &PipelineConfig,
) -> Result<(Vec<Block>, SegmentationReport)> {
    Pipeline::new(config.clone())?.prepare(records, None)
}

pub fn build_dataset_from_blocks(blocks: &[Block], config: &PipelineConfig) -> Result<DatasetSplit> {
    Pipeline::new(config.clone())?.build_from_blocks(blocks, None)
}

/// Feature vector for a single prediction request of exactly
/// `feature_days` contiguous records.
pub fn window_single_sample(
    records: &[ObservationRecord],
    config: &PipelineConfig,
) -> Result<Vec<f64>> {
    Pipeline::new(config.clone())?.window_single_sample(records)
}
