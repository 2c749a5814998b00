pub mod assembler;
pub mod pipeline;
pub mod purger;
pub mod segmentation_report;
pub mod segmenter;
pub mod windower;

pub use assembler::DatasetAssembler;
pub use pipeline::{
    build_dataset, build_dataset_from_blocks, prepare_dataset, window_single_sample, Pipeline,
};
pub use purger::{PurgeOutcome, Purger};
pub use segmentation_report::{LocationStatistics, SegmentationReport};
pub use segmenter::{group_by_location, LocationGroup, LocationSegmentStats, Segmentation, Segmenter};
pub use windower::Windower;
