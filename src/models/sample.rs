use serde::{Deserialize, Serialize};

use crate::models::BlockKey;

/// One supervised-learning pair produced from a block.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub key: BlockKey,
    pub features: Vec<f64>,
    pub target: Vec<f64>,
}

/// Feature and target arrays, row `i` of `x` pairs with row `i` of `y`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub x: Vec<Vec<f64>>,
    pub y: Vec<Vec<f64>>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn feature_width(&self) -> usize {
        self.x.first().map_or(0, Vec::len)
    }

    pub fn target_width(&self) -> usize {
        self.y.first().map_or(0, Vec::len)
    }
}

/// Train/test partitions handed to a regressor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetSplit {
    pub x_train: Vec<Vec<f64>>,
    pub x_test: Vec<Vec<f64>>,
    pub y_train: Vec<Vec<f64>>,
    pub y_test: Vec<Vec<f64>>,
}

impl DatasetSplit {
    pub fn train_len(&self) -> usize {
        self.x_train.len()
    }

    pub fn test_len(&self) -> usize {
        self.x_test.len()
    }

    pub fn total(&self) -> usize {
        self.train_len() + self.test_len()
    }

    pub fn summary(&self) -> String {
        let width = self
            .x_train
            .first()
            .or_else(|| self.x_test.first())
            .map_or(0, Vec::len);

        format!(
            "Dataset Split Summary:\n\
            - Total samples: {}\n\
            - Training set size: {} samples\n\
            - Test set size: {} samples\n\
            - Feature vector length: {}",
            self.total(),
            self.train_len(),
            self.test_len(),
            width
        )
    }
}
