//! Binary decision tree stored as parallel node arrays

use super::{argmax, check_finite, check_n_features, Classifier};
use crate::error::{InvalidParams, Result};
use ndarray::{Array1, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

/// Child index marking a leaf
pub const TREE_LEAF: i64 = -1;

/// Fitted tree as stored in `decision_tree_model.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTreeParams {
    pub n_features_in: usize,
    pub classes: Vec<f64>,
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-node class weights, one column per class
    pub value: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Copy)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        class_idx: usize,
    },
}

#[derive(Debug, Clone)]
pub struct DecisionTree {
    n_features_in: usize,
    classes: Vec<f64>,
    nodes: Vec<Node>,
}

impl DecisionTree {
    pub fn from_params(params: DecisionTreeParams) -> std::result::Result<Self, InvalidParams> {
        let n_nodes = params.children_left.len();
        let n_classes = params.classes.len();

        if params.n_features_in == 0 {
            return Err(InvalidParams("n_features_in must be positive".to_string()));
        }
        if n_classes == 0 {
            return Err(InvalidParams("classes must not be empty".to_string()));
        }
        check_finite("classes", &params.classes)?;
        if n_nodes == 0 {
            return Err(InvalidParams("tree has no nodes".to_string()));
        }
        for (what, len) in [
            ("children_right", params.children_right.len()),
            ("feature", params.feature.len()),
            ("threshold", params.threshold.len()),
            ("value", params.value.len()),
        ] {
            if len != n_nodes {
                return Err(InvalidParams(format!(
                    "{} has {} entries, expected {}",
                    what, len, n_nodes
                )));
            }
        }

        let mut nodes = Vec::with_capacity(n_nodes);
        for idx in 0..n_nodes {
            let left = params.children_left[idx];
            let right = params.children_right[idx];

            if left == TREE_LEAF {
                if right != TREE_LEAF {
                    return Err(InvalidParams(format!(
                        "node {} has a right child but no left child",
                        idx
                    )));
                }
                let weights = &params.value[idx];
                if weights.len() != n_classes {
                    return Err(InvalidParams(format!(
                        "value row {} has {} entries, expected {}",
                        idx,
                        weights.len(),
                        n_classes
                    )));
                }
                check_finite("value", weights)?;
                let class_idx = argmax(weights.iter().copied()).unwrap_or(0);
                nodes.push(Node::Leaf { class_idx });
                continue;
            }

            // Children always follow their parent, so traversal terminates
            let left = child_index(idx, left, n_nodes)?;
            let right = child_index(idx, right, n_nodes)?;
            let feature = usize::try_from(params.feature[idx])
                .ok()
                .filter(|f| *f < params.n_features_in)
                .ok_or_else(|| {
                    InvalidParams(format!(
                        "node {} splits on feature {} outside 0..{}",
                        idx, params.feature[idx], params.n_features_in
                    ))
                })?;
            let threshold = params.threshold[idx];
            if !threshold.is_finite() {
                return Err(InvalidParams(format!(
                    "node {} has a non-finite threshold",
                    idx
                )));
            }

            nodes.push(Node::Split {
                feature,
                threshold,
                left,
                right,
            });
        }

        Ok(Self {
            n_features_in: params.n_features_in,
            classes: params.classes,
            nodes,
        })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn predict_row(&self, row: ArrayView1<'_, f64>) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[feature] <= threshold { left } else { right };
                }
                Node::Leaf { class_idx } => return self.classes[class_idx],
            }
        }
    }
}

fn child_index(parent: usize, child: i64, n_nodes: usize) -> std::result::Result<usize, InvalidParams> {
    usize::try_from(child)
        .ok()
        .filter(|c| *c > parent && *c < n_nodes)
        .ok_or_else(|| {
            InvalidParams(format!(
                "node {} has invalid child index {}",
                parent, child
            ))
        })
}

impl Classifier for DecisionTree {
    fn name(&self) -> &'static str {
        "DecisionTreeClassifier"
    }

    fn n_features_in(&self) -> usize {
        self.n_features_in
    }

    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        check_n_features(self.name(), self.n_features_in, &x)?;
        Ok(x.axis_iter(Axis(0)).map(|row| self.predict_row(row)).collect())
    }
}
