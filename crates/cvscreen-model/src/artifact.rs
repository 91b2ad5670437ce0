use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// On-disk JSON layout of a trained pipeline artifact.
///
/// Produced offline by the training job; this crate only reads it. The
/// artifact is the single persisted input of the application: if it is
/// missing or corrupt, startup fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineArtifact {
    /// Artifact schema version.
    pub version: u32,
    /// Class labels, in probability-column order.
    pub classes: Vec<usize>,
    pub vectorizer: VectorizerArtifact,
    pub classifier: ClassifierArtifact,
}

/// TF-IDF vectorizer parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorizerArtifact {
    /// Token → feature column.
    pub vocabulary: HashMap<String, usize>,
    /// Inverse document frequency per feature column.
    pub idf: Vec<f64>,
}

/// Binary logistic regression parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierArtifact {
    /// One weight per feature column. The decision value scores the class
    /// at `classes[1]`.
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}
