use std::path::{Path, PathBuf};

use thiserror::Error;

use cvscreen_core::{ClassifierPipeline, PipelineError};

pub mod artifact;

pub use artifact::{ClassifierArtifact, PipelineArtifact, VectorizerArtifact};

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("failed to read model artifact {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse model artifact {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("inconsistent model artifact: {0}")]
    Inconsistent(String),
}

/// A pre-trained TF-IDF + logistic-regression pipeline.
///
/// Loaded once per process from a JSON artifact and read-only thereafter.
/// `predict` returns class *labels* (not column indices), matching the
/// training-side convention; for the usual `[0, 1]` label set the label
/// doubles as an index into the probability vector.
#[derive(Debug)]
pub struct LinearPipeline {
    artifact: PipelineArtifact,
}

impl LinearPipeline {
    /// Load and validate an artifact from disk.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let content = std::fs::read_to_string(path).map_err(|source| ModelError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let artifact: PipelineArtifact =
            serde_json::from_str(&content).map_err(|source| ModelError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_artifact(artifact)
    }

    /// Validate internal consistency and wrap the artifact.
    pub fn from_artifact(artifact: PipelineArtifact) -> Result<Self, ModelError> {
        let n_features = artifact.vectorizer.idf.len();

        if artifact.classifier.coefficients.len() != n_features {
            return Err(ModelError::Inconsistent(format!(
                "{} coefficients for {} features",
                artifact.classifier.coefficients.len(),
                n_features
            )));
        }
        if let Some((token, &column)) = artifact
            .vectorizer
            .vocabulary
            .iter()
            .find(|&(_, &column)| column >= n_features)
        {
            return Err(ModelError::Inconsistent(format!(
                "token {:?} maps to column {} but there are only {} features",
                token, column, n_features
            )));
        }
        if artifact.classes.len() != 2 {
            return Err(ModelError::Inconsistent(format!(
                "expected 2 classes, artifact has {}",
                artifact.classes.len()
            )));
        }

        tracing::info!(
            version = artifact.version,
            classes = ?artifact.classes,
            vocabulary = artifact.vectorizer.vocabulary.len(),
            "loaded classification pipeline"
        );

        Ok(Self { artifact })
    }

    pub fn version(&self) -> u32 {
        self.artifact.version
    }

    pub fn classes(&self) -> &[usize] {
        &self.artifact.classes
    }

    pub fn vocabulary_size(&self) -> usize {
        self.artifact.vectorizer.vocabulary.len()
    }

    /// TF-IDF feature vector for one cleaned text, L2-normalized.
    fn vectorize(&self, text: &str) -> Vec<f64> {
        let vectorizer = &self.artifact.vectorizer;
        let mut features = vec![0.0; vectorizer.idf.len()];

        let tokens: Vec<&str> = text.split_whitespace().collect();
        if tokens.is_empty() {
            return features;
        }

        for token in &tokens {
            if let Some(&column) = vectorizer.vocabulary.get(*token) {
                features[column] += 1.0;
            }
        }

        let doc_len = tokens.len() as f64;
        for (column, value) in features.iter_mut().enumerate() {
            *value = *value / doc_len * vectorizer.idf[column];
        }

        let norm = features.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in &mut features {
                *value /= norm;
            }
        }

        features
    }

    /// Probability of the positive class (`classes[1]`) for one text.
    fn positive_probability(&self, text: &str) -> f64 {
        let features = self.vectorize(text);
        let classifier = &self.artifact.classifier;
        let decision: f64 = classifier
            .coefficients
            .iter()
            .zip(&features)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + classifier.intercept;
        1.0 / (1.0 + (-decision).exp())
    }
}

impl ClassifierPipeline for LinearPipeline {
    fn predict(&self, texts: &[String]) -> Result<Vec<usize>, PipelineError> {
        Ok(texts
            .iter()
            .map(|text| {
                let p = self.positive_probability(text);
                if p >= 0.5 {
                    self.artifact.classes[1]
                } else {
                    self.artifact.classes[0]
                }
            })
            .collect())
    }

    fn predict_proba(&self, texts: &[String]) -> Result<Vec<Vec<f64>>, PipelineError> {
        Ok(texts
            .iter()
            .map(|text| {
                let p = self.positive_probability(text);
                vec![1.0 - p, p]
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn toy_artifact() -> PipelineArtifact {
        // Two features: "опыт" pushes towards class 1, "студент" towards 0.
        let vocabulary: HashMap<String, usize> =
            [("опыт".to_string(), 0), ("студент".to_string(), 1)]
                .into_iter()
                .collect();
        PipelineArtifact {
            version: 1,
            classes: vec![0, 1],
            vectorizer: VectorizerArtifact {
                vocabulary,
                idf: vec![1.0, 1.0],
            },
            classifier: ClassifierArtifact {
                coefficients: vec![4.0, -4.0],
                intercept: 0.0,
            },
        }
    }

    #[test]
    fn predicts_by_decision_sign() {
        let pipeline = LinearPipeline::from_artifact(toy_artifact()).unwrap();
        let labels = pipeline
            .predict(&["опыт работы".to_string(), "студент".to_string()])
            .unwrap();
        assert_eq!(labels, vec![1, 0]);
    }

    #[test]
    fn probabilities_sum_to_one_and_order_matches_classes() {
        let pipeline = LinearPipeline::from_artifact(toy_artifact()).unwrap();
        let probas = pipeline.predict_proba(&["опыт".to_string()]).unwrap();
        let proba = &probas[0];
        assert_eq!(proba.len(), 2);
        assert!((proba[0] + proba[1] - 1.0).abs() < 1e-12);
        assert!(proba[1] > proba[0]);
    }

    #[test]
    fn unknown_tokens_fall_back_to_the_intercept() {
        let mut artifact = toy_artifact();
        artifact.classifier.intercept = -1.0;
        let pipeline = LinearPipeline::from_artifact(artifact).unwrap();
        let labels = pipeline.predict(&["неизвестное слово".to_string()]).unwrap();
        assert_eq!(labels, vec![0]);
    }

    #[test]
    fn loads_from_json_file() {
        let artifact = toy_artifact();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&artifact).unwrap().as_bytes())
            .unwrap();
        file.flush().unwrap();

        let pipeline = LinearPipeline::load(file.path()).unwrap();
        assert_eq!(pipeline.classes(), &[0, 1]);
        assert_eq!(pipeline.vocabulary_size(), 2);
        assert_eq!(pipeline.version(), 1);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = LinearPipeline::load(Path::new("/nonexistent/model.json")).unwrap_err();
        assert!(matches!(err, ModelError::Read { .. }));
    }

    #[test]
    fn corrupt_json_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{not json").unwrap();
        file.flush().unwrap();

        let err = LinearPipeline::load(file.path()).unwrap_err();
        assert!(matches!(err, ModelError::Parse { .. }));
    }

    #[test]
    fn coefficient_shape_mismatch_is_rejected() {
        let mut artifact = toy_artifact();
        artifact.classifier.coefficients.push(0.0);
        let err = LinearPipeline::from_artifact(artifact).unwrap_err();
        assert!(matches!(err, ModelError::Inconsistent(_)));
    }
}
