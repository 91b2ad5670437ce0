use crate::clean::clean_text;
use crate::comment::synthesize_comment;
use crate::extract::extract_text;
use crate::{
    ClassifierPipeline, PdfBackend, PipelineError, ProgressEvent, ResumeFile, ScreenStats,
    ScreeningRecord,
};

/// Relevance used when the predicted class cannot index the probability
/// vector (a label/probability mismatch in the artifact).
const FALLBACK_RELEVANCE: f64 = 0.5;

/// Outcome of one batch run.
#[derive(Debug, Clone, Default)]
pub struct ScreenOutcome {
    /// Successful records, in input order.
    pub records: Vec<ScreeningRecord>,
    pub stats: ScreenStats,
}

/// Screen a batch of resumes sequentially, in arrival order.
///
/// Each file runs extraction → cleaning → classification → comment
/// synthesis. Failures are recovered per file: the file produces a warning
/// instead of a record and the batch continues. Progress events are emitted
/// via the callback.
pub fn screen_files(
    files: &[ResumeFile],
    backend: &dyn PdfBackend,
    pipeline: &dyn ClassifierPipeline,
    rng: &mut fastrand::Rng,
    progress: impl Fn(ProgressEvent),
) -> ScreenOutcome {
    let total = files.len();
    let mut outcome = ScreenOutcome {
        stats: ScreenStats {
            total,
            ..ScreenStats::default()
        },
        ..ScreenOutcome::default()
    };

    for (index, file) in files.iter().enumerate() {
        progress(ProgressEvent::Extracting {
            index,
            total,
            file: file.name.clone(),
        });

        let raw_text = match extract_text(&file.data, backend) {
            Ok(text) => text,
            Err(e) => {
                outcome.stats.failed += 1;
                progress(ProgressEvent::Warning {
                    index,
                    total,
                    file: file.name.clone(),
                    message: format!("could not extract text: {}", e),
                });
                continue;
            }
        };

        let cleaned = clean_text(&raw_text);
        if cleaned.is_empty() {
            outcome.stats.empty += 1;
            progress(ProgressEvent::Warning {
                index,
                total,
                file: file.name.clone(),
                message: "no usable text after cleaning".to_string(),
            });
            continue;
        }

        let (predicted_class, proba) = match classify_one(pipeline, cleaned) {
            Ok(pair) => pair,
            Err(e) => {
                outcome.stats.failed += 1;
                progress(ProgressEvent::Failed {
                    index,
                    total,
                    file: file.name.clone(),
                    message: e.to_string(),
                });
                continue;
            }
        };

        let relevance_prob = match proba.get(predicted_class) {
            Some(p) => *p,
            None => {
                // Label/probability mismatch in the artifact; do not fail
                // the file, but make the mismatch visible.
                tracing::warn!(
                    file = %file.name,
                    predicted_class,
                    proba_len = proba.len(),
                    "predicted class does not index the probability vector"
                );
                progress(ProgressEvent::Warning {
                    index,
                    total,
                    file: file.name.clone(),
                    message: format!(
                        "class {} out of range for {} probabilities; using default relevance",
                        predicted_class,
                        proba.len()
                    ),
                });
                FALLBACK_RELEVANCE
            }
        };

        let comment = synthesize_comment(&raw_text, predicted_class, rng);

        let record = ScreeningRecord {
            file: file.name.clone(),
            predicted_class,
            relevance_prob,
            comment,
        };

        outcome.stats.screened += 1;
        if predicted_class == 1 {
            outcome.stats.recommended += 1;
        } else {
            outcome.stats.not_recommended += 1;
        }

        progress(ProgressEvent::Record {
            index,
            total,
            record: Box::new(record.clone()),
        });
        outcome.records.push(record);
    }

    outcome
}

/// Run one cleaned text through the pipeline as a one-element batch.
fn classify_one(
    pipeline: &dyn ClassifierPipeline,
    cleaned: String,
) -> Result<(usize, Vec<f64>), PipelineError> {
    let batch = [cleaned];
    let labels = pipeline.predict(&batch)?;
    let probas = pipeline.predict_proba(&batch)?;

    let label = labels
        .into_iter()
        .next()
        .ok_or_else(|| PipelineError::Prediction("pipeline returned no label".into()))?;
    let proba = probas
        .into_iter()
        .next()
        .ok_or_else(|| PipelineError::Prediction("pipeline returned no probabilities".into()))?;

    Ok((label, proba))
}
