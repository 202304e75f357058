use crate::features::FeatureVector;
use crate::pipeline::PipelineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Classification label. `Safe` corresponds to the benign class probability
/// clearing the configured threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    Safe,
    Phishing,
}

impl Label {
    pub fn from_probability(benign_probability: f64, threshold: f64) -> Label {
        if benign_probability >= threshold {
            Label::Safe
        } else {
            Label::Phishing
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Safe => write!(f, "safe"),
            Label::Phishing => write!(f, "phishing"),
        }
    }
}

/// Logistic model over the 30-feature vector: sigmoid(bias + w . x) gives
/// the benign-class probability. Loaded from JSON so retrained weights can
/// ship without a rebuild.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl Model {
    pub fn from_file(path: &str) -> anyhow::Result<Model> {
        let content = std::fs::read_to_string(path)?;
        let model: Model = serde_json::from_str(&content)?;
        Ok(model)
    }

    /// Uniform-weight fallback used when no trained model file is
    /// configured: every heuristic contributes equally.
    pub fn baseline() -> Model {
        Model {
            weights: vec![0.25; FeatureVector::LEN],
            bias: 0.0,
        }
    }

    /// Benign-class probability for a feature vector. The only runtime
    /// failure is a weight/feature shape mismatch, surfaced distinctly so
    /// callers never read it as a phishing verdict.
    pub fn predict(&self, features: &FeatureVector) -> Result<f64, PipelineError> {
        let input = features.model_input();
        if self.weights.len() != input.len() {
            return Err(PipelineError::InputShape {
                expected: self.weights.len(),
                got: input.len(),
            });
        }

        let z: f64 = self.bias
            + self
                .weights
                .iter()
                .zip(input.iter())
                .map(|(w, x)| w * x)
                .sum::<f64>();
        Ok(1.0 / (1.0 + (-z).exp()))
    }
}

static SHARED_MODEL: OnceLock<Arc<Model>> = OnceLock::new();

/// Process-wide model instance, loaded once at first use. Read-only after
/// initialization; per-request code never mutates it.
pub fn shared(model_path: Option<&str>) -> anyhow::Result<Arc<Model>> {
    if let Some(model) = SHARED_MODEL.get() {
        return Ok(Arc::clone(model));
    }

    let model = match model_path {
        Some(path) => Model::from_file(path)?,
        None => {
            log::warn!("no model file configured, using uniform baseline weights");
            Model::baseline()
        }
    };

    Ok(Arc::clone(SHARED_MODEL.get_or_init(|| Arc::new(model))))
}
