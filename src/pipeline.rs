use crate::classifier::{self, Label, Model};
use crate::config::Config;
use crate::features::{self, FeatureVector};
use crate::resources::{self, Fetchers, ResourceSet};
use std::sync::Arc;
use thiserror::Error;

/// Failures surfaced to the caller, kept distinct from a low-probability
/// "phishing" verdict. Resource and evaluator faults never reach this level;
/// they are absorbed into fallback scores further down.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("classifier expects {expected} features, got {got}")]
    InputShape { expected: usize, got: usize },
}

#[derive(Debug, Clone)]
pub struct Verdict {
    pub label: Label,
    pub probability: f64,
    pub features: FeatureVector,
}

/// The classify-this-URL entry point: fetch resources once, evaluate the 30
/// heuristics, score the vector, threshold into a label.
pub struct Pipeline {
    fetchers: Fetchers,
    model: Arc<Model>,
    safe_threshold: f64,
    offline: bool,
}

impl Pipeline {
    pub fn new(config: &Config, offline: bool) -> anyhow::Result<Pipeline> {
        let model = classifier::shared(config.model_path.as_deref())?;
        Pipeline::with_model(model, config, offline)
    }

    pub fn with_model(
        model: Arc<Model>,
        config: &Config,
        offline: bool,
    ) -> anyhow::Result<Pipeline> {
        Ok(Pipeline {
            fetchers: Fetchers::new(&config.fetch)?,
            model,
            safe_threshold: config.safe_threshold,
            offline,
        })
    }

    /// Fetch all resources for a URL and assemble the feature vector. Always
    /// returns exactly 30 scores no matter how many fetches failed.
    pub async fn extract_features(&self, url: &str) -> FeatureVector {
        let resources = self.gather(url).await;
        features::extract(&resources)
    }

    pub async fn classify(&self, url: &str) -> Result<Verdict, PipelineError> {
        let resources = self.gather(url).await;
        let features = features::extract(&resources);
        let probability = self.model.predict(&features)?;
        let label = Label::from_probability(probability, self.safe_threshold);

        log::info!("classified {url}: {label} (probability {probability:.4})");
        Ok(Verdict {
            label,
            probability,
            features,
        })
    }

    async fn gather(&self, url: &str) -> ResourceSet {
        if self.offline {
            log::debug!("offline mode: skipping all network fetches for {url}");
            ResourceSet::offline(url)
        } else {
            resources::gather(url, &self.fetchers).await
        }
    }
}
