pub mod classifier;
pub mod config;
pub mod dns;
pub mod features;
pub mod history;
pub mod indexing;
pub mod page;
pub mod pipeline;
pub mod resources;
pub mod whois;

pub use classifier::{Label, Model};
pub use config::Config;
pub use features::{FeatureVector, FEATURE_NAMES};
pub use pipeline::{Pipeline, PipelineError, Verdict};
pub use resources::{ParsedUrl, ResourceSet};
