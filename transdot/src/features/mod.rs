//! Feature extraction from parser configurations.
//!
//! Features are strings of the form `name=value`. A feature extractor
//! must be a pure function of the configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::system::Configuration;

mod eager;
pub use eager::EagerFeatures;

mod stack;
pub use stack::StackFeatures;

/// Value of features that refer to absent tokens.
pub const NONE: &str = "-NONE-";

/// Extract features from a parser configuration.
pub trait FeatureExtractor {
    fn extract(&self, config: &Configuration) -> Vec<String>;
}

impl<F> FeatureExtractor for &F
where
    F: FeatureExtractor + ?Sized,
{
    fn extract(&self, config: &Configuration) -> Vec<String> {
        (**self).extract(config)
    }
}

/// The available feature sets.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureSet {
    /// Features for the arc-eager system.
    Eager,

    /// Features over the topmost stack tokens, for arc-standard.
    Stack,
}

impl FeatureExtractor for FeatureSet {
    fn extract(&self, config: &Configuration) -> Vec<String> {
        match self {
            FeatureSet::Eager => EagerFeatures.extract(config),
            FeatureSet::Stack => StackFeatures.extract(config),
        }
    }
}

impl fmt::Display for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FeatureSet::Eager => f.write_str("eager"),
            FeatureSet::Stack => f.write_str("stack"),
        }
    }
}

/// Form of a token, or [`NONE`] when there is no token.
fn form<'a>(config: &Configuration<'a>, token: Option<usize>) -> &'a str {
    token
        .map(|token| config.sentence()[token].form())
        .unwrap_or(NONE)
}

/// Tag of a token, or [`NONE`] when there is no token.
fn tag<'a>(config: &Configuration<'a>, token: Option<usize>) -> &'a str {
    token
        .map(|token| config.sentence()[token].tag())
        .unwrap_or(NONE)
}

/// Input token at `offset` from the cursor.
fn input_at(config: &Configuration, offset: usize) -> Option<usize> {
    let idx = config.cursor() + offset;
    if idx < config.sentence().len() {
        Some(idx)
    } else {
        None
    }
}
