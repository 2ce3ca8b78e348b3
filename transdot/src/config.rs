use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TransdotError;
use crate::features::FeatureSet;
use crate::learner::AveragedModel;
use crate::preprocess::Unlexer;
use crate::system::TransitionSystem;

/// Parser configuration.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Parser {
    /// The transition system.
    pub system: TransitionSystem,

    /// The feature templates.
    pub features: FeatureSet,

    /// Pop tokens in arc-eager parsing as soon as they are complete.
    #[serde(default = "default_pop_when_can")]
    pub pop_when_can: bool,

    /// Parse sentences from right to left.
    #[serde(default)]
    pub reverse: bool,

    /// Word list for unlexing, forms are not unlexed when absent.
    pub unlex: Option<String>,
}

impl Parser {
    /// Read the unlexer word list, if any.
    pub fn unlexer(&self) -> Result<Option<Unlexer>, TransdotError> {
        match self.unlex {
            Some(ref words) => {
                let read = BufReader::new(File::open(words)?);
                Ok(Some(Unlexer::from_words(read)?))
            }
            None => Ok(None),
        }
    }
}

fn default_pop_when_can() -> bool {
    true
}

/// The online learning strategy.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainerType {
    /// Perceptron updates on every oracle decision.
    Perceptron,

    /// Cost-sensitive updates, checked with rollouts.
    Rollout,
}

/// Training configuration.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Train {
    /// The online learning strategy.
    pub trainer: TrainerType,

    /// The number of passes over the training data.
    pub epochs: usize,

    /// Stop training on a sentence after the first wrong prediction.
    ///
    /// Only used by the perceptron trainer.
    #[serde(default)]
    pub early_update: bool,

    /// Only train on sentences with projective trees.
    #[serde(default)]
    pub only_projective: bool,

    /// Seed for shuffling the training data.
    #[serde(default)]
    pub seed: u64,
}

/// Evaluation configuration.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Eval {
    /// Do not evaluate tokens that start with a punctuation character.
    #[serde(default)]
    pub ignore_punctuation: bool,
}

/// Model configuration.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Model {
    /// Model parameters.
    pub parameters: String,
}

impl Model {
    /// Read the model parameters.
    pub fn load_parameters(&self) -> Result<AveragedModel, TransdotError> {
        let read = BufReader::new(File::open(&self.parameters)?);
        AveragedModel::load(read)
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Configuration of the parser.
    pub parser: Parser,

    /// Configuration of training.
    pub train: Train,

    /// Configuration of evaluation.
    #[serde(default)]
    pub eval: Eval,

    /// Configuration of the model.
    pub model: Model,
}

impl Config {
    /// Make configuration paths relative to the configuration file.
    pub fn relativize_paths<P>(&mut self, config_path: P) -> Result<(), TransdotError>
    where
        P: AsRef<Path>,
    {
        let config_path = config_path.as_ref();

        if let Some(ref mut words) = self.parser.unlex {
            *words = relativize_path(config_path, words)?;
        }
        self.model.parameters = relativize_path(config_path, &self.model.parameters)?;

        Ok(())
    }
}

pub trait TomlRead
where
    Self: Sized,
{
    fn from_toml_read(read: impl Read) -> Result<Self, TransdotError>;
}

impl TomlRead for Config {
    fn from_toml_read(mut read: impl Read) -> Result<Self, TransdotError> {
        let mut data = String::new();
        read.read_to_string(&mut data)?;
        let config: Config = toml::from_str(&data)?;
        Ok(config)
    }
}

fn relativize_path(config_path: &Path, filename: &str) -> Result<String, TransdotError> {
    if filename.is_empty() {
        return Ok(filename.to_owned());
    }

    let path = Path::new(&filename);

    // Don't touch absolute paths.
    if path.is_absolute() {
        return Ok(filename.to_owned());
    }

    let abs_config_path = config_path.canonicalize()?;
    Ok(abs_config_path
        .parent()
        .ok_or_else(|| {
            TransdotError::RelativizePathError(format!(
                "Cannot get parent path of the configuration file: {}",
                abs_config_path.to_string_lossy()
            ))
        })?
        .join(path)
        .to_str()
        .ok_or_else(|| {
            TransdotError::RelativizePathError(format!(
                "Cannot convert parent path to string: {}",
                abs_config_path.to_string_lossy()
            ))
        })?
        .to_owned())
}
