//! Online training of the parser model.

use log::info;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

use crate::config::{self, TrainerType};
use crate::error::TransdotError;
use crate::features::FeatureSet;
use crate::guide::{ActionDecider, PerceptronTrainer, RolloutTrainer};
use crate::learner::{AveragedModel, Learner, Perceptron};
use crate::oracle::StaticOracle;
use crate::parser::Parser;
use crate::preprocess::is_projective;
use crate::sentence::Sentence;
use crate::system::TransitionSystem;

/// Statistics of a training epoch.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct EpochStats {
    /// Number of sentences that were processed.
    pub sentences: usize,

    /// Number of sentences that were cut short by an early update.
    pub early_updates: usize,
}

/// Trainer for the parser model.
///
/// Every epoch, the training sentences are shuffled and parsed with a
/// training decider that follows the oracle.
#[derive(Clone, Debug)]
pub struct Trainer {
    system: TransitionSystem,
    features: FeatureSet,
    pop_when_can: bool,
    trainer: TrainerType,
    early_update: bool,
    epochs: usize,
    only_projective: bool,
    rng: XorShiftRng,
}

impl Trainer {
    pub fn new(parser_config: &config::Parser, train_config: &config::Train) -> Self {
        Trainer {
            system: parser_config.system,
            features: parser_config.features,
            pop_when_can: parser_config.pop_when_can,
            trainer: train_config.trainer,
            early_update: train_config.early_update,
            epochs: train_config.epochs,
            only_projective: train_config.only_projective,
            rng: XorShiftRng::seed_from_u64(train_config.seed),
        }
    }

    /// Train a model on `sentences`.
    ///
    /// The gold trees of all sentences must be well-formed. If the
    /// trainer is configured to only use projective trees, sentences
    /// with non-projective trees are skipped.
    pub fn train(&mut self, sentences: &[Sentence]) -> Result<AveragedModel, TransdotError> {
        for sentence in sentences {
            sentence.validate_gold()?;
        }

        let mut order = (0..sentences.len())
            .filter(|&idx| !self.only_projective || is_projective(&sentences[idx]))
            .collect::<Vec<_>>();
        if order.len() != sentences.len() {
            info!(
                "Skipping {} non-projective sentences",
                sentences.len() - order.len()
            );
        }

        let mut perceptron = Perceptron::new(self.system.n_actions());

        for epoch in 0..self.epochs {
            order.shuffle(&mut self.rng);
            let stats =
                self.train_epoch(&mut perceptron, order.iter().map(|&idx| &sentences[idx]))?;

            info!(
                "Epoch {}: {} sentences, {} early updates, {} features",
                epoch,
                stats.sentences,
                stats.early_updates,
                perceptron.n_features()
            );
        }

        Ok(perceptron.finalize())
    }

    /// Train a single epoch, in the order given by `sentences`.
    pub fn train_epoch<'a, L>(
        &self,
        learner: &mut L,
        sentences: impl IntoIterator<Item = &'a Sentence>,
    ) -> Result<EpochStats, TransdotError>
    where
        L: Learner,
    {
        let oracle = StaticOracle::new(self.system, self.pop_when_can);

        match self.trainer {
            TrainerType::Perceptron => {
                let decider =
                    PerceptronTrainer::new(oracle, self.features, learner, self.early_update);
                train_with(Parser::new(self.system, decider), sentences)
            }
            TrainerType::Rollout => {
                let decider = RolloutTrainer::new(oracle, self.features, learner);
                train_with(Parser::new(self.system, decider), sentences)
            }
        }
    }
}

fn train_with<'a, D>(
    mut parser: Parser<D>,
    sentences: impl IntoIterator<Item = &'a Sentence>,
) -> Result<EpochStats, TransdotError>
where
    D: ActionDecider,
{
    let mut stats = EpochStats::default();

    for sentence in sentences {
        match parser.parse(sentence) {
            Ok(_) => (),
            Err(TransdotError::EarlyUpdate) => stats.early_updates += 1,
            Err(err) => return Err(err),
        }

        stats.sentences += 1;
        if stats.sentences % 1000 == 0 {
            info!("Processed {} sentences", stats.sentences);
        }
    }

    Ok(stats)
}
