use super::{system_scores, ActionDecider};
use crate::error::TransdotError;
use crate::features::FeatureExtractor;
use crate::learner::Learner;
use crate::oracle::Oracle;
use crate::sentence::Sentence;
use crate::system::{Action, Configuration};

/// Decider that trains a perceptron on the decisions of an oracle.
///
/// Every decision updates the learner with the oracle action. The
/// oracle action is always returned, so that parsing follows the gold
/// derivation.
pub struct PerceptronTrainer<'a, O, F, L> {
    oracle: O,
    features: F,
    learner: &'a mut L,
    early_update: bool,
}

impl<'a, O, F, L> PerceptronTrainer<'a, O, F, L>
where
    O: Oracle,
    F: FeatureExtractor,
    L: Learner,
{
    /// Construct a trainer.
    ///
    /// With `early_update`, a decision on which the model disagrees with
    /// the oracle fails with [`TransdotError::EarlyUpdate`], after the
    /// learner was updated. The remainder of the sentence should then be
    /// skipped.
    pub fn new(oracle: O, features: F, learner: &'a mut L, early_update: bool) -> Self {
        PerceptronTrainer {
            oracle,
            features,
            learner,
            early_update,
        }
    }
}

impl<'a, O, F, L> ActionDecider for PerceptronTrainer<'a, O, F, L>
where
    O: Oracle,
    F: FeatureExtractor,
    L: Learner,
{
    fn begin_sentence(&mut self, sentence: &Sentence) {
        self.oracle.begin_sentence(sentence);
    }

    fn next_actions(&mut self, config: &Configuration) -> Result<Vec<Action>, TransdotError> {
        let gold = self.oracle.next_action(config)?;
        let features = self.features.extract(config);

        let predicted = self.learner.update(gold.index(), &features);
        if predicted != gold.index() && self.early_update {
            return Err(TransdotError::EarlyUpdate);
        }

        Ok(vec![gold])
    }

    fn action_scores(
        &mut self,
        config: &Configuration,
    ) -> Result<Vec<(Action, f32)>, TransdotError> {
        let features = self.features.extract(config);
        system_scores(config, &self.learner.scores(&features))
    }
}
