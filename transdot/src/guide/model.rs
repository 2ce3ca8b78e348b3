use std::cmp::Reverse;

use ordered_float::OrderedFloat;

use super::{system_scores, ActionDecider};
use crate::error::TransdotError;
use crate::features::FeatureExtractor;
use crate::learner::Scorer;
use crate::system::{Action, Configuration, TransitionSystem};

/// Decider that ranks actions using a trained model.
#[derive(Clone, Debug)]
pub struct ModelDecider<F, S> {
    features: F,
    scorer: S,
}

impl<F, S> ModelDecider<F, S>
where
    F: FeatureExtractor,
    S: Scorer,
{
    pub fn new(features: F, scorer: S) -> Self {
        ModelDecider { features, scorer }
    }
}

impl<F, S> ActionDecider for ModelDecider<F, S>
where
    F: FeatureExtractor,
    S: Scorer,
{
    /// Rank the actions of the transition system by their scores.
    ///
    /// Under arc-standard, shifting is the only possible action while the
    /// stack holds less than two tokens, so the model is not consulted.
    /// Shifting is never proposed when the input is exhausted.
    fn next_actions(&mut self, config: &Configuration) -> Result<Vec<Action>, TransdotError> {
        if config.system() == TransitionSystem::ArcStandard && config.stack().len() < 2 {
            return Ok(vec![Action::Shift]);
        }

        let mut scores = self.action_scores(config)?;
        scores.sort_by_key(|&(_, score)| Reverse(OrderedFloat(score)));

        Ok(scores.into_iter().map(|(action, _)| action).collect())
    }

    fn action_scores(
        &mut self,
        config: &Configuration,
    ) -> Result<Vec<(Action, f32)>, TransdotError> {
        let features = self.features.extract(config);
        let scores = self.scorer.scores(&features);

        let mut scores = system_scores(config, &scores)?;
        if config.input_exhausted() {
            scores.retain(|&(action, _)| action != Action::Shift);
        }

        Ok(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::ModelDecider;
    use crate::features::FeatureExtractor;
    use crate::guide::ActionDecider;
    use crate::learner::Scorer;
    use crate::sentence::tests::sentence_with_heads;
    use crate::system::{Action, Configuration, TransitionSystem};

    struct NoFeatures;

    impl FeatureExtractor for NoFeatures {
        fn extract(&self, _config: &Configuration) -> Vec<String> {
            Vec::new()
        }
    }

    struct FixedScores(Vec<f32>);

    impl Scorer for FixedScores {
        fn n_classes(&self) -> usize {
            self.0.len()
        }

        fn scores(&self, _features: &[String]) -> Vec<f32> {
            self.0.clone()
        }
    }

    #[test]
    fn actions_are_ranked_by_score() {
        let sentence = sentence_with_heads(&[0, 1]);
        let mut config = Configuration::new(TransitionSystem::ArcEager, &sentence);
        config.apply(Action::Shift).unwrap();

        let mut decider = ModelDecider::new(NoFeatures, FixedScores(vec![0.5, -1., 2., 1.]));
        assert_eq!(
            decider.next_actions(&config).unwrap(),
            vec![
                Action::ReduceRight,
                Action::Pop,
                Action::Shift,
                Action::ReduceLeft
            ]
        );
    }

    #[test]
    fn arc_standard_shifts_with_small_stack() {
        let sentence = sentence_with_heads(&[0, 1]);
        let mut config = Configuration::new(TransitionSystem::ArcStandard, &sentence);
        config.apply(Action::Shift).unwrap();

        let mut decider = ModelDecider::new(NoFeatures, FixedScores(vec![-1., 2., 1.]));
        assert_eq!(decider.next_actions(&config).unwrap(), vec![Action::Shift]);
    }

    #[test]
    fn shift_is_masked_on_exhausted_input() {
        let sentence = sentence_with_heads(&[0]);
        let mut config = Configuration::new(TransitionSystem::ArcStandard, &sentence);
        config.apply(Action::Shift).unwrap();
        config.apply(Action::Shift).unwrap();

        let mut decider = ModelDecider::new(NoFeatures, FixedScores(vec![3., 1., 2.]));
        assert_eq!(
            decider.next_actions(&config).unwrap(),
            vec![Action::ReduceRight, Action::ReduceLeft]
        );
    }

    #[test]
    fn model_must_score_all_actions() {
        let sentence = sentence_with_heads(&[0]);
        let config = Configuration::new(TransitionSystem::ArcEager, &sentence);

        let mut decider = ModelDecider::new(NoFeatures, FixedScores(vec![0., 0., 0.]));
        assert!(decider.next_actions(&config).is_err());
    }
}
