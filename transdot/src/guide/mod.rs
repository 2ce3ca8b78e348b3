//! Action deciders.
//!
//! A decider proposes a ranked list of actions for a configuration. The
//! parser applies the first action of the list that is legal. Deciders
//! are composed by wrapping: the logging decider wraps any decider and
//! the trainers wrap an oracle.

use crate::error::TransdotError;
use crate::sentence::Sentence;
use crate::system::{Action, Configuration};

mod logging;
pub use logging::LoggingDecider;

mod model;
pub use model::ModelDecider;

mod oracle;
pub use oracle::OracleDecider;

mod perceptron;
pub use perceptron::PerceptronTrainer;

mod rollout;
pub use rollout::{score_deps, RolloutTrainer};

/// Decide on the next parser action.
pub trait ActionDecider {
    /// Prepare the decider for parsing `sentence`.
    ///
    /// Must be called before the first decision for a sentence.
    /// Deciders that wrap an oracle rebuild its cache.
    fn begin_sentence(&mut self, _sentence: &Sentence) {}

    /// Get candidate actions, best candidate first.
    ///
    /// The returned list is never empty.
    fn next_actions(&mut self, config: &Configuration) -> Result<Vec<Action>, TransdotError>;

    /// Get the decider's score for each candidate action.
    ///
    /// Does not change the state of the decider or of its learner.
    fn action_scores(
        &mut self,
        config: &Configuration,
    ) -> Result<Vec<(Action, f32)>, TransdotError>;
}

impl<D> ActionDecider for &mut D
where
    D: ActionDecider + ?Sized,
{
    fn begin_sentence(&mut self, sentence: &Sentence) {
        (**self).begin_sentence(sentence)
    }

    fn next_actions(&mut self, config: &Configuration) -> Result<Vec<Action>, TransdotError> {
        (**self).next_actions(config)
    }

    fn action_scores(
        &mut self,
        config: &Configuration,
    ) -> Result<Vec<(Action, f32)>, TransdotError> {
        (**self).action_scores(config)
    }
}

/// Scores of the actions of the configuration's transition system.
///
/// Fails when the scorer has fewer classes than the system has actions.
fn system_scores(
    config: &Configuration,
    scores: &[f32],
) -> Result<Vec<(Action, f32)>, TransdotError> {
    let actions = config.system().actions();
    if scores.len() < actions.len() {
        return Err(TransdotError::IllegalConfigurationError(format!(
            "Model scores {} actions, transition system {} has {} actions",
            scores.len(),
            config.system(),
            actions.len()
        )));
    }

    Ok(actions
        .iter()
        .map(|&action| (action, scores[action.index()]))
        .collect())
}
