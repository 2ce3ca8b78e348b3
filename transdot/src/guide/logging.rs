use std::io::Write;

use log::debug;

use super::ActionDecider;
use crate::error::TransdotError;
use crate::features::FeatureExtractor;
use crate::sentence::Sentence;
use crate::system::{Action, Configuration};

/// Decider that writes the decisions of another decider.
///
/// For every decision, a line is written with the best action of the
/// wrapped decider followed by the features of the configuration,
/// separated by spaces. This can be used to create training data for
/// an external classifier.
pub struct LoggingDecider<D, F, W> {
    decider: D,
    features: F,
    write: W,
}

impl<D, F, W> LoggingDecider<D, F, W>
where
    D: ActionDecider,
    F: FeatureExtractor,
    W: Write,
{
    pub fn new(decider: D, features: F, write: W) -> Self {
        LoggingDecider {
            decider,
            features,
            write,
        }
    }

    /// Unwrap the decider, returning the writer.
    pub fn into_inner(self) -> W {
        self.write
    }
}

impl<D, F, W> ActionDecider for LoggingDecider<D, F, W>
where
    D: ActionDecider,
    F: FeatureExtractor,
    W: Write,
{
    fn begin_sentence(&mut self, sentence: &Sentence) {
        self.decider.begin_sentence(sentence);
    }

    fn next_actions(&mut self, config: &Configuration) -> Result<Vec<Action>, TransdotError> {
        let features = self.features.extract(config);
        debug!("Features: {:?}", features);

        let actions = self.decider.next_actions(config)?;
        let best = actions.first().ok_or_else(|| TransdotError::NoLegalAction {
            actions: Vec::new(),
        })?;

        writeln!(self.write, "{} {}", best, features.join(" "))?;

        Ok(actions)
    }

    fn action_scores(
        &mut self,
        config: &Configuration,
    ) -> Result<Vec<(Action, f32)>, TransdotError> {
        self.decider.action_scores(config)
    }
}
