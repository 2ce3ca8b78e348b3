use super::ActionDecider;
use crate::error::TransdotError;
use crate::oracle::Oracle;
use crate::sentence::Sentence;
use crate::system::{Action, Configuration};

/// Decider that follows an oracle.
#[derive(Clone, Debug)]
pub struct OracleDecider<O> {
    oracle: O,
}

impl<O> OracleDecider<O>
where
    O: Oracle,
{
    pub fn new(oracle: O) -> Self {
        OracleDecider { oracle }
    }
}

impl<O> ActionDecider for OracleDecider<O>
where
    O: Clone + Oracle,
{
    fn begin_sentence(&mut self, sentence: &Sentence) {
        self.oracle.begin_sentence(sentence);
    }

    fn next_actions(&mut self, config: &Configuration) -> Result<Vec<Action>, TransdotError> {
        Ok(vec![self.oracle.next_action(config)?])
    }

    /// The oracle action gets score 1, all other actions are omitted.
    ///
    /// The oracle records the attachments that it proposes, so scores
    /// are computed with a copy of the oracle.
    fn action_scores(
        &mut self,
        config: &Configuration,
    ) -> Result<Vec<(Action, f32)>, TransdotError> {
        Ok(vec![(self.oracle.clone().next_action(config)?, 1.)])
    }
}
