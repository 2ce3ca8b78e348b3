//! Scoring and learning of parser actions.
//!
//! Classes are action indices (see [`Action::index`](crate::system::Action::index)).
//! Features are strings produced by a
//! [`FeatureExtractor`](crate::features::FeatureExtractor).

use ordered_float::OrderedFloat;

mod perceptron;
pub use perceptron::{AveragedModel, Perceptron};

/// Score the classes for a set of features.
pub trait Scorer {
    /// The number of classes that are scored.
    fn n_classes(&self) -> usize;

    /// Get the score of each class, indexed by class.
    fn scores(&self, features: &[String]) -> Vec<f32>;

    /// Get the highest-scoring class and the scores of all classes.
    ///
    /// When several classes share the highest score, the class with the
    /// highest index is returned.
    fn predict(&self, features: &[String]) -> (usize, Vec<f32>) {
        let scores = self.scores(features);
        let best = argmax(&scores).unwrap_or(0);
        (best, scores)
    }
}

impl<S> Scorer for &S
where
    S: Scorer + ?Sized,
{
    fn n_classes(&self) -> usize {
        (**self).n_classes()
    }

    fn scores(&self, features: &[String]) -> Vec<f32> {
        (**self).scores(features)
    }
}

/// A scorer that can be trained online.
pub trait Learner: Scorer {
    /// Perform a single training step.
    ///
    /// Predicts a class for `features`; when the prediction differs from
    /// `gold`, the weights are moved towards `gold` and away from the
    /// prediction. Advances the clock by one step. Returns the predicted
    /// class.
    fn update(&mut self, gold: usize, features: &[String]) -> usize;

    /// Add `delta` to the weights of `features` for `class`.
    ///
    /// Adding `delta` and then `-delta` without advancing the clock in
    /// between restores the scores exactly, provided that `delta` is
    /// integral.
    fn add(&mut self, features: &[String], class: usize, delta: f32);

    /// Advance the clock that is used for averaging by one step.
    fn tick(&mut self);

    /// Finish training, returning the averaged model.
    fn finalize(self) -> AveragedModel;
}

/// Index of the largest score, ties go to the highest index.
pub(crate) fn argmax(scores: &[f32]) -> Option<usize> {
    scores
        .iter()
        .enumerate()
        .max_by_key(|(_, &score)| OrderedFloat(score))
        .map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::argmax;

    #[test]
    fn argmax_prefers_highest_index_on_ties() {
        assert_eq!(argmax(&[]), None);
        assert_eq!(argmax(&[0.0, 2.0, 1.0]), Some(1));
        assert_eq!(argmax(&[1.0, 1.0, 0.5]), Some(1));
        assert_eq!(argmax(&[0.0, 0.0, 0.0, 0.0]), Some(3));
    }
}
