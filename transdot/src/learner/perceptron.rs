use std::io::{Read, Write};

use numberer::Numberer;
use serde::{Deserialize, Serialize};

use super::{Learner, Scorer};
use crate::error::TransdotError;

/// Multiclass averaged perceptron.
///
/// Averaging is done lazily: for every weight, the sum of its values
/// over all past time steps is only brought up to date when the weight
/// changes or when the model is finalized.
#[derive(Clone, Debug)]
pub struct Perceptron {
    features: Numberer<String>,
    n_classes: usize,
    weights: Vec<f32>,
    totals: Vec<f64>,
    timestamps: Vec<u64>,
    time: u64,
}

impl Perceptron {
    /// Construct a perceptron for `n_classes` classes.
    pub fn new(n_classes: usize) -> Self {
        Perceptron {
            features: Numberer::new(0),
            n_classes,
            weights: Vec::new(),
            totals: Vec::new(),
            timestamps: Vec::new(),
            time: 0,
        }
    }

    /// The number of distinct features seen during training.
    pub fn n_features(&self) -> usize {
        self.features.len()
    }

    /// The number of training steps so far.
    pub fn time(&self) -> u64 {
        self.time
    }

    fn feature_row(&mut self, feature: &str) -> usize {
        let idx = self.features.add(feature.to_owned());

        let rows_len = self.features.len() * self.n_classes;
        if self.weights.len() < rows_len {
            self.weights.resize(rows_len, 0.);
            self.totals.resize(rows_len, 0.);
            self.timestamps.resize(rows_len, 0);
        }

        idx * self.n_classes
    }
}

impl Scorer for Perceptron {
    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn scores(&self, features: &[String]) -> Vec<f32> {
        score_rows(&self.features, &self.weights, self.n_classes, features)
    }
}

impl Learner for Perceptron {
    fn update(&mut self, gold: usize, features: &[String]) -> usize {
        let (predicted, _) = self.predict(features);

        if predicted != gold {
            self.add(features, gold, 1.);
            self.add(features, predicted, -1.);
        }

        self.tick();

        predicted
    }

    fn add(&mut self, features: &[String], class: usize, delta: f32) {
        assert!(
            class < self.n_classes,
            "Class {} out of range for {} classes",
            class,
            self.n_classes
        );

        for feature in features {
            let idx = self.feature_row(feature) + class;

            let elapsed = self.time - self.timestamps[idx];
            self.totals[idx] += elapsed as f64 * self.weights[idx] as f64;
            self.timestamps[idx] = self.time;
            self.weights[idx] += delta;
        }
    }

    fn tick(&mut self) {
        self.time += 1;
    }

    fn finalize(self) -> AveragedModel {
        let time = self.time;

        let weights = if time == 0 {
            self.weights
        } else {
            self.weights
                .iter()
                .zip(&self.totals)
                .zip(&self.timestamps)
                .map(|((&weight, &total), &timestamp)| {
                    let total = total + (time - timestamp) as f64 * weight as f64;
                    (total / time as f64) as f32
                })
                .collect()
        };

        AveragedModel {
            features: self.features,
            n_classes: self.n_classes,
            weights,
        }
    }
}

/// Averaged perceptron weights.
///
/// This is the model that is stored after training and used for parsing.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AveragedModel {
    features: Numberer<String>,
    n_classes: usize,
    weights: Vec<f32>,
}

impl AveragedModel {
    /// Read a model in JSON format.
    ///
    /// Fails when the number of weights does not match the number of
    /// features and classes.
    pub fn load<R>(read: R) -> Result<Self, TransdotError>
    where
        R: Read,
    {
        let model: AveragedModel = serde_json::from_reader(read).map_err(|err| {
            TransdotError::JSonSerialization("Cannot deserialize model".to_string(), err)
        })?;

        let expected = model.features.len() * model.n_classes;
        if model.weights.len() != expected {
            return Err(TransdotError::IllegalConfigurationError(format!(
                "Model has {} weights, expected {} ({} features, {} classes)",
                model.weights.len(),
                expected,
                model.features.len(),
                model.n_classes
            )));
        }

        Ok(model)
    }

    /// Write the model in JSON format.
    pub fn save<W>(&self, write: W) -> Result<(), TransdotError>
    where
        W: Write,
    {
        serde_json::to_writer(write, self).map_err(|err| {
            TransdotError::JSonSerialization("Cannot serialize model".to_string(), err)
        })
    }

    /// The number of features with weights.
    pub fn n_features(&self) -> usize {
        self.features.len()
    }
}

impl Scorer for AveragedModel {
    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn scores(&self, features: &[String]) -> Vec<f32> {
        score_rows(&self.features, &self.weights, self.n_classes, features)
    }
}

fn score_rows(
    numberer: &Numberer<String>,
    weights: &[f32],
    n_classes: usize,
    features: &[String],
) -> Vec<f32> {
    let mut scores = vec![0f32; n_classes];

    for feature in features {
        let row = match numberer.number(feature) {
            Some(idx) => idx * n_classes,
            None => continue,
        };

        for (score, &weight) in scores.iter_mut().zip(&weights[row..row + n_classes]) {
            *score += weight;
        }
    }

    scores
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::{AveragedModel, Perceptron};
    use crate::error::TransdotError;
    use crate::learner::{Learner, Scorer};

    fn feats(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn unknown_features_do_not_score() {
        let perceptron = Perceptron::new(3);
        assert_eq!(perceptron.scores(&feats(&["a", "b"])), vec![0., 0., 0.]);
        assert_eq!(perceptron.n_features(), 0);
    }

    #[test]
    fn update_moves_towards_gold() {
        let mut perceptron = Perceptron::new(3);
        let features = feats(&["s0w=cat", "s0t=NN"]);

        // All scores are zero, so the highest class is predicted.
        assert_eq!(perceptron.update(0, &features), 2);
        assert_eq!(perceptron.scores(&features), vec![2., 0., -2.]);
        assert_eq!(perceptron.predict(&features).0, 0);

        // A correct prediction does not change the weights.
        assert_eq!(perceptron.update(0, &features), 0);
        assert_eq!(perceptron.scores(&features), vec![2., 0., -2.]);
        assert_eq!(perceptron.time(), 2);
    }

    #[test]
    fn add_then_subtract_restores_scores_exactly() {
        let mut perceptron = Perceptron::new(4);
        let features = feats(&["a", "b", "c"]);
        let other = feats(&["b", "d"]);

        perceptron.update(1, &features);
        perceptron.update(3, &other);
        perceptron.update(2, &feats(&["a", "d"]));

        let before = perceptron.scores(&features);
        let before_other = perceptron.scores(&other);

        perceptron.add(&features, 1, 1.);
        perceptron.add(&other, 0, -1.);
        assert_ne!(perceptron.scores(&features), before);
        perceptron.add(&other, 0, 1.);
        perceptron.add(&features, 1, -1.);

        let after = perceptron.scores(&features);
        let after_other = perceptron.scores(&other);
        for (a, b) in before.iter().zip(&after).chain(before_other.iter().zip(&after_other)) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn finalize_averages_over_time() {
        let mut perceptron = Perceptron::new(2);
        let features = feats(&["f"]);

        // Time 0: class 1 is predicted on the tie, so the weight of
        // class 0 becomes 1 and the weight of class 1 becomes -1.
        assert_eq!(perceptron.update(0, &features), 1);
        perceptron.tick();
        perceptron.tick();
        perceptron.tick();

        // The weights were (1, -1) during all four steps.
        let model = perceptron.finalize();
        let scores = model.scores(&features);
        assert_abs_diff_eq!(scores[0], 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(scores[1], -1.0, epsilon = 1e-6);
    }

    #[test]
    fn averaging_weights_late_changes_less() {
        let mut perceptron = Perceptron::new(2);
        let features = feats(&["f"]);

        perceptron.tick();
        perceptron.tick();
        perceptron.tick();
        perceptron.update(0, &features);

        // The update at time 3 only contributes to the final step.
        let model = perceptron.finalize();
        let scores = model.scores(&features);
        assert_abs_diff_eq!(scores[0], 0.25, epsilon = 1e-6);
        assert_abs_diff_eq!(scores[1], -0.25, epsilon = 1e-6);
    }

    #[test]
    fn model_can_be_saved_and_loaded() {
        let mut perceptron = Perceptron::new(3);
        perceptron.update(1, &feats(&["x", "y"]));
        perceptron.update(2, &feats(&["y", "z"]));
        let model = perceptron.finalize();

        let mut data = Vec::new();
        model.save(&mut data).unwrap();
        let loaded = AveragedModel::load(&data[..]).unwrap();

        assert_eq!(loaded.n_features(), 3);
        for features in &[feats(&["x"]), feats(&["y", "z"]), feats(&["unknown"])] {
            assert_eq!(loaded.scores(features), model.scores(features));
        }
    }

    #[test]
    fn truncated_models_are_rejected() {
        let mut perceptron = Perceptron::new(3);
        perceptron.update(1, &feats(&["x", "y"]));
        let model = perceptron.finalize();

        let mut data = Vec::new();
        model.save(&mut data).unwrap();
        let mut json: serde_json::Value = serde_json::from_slice(&data).unwrap();
        json["weights"].as_array_mut().unwrap().pop();
        let truncated = serde_json::to_vec(&json).unwrap();

        assert!(matches!(
            AveragedModel::load(&truncated[..]),
            Err(TransdotError::IllegalConfigurationError(_))
        ));
    }
}
