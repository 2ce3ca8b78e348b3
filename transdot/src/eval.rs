//! Attachment score evaluation.

use std::fmt;

use crate::sentence::Sentence;

/// Characters that mark a form as punctuation when they start the form.
const PUNCTUATION_PREFIXES: &str = "`',.-;:!?{}";

/// Unlabeled attachment statistics.
///
/// Compares the predicted heads of tokens with their gold heads.
/// Tokens without a predicted head are counted as unattached, they do
/// not count towards the attachment accuracy, but do count towards
/// recall.
#[derive(Clone, Debug, Default)]
pub struct AttachmentScore {
    ignore_punctuation: bool,
    correct: usize,
    incorrect: usize,
    unattached: usize,
    gold_edges: usize,
    sentences: usize,
    complete: usize,
}

impl AttachmentScore {
    /// Construct an evaluator.
    ///
    /// If `ignore_punctuation` is `true`, tokens whose form starts with
    /// a punctuation character are not evaluated.
    pub fn new(ignore_punctuation: bool) -> Self {
        AttachmentScore {
            ignore_punctuation,
            ..Default::default()
        }
    }

    /// Add the predicted heads of a sentence.
    ///
    /// Returns the attachment score of the sentence: the fraction of
    /// evaluated tokens with the correct head. Unattached tokens count
    /// as errors. A sentence without evaluated tokens has score 0.
    pub fn add(&mut self, sentence: &Sentence) -> f64 {
        let mut correct = 0;
        let mut evaluated = 0;
        let mut mistake = false;

        for token in &sentence.tokens()[1..] {
            if self.ignore_punctuation && is_punctuation(token.form()) {
                continue;
            }

            evaluated += 1;

            match token.predicted_head() {
                None => self.unattached += 1,
                Some(head) if Some(head) == token.head() => correct += 1,
                Some(_) => {
                    self.incorrect += 1;
                    mistake = true;
                }
            }
        }

        self.correct += correct;
        self.gold_edges += evaluated;

        self.sentences += 1;
        if !mistake {
            self.complete += 1;
        }

        ratio(correct, evaluated)
    }

    /// Fraction of attached tokens with the correct head.
    pub fn accuracy(&self) -> f64 {
        ratio(self.correct, self.correct + self.incorrect)
    }

    /// Fraction of sentences without attachment errors.
    pub fn complete(&self) -> f64 {
        ratio(self.complete, self.sentences)
    }

    /// Fraction of gold edges that were predicted.
    pub fn recall(&self) -> f64 {
        ratio(self.correct, self.gold_edges)
    }

    /// Fraction of predicted edges that are correct.
    pub fn precision(&self) -> f64 {
        self.accuracy()
    }

    /// Fraction of tokens that were attached.
    pub fn assigned(&self) -> f64 {
        ratio(self.correct + self.incorrect, self.gold_edges)
    }

    /// Number of evaluated sentences.
    pub fn sentences(&self) -> usize {
        self.sentences
    }

    /// Number of tokens without a predicted head.
    pub fn unattached(&self) -> usize {
        self.unattached
    }
}

impl fmt::Display for AttachmentScore {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "accuracy: {:.4}, complete: {:.4}, recall: {:.4}, precision: {:.4}, assigned: {:.4}",
            self.accuracy(),
            self.complete(),
            self.recall(),
            self.precision(),
            self.assigned()
        )
    }
}

/// Check whether a form is punctuation.
pub fn is_punctuation(form: &str) -> bool {
    form.chars()
        .next()
        .map(|c| PUNCTUATION_PREFIXES.contains(c))
        .unwrap_or(false)
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.
    } else {
        numerator as f64 / denominator as f64
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::{is_punctuation, AttachmentScore};
    use crate::graph::DependencyGraph;
    use crate::sentence::{Sentence, Token};

    fn sentence() -> Sentence {
        Sentence::new(vec![
            Token::new("John", "NNP").with_head(2),
            Token::new("saw", "VBD").with_head(0),
            Token::new("Mary", "NNP").with_head(2),
            Token::new(".", ".").with_head(2),
        ])
    }

    fn annotate(sentence: &mut Sentence, edges: &[(usize, usize)]) {
        let mut graph = DependencyGraph::new(sentence.len());
        for &(head, dependent) in edges {
            graph.add(head, dependent).unwrap();
        }
        sentence.annotate(&graph);
    }

    #[test]
    fn punctuation_is_recognized() {
        assert!(is_punctuation("."));
        assert!(is_punctuation("``"));
        assert!(is_punctuation("-LRB-"));
        assert!(!is_punctuation("John"));
        assert!(!is_punctuation(""));
    }

    #[test]
    fn attachment_scores() {
        let mut correct = sentence();
        annotate(&mut correct, &[(2, 1), (0, 2), (2, 3), (2, 4)]);

        // Token 3 is attached to the wrong head, token 4 is unattached.
        let mut incorrect = sentence();
        annotate(&mut incorrect, &[(2, 1), (0, 2), (1, 3)]);

        let mut score = AttachmentScore::new(false);
        assert_abs_diff_eq!(score.add(&correct), 1.);
        assert_abs_diff_eq!(score.add(&incorrect), 0.5);

        assert_eq!(score.sentences(), 2);
        assert_eq!(score.unattached(), 1);
        assert_abs_diff_eq!(score.accuracy(), 6. / 7.);
        assert_abs_diff_eq!(score.complete(), 0.5);
        assert_abs_diff_eq!(score.recall(), 6. / 8.);
        assert_abs_diff_eq!(score.precision(), 6. / 7.);
        assert_abs_diff_eq!(score.assigned(), 7. / 8.);
    }

    #[test]
    fn punctuation_can_be_ignored() {
        let mut sentence = sentence();
        annotate(&mut sentence, &[(2, 1), (0, 2), (2, 3), (3, 4)]);

        let mut with_punct = AttachmentScore::new(false);
        with_punct.add(&sentence);
        assert_abs_diff_eq!(with_punct.accuracy(), 0.75);
        assert_abs_diff_eq!(with_punct.complete(), 0.);

        let mut without_punct = AttachmentScore::new(true);
        without_punct.add(&sentence);
        assert_abs_diff_eq!(without_punct.accuracy(), 1.);
        assert_abs_diff_eq!(without_punct.complete(), 1.);
    }

    #[test]
    fn sentence_scores() {
        let mut score = AttachmentScore::new(false);

        let mut one_error = sentence();
        annotate(&mut one_error, &[(2, 1), (0, 2), (1, 3), (2, 4)]);
        assert_abs_diff_eq!(score.add(&one_error), 0.75);

        let mut unattached = sentence();
        annotate(&mut unattached, &[(0, 2), (2, 4)]);
        assert_abs_diff_eq!(score.add(&unattached), 0.5);

        let mut wrong_punct = sentence();
        annotate(&mut wrong_punct, &[(2, 1), (0, 2), (2, 3), (1, 4)]);
        let mut without_punct = AttachmentScore::new(true);
        assert_abs_diff_eq!(without_punct.add(&wrong_punct), 1.);

        let mut punct_only = Sentence::new(vec![Token::new(".", ".").with_head(0)]);
        annotate(&mut punct_only, &[(0, 1)]);
        assert_abs_diff_eq!(without_punct.add(&punct_only), 0.);
        assert_eq!(without_punct.sentences(), 2);
    }
}
