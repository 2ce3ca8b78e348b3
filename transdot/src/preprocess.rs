//! Sentence preprocessing.
//!
//! Preprocessing is done before parsing and training and is undone on
//! the parser output: projectivity filtering, right-to-left parsing and
//! replacement of rare word forms by word classes (unlexing).

use std::collections::HashSet;
use std::io::BufRead;

use crate::error::TransdotError;
use crate::graph::DependencyGraph;
use crate::sentence::Sentence;

/// Auxiliary field that stores the form before unlexing.
pub const ORIG_FORM_FEATURE: &str = "orig_form";

/// Check whether the gold tree of a sentence is projective.
///
/// An edge is projective when its head dominates every token between
/// the head and the dependent. A tree is projective when all its edges
/// are projective. Tokens without a gold head are ignored.
pub fn is_projective(sentence: &Sentence) -> bool {
    for token in &sentence.tokens()[1..] {
        let head = match token.head() {
            Some(head) => head,
            None => continue,
        };

        let (left, right) = if head < token.id() {
            (head, token.id())
        } else {
            (token.id(), head)
        };

        if !(left + 1..right).all(|between| dominates(sentence, head, between)) {
            return false;
        }
    }

    true
}

/// Check whether `head` is an ancestor of `token` in the gold tree.
fn dominates(sentence: &Sentence, head: usize, token: usize) -> bool {
    let mut current = token;

    // Bounded walk, so that cycles in malformed trees terminate.
    for _ in 0..sentence.len() {
        current = match sentence[current].head() {
            Some(parent) if parent < sentence.len() => parent,
            _ => return false,
        };

        if current == head {
            return true;
        }
    }

    false
}

/// Reverse the order of the tokens of a sentence.
///
/// Token identifiers and gold/predicted heads are remapped, the root
/// stays at position 0. Reversal is an involution, reversing a reversed
/// sentence gives the original sentence.
pub fn reverse(sentence: &Sentence) -> Sentence {
    let len = sentence.len();

    let tokens = sentence.tokens()[1..].iter().rev().map(|token| {
        let mut token = token.clone();
        token.set_head(token.head().map(|head| reverse_position(len, head)));
        token.set_predicted_head(
            token
                .predicted_head()
                .map(|head| reverse_position(len, head)),
        );
        token
    });

    Sentence::new(tokens)
}

/// Map a graph over a reversed sentence to the original order.
pub fn reverse_graph(graph: &DependencyGraph) -> Result<DependencyGraph, TransdotError> {
    let len = graph.n_nodes();

    let mut reversed = DependencyGraph::new(len);
    for edge in graph.edges() {
        reversed.add(
            reverse_position(len, edge.head()),
            reverse_position(len, edge.dependent()),
        )?;
    }

    Ok(reversed)
}

fn reverse_position(len: usize, position: usize) -> usize {
    if position == 0 || position >= len {
        position
    } else {
        len - position
    }
}

/// Replaces rare word forms by word classes.
///
/// Forms in the word list are lowercased. Other forms are replaced by a
/// signature: `*NUM*` for numbers, otherwise `*CAP*` or `*UNK*`
/// (depending on capitalization), followed by markers for hyphens and
/// digits and the last two characters of the lowercased form.
#[derive(Clone, Debug, Default)]
pub struct Unlexer {
    words: HashSet<String>,
}

impl Unlexer {
    /// Construct an unlexer from a list of known words.
    pub fn new(words: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        Unlexer {
            words: words
                .into_iter()
                .map(|word| word.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Read the known words from a file with one word per line.
    pub fn from_words<R>(read: R) -> Result<Self, TransdotError>
    where
        R: BufRead,
    {
        let mut words = HashSet::new();
        for line in read.lines() {
            let line = line?;
            let word = line.trim();
            if !word.is_empty() {
                words.insert(word.to_lowercase());
            }
        }

        Ok(Unlexer { words })
    }

    /// The number of known words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Get the replacement of a word form.
    pub fn unlex(&self, form: &str) -> String {
        let lower = form.to_lowercase();
        if self.words.contains(&lower) {
            return lower;
        }

        let has_digit = form.chars().any(|c| c.is_ascii_digit());
        if has_digit
            && form
                .chars()
                .all(|c| c.is_ascii_digit() || ",.-/:".contains(c))
        {
            return "*NUM*".to_string();
        }

        let mut signature = if form.chars().next().map(char::is_uppercase).unwrap_or(false) {
            "*CAP*".to_string()
        } else {
            "*UNK*".to_string()
        };

        if form.contains('-') {
            signature.push_str("-hyph");
        }

        if has_digit {
            signature.push_str("-dig");
        }

        let suffix = lower.chars().rev().take(2).collect::<Vec<_>>();
        signature.push('-');
        signature.extend(suffix.into_iter().rev());

        signature
    }

    /// Unlex the forms of a sentence.
    ///
    /// The original form of every token is stored in the
    /// [`ORIG_FORM_FEATURE`] auxiliary field.
    pub fn unlex_sentence(&self, sentence: &mut Sentence) {
        for token in &mut sentence.tokens_mut()[1..] {
            let unlexed = self.unlex(token.form());
            let orig_form = token.form().to_owned();
            token
                .features_mut()
                .insert(ORIG_FORM_FEATURE.to_string(), orig_form);
            token.set_form(unlexed);
        }
    }
}

/// Restore the forms that were replaced by [`Unlexer::unlex_sentence`].
pub fn restore_forms(sentence: &mut Sentence) {
    for token in &mut sentence.tokens_mut()[1..] {
        if let Some(orig_form) = token.features_mut().remove(ORIG_FORM_FEATURE) {
            token.set_form(orig_form);
        }
    }
}

/// Preprocessing pipeline that is shared by training and parsing.
#[derive(Clone, Debug, Default)]
pub struct Preprocessor {
    reverse: bool,
    unlexer: Option<Unlexer>,
}

impl Preprocessor {
    pub fn new(reverse: bool, unlexer: Option<Unlexer>) -> Self {
        Preprocessor { reverse, unlexer }
    }

    /// Prepare a sentence for the parser.
    pub fn prepare(&self, mut sentence: Sentence) -> Sentence {
        if let Some(ref unlexer) = self.unlexer {
            unlexer.unlex_sentence(&mut sentence);
        }

        if self.reverse {
            reverse(&sentence)
        } else {
            sentence
        }
    }

    /// Annotate `sentence` with a graph that was parsed from its
    /// prepared counterpart.
    ///
    /// `sentence` is the sentence before preparation.
    pub fn annotate(
        &self,
        sentence: &mut Sentence,
        graph: &DependencyGraph,
    ) -> Result<(), TransdotError> {
        if self.reverse {
            sentence.annotate(&reverse_graph(graph)?);
        } else {
            sentence.annotate(graph);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::BufReader;

    use maplit::hashset;

    use super::{
        is_projective, restore_forms, reverse, reverse_graph, Preprocessor, Unlexer,
        ORIG_FORM_FEATURE,
    };
    use crate::graph::DependencyGraph;
    use crate::guide::OracleDecider;
    use crate::oracle::StaticOracle;
    use crate::parser::Parser;
    use crate::sentence::tests::{
        read_sentences, sentence_with_heads, NON_PROJECTIVE_DATA, PROJECTIVE_DATA,
    };
    use crate::system::TransitionSystem;

    #[test]
    fn projectivity_of_test_data() {
        for (_, sentence) in read_sentences(PROJECTIVE_DATA) {
            assert!(is_projective(&sentence));
        }

        let non_projective = read_sentences(NON_PROJECTIVE_DATA);
        assert!(!is_projective(&non_projective[0].1));
        assert!(is_projective(&non_projective[1].1));
    }

    #[test]
    fn crossing_edges_are_non_projective() {
        // 1 -> 3 crosses 0 -> 2.
        assert!(!is_projective(&sentence_with_heads(&[0, 0, 1])));
        assert!(is_projective(&sentence_with_heads(&[0, 1, 1])));
        assert!(is_projective(&sentence_with_heads(&[3, 3, 0])));
    }

    #[test]
    fn reversal_remaps_heads() {
        let sentence = sentence_with_heads(&[2, 0, 2, 3]);
        let reversed = reverse(&sentence);

        assert_eq!(reversed.len(), sentence.len());
        assert_eq!(reversed[1].form(), "w4");
        assert_eq!(reversed[4].form(), "w1");
        assert_eq!(
            reversed.gold_edges(),
            hashset! {(3, 4), (0, 3), (3, 2), (2, 1)}
        );
        assert_eq!(reverse(&reversed), sentence);
    }

    #[test]
    fn reversed_graphs_map_back() {
        let sentence = sentence_with_heads(&[2, 0, 2, 3]);
        let reversed = reverse(&sentence);

        let mut graph = DependencyGraph::new(reversed.len());
        for (head, dependent) in reversed.gold_edges() {
            graph.add(head, dependent).unwrap();
        }

        assert_eq!(
            reverse_graph(&graph).unwrap().edge_set(),
            sentence.gold_edges()
        );
    }

    #[test]
    fn unlexer_signatures() {
        let unlexer = Unlexer::from_words(BufReader::new("the\nCat\n\n".as_bytes())).unwrap();
        assert_eq!(unlexer.len(), 2);

        assert_eq!(unlexer.unlex("The"), "the");
        assert_eq!(unlexer.unlex("cat"), "cat");
        assert_eq!(unlexer.unlex("1,234.5"), "*NUM*");
        assert_eq!(unlexer.unlex("Walking"), "*CAP*-ng");
        assert_eq!(unlexer.unlex("well-known"), "*UNK*-hyph-wn");
        assert_eq!(unlexer.unlex("4x4"), "*UNK*-dig-x4");
        assert_eq!(unlexer.unlex("a"), "*UNK*-a");
    }

    #[test]
    fn unlexed_forms_are_restored() {
        let unlexer = Unlexer::new(&["w1"]);
        let original = sentence_with_heads(&[0, 1]);

        let mut sentence = original.clone();
        unlexer.unlex_sentence(&mut sentence);
        assert_eq!(sentence[1].form(), "w1");
        assert_eq!(sentence[2].form(), "*UNK*-dig-w2");
        assert_eq!(
            sentence[2].features().get(ORIG_FORM_FEATURE).map(String::as_str),
            Some("w2")
        );

        restore_forms(&mut sentence);
        assert_eq!(sentence, original);
    }

    #[test]
    fn reversed_parses_annotate_the_original_sentence() {
        let preprocessor = Preprocessor::new(true, Some(Unlexer::new(&["w1"])));

        for (_, sentence) in read_sentences(PROJECTIVE_DATA) {
            let prepared = preprocessor.prepare(sentence.clone());
            assert_eq!(prepared.len(), sentence.len());

            let mut parser = Parser::new(
                TransitionSystem::ArcStandard,
                OracleDecider::new(StaticOracle::new(TransitionSystem::ArcStandard, true)),
            );
            let graph = parser.parse(&prepared).unwrap();

            let mut annotated = sentence.clone();
            preprocessor.annotate(&mut annotated, &graph).unwrap();

            for token in &annotated.tokens()[1..] {
                assert_eq!(token.predicted_head(), token.head());
                assert_eq!(token.form(), sentence[token.id()].form());
            }
        }
    }
}
