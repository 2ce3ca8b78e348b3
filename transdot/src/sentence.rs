//! Tokens and sentences as seen by the parser.

use std::collections::{BTreeMap, HashSet};
use std::convert::TryFrom;
use std::ops::Index;

use udgraph::graph::{DepTriple, Node, Sentence as UdSentence};

use crate::error::TransdotError;
use crate::graph::DependencyGraph;

/// Form and tag of the synthetic root token.
pub const ROOT: &str = "*ROOT*";

/// Auxiliary field that stores the gold dependency relation.
pub const RELATION_FEATURE: &str = "deprel";

/// Auxiliary field that stores the lemma.
pub const LEMMA_FEATURE: &str = "lemma";

/// A sentence token.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token {
    id: usize,
    form: String,
    tag: String,
    head: Option<usize>,
    predicted_head: Option<usize>,
    features: BTreeMap<String, String>,
}

impl Token {
    /// Construct a token without a head.
    ///
    /// The identifier is assigned when the token is added to a sentence.
    pub fn new(form: impl Into<String>, tag: impl Into<String>) -> Self {
        Token {
            id: 0,
            form: form.into(),
            tag: tag.into(),
            head: None,
            predicted_head: None,
            features: BTreeMap::new(),
        }
    }

    /// Set the gold head.
    pub fn with_head(mut self, head: usize) -> Self {
        self.head = Some(head);
        self
    }

    /// Add an auxiliary field.
    pub fn with_feature(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.features.insert(name.into(), value.into());
        self
    }

    /// Auxiliary fields, passed through the parser untouched.
    pub fn features(&self) -> &BTreeMap<String, String> {
        &self.features
    }

    pub fn features_mut(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.features
    }

    pub fn form(&self) -> &str {
        &self.form
    }

    /// Gold head, `None` for the root and for unannotated tokens.
    pub fn head(&self) -> Option<usize> {
        self.head
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Head assigned by the parser.
    pub fn predicted_head(&self) -> Option<usize> {
        self.predicted_head
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub(crate) fn set_form(&mut self, form: String) {
        self.form = form;
    }

    pub(crate) fn set_head(&mut self, head: Option<usize>) {
        self.head = head;
    }

    pub(crate) fn set_predicted_head(&mut self, head: Option<usize>) {
        self.predicted_head = head;
    }

    fn root() -> Self {
        Token::new(ROOT, ROOT)
    }
}

/// A sentence with a synthetic root token at position 0.
///
/// The token at position `i` always has identifier `i`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Sentence {
    tokens: Vec<Token>,
}

impl Sentence {
    /// Construct a sentence, prepending the root token.
    pub fn new(tokens: impl IntoIterator<Item = Token>) -> Self {
        let tokens = std::iter::once(Token::root())
            .chain(tokens)
            .enumerate()
            .map(|(id, mut token)| {
                token.id = id;
                token
            })
            .collect();

        Sentence { tokens }
    }

    /// Store the heads of `graph` as predicted heads.
    ///
    /// Tokens that are not attached in `graph` get no predicted head.
    pub fn annotate(&mut self, graph: &DependencyGraph) {
        for token in &mut self.tokens[1..] {
            token.predicted_head = graph.head(token.id).map(|edge| edge.head());
        }
    }

    /// The gold edges as `(head, dependent)` pairs.
    ///
    /// Tokens without a gold head do not contribute an edge.
    pub fn gold_edges(&self) -> HashSet<(usize, usize)> {
        self.tokens[1..]
            .iter()
            .filter_map(|token| token.head.map(|head| (head, token.id)))
            .collect()
    }

    /// Get the number of tokens, including the root.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Check whether the sentence only consists of the root.
    pub fn is_empty(&self) -> bool {
        self.tokens.len() == 1
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub(crate) fn tokens_mut(&mut self) -> &mut [Token] {
        &mut self.tokens
    }

    /// Check that the gold annotation forms a tree rooted at position 0.
    pub fn validate_gold(&self) -> Result<(), TransdotError> {
        for token in &self.tokens[1..] {
            let head = token.head.ok_or_else(|| {
                TransdotError::MalformedGold(format!(
                    "token {} ({}) does not have a head",
                    token.id, token.form
                ))
            })?;

            if head >= self.len() || head == token.id {
                return Err(TransdotError::MalformedGold(format!(
                    "token {} ({}) has invalid head {}",
                    token.id, token.form, head
                )));
            }
        }

        // With one head per token, a path to the root must be found
        // within len steps, unless there is a cycle.
        for token in &self.tokens[1..] {
            let mut current = token.id;
            let mut steps = 0;
            while current != 0 {
                current = self.tokens[current].head.unwrap_or(0);
                steps += 1;
                if steps > self.len() {
                    return Err(TransdotError::MalformedGold(format!(
                        "token {} ({}) is part of a cycle",
                        token.id, token.form
                    )));
                }
            }
        }

        Ok(())
    }

    /// Convert to a CoNLL-U graph with the predicted heads.
    ///
    /// Tokens, comments and auxiliary annotations are copied from
    /// `original`, the sentence that this sentence was constructed
    /// from, so that forms replaced during preprocessing are restored.
    pub fn to_udgraph(&self, original: &UdSentence) -> Result<UdSentence, TransdotError> {
        let mut sentence = UdSentence::new();
        sentence.set_comments(original.comments().to_owned());

        for token in original.iter().filter_map(Node::token) {
            sentence.push(token.clone());
        }

        if sentence.len() != self.len() {
            return Err(TransdotError::IllegalConfigurationError(format!(
                "Cannot annotate sentence of length {} with {} tokens",
                sentence.len(),
                self.len()
            )));
        }

        for token in &self.tokens[1..] {
            if let Some(head) = token.predicted_head {
                sentence
                    .dep_graph_mut()
                    .add_deprel(DepTriple::<String>::new(head, None, token.id))?;
            }
        }

        Ok(sentence)
    }
}

impl Index<usize> for Sentence {
    type Output = Token;

    fn index(&self, index: usize) -> &Self::Output {
        &self.tokens[index]
    }
}

impl TryFrom<&UdSentence> for Sentence {
    type Error = TransdotError;

    fn try_from(sentence: &UdSentence) -> Result<Self, Self::Error> {
        let dep_graph = sentence.dep_graph();

        let mut tokens = Vec::with_capacity(sentence.len());
        for (idx, node) in sentence.iter().enumerate().skip(1) {
            let ud_token = match node.token() {
                Some(token) => token,
                None => {
                    return Err(TransdotError::IllegalConfigurationError(format!(
                        "Node {} is not a token",
                        idx
                    )))
                }
            };

            let tag = ud_token.xpos().or_else(|| ud_token.upos()).unwrap_or("_");
            let mut token = Token::new(ud_token.form(), tag);

            if let Some(triple) = dep_graph.head(idx) {
                token.head = Some(triple.head());
                if let Some(relation) = triple.relation() {
                    token
                        .features
                        .insert(RELATION_FEATURE.to_string(), relation.to_string());
                }
            }

            if let Some(lemma) = ud_token.lemma() {
                token
                    .features
                    .insert(LEMMA_FEATURE.to_string(), lemma.to_string());
            }

            tokens.push(token);
        }

        Ok(Sentence::new(tokens))
    }
}
