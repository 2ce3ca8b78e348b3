//! Transition systems and parser configurations.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::IllegalAction;
use crate::graph::DependencyGraph;
use crate::sentence::Sentence;

mod arc_eager;

mod arc_standard;

/// Parser actions.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Action {
    Shift,
    ReduceLeft,
    ReduceRight,

    /// Remove a token that has a head from the stack (arc-eager only).
    Pop,
}

impl Action {
    /// All actions, in index order.
    pub const ALL: [Action; 4] = [
        Action::Shift,
        Action::ReduceLeft,
        Action::ReduceRight,
        Action::Pop,
    ];

    /// Look up an action by its numeric index.
    pub fn from_index(index: usize) -> Option<Action> {
        Self::ALL.get(index).copied()
    }

    /// Numeric index of the action, used as the learner's class.
    pub fn index(self) -> usize {
        match self {
            Action::Shift => 0,
            Action::ReduceLeft => 1,
            Action::ReduceRight => 2,
            Action::Pop => 3,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Action::Shift => "SHIFT",
            Action::ReduceLeft => "REDUCE_LEFT",
            Action::ReduceRight => "REDUCE_RIGHT",
            Action::Pop => "POP",
        };

        f.write_str(name)
    }
}

/// Transition systems.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionSystem {
    /// Arc-standard (Nivre, 2004), can only build projective trees.
    ArcStandard,

    /// Arc-eager (Nivre, 2003).
    ArcEager,
}

impl TransitionSystem {
    /// The actions of the transition system, in index order.
    pub fn actions(self) -> &'static [Action] {
        match self {
            TransitionSystem::ArcStandard => &Action::ALL[..3],
            TransitionSystem::ArcEager => &Action::ALL,
        }
    }

    /// The number of actions of the transition system.
    pub fn n_actions(self) -> usize {
        self.actions().len()
    }
}

impl fmt::Display for TransitionSystem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TransitionSystem::ArcStandard => f.write_str("arcstandard"),
            TransitionSystem::ArcEager => f.write_str("arceager"),
        }
    }
}

/// Parser configuration.
///
/// A configuration consists of a stack of token positions, a cursor
/// into the input, the dependency graph that is under construction and
/// the history of applied actions. The sentence itself is shared, so
/// cloning a configuration is cheap and the clone is fully independent
/// of the original.
#[derive(Clone, Debug)]
pub struct Configuration<'a> {
    sentence: &'a Sentence,
    system: TransitionSystem,
    stack: Vec<usize>,
    cursor: usize,
    graph: DependencyGraph,
    history: Vec<Action>,
}

impl<'a> Configuration<'a> {
    /// Construct the initial configuration for a sentence.
    pub fn new(system: TransitionSystem, sentence: &'a Sentence) -> Self {
        Configuration {
            sentence,
            system,
            stack: Vec::new(),
            cursor: 0,
            graph: DependencyGraph::new(sentence.len()),
            history: Vec::new(),
        }
    }

    /// Apply an action.
    ///
    /// Returns an error when the action is not legal in this
    /// configuration. The configuration is not modified in that case.
    pub fn apply(&mut self, action: Action) -> Result<(), IllegalAction> {
        if !self.is_legal(action) {
            return Err(IllegalAction {
                action,
                stack: self.stack.clone(),
                cursor: self.cursor,
            });
        }

        match self.system {
            TransitionSystem::ArcStandard => arc_standard::apply(self, action),
            TransitionSystem::ArcEager => arc_eager::apply(self, action),
        }

        self.history.push(action);

        Ok(())
    }

    /// Get the position of the input cursor.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The dependency graph under construction.
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// The actions applied so far.
    pub fn history(&self) -> &[Action] {
        &self.history
    }

    /// Check whether all input tokens were consumed.
    pub fn input_exhausted(&self) -> bool {
        self.cursor >= self.sentence.len()
    }

    /// Consume the configuration, returning the dependency graph.
    pub fn into_graph(self) -> DependencyGraph {
        self.graph
    }

    /// Check whether `action` can be applied to this configuration.
    pub fn is_legal(&self, action: Action) -> bool {
        match self.system {
            TransitionSystem::ArcStandard => arc_standard::is_legal(self, action),
            TransitionSystem::ArcEager => arc_eager::is_legal(self, action),
        }
    }

    /// Check whether the configuration is terminal.
    pub fn is_terminal(&self) -> bool {
        match self.system {
            TransitionSystem::ArcStandard => arc_standard::is_terminal(self),
            TransitionSystem::ArcEager => arc_eager::is_terminal(self),
        }
    }

    /// Get the next input token, if any.
    pub fn next_token(&self) -> Option<usize> {
        if self.input_exhausted() {
            None
        } else {
            Some(self.cursor)
        }
    }

    pub fn sentence(&self) -> &'a Sentence {
        self.sentence
    }

    /// The stack, the top of the stack is the last element.
    pub fn stack(&self) -> &[usize] {
        &self.stack
    }

    /// Get the stack element at `depth`, where depth 0 is the top.
    pub fn stack_at(&self, depth: usize) -> Option<usize> {
        self.stack
            .len()
            .checked_sub(depth + 1)
            .map(|idx| self.stack[idx])
    }

    pub fn system(&self) -> TransitionSystem {
        self.system
    }

    /// The actions that are legal in this configuration, in index order.
    pub fn valid_actions(&self) -> Vec<Action> {
        self.system
            .actions()
            .iter()
            .copied()
            .filter(|&action| self.is_legal(action))
            .collect()
    }

    fn attach(&mut self, head: usize, dependent: usize) {
        // Legality checks guarantee that the dependent is unattached.
        self.graph
            .add(head, dependent)
            .unwrap_or_else(|err| panic!("Transition system invariant violated: {}", err));
    }

    fn shift(&mut self) {
        self.stack.push(self.cursor);
        self.cursor += 1;
    }
}
