use std::io;

use thiserror::Error;

use crate::system::Action;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum TransdotError {
    #[error(transparent)]
    ConlluError(#[from] conllu::Error),

    #[error("Token {dependent} already has head {head}, cannot attach it to {new_head}")]
    DoubleHead {
        dependent: usize,
        head: usize,
        new_head: usize,
    },

    /// The decider diverged from the oracle during early-update training.
    ///
    /// This is not a failure: the caller should skip the remainder of
    /// the sentence.
    #[error("Model prediction diverged from the oracle")]
    EarlyUpdate,

    #[error(transparent)]
    IllegalAction(#[from] IllegalAction),

    #[error("Illegal configuration: {0}")]
    IllegalConfigurationError(String),

    #[error(transparent)]
    IoError(#[from] io::Error),

    #[error("{0}: {1}")]
    JSonSerialization(String, serde_json::Error),

    #[error("Malformed gold annotation: {0}")]
    MalformedGold(String),

    #[error("None of the proposed actions ({actions:?}) is legal in a non-terminal configuration")]
    NoLegalAction { actions: Vec<Action> },

    #[error("Oracle cannot find an action with stack {stack:?} and cursor {cursor}")]
    OracleExhausted { stack: Vec<usize>, cursor: usize },

    #[error("Cannot relativize path: {0}")]
    RelativizePathError(String),

    #[error(transparent)]
    TomlDeserializationError(#[from] toml::de::Error),

    #[error(transparent)]
    UdgraphError(#[from] udgraph::Error),
}

/// An action was applied to a configuration in which it is not legal.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("Action {action} is not legal (stack: {stack:?}, cursor: {cursor})")]
pub struct IllegalAction {
    pub action: Action,
    pub stack: Vec<usize>,
    pub cursor: usize,
}
