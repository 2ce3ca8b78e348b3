pub mod config;

pub mod error;

pub mod eval;

pub mod features;

pub mod graph;

pub mod guide;

pub mod learner;

pub mod oracle;

pub mod parser;

pub mod preprocess;

pub mod sentence;

pub mod system;

pub mod train;
