use std::convert::TryFrom;
use std::fs::File;
use std::io::BufReader;

use anyhow::{Context, Result};
use conllu::io::Reader;
use transdot::config::{Config, TomlRead};
use transdot::preprocess::{Preprocessor, Unlexer};
use transdot::sentence::Sentence;

use crate::progress::ReadProgress;

pub fn load_config(config_path: &str) -> Result<Config> {
    let config_file = File::open(config_path)
        .context(format!("Cannot open configuration file '{}'", &config_path))?;
    let mut config = Config::from_toml_read(config_file)
        .context(format!("Cannot parse configuration file: {}", config_path))?;
    config.relativize_paths(config_path).context(format!(
        "Cannot relativize paths in configuration file: {}",
        config_path
    ))?;

    Ok(config)
}

pub fn load_preprocessor(config: &Config) -> Result<Preprocessor> {
    let unlexer = config.parser.unlexer().context(format!(
        "Cannot read word list: {}",
        config.parser.unlex.as_deref().unwrap_or_default()
    ))?;

    if let Some(n_words) = unlexer.as_ref().map(Unlexer::len) {
        log::info!("Loaded {} words for unlexing", n_words);
    }

    Ok(Preprocessor::new(config.parser.reverse, unlexer))
}

/// Read and prepare a treebank with gold heads.
pub fn read_treebank(path: &str, preprocessor: &Preprocessor) -> Result<Vec<Sentence>> {
    let f = File::open(path).context(format!("Cannot open treebank: {}", path))?;
    let reader = Reader::new(BufReader::new(
        ReadProgress::new(f).context("Cannot create progress bar")?,
    ));

    let mut sentences = Vec::new();
    for sentence in reader {
        let sentence = sentence.context("Cannot read sentence from treebank")?;
        let sentence = Sentence::try_from(&sentence).context("Cannot convert sentence")?;
        sentences.push(preprocessor.prepare(sentence));
    }

    log::info!("Read {} sentences from {}", sentences.len(), path);

    Ok(sentences)
}
