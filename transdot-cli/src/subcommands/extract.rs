use std::io::{BufWriter, Write};

use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use stdinout::Output;
use transdot::guide::{LoggingDecider, OracleDecider};
use transdot::oracle::StaticOracle;
use transdot::parser::Parser;
use transdot::preprocess::is_projective;

use crate::io::{load_config, load_preprocessor, read_treebank};
use crate::traits::TransdotApp;

const CONFIG: &str = "CONFIG";
const OUTPUT: &str = "OUTPUT";
const TRAIN_DATA: &str = "TRAIN_DATA";

pub struct ExtractApp {
    config: String,
    output: Option<String>,
    train_data: String,
}

impl TransdotApp for ExtractApp {
    fn app() -> Command {
        Command::new("extract")
            .arg_required_else_help(true)
            .about("Extract oracle decisions with their features")
            .arg(
                Arg::new(CONFIG)
                    .help("Transdot configuration file")
                    .index(1)
                    .required(true),
            )
            .arg(
                Arg::new(TRAIN_DATA)
                    .help("Training treebank")
                    .index(2)
                    .required(true),
            )
            .arg(Arg::new(OUTPUT).help("Output data").index(3).num_args(1))
    }

    fn parse(matches: &ArgMatches) -> Result<Self> {
        let config = matches.get_one::<String>(CONFIG).unwrap().into();
        let output = matches.get_one::<String>(OUTPUT).map(ToOwned::to_owned);
        let train_data = matches.get_one::<String>(TRAIN_DATA).unwrap().into();

        Ok(ExtractApp {
            config,
            output,
            train_data,
        })
    }

    fn run(&self) -> Result<()> {
        let config = load_config(&self.config)?;
        let preprocessor = load_preprocessor(&config)?;
        let sentences = read_treebank(&self.train_data, &preprocessor)?;

        let output = Output::from(self.output.as_ref());
        let write = BufWriter::new(output.write().context("Cannot open output for writing")?);

        let system = config.parser.system;
        let decider = LoggingDecider::new(
            OracleDecider::new(StaticOracle::new(system, config.parser.pop_when_can)),
            config.parser.features,
            write,
        );
        let mut parser = Parser::new(system, decider);

        let mut skipped = 0;
        for sentence in &sentences {
            sentence.validate_gold()?;
            if config.train.only_projective && !is_projective(sentence) {
                skipped += 1;
                continue;
            }

            parser
                .parse(sentence)
                .context("Cannot extract oracle decisions")?;
        }

        if skipped != 0 {
            log::info!("Skipped {} non-projective sentences", skipped);
        }

        parser
            .into_decider()
            .into_inner()
            .flush()
            .context("Cannot write oracle decisions")?;

        Ok(())
    }
}
