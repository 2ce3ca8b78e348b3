use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use transdot::train::Trainer;

use crate::io::{load_config, load_preprocessor, read_treebank};
use crate::traits::TransdotApp;

const CONFIG: &str = "CONFIG";
const TRAIN_DATA: &str = "TRAIN_DATA";

pub struct TrainApp {
    config: String,
    train_data: String,
}

impl TransdotApp for TrainApp {
    fn app() -> Command {
        Command::new("train")
            .arg_required_else_help(true)
            .about("Train a parser model")
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
    }

    fn parse(matches: &ArgMatches) -> Result<Self> {
        let config = matches.get_one::<String>(CONFIG).unwrap().into();
        let train_data = matches.get_one::<String>(TRAIN_DATA).unwrap().into();

        Ok(TrainApp { config, train_data })
    }

    fn run(&self) -> Result<()> {
        let config = load_config(&self.config)?;
        let preprocessor = load_preprocessor(&config)?;

        let sentences = read_treebank(&self.train_data, &preprocessor)?;

        log::info!(
            "Training {} parser with {} features for {} epochs",
            config.parser.system,
            config.parser.features,
            config.train.epochs
        );

        let mut trainer = Trainer::new(&config.parser, &config.train);
        let model = trainer
            .train(&sentences)
            .context("Cannot train parser model")?;

        let f = File::create(&config.model.parameters).context(format!(
            "Cannot create model file: {}",
            config.model.parameters
        ))?;
        let mut write = BufWriter::new(f);
        model
            .save(&mut write)
            .context("Cannot write model parameters")?;
        write.flush().context("Cannot write model parameters")?;

        Ok(())
    }
}
