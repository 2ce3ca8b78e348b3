use std::convert::TryFrom;
use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use conllu::io::{ReadSentence, Reader, WriteSentence, Writer};
use stdinout::{Input, Output};
use transdot::config::Config;
use transdot::eval::AttachmentScore;
use transdot::guide::{ActionDecider, ModelDecider};
use transdot::parser::Parser;
use transdot::preprocess::Preprocessor;
use transdot::sentence::Sentence;

use crate::io::{load_config, load_preprocessor};
use crate::progress::ParserSpeed;
use crate::traits::TransdotApp;

const CONFIG: &str = "CONFIG";
const EVAL: &str = "EVAL";
const INPUT: &str = "INPUT";
const OUTPUT: &str = "OUTPUT";
const SCORES: &str = "SCORES";

pub struct ParseApp {
    config: String,
    eval: bool,
    input: Option<String>,
    output: Option<String>,
    scores: Option<String>,
}

impl ParseApp {
    fn process<D, R, W>(
        &self,
        config: &Config,
        preprocessor: &Preprocessor,
        mut parser: Parser<D>,
        read: R,
        mut write: W,
    ) -> Result<()>
    where
        D: ActionDecider,
        R: ReadSentence,
        W: WriteSentence,
    {
        let mut speed = ParserSpeed::new();
        let mut score = AttachmentScore::new(config.eval.ignore_punctuation);

        let mut scores_write = match &self.scores {
            Some(path) => Some(BufWriter::new(
                File::create(path).context(format!("Cannot create scores file: {}", path))?,
            )),
            None => None,
        };

        for ud_sentence in read.sentences() {
            let ud_sentence = ud_sentence.context("Cannot parse sentence")?;
            let mut sentence =
                Sentence::try_from(&ud_sentence).context("Cannot convert sentence")?;

            let prepared = preprocessor.prepare(sentence.clone());
            let graph = parser
                .parse(&prepared)
                .context("Cannot parse sentence")?;
            preprocessor.annotate(&mut sentence, &graph)?;

            let sentence_score = score.add(&sentence);
            if let Some(scores_write) = scores_write.as_mut() {
                writeln!(scores_write, "{}", sentence_score)
                    .context("Cannot write sentence score")?;
            }

            write
                .write_sentence(&sentence.to_udgraph(&ud_sentence)?)
                .context("Cannot write sentence")?;

            speed.count_sentence(sentence.len() - 1);
        }

        if let Some(mut scores_write) = scores_write {
            scores_write
                .flush()
                .context("Cannot write sentence scores")?;
        }

        if self.eval {
            log::info!("{}", score);
            if score.unattached() != 0 {
                log::info!("Unattached tokens: {}", score.unattached());
            }
        }

        Ok(())
    }
}

impl TransdotApp for ParseApp {
    fn app() -> Command {
        Command::new("parse")
            .arg_required_else_help(true)
            .about("Parse a corpus")
            .arg(
                Arg::new(CONFIG)
                    .help("Transdot configuration file")
                    .index(1)
                    .required(true),
            )
            .arg(Arg::new(INPUT).help("Input data").index(2))
            .arg(Arg::new(OUTPUT).help("Output data").index(3).num_args(1))
            .arg(
                Arg::new(EVAL)
                    .long("eval")
                    .action(ArgAction::SetTrue)
                    .help("Evaluate against the gold heads of the input"),
            )
            .arg(
                Arg::new(SCORES)
                    .long("scores")
                    .value_name("FILE")
                    .help("Write the attachment score of each sentence to FILE"),
            )
    }

    fn parse(matches: &ArgMatches) -> Result<Self> {
        let config = matches.get_one::<String>(CONFIG).unwrap().into();
        let eval = matches.get_flag(EVAL);
        let input = matches.get_one::<String>(INPUT).map(ToOwned::to_owned);
        let output = matches.get_one::<String>(OUTPUT).map(ToOwned::to_owned);
        let scores = matches.get_one::<String>(SCORES).map(ToOwned::to_owned);

        Ok(ParseApp {
            config,
            eval,
            input,
            output,
            scores,
        })
    }

    fn run(&self) -> Result<()> {
        let config = load_config(&self.config)?;
        let preprocessor = load_preprocessor(&config)?;
        let model = config.model.load_parameters().context(format!(
            "Cannot load model parameters: {}",
            config.model.parameters
        ))?;

        let parser = Parser::new(
            config.parser.system,
            ModelDecider::new(config.parser.features, &model),
        );

        let input = Input::from(self.input.as_ref());
        let reader = Reader::new(input.buf_read().context("Cannot open input for reading")?);

        let output = Output::from(self.output.as_ref());
        let writer = Writer::new(BufWriter::new(
            output.write().context("Cannot open output for writing")?,
        ));

        self.process(&config, &preprocessor, parser, reader, writer)
    }
}
