use std::convert::TryFrom;
use std::io::BufWriter;

use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use conllu::io::{ReadSentence, Reader, WriteSentence, Writer};
use stdinout::{Input, Output};
use transdot::preprocess::is_projective;
use transdot::sentence::Sentence;

use crate::traits::TransdotApp;

const INPUT: &str = "INPUT";
const OUTPUT: &str = "OUTPUT";

pub struct FilterProjApp {
    input: Option<String>,
    output: Option<String>,
}

impl TransdotApp for FilterProjApp {
    fn app() -> Command {
        Command::new("filter-proj")
            .about("Filter corpus, keeping sentences with projective trees")
            .arg(Arg::new(INPUT).help("Input corpus").index(1))
            .arg(Arg::new(OUTPUT).help("Output corpus").index(2))
    }

    fn parse(matches: &ArgMatches) -> Result<Self> {
        let input = matches.get_one::<String>(INPUT).map(ToOwned::to_owned);
        let output = matches.get_one::<String>(OUTPUT).map(ToOwned::to_owned);

        Ok(FilterProjApp { input, output })
    }

    fn run(&self) -> Result<()> {
        let input = Input::from(self.input.as_ref());
        let output = Output::from(self.output.as_ref());

        let treebank_reader = Reader::new(
            input
                .buf_read()
                .context("Cannot open treebank for reading")?,
        );

        let mut treebank_writer = Writer::new(BufWriter::new(
            output.write().context("Cannot open treebank for writing")?,
        ));

        let (mut kept, mut total) = (0, 0);
        for ud_sentence in treebank_reader.sentences() {
            let ud_sentence = ud_sentence.context("Cannot read sentence from treebank")?;
            let sentence = Sentence::try_from(&ud_sentence).context("Cannot convert sentence")?;

            total += 1;
            if is_projective(&sentence) {
                kept += 1;
                treebank_writer
                    .write_sentence(&ud_sentence)
                    .context("Cannot write sentence")?;
            }
        }

        log::info!("Kept {} of {} sentences", kept, total);

        Ok(())
    }
}
