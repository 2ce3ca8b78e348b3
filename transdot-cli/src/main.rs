use std::io::stdout;

use anyhow::Result;
use clap::{crate_version, value_parser, Arg, Command};
use clap_complete::{generate, Shell};

pub mod io;

pub mod progress;

mod subcommands;

pub mod traits;
use traits::TransdotApp;

fn main() -> Result<()> {
    // Known subapplications.
    let apps = vec![
        subcommands::ExtractApp::app(),
        subcommands::FilterProjApp::app(),
        subcommands::ParseApp::app(),
        subcommands::TrainApp::app(),
    ];

    env_logger::init();

    let mut cli = Command::new("transdot")
        .about("A transition-based dependency parser")
        .version(crate_version!())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommands(apps)
        .subcommand(
            Command::new("completions")
                .about("Generate completion scripts for your shell")
                .arg_required_else_help(true)
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(value_parser!(Shell)),
                ),
        );
    let matches = cli.clone().get_matches();

    match matches.subcommand() {
        Some(("completions", matches)) => {
            let shell = *matches.get_one::<Shell>("shell").unwrap();
            generate(shell, &mut cli, "transdot", &mut stdout());
            Ok(())
        }
        Some(("extract", matches)) => subcommands::ExtractApp::parse(matches)?.run(),
        Some(("filter-proj", matches)) => subcommands::FilterProjApp::parse(matches)?.run(),
        Some(("parse", matches)) => subcommands::ParseApp::parse(matches)?.run(),
        Some(("train", matches)) => subcommands::TrainApp::parse(matches)?.run(),
        _unknown => unreachable!(),
    }
}
