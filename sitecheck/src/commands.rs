use crate::CLAP_STYLING;
use clap::{arg, command};
use url::Url;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("sitecheck")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("sitecheck")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("verify")
                .about(
                    "Verify that every site in a list answers with an acceptable status, \
                following one layer of outbound links by default.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(false)
                        .help("Verify a single URL instead of a list")
                        .value_parser(clap::value_parser!(Url))
                        .conflicts_with_all(["sites-file", "debug"]),
                )
                .arg(
                    arg!(-S --"sites-file" <PATH>)
                        .required(false)
                        .help("Path to a newline-delimited file of sites to verify")
                        .value_parser(clap::value_parser!(std::path::PathBuf))
                        .conflicts_with("debug"),
                )
                .arg(
                    arg!(--"debug")
                        .required(false)
                        .help("Verify the short built-in list of troublesome sites")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(-t --"threads" <NUM_WORKERS>)
                        .required(false)
                        .help("The number of sites verified concurrently.")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("8"),
                )
                .arg(
                    arg!(--"attempts" <N>)
                        .required(false)
                        .help("Visit attempts per site before reporting failure")
                        .value_parser(clap::value_parser!(u32))
                        .default_value("2"),
                )
                .arg(
                    arg!(--"backoff-ms" <MILLIS>)
                        .required(false)
                        .help("Delay between attempts, in milliseconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("1500"),
                )
                .arg(
                    arg!(--"no-links")
                        .required(false)
                        .help("Skip the outbound link pass and only check the sites themselves")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"json")
                        .required(false)
                        .help("Emit the report as JSON on stdout")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(command!("sites").about("Print the packaged site list"))
}
