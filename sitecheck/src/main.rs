use commands::command_argument_builder;
use sitecheck::handlers;
use sitecheck::print_banner;

mod commands;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");
    let json_mode = matches!(
        chosen_command.subcommand(),
        Some(("verify", sub)) if sub.get_flag("json")
    );

    // Show banner unless --quiet is set or stdout carries the JSON document
    if !quiet && !json_mode {
        print_banner();
    }

    if chosen_command.subcommand().is_none() {
        // No subcommand provided, just show the banner
        return;
    }

    match chosen_command.subcommand() {
        Some(("verify", primary_command)) => {
            if let Err(e) = handlers::handle_verify(primary_command).await {
                eprintln!("✗ {}", e);
                std::process::exit(1);
            }
        }
        Some(("sites", _)) => handlers::handle_sites(),
        _ => unreachable!("clap should ensure we don't get here"),
    }
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
