use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;

use dwmstat::commands;
use dwmstat::StatusError;

fn build_cli() -> Command {
    Command::new("dwmstat")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Publishes brightness, battery, volume, keyboard layout, tunnel state and time to the dwm status bar")
        .long_about(
            "Publishes brightness, battery, volume, keyboard layout, tunnel state and time to the dwm status bar\n\n\
             The line is refreshed at every minute boundary.\n\
             Send SIGUSR1 to refresh immediately, SIGUSR2 to refresh after a short settle delay\n\
             (useful for volume or layout key bindings that fire repeatedly).",
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .help("Config file (defaults to ~/.config/dwmstat/config.json)")
                .value_parser(value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase log verbosity (-v info, -vv debug, -vvv trace)")
                .action(ArgAction::Count)
                .global(true),
        )
        .arg(
            Arg::new("once")
                .long("once")
                .help("Publish a single status line and exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("stdout")
                .long("stdout")
                .help("Print status lines to stdout instead of setting the root window name")
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("config")
                .about("Show the effective configuration")
                .arg(
                    Arg::new("path")
                        .long("path")
                        .help("Only print the config file location")
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn main() {
    let matches = build_cli().get_matches();
    dwmstat::init_logging(matches.get_count("verbose"));

    let result = match matches.subcommand() {
        Some(("config", sub_matches)) => commands::config::execute(sub_matches),
        _ => commands::run(&matches),
    };

    if let Err(e) = result {
        eprintln!("dwmstat: {:#}", e);
        std::process::exit(exit_code_for(&e));
    }
}

/// Log a top-level failure and pick the process exit code for it.
fn exit_code_for(e: &anyhow::Error) -> i32 {
    match e.downcast_ref::<StatusError>() {
        Some(err) if err.is_bootstrap() => {
            log::error!("Startup failed: {}", err);
            err.exit_code()
        }
        Some(err) => {
            log::error!("{:#}", e);
            err.exit_code()
        }
        None => {
            log::error!("{:#}", e);
            1
        }
    }
}
