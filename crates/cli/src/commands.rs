//! Clap command tree definition.

use clap::{value_parser, Arg, ArgAction, Command};

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("eicio")
        .about("Inspect eicio event streams")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("json")
                .long("json")
                .help("JSON output mode")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("max-payload")
                .long("max-payload")
                .help("Largest event payload to accept, in bytes (default: 1 GiB)")
                .value_parser(value_parser!(u64))
                .global(true),
        )
        .subcommand(build_ls())
        .subcommand(build_count())
        .subcommand(build_cat())
}

fn file_arg() -> Arg {
    Arg::new("file")
        .help("Event file (.gz and .zst are decompressed)")
        .required(true)
}

fn build_ls() -> Command {
    Command::new("ls")
        .about("List each event's collections without decoding them")
        .arg(file_arg())
}

fn build_count() -> Command {
    Command::new("count")
        .about("Count events and resynchronizations")
        .arg(file_arg())
}

fn build_cat() -> Command {
    Command::new("cat")
        .about("Print decoded collections")
        .arg(file_arg())
        .arg(
            Arg::new("event")
                .long("event")
                .short('e')
                .help("Only print the event with this index")
                .value_parser(value_parser!(u64)),
        )
}
