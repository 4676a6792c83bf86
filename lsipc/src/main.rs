//! # lsipc
//!
//! Show information on System V IPC facilities currently employed in the
//! system: shared memory segments, message queues and semaphore sets.
//!
//! ## Overview
//!
//! lsipc is built on top of lsipclib. The library builds a report of named
//! columns; this binary parses the command line, picks the output layout and
//! writes the result.
//!
//! ## Usage
//!
//! ```bash
//! # All shared memory segments
//! lsipc --shmems
//!
//! # System-wide usage against the kernel limits
//! lsipc --global
//!
//! # Everything known about one semaphore set
//! lsipc --semaphores --id 3
//!
//! # Chosen columns as JSON
//! lsipc --queues -o KEY,ID,MSGS --json
//! ```

mod render;

use std::process::ExitCode;

use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};
use log::debug;
use lsipclib::{
    Category, ColumnId, OutputMode, ProcIpcSource, ProcfsProcessLookup, RenderOptions,
    ReportBuilder, ReportOptions, Resource, SystemIdentity, TimeMode, DEFAULT_PROC_ROOT,
};

/// Flags selecting an output layout; at most one may be given.
const OUTPUT_MODE_FLAGS: [&str; 6] = [
    "json",
    "export",
    "newline",
    "raw",
    "print0",
    "colon-separate",
];

/// The "Available columns" section of `--help`, generated from the registry.
fn columns_help() -> String {
    let mut help = String::from("Available columns:\n");
    for category in [
        Category::Generic,
        Category::Shm,
        Category::Msg,
        Category::Sem,
        Category::Summary,
    ] {
        help.push_str(&format!("\n{}:\n", category.title()));
        for column in ColumnId::in_category(category) {
            let desc = column.desc();
            help.push_str(&format!("  {:>11}  {}\n", desc.name, desc.help));
        }
    }
    help
}

fn flag(name: &'static str, short: Option<char>, help: &'static str) -> Arg {
    let arg = Arg::new(name)
        .long(name)
        .action(ArgAction::SetTrue)
        .help(help);
    match short {
        Some(short) => arg.short(short),
        None => arg,
    }
}

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("lsipc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Show information on IPC facilities currently employed in the system")
        .after_help(columns_help())
        .next_help_heading("Resource options")
        .arg(
            flag("shmems", Some('m'), "shared memory segments")
                .conflicts_with_all(["queues", "semaphores"]),
        )
        .arg(flag("queues", Some('q'), "message queues").conflicts_with("semaphores"))
        .arg(flag("semaphores", Some('s'), "semaphores"))
        .arg(
            flag("global", Some('g'), "info about system-wide usage")
                .conflicts_with_all(["creator", "id", "time"]),
        )
        .arg(
            Arg::new("id")
                .short('i')
                .long("id")
                .value_name("id")
                .allow_negative_numbers(true)
                .value_parser(clap::value_parser!(i32))
                .conflicts_with_all(OUTPUT_MODE_FLAGS)
                .conflicts_with_all(["creator", "time"])
                .help("print details on resource identified by <id>"),
        )
        .next_help_heading("Output options")
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("list")
                .conflicts_with_all(["creator", "id", "time"])
                .help("define the columns to output"),
        )
        .arg(
            flag("time", Some('t'), "show attach, detach and change times")
                .conflicts_with("creator"),
        )
        .arg(flag("creator", Some('c'), "show creator and owner"))
        .arg(flag(
            "bytes",
            Some('b'),
            "print SIZE in bytes rather than in human readable format",
        ))
        .arg(flag(
            "numeric-perms",
            Some('P'),
            "print numeric permissions (PERMS column)",
        ))
        .arg(flag("notruncate", None, "don't truncate output"))
        .arg(flag("noheadings", None, "don't print headings"))
        .arg(
            Arg::new("time-format")
                .long("time-format")
                .value_name("type")
                .value_parser(|s: &str| s.parse::<TimeMode>())
                .help("display dates in short, full or iso format"),
        )
        .arg(
            flag("colon-separate", None, "display data in a format similar to /etc/passwd")
                .conflicts_with_all(["export", "newline", "raw", "json", "print0"]),
        )
        .arg(
            flag("export", Some('e'), "display in an export-able output format")
                .conflicts_with_all(["newline", "raw", "json", "print0"]),
        )
        .arg(
            flag("newline", Some('n'), "display each piece of information on a new line")
                .conflicts_with_all(["raw", "json", "print0"]),
        )
        .arg(flag("raw", Some('r'), "raw output").conflicts_with_all(["json", "print0"]))
        .arg(flag("json", Some('J'), "use the JSON output format").conflicts_with("print0"))
        .arg(flag("print0", Some('z'), "delimit user entries with a nul character"))
        .arg(
            Arg::new("proc-root")
                .long("proc-root")
                .value_name("dir")
                .default_value(DEFAULT_PROC_ROOT)
                .hide(true),
        )
}

/// Translate parsed arguments into report options.
fn report_options(matches: &ArgMatches) -> ReportOptions {
    let mut options = ReportOptions::new()
        .global(matches.get_flag("global"))
        .show_creator(matches.get_flag("creator"))
        .show_time(matches.get_flag("time"))
        .bytes(matches.get_flag("bytes"))
        .numeric_perms(matches.get_flag("numeric-perms"));

    for (name, resource) in [
        ("queues", Resource::Msg),
        ("shmems", Resource::Shm),
        ("semaphores", Resource::Sem),
    ] {
        if matches.get_flag(name) {
            options = options.resource(resource);
        }
    }
    if let Some(id) = matches.get_one::<i32>("id") {
        options = options.id(*id);
    }
    if let Some(list) = matches.get_one::<String>("output") {
        options = options.columns(list.as_str());
    }
    if let Some(mode) = matches.get_one::<TimeMode>("time-format") {
        options = options.time_mode(*mode);
    }
    options
}

/// Translate parsed arguments into the output layout.
fn render_options(matches: &ArgMatches) -> RenderOptions {
    let mode = if matches.get_one::<i32>("id").is_some() {
        OutputMode::Pretty
    } else if matches.get_flag("colon-separate") {
        OutputMode::Colon
    } else if matches.get_flag("export") {
        OutputMode::Export
    } else if matches.get_flag("newline") {
        OutputMode::Newline
    } else if matches.get_flag("raw") {
        OutputMode::Raw
    } else if matches.get_flag("print0") {
        OutputMode::Nul
    } else {
        OutputMode::Table
    };

    RenderOptions::new(mode)
        .json(matches.get_flag("json"))
        .noheadings(matches.get_flag("noheadings"))
        .notruncate(matches.get_flag("notruncate"))
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let root = matches
        .get_one::<String>("proc-root")
        .map(String::as_str)
        .unwrap_or(DEFAULT_PROC_ROOT);
    debug!("reading IPC state from {root}");

    let source = ProcIpcSource::new(root);
    let processes = ProcfsProcessLookup::new(root);
    let options = report_options(matches);

    let report = ReportBuilder::new(&source, &processes, &SystemIdentity).build(&options)?;

    for warning in &report.warnings {
        eprintln!("lsipc: {warning}");
    }

    let render = render_options(matches);
    render::print_report(&report, render).context("failed to write output")?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let matches = build_command().get_matches();

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("lsipc: {e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<ArgMatches, clap::Error> {
        let mut argv = vec!["lsipc"];
        argv.extend(args);
        build_command().try_get_matches_from(argv)
    }

    #[test]
    fn test_command_is_valid() {
        build_command().debug_assert();
    }

    #[test]
    fn test_resource_flags_are_exclusive() {
        assert!(parse(&["-m", "-q"]).is_err());
        assert!(parse(&["-q", "-s"]).is_err());
        assert!(parse(&["-g", "-m"]).is_ok());
    }

    #[test]
    fn test_output_modes_are_exclusive() {
        assert!(parse(&["-m", "--json", "--raw"]).is_err());
        assert!(parse(&["-m", "--export", "--colon-separate"]).is_err());
        assert!(parse(&["-m", "--id", "3", "--raw"]).is_err());
        assert!(parse(&["-m", "--noheadings", "--raw"]).is_ok());
    }

    #[test]
    fn test_column_options_are_exclusive() {
        assert!(parse(&["-m", "-c", "-t"]).is_err());
        assert!(parse(&["-m", "-o", "KEY", "-c"]).is_err());
        assert!(parse(&["-g", "-i", "1"]).is_err());
        assert!(parse(&["-m", "-i", "5", "-c"]).is_err());
        assert!(parse(&["-m", "-i", "5", "-t"]).is_err());
        assert!(parse(&["-m", "-i", "5", "-b", "-P"]).is_ok());
        assert!(parse(&["-g", "-o", "RESOURCE"]).is_ok());
    }

    #[test]
    fn test_report_options() {
        let matches = parse(&["-s", "-c", "-b", "-P", "--time-format", "iso"]).unwrap();
        let options = report_options(&matches);
        assert!(options.resources.sem);
        assert!(!options.resources.shm);
        assert!(options.show_creator);
        assert!(options.bytes);
        assert!(options.numeric_perms);
        assert_eq!(options.time_mode, TimeMode::Iso);
        assert_eq!(options.id, None);
    }

    #[test]
    fn test_negative_id() {
        let matches = parse(&["-m", "--id", "-1"]).unwrap();
        assert_eq!(report_options(&matches).id, Some(-1));
        assert_eq!(render_options(&matches).mode, OutputMode::Pretty);
    }

    #[test]
    fn test_unknown_time_format_is_rejected() {
        assert!(parse(&["-m", "--time-format", "long"]).is_err());
    }

    #[test]
    fn test_render_options() {
        let matches = parse(&["-q", "--print0", "--noheadings"]).unwrap();
        let render = render_options(&matches);
        assert_eq!(render.mode, OutputMode::Nul);
        assert!(render.noheadings);
        assert!(!render.json);

        let matches = parse(&["-q", "-J"]).unwrap();
        let render = render_options(&matches);
        assert!(render.json);
        assert_eq!(render.mode, OutputMode::Table);
    }

    #[test]
    fn test_columns_help_lists_every_column() {
        let help = columns_help();
        for column in ColumnId::ALL {
            assert!(help.contains(column.name()), "{}", column.name());
        }
    }
}
