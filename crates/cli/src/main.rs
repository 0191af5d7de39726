mod error;
mod snapshot;

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use flexi_logger::{Logger, LoggerHandle};
use log::info;
use mcts_core::eval_info::{EvalInfo, EvalOptions, update_eval_info};
use mcts_core::node::Node;
use num_format::{Locale, ToFormattedString};

use crate::error::Result;

/// Prints UCI search reports for a saved search tree.
#[derive(Parser, Debug)]
#[command(version)]
struct Cli {
    /// Tree snapshot in JSON, `-` reads standard input
    #[arg(value_name = "SNAPSHOT", value_hint = clap::ValueHint::FilePath)]
    snapshot: PathBuf,

    /// Number of principal variations to report
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u64).range(1..))]
    multipv: u64,

    /// Write castling moves as king takes rook
    #[arg(long)]
    chess960: bool,

    #[arg(long, default_value = "0")]
    tbhits: u64,

    #[arg(long, default_value = "0")]
    seldepth: usize,

    /// Tree size when the search started
    #[arg(long = "nodes-at-start", default_value = "0")]
    nodes_at_start: u64,

    /// Search time to report, in milliseconds
    #[arg(long = "elapsed-ms", default_value = "0")]
    elapsed_ms: u64,

    /// Log filter, overridden by RUST_LOG
    #[arg(long = "log-level", default_value = "warn")]
    log_level: String,
}

fn main() {
    let args = Cli::parse();
    let _logger = setup_logging(&args.log_level);

    if let Err(err) = run(&args) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn setup_logging(level: &str) -> Option<LoggerHandle> {
    Logger::try_with_env_or_str(level)
        .and_then(|logger| logger.log_to_stderr().start())
        .map_err(|err| eprintln!("Failed to initialize logging: {err}"))
        .ok()
}

fn run(args: &Cli) -> Result<()> {
    let root = if args.snapshot.as_os_str() == "-" {
        snapshot::load_tree(io::stdin().lock())?
    } else {
        snapshot::load_tree(BufReader::new(File::open(&args.snapshot)?))?
    };

    let mut out = io::stdout().lock();
    write_report(args, &root, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Writes the `info` lines and the `bestmove` command for `root`.
fn write_report<W: Write>(args: &Cli, root: &Node, out: &mut W) -> Result<()> {
    let multi_pv = usize::try_from(args.multipv).unwrap_or(usize::MAX);
    let options = EvalOptions::new(multi_pv).with_chess960(args.chess960);
    let mut eval_info = EvalInfo::new(&options);
    eval_info.start_search(args.nodes_at_start);
    eval_info.end = eval_info.start + Duration::from_millis(args.elapsed_ms);

    update_eval_info(&mut eval_info, root, args.tbhits, args.seldepth, multi_pv);
    info!(
        "{} of {} lines resolved, {} nodes",
        eval_info.line_count(),
        multi_pv,
        eval_info.nodes.to_formatted_string(&Locale::en)
    );

    if eval_info.line_count() > 0 {
        write!(out, "info score {eval_info}")?;
    }
    writeln!(out, "{}", eval_info.bestmove_command())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "mcts-report",
            "tree.json",
            "--multipv",
            "3",
            "--chess960",
            "--elapsed-ms",
            "250",
        ])
        .unwrap();
        assert_eq!(cli.snapshot, PathBuf::from("tree.json"));
        assert_eq!(cli.multipv, 3);
        assert!(cli.chess960);
        assert_eq!(cli.elapsed_ms, 250);
        assert_eq!(cli.tbhits, 0);
    }

    const CASTLING_TREE: &str = r#"{
        "moves": ["e1h1", "d2d4"],
        "castling": ["e1h1"],
        "value": 0.0,
        "children": [
            { "visits": 3, "value_sum": 0.6, "node": { "moves": ["e8g8"], "value": 0.0 } }
        ]
    }"#;

    fn report(flags: &[&str]) -> String {
        let mut argv = vec!["mcts-report", "tree.json", "--elapsed-ms", "1000"];
        argv.extend_from_slice(flags);
        let cli = Cli::try_parse_from(argv).unwrap();
        let root = snapshot::parse_tree(CASTLING_TREE).unwrap();

        let mut out = Vec::new();
        write_report(&cli, &root, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_report_standard_castling() {
        let text = report(&[]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("info score multipv 1 cp "));
        assert!(lines[0].ends_with("time 1000 nps 3 tbhits 0 pv e1g1 e8g8"));
        assert_eq!(lines[1], "bestmove e1g1");
    }

    #[test]
    fn test_report_chess960_castling() {
        let text = report(&["--chess960"]);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].ends_with("pv e1h1 e8g8"));
        assert_eq!(lines[1], "bestmove e1h1");
    }

    #[test]
    fn test_report_without_lines() {
        let cli = Cli::try_parse_from(["mcts-report", "-"]).unwrap();
        let root = snapshot::parse_tree(r#"{ "moves": ["e2e4"] }"#).unwrap();
        let mut out = Vec::new();
        write_report(&cli, &root, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "bestmove (none)\n");
    }

    #[test]
    fn test_rejects_zero_multipv() {
        assert!(Cli::try_parse_from(["mcts-report", "-", "--multipv", "0"]).is_err());
    }
}
