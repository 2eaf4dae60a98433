use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::catalog::UNITS;
use crate::config::Settings;
use crate::parallel::{parse_report_dir, WorkerPool};
use crate::report::{normalize_payload, parse_combat_report};
use crate::server;
use crate::settlement::{run_settlement, SettlementRequest};

const USAGE: &str = "usage: crsplit <serve|parse|settle|batch|units>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Parse,
    Settle,
    Batch,
    Units,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("parse") => Some(Command::Parse),
        Some("settle") => Some(Command::Settle),
        Some("batch") => Some(Command::Batch),
        Some("units") => Some(Command::Units),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    let Some(command) = parse_command(args) else {
        eprintln!("{USAGE}");
        return 2;
    };
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return 1;
        }
    };
    match command {
        Command::Serve => handle_serve(&settings),
        Command::Parse => handle_parse(args),
        Command::Settle => handle_settle(args, &settings),
        Command::Batch => handle_batch(args, &settings),
        Command::Units => print_json(&UNITS, "unit catalog"),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T, what: &str) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize {what}: {err}");
            1
        }
    }
}

fn read_input(path: &str) -> Result<String, i32> {
    fs::read_to_string(path).map_err(|err| {
        eprintln!("failed to read {path}: {err}");
        1
    })
}

fn handle_serve(settings: &Settings) -> i32 {
    match server::run_server(settings) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

fn handle_parse(args: &[String]) -> i32 {
    let Some(path) = args.get(2) else {
        eprintln!("usage: crsplit parse <report-file>");
        return 2;
    };
    let raw = match read_input(path) {
        Ok(raw) => raw,
        Err(code) => return code,
    };
    let report = parse_combat_report(&normalize_payload(&raw));
    print_json(&report, "parsed report")
}

fn handle_settle(args: &[String], settings: &Settings) -> i32 {
    let Some(path) = args.get(2) else {
        eprintln!("usage: crsplit settle <request.json>");
        return 2;
    };
    let raw = match read_input(path) {
        Ok(raw) => raw,
        Err(code) => return code,
    };
    let request: SettlementRequest = match serde_json::from_str(&raw) {
        Ok(request) => request,
        Err(err) => {
            eprintln!("invalid settlement request: {err}");
            return 1;
        }
    };
    match run_settlement(request, settings) {
        Ok(report) => print_json(&report, "settlement report"),
        Err(err) => {
            eprintln!("settlement failed: {err}");
            1
        }
    }
}

fn handle_batch(args: &[String], settings: &Settings) -> i32 {
    let Some(dir) = args.get(2) else {
        eprintln!("usage: crsplit batch <dir> [workers]");
        return 2;
    };
    let workers = parse_usize_arg(args.get(3), "workers", settings.workers);
    match parse_report_dir(Path::new(dir), &WorkerPool::with_workers(workers)) {
        Ok(parsed) => print_json(&parsed, "batch results"),
        Err(err) => {
            eprintln!("batch failed: {err}");
            1
        }
    }
}

fn parse_usize_arg(raw: Option<&String>, name: &str, default: usize) -> usize {
    raw.and_then(|value| value.parse::<usize>().ok())
        .unwrap_or_else(|| {
            if let Some(value) = raw {
                eprintln!("invalid {name} '{value}', defaulting to {default}");
            }
            default
        })
}
