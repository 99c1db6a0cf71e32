use chrono::DateTime;
use due_date_tool::{Calendar, CalendarConfig, CalendarError};
use log::{error, info};
use std::fs;
use std::io::{self, Write};
use std::process;
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid calendar JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Calendar(#[from] CalendarError),
}

fn load_calendar(path: &str) -> Result<Calendar, CliError> {
    let contents = fs::read_to_string(path)?;
    let config: CalendarConfig = serde_json::from_str(&contents)?;
    Ok(Calendar::new(config)?)
}

fn save_calendar(calendar: &Calendar, path: &str) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(&calendar.config().to_config())?;
    fs::write(path, json)?;
    Ok(())
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  config show                        Show the active work schedule\n  config default                     Reset to the default work schedule\n  config set <json_path>             Load a work schedule from a JSON file\n  config save <json_path>            Save the active work schedule to a JSON file\n  due <rfc3339> <hours>              Compute the due date for a submission\n  quit|exit                          Exit"
    );
}

fn print_calendar_info(calendar: &Calendar) {
    let config = calendar.config();
    println!("Workdays           : {} - {}", config.first_workday(), config.last_workday());
    println!("Workdays in week   : {}", config.workdays_in_week());
    println!(
        "Work hours         : {} - {}",
        due_date_tool::config::format_offset(config.work_begins()),
        due_date_tool::config::format_offset(config.work_ends())
    );
    println!("Time format        : {}", config.time_format());
}

fn main() {
    pretty_env_logger::init();

    let mut calendar = match Calendar::new(CalendarConfig::default()) {
        Ok(calendar) => calendar,
        Err(e) => {
            error!("unable to init calendar: {e}");
            process::exit(1);
        }
    };

    println!("Due Date Tool (CLI) - type 'help' for commands\n");
    print_calendar_info(&calendar);

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "config" => match parts.next() {
                Some("show") | None => print_calendar_info(&calendar),
                Some("default") => match Calendar::new(CalendarConfig::default()) {
                    Ok(default) => {
                        calendar = default;
                        println!("Work schedule reset to default.");
                        print_calendar_info(&calendar);
                    }
                    Err(e) => println!("Error resetting work schedule: {}", e),
                },
                Some("set") => match parts.next() {
                    Some(path) => match load_calendar(path) {
                        Ok(loaded) => {
                            calendar = loaded;
                            info!("work schedule loaded from {path}");
                            println!("Work schedule updated from {}.", path);
                            print_calendar_info(&calendar);
                        }
                        Err(e) => println!("Error loading {}: {}", path, e),
                    },
                    None => println!("Usage: config set <json_path>"),
                },
                Some("save") => match parts.next() {
                    Some(path) => match save_calendar(&calendar, path) {
                        Ok(_) => println!("Work schedule saved to {}.", path),
                        Err(e) => println!("Error saving {}: {}", path, e),
                    },
                    None => println!("Usage: config save <json_path>"),
                },
                Some(other) => {
                    println!("Unknown config command '{}'.", other);
                    println!("Usage: config show|default|set <json_path>|save <json_path>");
                }
            },
            "due" => {
                let submit_s = parts.next();
                let hours_s = parts.next();
                match (submit_s, hours_s) {
                    (Some(submit_s), Some(hours_s)) => {
                        let submit_at = match DateTime::parse_from_rfc3339(submit_s) {
                            Ok(v) => v,
                            Err(_) => {
                                println!("Invalid submit time (RFC 3339, e.g. 2021-10-13T09:30:00+04:00)");
                                continue;
                            }
                        };
                        let hours: f64 = match hours_s.parse() {
                            Ok(v) => v,
                            Err(_) => {
                                println!("Invalid hours");
                                continue;
                            }
                        };
                        match calendar.calculate_due_date(submit_at, hours) {
                            Ok(due) => println!("Due: {}", calendar.config().format_time(&due)),
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    _ => println!("Usage: due <rfc3339> <hours>"),
                }
            }
            other => println!("Unknown command '{}'. Type 'help' for commands.", other),
        }
    }
}
