use crate::aircraft::{Aircraft, AircraftStatus};
use crate::flight::{CabinCounts, CabinPrices, Flight, FlightStatus};
use crate::ops::ops::{FlightPlan, Ops, SyncReport};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::{Context, Editor, Helper, Highlighter, Hinter, Validator};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::time::Duration;
use tabled::Tabled;
use tabled::settings::Style;

mod aircraft;
mod airport;
mod cache;
mod error;
mod flight;
mod ops;
mod route;
mod time;

#[derive(Parser)]
struct Args {
    /// Path to the JSON scenario file
    #[arg(short, long, value_name = "FILE", default_value = "data/default.json")]
    scenario: PathBuf,

    /// Time-to-live for cached bulk queries, in seconds
    #[arg(long, default_value_t = 60)]
    cache_ttl_secs: u64,
}

#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct CompleteHelper {
    pub commands: Vec<String>,
}

impl Completer for CompleteHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        _pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let mut candidates = Vec::new();

        for cmd in &self.commands {
            if cmd.starts_with(line) {
                candidates.push(Pair {
                    display: cmd.clone(),
                    replacement: format!("{} ", cmd),
                });
            }
        }

        Ok((0, candidates))
    }
}

fn paginate(content: String) {
    let mut pager = Command::new("less")
        .arg("-R")
        .stdin(Stdio::piped())
        .spawn()
        // Fallback to 'more' if 'less' isn't available
        .or_else(|_| Command::new("more").stdin(Stdio::piped()).spawn())
        .expect("Failed to spawn pager");

    let mut stdin = pager.stdin.take().expect("Failed to open stdin for pager");

    if let Err(e) = stdin.write_all(content.as_bytes()) {
        // Broken pipe is common if the user quits the pager early
        if e.kind() != std::io::ErrorKind::BrokenPipe {
            eprintln!("Error writing to pager: {}", e);
        }
    }

    // Wait for the user to close the pager before returning to the ">> " prompt
    let _ = pager.wait();
}

fn tint_flight_status(status: FlightStatus) -> String {
    let label = status.to_string();
    match status {
        FlightStatus::Scheduled => label.normal(),
        FlightStatus::Boarding => label.yellow(),
        FlightStatus::Departed
        | FlightStatus::Flying
        | FlightStatus::Landed
        | FlightStatus::Deplaning => label.cyan(),
        FlightStatus::Completed => label.green(),
    }
    .to_string()
}

fn tint_aircraft_status(status: AircraftStatus) -> String {
    let label = status.to_string();
    match status {
        AircraftStatus::Available => label.green(),
        AircraftStatus::Scheduled => label.yellow(),
        AircraftStatus::Flying => label.cyan(),
    }
    .to_string()
}

#[derive(Tabled)]
struct FlightRow {
    number: String,
    route: String,
    departure: String,
    arrival: String,
    aircraft: String,
    status: String,
}

impl From<&Flight> for FlightRow {
    fn from(flight: &Flight) -> FlightRow {
        FlightRow {
            number: flight.number.to_string(),
            route: format!("{}-{}", flight.origin_id, flight.destination_id),
            departure: flight.departure_time.format("%Y-%m-%d %H:%M").to_string(),
            arrival: flight
                .arrival_time()
                .map(|a| a.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|_| "n/a".to_string()),
            aircraft: flight
                .aircraft_id
                .as_ref()
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".to_string()),
            status: tint_flight_status(flight.status),
        }
    }
}

#[derive(Tabled)]
struct AircraftRow {
    registration: String,
    model: String,
    location: String,
    operator: String,
    status: String,
}

impl From<&Aircraft> for AircraftRow {
    fn from(aircraft: &Aircraft) -> AircraftRow {
        AircraftRow {
            registration: aircraft.registration.to_string(),
            model: aircraft.model.name.to_string(),
            location: aircraft.location_id.to_string(),
            operator: aircraft.operator.to_string(),
            status: tint_aircraft_status(aircraft.status),
        }
    }
}

fn print_table<R: Tabled>(rows: Vec<R>) {
    let count = rows.len();
    let mut table = tabled::Table::new(rows);
    table.with(Style::rounded());
    table.with(tabled::settings::Alignment::left());
    if count > 20 {
        paginate(table.to_string());
    } else {
        println!("{}", table);
    }
}

fn parse_dt(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").ok()
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn print_sync_report(report: &SyncReport) {
    println!(
        "Sync pass complete: {} flight change(s), {} aircraft change(s), {} error(s).",
        report.changed(),
        report.aircraft_changes.len(),
        report.errors.len()
    );
    for (number, old, new) in &report.flight_changes {
        println!("  {} {} -> {}", number, old, new);
    }
    for (registration, old, new) in &report.aircraft_changes {
        println!("  {} {} -> {}", registration, old, new);
    }
    for err in &report.errors {
        println!("  {} {}", "error:".red(), err);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();
    let mut ops = Ops::load_from_file(
        args.scenario.to_str().unwrap(),
        Duration::from_secs(args.cache_ttl_secs),
    )?;
    println!(
        "Ops desk online. Loaded scenario from {}",
        args.scenario.display()
    );

    let config = rustyline::Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();

    let helper = CompleteHelper {
        commands: vec![
            "ls".to_string(),
            "fleet".to_string(),
            "dep".to_string(),
            "add".to_string(),
            "move".to_string(),
            "assign".to_string(),
            "rm".to_string(),
            "avail".to_string(),
            "sync".to_string(),
            "help".to_string(),
            "exit".to_string(),
        ],
    };

    let mut rl = Editor::with_config(config)?;
    rl.set_helper(Some(helper));

    loop {
        let readline = rl.readline(">> ");
        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                rl.add_history_entry(trimmed)?;

                let parts: Vec<&str> = trimmed.split_whitespace().collect();
                match parts[0] {
                    "ls" => {
                        let sub = parts.get(1).copied().unwrap_or("a");
                        let all = ops.all_flights();
                        let rows: Vec<FlightRow> = all
                            .iter()
                            .filter(|f| match sub {
                                "s" | "scheduled" => f.status == FlightStatus::Scheduled,
                                "b" | "boarding" => f.status == FlightStatus::Boarding,
                                "f" | "flying" => {
                                    f.status > FlightStatus::Boarding && !f.status.is_terminal()
                                }
                                "c" | "completed" => f.status.is_terminal(),
                                _ => true, // 'ls' or 'ls a'
                            })
                            .map(FlightRow::from)
                            .collect();
                        if rows.is_empty() {
                            println!("No matching flights found.");
                        } else {
                            print_table(rows);
                        }
                    }
                    "fleet" => {
                        let mut regs: Vec<_> = ops.aircraft.keys().cloned().collect();
                        regs.sort();
                        let rows: Vec<AircraftRow> = regs
                            .iter()
                            .filter_map(|reg| ops.aircraft.get(reg))
                            .map(AircraftRow::from)
                            .collect();
                        print_table(rows);
                    }
                    "dep" => {
                        if let (Some(airport), Some(date)) =
                            (parts.get(1), parts.get(2).and_then(|s| parse_date(s)))
                        {
                            let rows: Vec<FlightRow> = ops
                                .departures(&Arc::from(*airport), date)
                                .iter()
                                .map(FlightRow::from)
                                .collect();
                            if rows.is_empty() {
                                println!("No departures found.");
                            } else {
                                print_table(rows);
                            }
                        } else {
                            println!("Usage: dep <airport_id> <YYYY-MM-DD>");
                        }
                    }
                    "add" => {
                        if let (Some(number), Some(origin), Some(dest), Some(departure)) = (
                            parts.get(1),
                            parts.get(2),
                            parts.get(3),
                            parts.get(4).and_then(|s| parse_dt(s)),
                        ) {
                            let plan = FlightPlan {
                                number: Arc::from(*number),
                                origin_id: Arc::from(*origin),
                                destination_id: Arc::from(*dest),
                                aircraft_id: parts.get(5).map(|s| Arc::from(*s)),
                                departure_time: departure,
                                duration_minutes: parts.get(6).and_then(|s| s.parse().ok()),
                                passengers: CabinCounts::default(),
                                prices: CabinPrices::default(),
                            };
                            match ops.add_flight(plan) {
                                Ok(id) => println!("Flight {} added (id {}).", number, id),
                                Err(err) => println!("{} {}", "rejected:".red(), err),
                            }
                        } else {
                            println!(
                                "Usage: add <number> <origin> <dest> <YYYY-MM-DDTHH:MM> [aircraft] [minutes]"
                            );
                        }
                    }
                    "move" => {
                        if let (Some(number), Some(departure)) =
                            (parts.get(1), parts.get(2).and_then(|s| parse_dt(s)))
                        {
                            match ops.reschedule_flight(number, departure) {
                                Ok(()) => println!("Flight {} moved.", number),
                                Err(err) => println!("{} {}", "rejected:".red(), err),
                            }
                        } else {
                            println!("Usage: move <number> <YYYY-MM-DDTHH:MM>");
                        }
                    }
                    "assign" => {
                        if let (Some(number), Some(registration)) = (parts.get(1), parts.get(2)) {
                            match ops.assign_aircraft(number, Arc::from(*registration)) {
                                Ok(()) => println!("{} assigned to {}.", registration, number),
                                Err(err) => println!("{} {}", "rejected:".red(), err),
                            }
                        } else {
                            println!("Usage: assign <number> <registration>");
                        }
                    }
                    "rm" => {
                        if let Some(number) = parts.get(1) {
                            match ops.remove_flight(number) {
                                Ok(()) => println!("Flight {} removed.", number),
                                Err(err) => println!("{} {}", "rejected:".red(), err),
                            }
                        } else {
                            println!("Usage: rm <number>");
                        }
                    }
                    "avail" => {
                        if let (Some(registration), Some(from), Some(to)) = (
                            parts.get(1),
                            parts.get(2).and_then(|s| parse_dt(s)),
                            parts.get(3).and_then(|s| parse_dt(s)),
                        ) {
                            if ops.is_available(&Arc::from(*registration), (from, to), None) {
                                println!("{} is available in that window.", registration);
                            } else {
                                println!(
                                    "{} is {} in that window.",
                                    registration,
                                    "not available".red()
                                );
                            }
                        } else {
                            println!("Usage: avail <registration> <from> <to>  (YYYY-MM-DDTHH:MM)");
                        }
                    }
                    "sync" => {
                        let now = parts
                            .get(1)
                            .and_then(|s| parse_dt(s))
                            .unwrap_or_else(|| Utc::now().naive_utc());
                        let report = ops.sync_status(now);
                        print_sync_report(&report);
                    }
                    "help" | "?" => {
                        println!("\nAvailable Commands:");
                        println!("  ls [filter]             - List flights; filter: s scheduled, b boarding, f airborne, c completed");
                        println!("  fleet                   - List aircraft with projected statuses");
                        println!("  dep <airport> <date>    - List departures for an airport on a date");
                        println!("  add <no> <org> <dst> <dep> [ac] [min] - Schedule a new flight");
                        println!("  move <no> <dep>         - Reschedule a flight's departure");
                        println!("  assign <no> <reg>       - Put an aircraft on a flight");
                        println!("  rm <no>                 - Remove a flight (only while SCHEDULED)");
                        println!("  avail <reg> <from> <to> - Check aircraft availability for a window");
                        println!("  sync [now]              - Run a status synchronization pass");
                        println!("  help / ?                - Show this help menu");
                        println!("  exit / quit             - Exit the ops desk\n");
                    }
                    "exit" | "quit" => break,
                    _ => println!("Unknown command: {}", parts[0]),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}
