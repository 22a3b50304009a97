//! Interactive console: the thin presentation layer over the garage core.
//!
//! Renders spot status and receipts, and forwards `enter`/`exit` commands
//! to the state owner. Carries no decision logic of its own; every failure
//! is printed and the loop keeps going.

use crate::model::{Plate, TicketCode, Vehicle, VehicleCategory};
use crate::state::AppState;
use anyhow::Result;
use std::io::{self, BufRead, Write};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn run(state: &AppState) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("carpark console. Type 'help' for commands.");
    render_status(state);

    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            // EOF
            return Ok(());
        }

        match parse_command(&line) {
            Command::Status => render_status(state),
            Command::Enter { plate, category } => handle_enter(state, &plate, &category),
            Command::Exit { code } => handle_exit(state, &code),
            Command::Help => print_help(),
            Command::Quit => return Ok(()),
            Command::Empty => {}
            Command::Unknown(word) => {
                println!("unknown command '{word}'. Type 'help' for commands.");
            }
            Command::Usage(message) => println!("{message}"),
        }
    }
}

enum Command {
    Status,
    Enter { plate: String, category: String },
    Exit { code: String },
    Help,
    Quit,
    Empty,
    Unknown(String),
    Usage(&'static str),
}

fn parse_command(line: &str) -> Command {
    let mut parts = line.split_whitespace();
    let Some(keyword) = parts.next() else {
        return Command::Empty;
    };

    match keyword.to_ascii_lowercase().as_str() {
        "status" => Command::Status,
        "enter" => match (parts.next(), parts.next()) {
            (Some(plate), Some(category)) => Command::Enter {
                plate: plate.to_string(),
                category: category.to_string(),
            },
            _ => Command::Usage("usage: enter <plate> <category>"),
        },
        "exit" => match parts.next() {
            Some(code) => Command::Exit {
                code: code.to_string(),
            },
            None => Command::Usage("usage: exit <ticket-code>"),
        },
        "help" => Command::Help,
        "quit" | "q" => Command::Quit,
        other => Command::Unknown(other.to_string()),
    }
}

fn handle_enter(state: &AppState, raw_plate: &str, raw_category: &str) {
    let plate = match Plate::new(raw_plate) {
        Ok(plate) => plate,
        Err(error) => {
            println!("{error}");
            return;
        }
    };
    let category = VehicleCategory::parse(raw_category);
    let vehicle = Vehicle::new(plate.clone(), category.clone());

    match state.allocate(vehicle) {
        Ok(entry) => {
            println!("Entry registered.");
            println!("  Spot:     {}", entry.spot_id);
            println!("  Ticket:   {}", entry.ticket_code);
            println!("  Plate:    {plate}");
            println!("  Category: {category}");
            println!(
                "  Entered:  {}",
                entry.entered_at.format(TIME_FORMAT)
            );
        }
        Err(error) => println!("{error}"),
    }
}

fn handle_exit(state: &AppState, raw_code: &str) {
    let code = TicketCode::parse(raw_code);
    match state.check_out(&code) {
        Ok(outcome) => {
            let receipt = outcome.receipt;
            println!("PAYMENT RECEIPT");
            println!("  Ticket:  {}", receipt.ticket_code);
            println!("  Plate:   {}", receipt.plate);
            println!("  Time:    {}h {}min", receipt.hours, receipt.minutes);
            println!("  TOTAL:   {:.2}", receipt.total);
            println!("Spot {} is now free.", outcome.freed_spot);
        }
        Err(error) => println!("{error}"),
    }
}

fn render_status(state: &AppState) {
    println!("{:>4}  {:<12} {}", "id", "category", "state");
    for spot in state.snapshot() {
        println!(
            "{:>4}  {:<12} {}",
            format!("{:02}", spot.id().value()),
            spot.category().to_string(),
            spot.state()
        );
    }
}

fn print_help() {
    println!("commands:");
    println!("  status                   show all spots");
    println!("  enter <plate> <category> register a vehicle entry");
    println!("  exit <ticket-code>       process exit and payment");
    println!("  help                     this message");
    println!("  quit                     leave the console");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_parse() {
        assert!(matches!(parse_command("status\n"), Command::Status));
        assert!(matches!(parse_command("  "), Command::Empty));
        assert!(matches!(parse_command("quit"), Command::Quit));
        assert!(matches!(
            parse_command("enter AB-12 car"),
            Command::Enter { .. }
        ));
        assert!(matches!(parse_command("enter AB-12"), Command::Usage(_)));
        assert!(matches!(parse_command("exit abcd1234"), Command::Exit { .. }));
        assert!(matches!(parse_command("exit"), Command::Usage(_)));
        assert!(matches!(parse_command("nope"), Command::Unknown(_)));
    }
}
