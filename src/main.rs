// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::Result;
use std::env;

// Use library instead of local modules
use kfo_studio::{open_store, Config};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let config = Config::from_env()?;

    match args.get(1).map(String::as_str) {
        Some("bookings") => run_list_bookings(&config)?,
        Some("--help") | Some("-h") => print_help(),
        _ => run_ui_mode(&config)?,
    }

    Ok(())
}

fn print_help() {
    println!(
        r#"
KFO Studio

USAGE:
    kfo-studio             Open the studio (access code required)
    kfo-studio bookings    Print stored booking requests
    kfo-studio --help      Print this help

ENVIRONMENT:
    KFO_STORE              sqlite | memory        [default: sqlite]
    KFO_DB_PATH            SQLite file            [default: bookings.db]
    KFO_REDUCED_MOTION     true | false           [default: false]
"#
    );
}

fn run_list_bookings(config: &Config) -> Result<()> {
    println!("📋 KFO Studio - Booking Requests");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let store = open_store(config)?;
    let bookings = store.list_all()?;

    if bookings.is_empty() {
        println!("\nNo booking requests yet.");
        return Ok(());
    }

    for booking in &bookings {
        println!(
            "\n#{:<4} {}  {} ({})",
            booking.id,
            booking.created_at.format("%Y-%m-%d %H:%M"),
            booking.name,
            booking.phone
        );
        println!("      Project: {}", booking.project_type.label());
        if let Some(budget) = &booking.budget {
            println!("      Budget:  {}", budget);
        }
        if let Some(timeline) = &booking.timeline {
            println!("      When:    {}", timeline);
        }
        if let Some(description) = &booking.description {
            println!("      {}", description);
        }
    }

    println!("\n✓ {} booking(s) from {} store", bookings.len(), store.backend_name());
    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &Config) -> Result<()> {
    use kfo_studio::{AccessSequencer, Feedback, TerminalBell};

    let store = open_store(config)?;
    let gate = AccessSequencer::new(config.reduced_motion)
        .with_feedback(Feedback::new(Box::new(TerminalBell)));

    let mut app = ui::App::new(gate, store);
    ui::run_ui(&mut app)?;

    println!("\n✅ See you soon");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &Config) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the web UI: cargo run --bin kfo-server --features server");
    std::process::exit(1);
}
