// structty: step-by-step data structure tracer with a terminal playback UI

use std::fs;
use std::io;
use std::path::Path;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use structty::config::CliOptions;
use structty::trace::TraceEngine;
use structty::ui::App;

fn print_usage(program_name: &str) {
    eprintln!(
        "Usage: {} <script> [--kind <kind>] [--json] [--history-limit <MB>]",
        program_name
    );
    eprintln!();
    eprintln!("  --kind <kind>         structure assumed for undeclared names (default: stack)");
    eprintln!("  --json                print the replay result as JSON instead of opening the UI");
    eprintln!("  --history-limit <MB>  memory budget for recorded frames");
    eprintln!();
    eprintln!("Example script:");
    eprintln!("  s = ArrayStack()");
    eprintln!("  s.push(10)");
    eprintln!("  s.pop()");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let program_name = args.first().map(|s| s.as_str()).unwrap_or("structty");

    let options = match CliOptions::parse(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!();
            print_usage(program_name);
            std::process::exit(1);
        }
    };

    if !Path::new(&options.script_path).exists() {
        eprintln!("Error: File '{}' not found", options.script_path);
        std::process::exit(1);
    }

    let source = fs::read_to_string(&options.script_path)?;

    let engine = TraceEngine::with_history_limit(options.history_limit);
    let result = match engine.run_script(&source, options.default_kind) {
        Ok(result) => result,
        Err(rejected) => {
            eprintln!("Could not extract operations from {}:", options.script_path);
            for error in &rejected.errors {
                eprintln!("  {}", error);
            }
            std::process::exit(1);
        }
    };

    if options.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if result.frames.is_truncated() {
        eprintln!(
            "Warning: history limit reached after {} frames; later operations are not viewable",
            result.frames.len()
        );
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(result, source);
    let res = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
