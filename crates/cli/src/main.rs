//! # tripdash-cli
//!
//! Command-line interface for the travel dashboard.

mod output;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::EnvFilter;
use tripdash_core::{
    render, write_export, Dashboard, DashboardConfig, DashboardError, DataTable, RenderedView, SheetCache,
    ViewConfig, ViewMode,
};

use output::{print_birthdays, print_view, OutputFormat};

/// tripdash - travel insights over a client roster spreadsheet
#[derive(Parser)]
#[command(name = "tripdash")]
#[command(author, version, about = "Travel dashboard for client roster spreadsheets", long_about = None)]
struct Cli {
    /// Roster spreadsheet (.xlsx or .csv)
    #[arg(short, long, env = "TRIPDASH_ROSTER", value_name = "PATH")]
    roster: Option<PathBuf>,

    /// Birthday table with one row per month
    #[arg(short, long, env = "TRIPDASH_BIRTHDAYS", value_name = "PATH")]
    birthdays: Option<PathBuf>,

    /// YAML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// View to show (destinations, clients, retirees)
    #[arg(short, long)]
    mode: Option<ViewMode>,

    /// Number of entries in rankings and charts (5-50)
    #[arg(short = 'n', long = "top")]
    top: Option<usize>,

    /// Only count destinations containing this text
    #[arg(short, long)]
    search: Option<String>,

    /// Output format (json, csv, table)
    #[arg(short = 'f', long = "format", default_value = "table")]
    format: OutputFormat,

    /// Export the displayed table as XLSX
    #[arg(short = 'o', long = "export", value_name = "PATH", num_args = 0..=1)]
    export: Option<Option<PathBuf>>,

    /// Export this month's birthdays as XLSX
    #[arg(long = "export-birthdays", value_name = "PATH")]
    export_birthdays: Option<PathBuf>,

    /// Write the chart as an HTML page
    #[arg(long = "chart-html", value_name = "PATH")]
    chart_html: Option<PathBuf>,

    /// Render as of this date (YYYY-MM-DD) instead of today
    #[arg(long, value_name = "DATE")]
    today: Option<NaiveDate>,

    /// Start REPL mode
    #[arg(short = 'i', long = "interactive")]
    interactive: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Defaults, then the config file, then flags and environment.
    fn dashboard_config(&self) -> Result<DashboardConfig> {
        let mut config = match &self.config {
            Some(path) => DashboardConfig::from_yaml_file(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?,
            None => DashboardConfig::default(),
        };

        if let Some(roster) = &self.roster {
            config.roster = Some(roster.clone());
        }
        if let Some(birthdays) = &self.birthdays {
            config.birthdays = Some(birthdays.clone());
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(top) = self.top {
            config.top_n = top;
        }
        if let Some(search) = &self.search {
            config.search = Some(search.clone());
        }
        if let Some(Some(path)) = &self.export {
            config.export_file = path.clone();
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();
    }

    let config = cli.dashboard_config()?;
    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
    let mut session = Session::new(config, today);

    if cli.interactive {
        return run_repl(&mut session, cli.format);
    }

    if let Err(e) = session.load() {
        if matches!(e, DashboardError::MissingInput(_)) {
            bail!("{e}. Pass --roster <PATH> or set TRIPDASH_ROSTER");
        }
        return Err(e.into());
    }

    let view = session.render()?;
    print_view(&view, cli.format)?;

    if cli.export.is_some() {
        session.export(&view.export_table, None)?;
    }
    if let Some(path) = &cli.export_birthdays {
        session.export(&view.birthdays.table(), Some(path.as_path()))?;
    }
    if let Some(path) = &cli.chart_html {
        write_chart_html(&view, path)?;
    }

    Ok(())
}

/// Loaded inputs plus the current view settings.
struct Session {
    config: DashboardConfig,
    view: ViewConfig,
    cache: SheetCache,
    dashboard: Option<Dashboard>,
    today: NaiveDate,
}

impl Session {
    fn new(config: DashboardConfig, today: NaiveDate) -> Self {
        Self {
            view: config.view(),
            config,
            cache: SheetCache::default(),
            dashboard: None,
            today,
        }
    }

    fn load(&mut self) -> Result<(), DashboardError> {
        self.dashboard = Some(Dashboard::load(&mut self.cache, &self.config)?);
        Ok(())
    }

    /// Point the session at another roster file. The old file's sheets are
    /// evicted so the cache holds only what is in use.
    fn switch_roster(&mut self, path: PathBuf) -> Result<(), DashboardError> {
        if let Some(old) = self.config.roster.replace(path) {
            self.cache.invalidate(&old);
        }
        self.load()
    }

    /// Drop cached sheets and read the input files again.
    fn reload(&mut self) -> Result<(), DashboardError> {
        self.cache.clear();
        self.load()
    }

    fn render(&self) -> Result<RenderedView> {
        let dashboard = self
            .dashboard
            .as_ref()
            .context("No roster loaded. Use :roster <path>")?;
        Ok(render(dashboard, &self.view, self.today))
    }

    fn export(&self, table: &DataTable, path: Option<&Path>) -> Result<()> {
        let path = path.unwrap_or(self.config.export_file.as_path());
        let bytes = write_export(table, path).with_context(|| format!("Failed to export to {}", path.display()))?;
        println!(
            "{} {} ({} rows, {bytes} bytes)",
            "Exported".green().bold(),
            path.display(),
            table.len()
        );
        Ok(())
    }
}

fn write_chart_html(view: &RenderedView, path: &Path) -> Result<()> {
    let Some(chart) = &view.chart else {
        println!("{}", "This view has no chart".yellow());
        return Ok(());
    };
    let html = chart.to_html()?;
    std::fs::write(path, html).with_context(|| format!("Failed to write chart: {}", path.display()))?;
    println!("{} {}", "Chart written to".green().bold(), path.display());
    Ok(())
}

/// A REPL command.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Show,
    Mode(ViewMode),
    Top(usize),
    Search(Option<String>),
    Export(Option<PathBuf>),
    ExportBirthdays(Option<PathBuf>),
    Birthdays,
    Roster(PathBuf),
    Reload,
    Help,
    Quit,
}

/// Parse one REPL line.
fn parse_command(line: &str) -> Result<Command, String> {
    let (name, arg) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };
    let arg = (!arg.is_empty()).then_some(arg);

    match name {
        ":show" | ":s" => Ok(Command::Show),
        ":mode" | ":m" => {
            let mode = arg.ok_or("Usage: :mode <destinations|clients|retirees>")?;
            mode.parse().map(Command::Mode).map_err(|e: DashboardError| e.to_string())
        }
        ":top" | ":n" => {
            let n = arg.ok_or("Usage: :top <n>")?;
            n.parse()
                .map(Command::Top)
                .map_err(|_| format!("Invalid number: {n}"))
        }
        ":search" => Ok(Command::Search(arg.map(str::to_string))),
        ":export" => Ok(Command::Export(arg.map(PathBuf::from))),
        ":export-birthdays" => Ok(Command::ExportBirthdays(arg.map(PathBuf::from))),
        ":birthdays" | ":b" => Ok(Command::Birthdays),
        ":roster" => arg
            .map(|p| Command::Roster(PathBuf::from(p)))
            .ok_or_else(|| "Usage: :roster <path>".to_string()),
        ":reload" => Ok(Command::Reload),
        ":help" | ":h" | ":?" => Ok(Command::Help),
        ":quit" | ":q" | ":exit" => Ok(Command::Quit),
        _ => Err(format!("Unknown command: {line}")),
    }
}

/// Run the REPL.
fn run_repl(session: &mut Session, format: OutputFormat) -> Result<()> {
    println!(
        "{} {} - Interactive Mode",
        "tripdash".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(
        "Type {} for help, {} to exit\n",
        ":help".yellow(),
        ":quit".yellow()
    );

    match session.load() {
        Ok(()) => show(session, format),
        Err(DashboardError::MissingInput(_)) => {
            println!("{}", "No roster file set. Use :roster <path>".yellow());
        }
        Err(e) => println!("{} {e}", "Error:".red().bold()),
    }

    let mut rl = DefaultEditor::new()?;
    let history_path = dirs_history_path();

    // Load history if available
    if let Some(ref path) = history_path {
        let _ = rl.load_history(path);
    }

    loop {
        let prompt = format!("{}> ", session.view.mode).green().bold().to_string();

        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                // Add to history
                let _ = rl.add_history_entry(line);

                // Bare text is a search
                let command = if line.starts_with(':') {
                    parse_command(line)
                } else {
                    Ok(Command::Search(Some(line.to_string())))
                };

                match command {
                    Ok(Command::Quit) => break,
                    Ok(command) => {
                        if let Err(e) = execute(session, command, format) {
                            println!("{} {e:#}", "Error:".red().bold());
                        }
                    }
                    Err(e) => println!("{} {e}", "Error:".red().bold()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(e) => {
                println!("{} {e}", "Error:".red().bold());
                break;
            }
        }
    }

    // Save history
    if let Some(ref path) = history_path {
        let _ = rl.save_history(path);
    }

    Ok(())
}

/// Apply a command; state changes re-render.
fn execute(session: &mut Session, command: Command, format: OutputFormat) -> Result<()> {
    match command {
        Command::Show => {}
        Command::Mode(mode) => session.view.mode = mode,
        Command::Top(n) => session.view.set_top_n(n),
        Command::Search(text) => session.view.set_search(text),
        Command::Export(path) => {
            let view = session.render()?;
            return session.export(&view.export_table, path.as_deref());
        }
        Command::ExportBirthdays(path) => {
            let view = session.render()?;
            let path = path.unwrap_or_else(|| PathBuf::from("aniversariantes.xlsx"));
            return session.export(&view.birthdays.table(), Some(path.as_path()));
        }
        Command::Birthdays => {
            let view = session.render()?;
            print_birthdays(&view.birthdays);
            return Ok(());
        }
        Command::Roster(path) => session.switch_roster(path)?,
        Command::Reload => session.reload()?,
        Command::Help => {
            print_help();
            return Ok(());
        }
        Command::Quit => return Ok(()),
    }
    show(session, format);
    Ok(())
}

fn show(session: &Session, format: OutputFormat) {
    match session.render().and_then(|view| print_view(&view, format)) {
        Ok(()) => {}
        Err(e) => println!("{} {e:#}", "Error:".red().bold()),
    }
}

/// Get the history file path.
fn dirs_history_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|mut p| {
        p.push("tripdash");
        let _ = std::fs::create_dir_all(&p);
        p.push("history.txt");
        p
    })
}

/// Print REPL help.
fn print_help() {
    println!("{}", "tripdash REPL Commands:".cyan().bold());
    println!("  {}              Show this help", ":help, :h, :?".yellow());
    println!("  {}            Exit the REPL", ":quit, :q, :exit".yellow());
    println!("  {}                    Render the current view", ":show".yellow());
    println!("  {}             Switch view (destinations, clients, retirees)", ":mode <m>".yellow());
    println!("  {}                 Set the top-N limit (5-50)", ":top <n>".yellow());
    println!("  {}       Filter destinations; no text clears it", ":search [text]".yellow());
    println!("  {}       Export the displayed table", ":export [path]".yellow());
    println!("  {} Export this month's birthdays", ":export-birthdays [path]".yellow());
    println!("  {}               Show this month's birthdays", ":birthdays".yellow());
    println!("  {}           Load another roster file", ":roster <path>".yellow());
    println!("  {}                  Read the input files again", ":reload".yellow());
    println!();
    println!("Any other text is used as a destination search.");
}
