// Binary includes library modules - some public API items are only for library consumers
#![allow(unused)]

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use clap::builder::PossibleValuesParser;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};
use tracing_subscriber::EnvFilter;

mod app;
mod config;
mod data;
mod events;
mod source;
mod ui;

use app::{App, View};
use data::{DerivedView, FilterCriteria, DEFAULT_SITE, SITES};
use source::{DataSource, FileSource, HttpSource};

#[derive(Parser, Debug)]
#[command(name = "faultwatch")]
#[command(about = "Terminal analytics dashboard for device fault data")]
struct Args {
    /// Base URL serving device.json and fault.json
    #[arg(short, long, conflicts_with_all = ["devices", "faults"])]
    url: Option<String>,

    /// Path to the device catalog JSON file
    #[arg(long)]
    devices: Option<PathBuf>,

    /// Path to the fault catalog JSON file
    #[arg(long)]
    faults: Option<PathBuf>,

    /// Path to a TOML config file (FAULTWATCH_* env vars also apply)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Refresh interval in seconds (file mode)
    #[arg(short, long)]
    refresh: Option<u64>,

    /// Initial site selection
    #[arg(short, long, value_parser = PossibleValuesParser::new(SITES))]
    site: Option<String>,

    /// Compute the derived view, write it to a JSON file, and exit
    #[arg(short, long)]
    export: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let settings = config::load(args.config.as_deref())?;

    // Command line wins over config file / environment.
    let url = args.url.or(settings.url);
    let devices_path = args
        .devices
        .or(settings.devices)
        .unwrap_or_else(|| PathBuf::from("device.json"));
    let faults_path = args
        .faults
        .or(settings.faults)
        .unwrap_or_else(|| PathBuf::from("fault.json"));
    let refresh = Duration::from_secs(args.refresh.or(settings.refresh).unwrap_or(5));

    let site = args
        .site
        .or(settings.site)
        .unwrap_or_else(|| DEFAULT_SITE.to_string());
    if !SITES.contains(&site.as_str()) {
        bail!("unknown site: {} (expected one of {:?})", site, SITES);
    }
    let criteria = FilterCriteria::for_site(&site);

    // Handle export mode (non-interactive)
    if let Some(ref export_path) = args.export {
        return export_to_file(
            url.as_deref(),
            &devices_path,
            &faults_path,
            &criteria,
            export_path,
        );
    }

    // Handle HTTP mode
    if let Some(ref base_url) = url {
        return run_with_http(base_url, criteria);
    }

    // Default: file-based mode
    run_with_files(&devices_path, &faults_path, criteria, refresh)
}

/// Run with a file-based data source
fn run_with_files(
    devices: &Path,
    faults: &Path,
    criteria: FilterCriteria,
    refresh: Duration,
) -> Result<()> {
    let source = Box::new(FileSource::new(devices, faults));
    run_tui(source, criteria, refresh)
}

/// Run with an HTTP data source
fn run_with_http(base_url: &str, criteria: FilterCriteria) -> Result<()> {
    // Build a tokio runtime for the background fetch tasks; it must
    // outlive the TUI loop.
    let rt = tokio::runtime::Runtime::new()?;
    let source = Box::new(HttpSource::spawn(rt.handle().clone(), base_url));

    // Results are pushed through a channel, so poll frequently.
    run_tui(source, criteria, Duration::from_millis(250))
}

/// Run the TUI with the given data source
fn run_tui(
    source: Box<dyn DataSource>,
    criteria: FilterCriteria,
    refresh_interval: Duration,
) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    // Create app and load initial data
    let mut app = App::new(source, criteria);
    app.poll_source();

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, refresh_interval);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    refresh_interval: Duration,
) -> Result<()> {
    let mut last_refresh = Instant::now();

    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 14;

    while app.running {
        // Draw UI
        terminal.draw(|frame| {
            let area = frame.area();

            // Check for minimum terminal size
            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered = ratatui::layout::Rect::new(0, area.height / 2 - 2, area.width, 5);
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header tiles
                Constraint::Length(1), // Tabs
                Constraint::Length(1), // Filter bar
                Constraint::Min(8),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::common::render_tabs(frame, app, chunks[1]);
            ui::common::render_filter_bar(frame, app, chunks[2]);

            // Render current view
            match app.current_view {
                View::Overview => ui::overview::render(frame, app, chunks[3]),
                View::Categories => ui::categories::render(frame, app, chunks[3]),
                View::Faults => ui::faults::render(frame, app, chunks[3]),
            }

            ui::common::render_status_bar(frame, app, chunks[4]);

            // Render detail overlay if active
            if app.show_detail_overlay {
                ui::detail::render_overlay(frame, app, area);
            }

            // Render help overlay if active
            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => {
                    // Content starts after header (1) + tabs (1) + filter
                    // bar (1) + block border/table header (2)
                    events::handle_mouse_event(app, mouse, 4);
                }
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        // Poll the source for newly arrived collections
        if last_refresh.elapsed() >= refresh_interval {
            app.poll_source();
            last_refresh = Instant::now();
        }
    }

    Ok(())
}

/// Load both catalogs, run the pipeline once, and write the derived
/// view to a JSON file
fn export_to_file(
    url: Option<&str>,
    devices_path: &Path,
    faults_path: &Path,
    criteria: &FilterCriteria,
    export_path: &Path,
) -> Result<()> {
    use std::io::Write;

    let (devices, faults) = match url {
        Some(base_url) => {
            let rt = tokio::runtime::Runtime::new()?;
            let base = base_url.trim_end_matches('/');
            rt.block_on(async {
                let client = reqwest::Client::new();
                let devices_url = format!("{}/device.json", base);
                let faults_url = format!("{}/fault.json", base);
                let devices = source::fetch_devices(&client, &devices_url);
                let faults = source::fetch_faults(&client, &faults_url);
                let (devices, faults) = tokio::try_join!(devices, faults)?;
                Ok::<_, source::SourceError>((devices, faults))
            })?
        }
        None => {
            let devices = serde_json::from_str(&std::fs::read_to_string(devices_path)?)?;
            let faults = serde_json::from_str(&std::fs::read_to_string(faults_path)?)?;
            (devices, faults)
        }
    };

    let view = DerivedView::compute(&devices, &faults, criteria);

    let export = serde_json::json!({
        "criteria": criteria,
        "summary": {
            "total_faults": view.summary.total_faults,
            "total_duration_seconds": view.summary.total_duration_seconds,
            "total_duration": view.summary.formatted_duration(),
        },
        "top_by_duration": view.top_by_duration,
        "top_by_frequency": view.top_by_frequency,
        "categories": view.categories,
    });

    let json = serde_json::to_string_pretty(&export)?;
    let mut file = std::fs::File::create(export_path)?;
    file.write_all(json.as_bytes())?;

    println!("Exported derived view to: {}", export_path.display());
    Ok(())
}
