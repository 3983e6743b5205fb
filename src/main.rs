use chrono::Local;
use clap::{Args as ClapArgs, Parser, Subcommand};
use fabric_gallery::render::page;
use fabric_gallery::sheet::{FileFetcher, Fetcher, HttpFetcher};
use fabric_gallery::{report, FilterField, FilterState, GalleryConfig, Session, LOAD_FAILED_MESSAGE};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "fabric-gallery")]
#[command(author, version, about = "Browse the fabric sample sheet as a filterable gallery")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Sheet export URL (defaults to the "Sample Fabrics" sheet)
    #[arg(long, global = true)]
    url: Option<String>,

    /// Read a saved export from disk instead of fetching
    #[arg(long, global = true, conflicts_with = "url")]
    input: Option<PathBuf>,

    /// Settling delay for text filters on the live page, in milliseconds
    #[arg(long, global = true)]
    debounce_ms: Option<u64>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only show errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a gallery snapshot (.html, .json or .csv)
    Render {
        /// Output file; format follows the extension
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory for auto-named snapshots
        #[arg(long, default_value = "fabric-gallery-reports")]
        report_dir: PathBuf,

        /// Don't prompt to open the snapshot
        #[arg(long)]
        no_open: bool,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Print the matching fabrics as a table
    List {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Print the selectable filter values as JSON
    Options,

    /// Start the live gallery in the browser
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3001")]
        port: u16,

        /// Don't open a browser window
        #[arg(long)]
        no_open: bool,
    },
}

#[derive(ClapArgs, Debug, Default)]
struct FilterArgs {
    /// Case-insensitive match on name or SKU
    #[arg(long)]
    search: Option<String>,

    #[arg(long = "type", value_name = "TYPE")]
    kind: Vec<String>,

    #[arg(long)]
    family: Vec<String>,

    #[arg(long)]
    colour: Vec<String>,

    #[arg(long)]
    band_width: Vec<String>,

    #[arg(long)]
    schedule: Vec<String>,

    #[arg(long)]
    status: Vec<String>,

    /// Hide fabrics narrower than this roll width
    #[arg(long)]
    min_roll_width: Option<f64>,
}

impl FilterArgs {
    fn to_state(&self) -> FilterState {
        let mut state = FilterState::new();
        if let Some(ref term) = self.search {
            state.set_search(term);
        }
        if let Some(width) = self.min_roll_width {
            state.set_min_roll_width(width);
        }

        let selections = [
            (FilterField::Type, &self.kind),
            (FilterField::Family, &self.family),
            (FilterField::Colour, &self.colour),
            (FilterField::BandWidth, &self.band_width),
            (FilterField::Schedule, &self.schedule),
            (FilterField::Status, &self.status),
        ];
        for (field, values) in selections {
            for value in values {
                state.select(field, value);
            }
        }

        state
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let mut config = GalleryConfig::default();
    if let Some(ref url) = args.url {
        config = config.with_sheet_url(url.clone());
    }
    if let Some(ms) = args.debounce_ms {
        config = config.with_debounce(Duration::from_millis(ms));
    }

    let mut session = match load(&args, &config) {
        Ok(session) => session,
        Err(e) => {
            error!("Error fetching or processing data: {}", e);
            eprintln!("\x1b[31m{}\x1b[0m", LOAD_FAILED_MESSAGE);
            if let Command::Render { output: Some(ref path), .. } = args.command {
                write_error_page(path);
            }
            std::process::exit(1);
        }
    };

    let result = match args.command {
        Command::Render { output, report_dir, no_open, filters } => {
            session.set_state(filters.to_state());
            render(&session, &config, output, report_dir, no_open || args.quiet)
        }
        Command::List { filters } => {
            session.set_state(filters.to_state());
            list(&session, args.quiet);
            Ok(())
        }
        Command::Options => serde_json::to_string_pretty(session.options())
            .map(|json| println!("{}", json))
            .map_err(io::Error::from),
        Command::Serve { port, no_open } => fabric_gallery::serve::start(port, session, config, !no_open),
    };

    if let Err(e) = result {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn load(args: &Args, config: &GalleryConfig) -> fabric_gallery::Result<Session> {
    let fetcher: Box<dyn Fetcher> = match args.input {
        Some(ref path) => Box::new(FileFetcher::new(path)),
        None => Box::new(HttpFetcher::new()?),
    };

    let spinner = if args.quiet {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Loading fabrics...");
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    };

    let session = Session::load(fetcher.as_ref(), config);

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    session
}

fn render(
    session: &Session,
    config: &GalleryConfig,
    output: Option<PathBuf>,
    report_dir: PathBuf,
    no_open: bool,
) -> io::Result<()> {
    let output_path = match output {
        Some(path) => path,
        None => {
            std::fs::create_dir_all(&report_dir)?;
            let timestamp = Local::now().format("%Y%m%d_%H%M%S");
            report_dir.join(format!("fabric_gallery_{}.html", timestamp))
        }
    };

    report::generate(&output_path, session, config)?;
    info!(path = %output_path.display(), visible = session.visible_count(), "snapshot written");
    eprintln!("\n\x1b[32mGallery saved: {}\x1b[0m", output_path.display());

    if !no_open {
        eprint!("\nOpen gallery in browser? [Y/n] ");
        io::stderr().flush().ok();

        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_ok() {
            let input = input.trim().to_lowercase();
            if input.is_empty() || input == "y" || input == "yes" {
                if let Err(e) = open::that(&output_path) {
                    eprintln!("Failed to open gallery: {}", e);
                }
            }
        }
    }

    Ok(())
}

/// Leave the failure message where the snapshot would have gone
fn write_error_page(path: &Path) {
    let is_html = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("htm"))
        .unwrap_or(false);
    if !is_html {
        return;
    }

    let result = std::fs::File::create(path).and_then(|mut file| page::write_error(&mut file));
    if let Err(e) = result {
        error!("Failed to write error page: {}", e);
    }
}

fn list(session: &Session, quiet: bool) {
    let visible = session.visible();

    if !quiet {
        eprintln!("\x1b[1mFabric Gallery\x1b[0m");
        eprintln!("{}", "─".repeat(90));
    }

    println!(
        "{:<12} {:<28} {:<12} {:<12} {:>6} {:>6}  {}",
        "SKU", "NAME", "TYPE", "COLOUR", "BAND", "ROLL", "STATUS"
    );
    for (_, r) in &visible {
        let (color, reset) = if r.is_low_stock() { ("\x1b[33m", "\x1b[0m") } else { ("", "") };
        println!(
            "{}{:<12} {:<28} {:<12} {:<12} {:>6} {:>6}  {}{}",
            color,
            truncate(&r.sku, 12),
            truncate(r.display_name(), 28),
            truncate(&r.kind, 12),
            truncate(&r.colour, 12),
            truncate(&r.band_width_text, 6),
            truncate(&r.roll_width, 6),
            r.ordering_status,
            reset
        );
    }

    if !quiet {
        let summary = report::Summary::from_session(session);
        eprintln!("\n{}", "─".repeat(90));
        eprintln!("\x1b[1mSummary:\x1b[0m");
        eprintln!("  Showing:      {}", summary.headline());
        eprintln!("  \x1b[33mLow stock:\x1b[0m    {}", summary.low_stock);
        if summary.without_image > 0 {
            eprintln!("  \x1b[90mNo image:\x1b[0m     {}", summary.without_image);
        }
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
