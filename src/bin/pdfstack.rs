//! CLI binary for pdfstack.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdfstack::config::{
    DEFAULT_COMPOSITES_DIR, DEFAULT_DPI, DEFAULT_GROUP_SIZE, DEFAULT_INPUT, DEFAULT_PAGES_DIR,
};
use pdfstack::{
    convert, inspect, ConversionConfig, ConversionProgressCallback, PngCompression,
    ProgressCallback,
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback ────────────────────────────────────────────────────

/// Prints one "saved" line per composite and, when enabled, drives a
/// progress bar over pages and then over groups.
struct CliProgressCallback {
    bar: Option<ProgressBar>,
}

impl CliProgressCallback {
    fn new(show_bar: bool) -> Arc<Self> {
        let bar = show_bar.then(|| {
            let bar = ProgressBar::new(0);
            bar.set_style(
                ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner())
                    .tick_strings(TICKS),
            );
            bar.set_prefix("Preparing");
            bar.set_message("Opening PDF…");
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        });
        Arc::new(Self { bar })
    }

    fn activate_bar(bar: &ProgressBar, prefix: &'static str, total: usize, unit: &str) {
        let style = ProgressStyle::with_template(&format!(
            "{{spinner:.cyan}} {{prefix:.bold}}  \
             [{{bar:42.green/238}}] {{pos:>3}}/{{len}} {unit}  \
             ⏱ {{elapsed_precise}}  ETA {{eta_precise}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        bar.set_length(total as u64);
        bar.set_position(0);
        bar.set_style(style);
        bar.set_prefix(prefix);
        bar.reset_eta();
    }

    fn line(&self, msg: String) {
        match self.bar {
            Some(ref bar) => bar.println(msg),
            None => println!("{msg}"),
        }
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total_pages: usize) {
        if let Some(ref bar) = self.bar {
            Self::activate_bar(bar, "Rendering", total_pages, "pages");
        }
        self.line(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("{total_pages} pages to render"))
        ));
    }

    fn on_page_written(&self, page_num: usize, _total_pages: usize, _path: &Path) {
        if let Some(ref bar) = self.bar {
            bar.set_message(format!("page {page_num}"));
            bar.inc(1);
        }
    }

    fn on_composite_written(&self, group_num: usize, total_groups: usize, path: &Path) {
        if let Some(ref bar) = self.bar {
            if group_num == 1 {
                Self::activate_bar(bar, "Stacking", total_groups, "composites");
            }
            bar.inc(1);
        }
        self.line(format!(
            "  {} Composite saved: {}",
            green("✓"),
            path.display()
        ));
    }

    fn on_conversion_complete(&self, _total_pages: usize, _total_groups: usize) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Defaults: ton_fichier.pdf → images_pages/ + images_concatenees/
  pdfstack

  # Another file, pages stacked two at a time
  pdfstack report.pdf --group-size 2

  # Lower resolution, custom output directories
  pdfstack scan.pdf --dpi 300 --pages-dir out/pages --output-dir out/strips

  # Inspect PDF metadata only
  pdfstack --inspect-only report.pdf

  # Machine-readable run report
  pdfstack report.pdf --json > run.json

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH         Path to libpdfium (file or directory)
  RUST_LOG                Override the log filter (e.g. pdfstack=debug)
"#;

/// Rasterise PDF pages and stack them into tall PNG strips.
#[derive(Parser, Debug)]
#[command(
    name = "pdfstack",
    version,
    about = "Rasterise PDF pages to PNG and stack them into tall composite images",
    long_about = "Render every page of a PDF to a PNG at high resolution, then paste \
consecutive pages top to bottom onto a white canvas, one composite per group.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF file to rasterise.
    #[arg(env = "PDFSTACK_INPUT", default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Directory for per-page PNGs.
    #[arg(long, env = "PDFSTACK_PAGES_DIR", default_value = DEFAULT_PAGES_DIR)]
    pages_dir: PathBuf,

    /// Directory for stacked composite PNGs.
    #[arg(short, long, env = "PDFSTACK_OUTPUT_DIR", default_value = DEFAULT_COMPOSITES_DIR)]
    output_dir: PathBuf,

    /// Rendering DPI (72–1200).
    #[arg(long, env = "PDFSTACK_DPI", default_value_t = DEFAULT_DPI,
          value_parser = clap::value_parser!(u32).range(72..=1200))]
    dpi: u32,

    /// Pages per composite.
    #[arg(short, long, env = "PDFSTACK_GROUP_SIZE", default_value_t = DEFAULT_GROUP_SIZE as u64,
          value_parser = clap::value_parser!(u64).range(1..))]
    group_size: u64,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDFSTACK_PASSWORD")]
    password: Option<String>,

    /// Cap the longest rendered edge at this many pixels.
    #[arg(long, env = "PDFSTACK_MAX_PIXELS")]
    max_pixels: Option<u32>,

    /// PNG compression for page files.
    #[arg(long, env = "PDFSTACK_PAGE_COMPRESSION", value_enum, default_value = "default")]
    page_compression: CompressionArg,

    /// PNG compression for composites.
    #[arg(long, env = "PDFSTACK_COMPOSITE_COMPRESSION", value_enum, default_value = "best")]
    composite_compression: CompressionArg,

    /// Path to libpdfium (file or directory).
    #[arg(long, env = "PDFSTACK_PDFIUM_LIB")]
    pdfium_lib: Option<PathBuf>,

    /// Print PDF metadata only, no rendering.
    #[arg(long)]
    inspect_only: bool,

    /// Print a JSON run report (or metadata with --inspect-only) on stdout.
    #[arg(long, env = "PDFSTACK_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDFSTACK_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDFSTACK_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDFSTACK_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum CompressionArg {
    Fast,
    Default,
    Best,
}

impl From<CompressionArg> for PngCompression {
    fn from(v: CompressionArg) -> Self {
        match v {
            CompressionArg::Fast => PngCompression::Fast,
            CompressionArg::Default => PngCompression::Default,
            CompressionArg::Best => PngCompression::Best,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar and status lines cover what the user needs; library
    // INFO logs only show up when the bar is off or with -v.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress || cli.json {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let meta = inspect(&cli.input, cli.password.as_deref(), cli.pdfium_lib.as_deref())
            .context("Failed to inspect PDF")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&meta).context("Failed to serialize metadata")?
            );
        } else {
            println!("File:         {}", cli.input.display());
            if let Some(ref t) = meta.title {
                println!("Title:        {}", t);
            }
            if let Some(ref a) = meta.author {
                println!("Author:       {}", a);
            }
            if let Some(ref s) = meta.subject {
                println!("Subject:      {}", s);
            }
            println!("Pages:        {}", meta.page_count);
            println!("PDF Version:  {}", meta.pdf_version);
            if let Some(ref p) = meta.producer {
                println!("Producer:     {}", p);
            }
            if let Some(ref c) = meta.creator {
                println!("Creator:      {}", c);
            }
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let status_lines = !cli.quiet && !cli.json;
    let progress_cb: Option<ProgressCallback> = status_lines
        .then(|| CliProgressCallback::new(show_progress) as Arc<dyn ConversionProgressCallback>);

    let config = build_config(&cli, progress_cb)?;

    // ── Run ──────────────────────────────────────────────────────────────
    if status_lines {
        println!("Converting PDF to images…");
    }

    let output = convert(&config).context("Conversion failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else if status_lines {
        println!("Processing complete.");
        eprintln!(
            "   {} pages → {}  /  {} composites → {}  {}",
            output.stats.total_pages,
            bold(&config.pages_dir.display().to_string()),
            output.stats.total_groups,
            bold(&config.composites_dir.display().to_string()),
            dim(&format!("{}ms", output.stats.total_duration_ms)),
        );
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let group_size = usize::try_from(cli.group_size).context("Group size is too large")?;

    let mut builder = ConversionConfig::builder()
        .input(&cli.input)
        .pages_dir(&cli.pages_dir)
        .composites_dir(&cli.output_dir)
        .dpi(cli.dpi)
        .group_size(group_size)
        .page_compression(cli.page_compression.into())
        .composite_compression(cli.composite_compression.into());

    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd);
    }
    if let Some(px) = cli.max_pixels {
        builder = builder.max_rendered_pixels(px);
    }
    if let Some(ref lib) = cli.pdfium_lib {
        builder = builder.pdfium_lib_path(lib);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
