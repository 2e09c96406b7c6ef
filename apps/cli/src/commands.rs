//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use dictbuilder_core::merge::{MergeConfig, MergeResult, merge_lexicons};
use dictbuilder_core::pipeline::{
    ExtractConfig, ExtractResult, ProgressReporter, extract_dictionary,
};
use dictbuilder_shared::{
    AppConfig, DictPaths, book_registry, config_to_toml, init_config, load_config,
    load_config_from, lookup_book,
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// dictbuilder — build combined Kindle dictionaries from GCIDE.
#[derive(Parser)]
#[command(
    name = "dictbuilder",
    version,
    about = "Convert GCIDE XML into a tab-delimited lexicon and merge it with book character lists.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Dictionaries root directory (overrides the config file).
    #[arg(long, global = true, env = "DICTBUILDER_ROOT")]
    pub root: Option<PathBuf>,

    /// Config file to use instead of ~/.dictbuilder/dictbuilder.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print the run summary as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Extract the GCIDE letter files into a tab-delimited lexicon.
    Extract {
        /// Directory holding gcide_<letter>.xml (defaults to <root>/gcide_xml-0.53/gcide_xml-0.53).
        input: Option<PathBuf>,

        /// Output lexicon file (defaults to <root>/gcide/gcide.txt).
        output: Option<PathBuf>,
    },

    /// Merge the lexicon with a book's character list.
    Merge {
        /// Book folder identifier (see `dictbuilder books`).
        book: String,
    },

    /// List known book folders.
    Books,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "dictbuilder=info",
        1 => "dictbuilder=debug",
        _ => "dictbuilder=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(cli.config.as_deref())?;
    let paths = DictPaths::resolve(&config, cli.root.as_deref());

    match cli.command {
        Command::Extract { input, output } => {
            cmd_extract(&paths, input.as_deref(), output.as_deref(), cli.json)
        }
        Command::Merge { book } => cmd_merge(&config, &paths, &book, cli.json),
        Command::Books => cmd_books(&config, &paths, cli.json),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(&config),
        },
    }
}

/// Explicit `--config` must exist; the default location is optional.
fn resolve_config(explicit: Option<&Path>) -> Result<AppConfig> {
    let config = match explicit {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_extract(
    paths: &DictPaths,
    input: Option<&Path>,
    output: Option<&Path>,
    json: bool,
) -> Result<()> {
    let config = ExtractConfig::from_paths(paths, input, output);

    info!(
        input = %config.input_dir.display(),
        output = %config.output_path.display(),
        "extracting GCIDE dictionary"
    );

    let reporter = CliProgress::new(json);
    let result = extract_dictionary(&config, &reporter);
    reporter.clear();
    let result = result?;

    if json {
        print_json(&extract_summary(&result))?;
        return Ok(());
    }

    println!();
    println!("  Lexicon written!");
    println!("  Entries: {}", result.entry_count);
    println!("  Files:   {}", result.files.len());
    println!("  Skipped: {} blocks", result.skipped);
    println!("  Path:    {}", result.output.path.display());
    println!("  SHA-256: {}", result.output.sha256);
    println!("  Time:    {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

fn cmd_merge(config: &AppConfig, paths: &DictPaths, book_id: &str, json: bool) -> Result<()> {
    let book = lookup_book(config, book_id)?;
    let merge_config = MergeConfig::for_book(paths, &book, &config.merge.tag);

    info!(
        book = %book.id,
        lexicon = %merge_config.lexicon_path.display(),
        characters = %merge_config.supplement_path.display(),
        "merging character list"
    );

    let result = merge_lexicons(&merge_config)?;

    if json {
        print_json(&merge_summary(&book.id, &result))?;
        return Ok(());
    }

    println!();
    println!("  Combined dictionary written!");
    println!("  Book:       {}", book.id);
    println!("  Dictionary: {} lines", result.counts.base_lines);
    println!(
        "  Characters: {} lines ({} untagged)",
        result.counts.tagged + result.counts.untagged,
        result.counts.untagged
    );
    println!("  Path:       {}", result.output.path.display());
    println!("  SHA-256:    {}", result.output.sha256);
    println!();

    Ok(())
}

fn cmd_books(config: &AppConfig, paths: &DictPaths, json: bool) -> Result<()> {
    let books = book_registry(config);

    if json {
        let list: Vec<serde_json::Value> = books
            .iter()
            .map(|b| {
                serde_json::json!({
                    "id": b.id,
                    "characters": paths.characters_path(b),
                    "output": paths.combined_path(b),
                })
            })
            .collect();
        print_json(&serde_json::Value::Array(list))?;
        return Ok(());
    }

    for book in &books {
        println!("{}", book.id);
        println!("  characters: {}", paths.characters_path(book).display());
        println!("  output:     {}", paths.combined_path(book).display());
    }

    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    print!("{}", config_to_toml(config)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// JSON summaries
// ---------------------------------------------------------------------------

fn extract_summary(result: &ExtractResult) -> serde_json::Value {
    serde_json::json!({
        "entries": result.entry_count,
        "files": result.files,
        "blocks": result.blocks,
        "skipped": result.skipped,
        "output": result.output.path,
        "sha256": result.output.sha256,
        "size_bytes": result.output.size_bytes,
        "elapsed_ms": elapsed_ms(result.elapsed),
    })
}

fn merge_summary(book: &str, result: &MergeResult) -> serde_json::Value {
    serde_json::json!({
        "book": book,
        "base_lines": result.counts.base_lines,
        "tagged": result.counts.tagged,
        "untagged": result.counts.untagged,
        "blank_skipped": result.counts.blank_skipped,
        "output": result.output.path,
        "sha256": result.output.sha256,
        "size_bytes": result.output.size_bytes,
        "elapsed_ms": elapsed_ms(result.elapsed),
    })
}

/// Whole milliseconds, saturating at `u64::MAX`.
fn elapsed_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    let text =
        serde_json::to_string_pretty(value).map_err(|e| eyre!("failed to render summary: {e}"))?;
    println!("{text}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    /// Hidden when the summary goes to stdout as JSON.
    fn new(hidden: bool) -> Self {
        if hidden {
            return Self {
                spinner: ProgressBar::hidden(),
            };
        }

        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(style);
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self { spinner }
    }

    fn clear(&self) {
        self.spinner.finish_and_clear();
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn file_processed(&self, path: &Path, current: usize, total: usize) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.spinner
            .set_message(format!("Processing [{current}/{total}] {name}"));
    }

    fn done(&self) {
        self.spinner.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn extract_positionals_are_optional() {
        let cli = Cli::try_parse_from(["dictbuilder", "extract"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Extract {
                input: None,
                output: None
            }
        ));

        let cli = Cli::try_parse_from(["dictbuilder", "extract", "xml", "out.txt"]).unwrap();
        match cli.command {
            Command::Extract { input, output } => {
                assert_eq!(input, Some(PathBuf::from("xml")));
                assert_eq!(output, Some(PathBuf::from("out.txt")));
            }
            _ => panic!("expected extract"),
        }
    }

    #[test]
    fn merge_requires_book() {
        assert!(Cli::try_parse_from(["dictbuilder", "merge"]).is_err());

        let cli = Cli::try_parse_from(["dictbuilder", "merge", "speaker-for-the-dead", "--json"])
            .unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Command::Merge { ref book } if book == "speaker-for-the-dead"));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli =
            Cli::try_parse_from(["dictbuilder", "books", "--root", "/data", "-vv"]).unwrap();
        assert_eq!(cli.root, Some(PathBuf::from("/data")));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn elapsed_ms_saturates_instead_of_truncating() {
        assert_eq!(elapsed_ms(Duration::from_millis(1_500)), 1_500);
        assert_eq!(elapsed_ms(Duration::MAX), u64::MAX);
    }
}
