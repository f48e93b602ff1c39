//! DocSleuth — read-only Markdown documentation browser.
//!
//! Thin binary entry point. All logic lives in the `docsleuth-core`
//! and `docsleuth-gui` crates.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use docsleuth_core::config::resolve_docs_root_from_cwd;
use docsleuth_core::export;
use docsleuth_core::{load_catalog, LoaderConfig};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docsleuth")]
#[command(version, about = "Index a Markdown documentation folder and browse it as a tree")]
struct Cli {
    /// Documents root (defaults to ./docs, then the current directory)
    #[arg(env = "DOCS_DIR")]
    path: Option<PathBuf>,

    /// Print the flat document listing and exit
    #[arg(long, conflicts_with = "tree")]
    list: bool,

    /// Print the document tree and exit
    #[arg(long)]
    tree: bool,

    /// Output format for --list / --tree
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Include hidden files and directories
    #[arg(long)]
    show_hidden: bool,

    /// Include directories that are ignored by default (node_modules, target, ...)
    #[arg(long)]
    show_ignored: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Csv,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    check_output_mode(&cli)?;

    // Logs go to stderr so headless output stays machine-readable.
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    let root = resolve_docs_root_from_cwd(cli.path.as_deref())
        .context("could not determine the documents root")?;
    let config = LoaderConfig::new(root)
        .with_show_hidden(cli.show_hidden)
        .with_show_ignored(cli.show_ignored);

    if cli.list || cli.tree {
        return run_headless(&cli, &config);
    }

    run_gui(config)
}

/// Reject format/mode combinations before any loading starts.
fn check_output_mode(cli: &Cli) -> Result<()> {
    if !(cli.list || cli.tree) && cli.format != OutputFormat::Text {
        bail!("--format requires --list or --tree");
    }
    if cli.tree && cli.format == OutputFormat::Csv {
        bail!("CSV output is only available for --list");
    }
    Ok(())
}

/// Print the listing or the tree to stdout.
fn run_headless(cli: &Cli, config: &LoaderConfig) -> Result<()> {
    let catalog = load_catalog(config)
        .with_context(|| format!("failed to load {}", config.root.display()))?;
    for entry in &catalog.skipped {
        tracing::warn!("Skipped {}: {}", entry.path.display(), entry.reason);
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if cli.list {
        match cli.format {
            OutputFormat::Text => {
                out.write_all(export::render_listing_text(&catalog.documents).as_bytes())?
            }
            OutputFormat::Json => writeln!(out, "{}", export::listing_to_json(&catalog)?)?,
            OutputFormat::Csv => export::write_listing_csv(&catalog.documents, &mut out)?,
        }
    } else {
        let forest = catalog.tree().context("could not build the document tree")?;
        match cli.format {
            OutputFormat::Text => out.write_all(export::render_tree_text(&forest).as_bytes())?,
            OutputFormat::Json => writeln!(out, "{}", export::tree_to_json(&forest)?)?,
            OutputFormat::Csv => bail!("CSV output is only available for --list"),
        }
    }

    out.flush()?;
    Ok(())
}

fn run_gui(config: LoaderConfig) -> Result<()> {
    tracing::info!("DocSleuth starting on {}", config.root.display());

    let icon = docsleuth_gui::icon::generate_icon(64);

    // Start the load before opening the window so the first frame already
    // has progress to show.
    let state = docsleuth_gui::DocSleuthState::build(config);

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("DocSleuth -- Documentation Browser")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 500.0])
            .with_icon(icon),
        ..Default::default()
    };

    eframe::run_native(
        "DocSleuth",
        options,
        Box::new(|cc| {
            Ok(Box::new(docsleuth_gui::DocSleuthApp::with_state(
                cc, state,
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {e}"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("docsleuth").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_tree_csv_is_rejected_before_loading() {
        // The root does not exist: the mode check must fail first.
        let cli = parse(&["/no/such/docs", "--tree", "--format", "csv"]);
        let err = check_output_mode(&cli).unwrap_err();
        assert!(err.to_string().contains("only available for --list"), "{err}");
    }

    #[test]
    fn test_format_without_mode_is_rejected() {
        let cli = parse(&["--format", "json"]);
        assert!(check_output_mode(&cli).is_err());
    }

    #[test]
    fn test_valid_modes_pass() {
        for args in [
            &["--list", "--format", "csv"][..],
            &["--list", "--format", "json"],
            &["--tree", "--format", "json"],
            &["--tree"],
            &[],
        ] {
            assert!(check_output_mode(&parse(args)).is_ok(), "{args:?}");
        }
    }

    #[test]
    fn test_list_conflicts_with_tree() {
        assert!(Cli::try_parse_from(["docsleuth", "--list", "--tree"]).is_err());
    }
}
