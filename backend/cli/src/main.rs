mod render;
mod steps;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use bespoke::{Bespoke, Deck, LoadReport};
use bespoke_config::{
    load_config_value, prepare, validate_with_plugins, BespokeConfig, DeckSpec, ValidationReport,
};
use bespoke_logging::{init_logger, DeckEventLogger, LoggerSettings};

use render::{render_table, DeckSnapshot};
use steps::Step;

/// How long `run` waits for deferred event deliveries before printing.
const DRAIN_DELAY: Duration = Duration::from_millis(50);

#[derive(Parser)]
#[command(name = "bespoke")]
#[command(about = "Bespoke: build slide decks from a config file and step through them")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build every configured deck, replay navigation steps and print the result
    Run {
        /// Path to a YAML or JSON config file
        #[arg(short, long)]
        config: PathBuf,

        /// Navigation step broadcast to every deck: next, prev or a slide index
        #[arg(short, long = "step")]
        steps: Vec<Step>,

        /// Print decks as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Check a config file and print every error and warning
    Validate {
        /// Path to a YAML or JSON config file
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, steps, json } => run(&config, &steps, json).await,
        Commands::Validate { config } => validate_cmd(&config).await,
    }
}

async fn load(path: &Path) -> Result<BespokeConfig> {
    prepare(load_config_value(path).await?)
        .with_context(|| format!("Failed to prepare config: {}", path.display()))
}

async fn run(path: &Path, steps: &[Step], json: bool) -> Result<()> {
    let config = load(path).await?;
    init_logger(
        &LoggerSettings::new(&config.logging.level)
            .json(config.logging.json)
            .dir(config.logging.dir.as_deref()),
    );

    let bespoke = Bespoke::with_document(config.build_document());
    let report = validate_with_plugins(&config, bespoke.plugins());
    for warning in &report.warnings {
        warn!(path = %warning.path, "{}", warning.message);
    }
    if !report.is_valid() {
        bail!(
            "config {} has {} error(s); run `bespoke validate` for details",
            path.display(),
            report.errors.len()
        );
    }

    DeckEventLogger::attach(&bespoke);

    for (i, spec) in config.decks.iter().enumerate() {
        build_deck(&bespoke, spec).with_context(|| format!("Failed to build decks[{i}]"))?;
    }
    info!(decks = bespoke.decks().len(), "decks ready");

    for step in steps {
        let moved = step.apply(&bespoke);
        info!(%step, moved, "step replayed");
    }
    tokio::time::sleep(DRAIN_DELAY).await;

    let snapshots: Vec<DeckSnapshot> =
        bespoke.decks().iter().map(DeckSnapshot::capture).collect();
    if json {
        println!("{}", serde_json::to_string_pretty(&snapshots)?);
    } else {
        print!("{}", render_table(&snapshots));
    }
    Ok(())
}

/// Build one configured deck; the flavor picks the shorthand factory.
/// Plugins that were skipped or failed are logged.
fn build_deck(bespoke: &Bespoke, spec: &DeckSpec) -> Result<(Deck, LoadReport)> {
    let container = spec.container.as_str();
    let options = spec.plugins.clone();
    let (deck, report) = match &spec.flavor {
        Some(flavor) => bespoke.shorthand(flavor).from_selecting_with_report(
            container,
            spec.slide_selector(),
            options,
        )?,
        None => bespoke.from_selecting_with_report(container, spec.slide_selector(), options)?,
    };
    for name in &report.missing {
        warn!(deck = deck.id(), plugin = %name, "plugin is not registered; skipped");
    }
    for failure in &report.failed {
        warn!(deck = deck.id(), plugin = %failure.plugin, error = %failure.error, "plugin failed");
    }
    Ok((deck, report))
}

async fn validate_cmd(path: &Path) -> Result<()> {
    let config = load(path).await?;
    let report = validate_with_plugins(&config, Bespoke::new().plugins());
    print_report(path, &report);
    if !report.is_valid() {
        bail!("{} error(s) found", report.errors.len());
    }
    Ok(())
}

fn print_report(path: &Path, report: &ValidationReport) {
    for error in &report.errors {
        println!("error   {}: {}", error.path, error.message);
    }
    for warning in &report.warnings {
        println!("warning {}: {}", warning.path, warning.message);
    }
    println!(
        "{}: {} error(s), {} warning(s)",
        path.display(),
        report.errors.len(),
        report.warnings.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use bespoke::Element;

    fn spec(yaml: &str) -> DeckSpec {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn registry() -> Bespoke {
        let article = Element::new("article");
        for _ in 0..3 {
            article.append_child(Element::new("section"));
        }
        let body = Element::new("body");
        body.append_child(article);
        Bespoke::with_document(body)
    }

    #[test]
    fn build_deck_reports_unresolved_plugins() {
        let bespoke = registry();
        bespoke.plugins().register("keys", |_deck, _config| Ok(()));
        bespoke.plugins().register("broken", |_deck, _config| anyhow::bail!("no keyboard"));

        let (deck, report) = build_deck(
            &bespoke,
            &spec("{container: article, flavor: horizontal, plugins: {keys: true, broken: true}}"),
        )
        .unwrap();
        assert_eq!(deck.len(), 3);
        assert_eq!(report.applied, vec!["keys".to_string()]);
        assert_eq!(report.missing, vec!["horizontal".to_string()]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].plugin, "broken");
    }

    #[test]
    fn build_deck_without_flavor_honours_slide_tag() {
        let bespoke = registry();
        let (deck, report) =
            build_deck(&bespoke, &spec("{container: article, slides: aside}")).unwrap();
        assert!(deck.is_empty());
        assert!(report.is_clean());
        assert!(build_deck(&bespoke, &spec("{container: '#nowhere'}")).is_err());
    }
}
