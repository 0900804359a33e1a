use anyhow::Context;
use colored::Colorize;
use serde::Serialize;
use stackpromo_metadata::{CachedArchiveSource, MetadataFetcher};
use stackpromo_registry::{CurlRegistryClient, ImageResolver};
use stackpromo_sdk::{
    ConfiguredPromoter, ImageName, PromotionConfig, PromotionOutcome, StackPromotion,
};
use tracing::debug;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    let format = cli.format;
    match cli.command {
        Command::Report(args) => cmd_report(&config, format, args),
        Command::Resolve(args) => cmd_resolve(&config, format, args),
        Command::Inspect(args) => cmd_inspect(&config, format, args),
    }
}

/// Defaults, then the config file, then the environment, then flags.
fn load_config(cli: &Cli) -> anyhow::Result<PromotionConfig> {
    let base = match &cli.config {
        Some(path) => PromotionConfig::from_toml_file(path)?,
        None => PromotionConfig::default(),
    };
    let config = cli.apply_overrides(base.with_overrides(|key| std::env::var(key).ok()));
    debug!(?config, "configuration loaded");
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_report(
    config: &PromotionConfig,
    format: OutputFormat,
    args: ReportArgs,
) -> anyhow::Result<()> {
    let request = StackPromotion::new(args.stack, args.current, args.next)?;
    let promoter = ConfiguredPromoter::from_config(config)?;
    let outcome = promoter
        .hydrate(&request, &args.output_dir)
        .with_context(|| format!("promotion report for stack {}", request.stack()))?;

    match format {
        OutputFormat::Json => print_json(&outcome),
        OutputFormat::Text => {
            print_outcome(&outcome);
            Ok(())
        }
    }
}

fn print_outcome(outcome: &PromotionOutcome) {
    println!(
        "{} {} → {}",
        outcome.stack.bold(),
        outcome.images.current.as_str().yellow(),
        outcome.images.next.as_str().green()
    );
    for artifact in &outcome.diff.artifacts {
        if artifact.stats.is_empty() {
            println!("  {} {}", artifact.name, "unchanged".dimmed());
        } else {
            println!(
                "  {} {} {}",
                artifact.name,
                format!("+{}", artifact.stats.additions).green(),
                format!("-{}", artifact.stats.deletions).red()
            );
        }
    }
    let env = &outcome.diff.env;
    if !env.is_empty() {
        println!(
            "  env: {} added, {} removed, {} modified",
            env.additions(),
            env.removals(),
            env.modifications()
        );
    }
    let index = &outcome.report.index;
    println!("  packer-templates:  {}", index.packer_templates_diff_url.blue());
    println!("  travis-cookbooks:  {}", index.travis_cookbooks_diff_url.blue());
    println!(
        "{} Report written to {}",
        "✓".green().bold(),
        outcome.output_dir.display()
    );
}

fn cmd_resolve(
    config: &PromotionConfig,
    format: OutputFormat,
    args: ResolveArgs,
) -> anyhow::Result<()> {
    let resolver = ImageResolver::new(CurlRegistryClient::from_config(config)?, config);
    let image = resolver.resolve(&args.stack, &args.group)?;

    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "stack": args.stack,
            "group": args.group,
            "image": image,
        })),
        OutputFormat::Text => {
            println!("{}", image.as_str().yellow());
            Ok(())
        }
    }
}

fn cmd_inspect(
    config: &PromotionConfig,
    format: OutputFormat,
    args: InspectArgs,
) -> anyhow::Result<()> {
    let image: ImageName = args.image.parse()?;
    let fetcher = MetadataFetcher::new(CachedArchiveSource::from_config(config));
    let bundle = fetcher.fetch(&image)?;

    let files: Vec<&str> = bundle.files().keys().map(|f| f.file_name()).collect();
    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "image": bundle.image(),
            "files": files,
            "env": bundle.env(),
        })),
        OutputFormat::Text => {
            println!("Image {}", bundle.image().as_str().yellow().bold());
            for name in &files {
                println!("  {} {}", "file:".green(), name);
            }
            for (key, value) in bundle.env() {
                println!("  {}={}", key.cyan(), value);
            }
            Ok(())
        }
    }
}
