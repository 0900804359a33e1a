use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use stackpromo_types::PromotionConfig;

#[derive(Parser)]
#[command(
    name = "stackpromo",
    about = "Promotion reports comparing the current and next image of a build stack",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML config file; environment variables override it
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Image registry endpoint (JOB_BOARD_IMAGES_URL)
    #[arg(long, global = true)]
    pub images_url: Option<String>,

    /// Base URL of metadata archives (IMAGE_METADATA_URL)
    #[arg(long, global = true)]
    pub metadata_url: Option<String>,

    /// Metadata archive cache (IMAGE_METADATA_CACHE_DIR)
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Diff executable, or `builtin` for the in-process differ (DIFF_EXE)
    #[arg(long, global = true)]
    pub diff_exe: Option<String>,
}

impl Cli {
    /// Apply command-line overrides on top of a resolved config.
    pub fn apply_overrides(&self, mut config: PromotionConfig) -> PromotionConfig {
        if let Some(url) = &self.images_url {
            config.images_url = Some(url.clone());
        }
        if let Some(url) = &self.metadata_url {
            config.metadata_url = Some(url.clone());
        }
        if let Some(dir) = &self.cache_dir {
            config.metadata_cache_dir = dir.clone();
        }
        if let Some(exe) = &self.diff_exe {
            config.diff_exe = exe.clone();
        }
        config
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compare the latest images of two groups and write the report
    Report(ReportArgs),
    /// Print the latest image tagged for a group
    Resolve(ResolveArgs),
    /// Fetch one image's metadata and show what it contains
    Inspect(InspectArgs),
}

#[derive(Args)]
pub struct ReportArgs {
    #[arg(long)]
    pub stack: String,
    /// Group whose image is currently in use
    #[arg(long, alias = "cur")]
    pub current: String,
    /// Group whose image is being promoted
    #[arg(long, alias = "nxt")]
    pub next: String,
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,
}

#[derive(Args)]
pub struct ResolveArgs {
    #[arg(long)]
    pub stack: String,
    #[arg(long)]
    pub group: String,
}

#[derive(Args)]
pub struct InspectArgs {
    pub image: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_report() {
        let cli = Cli::try_parse_from([
            "stackpromo", "report", "--stack", "ubuntu", "--current", "stable", "--next", "beta",
            "-o", "out/ubuntu",
        ])
        .unwrap();
        if let Command::Report(args) = cli.command {
            assert_eq!(args.stack, "ubuntu");
            assert_eq!(args.current, "stable");
            assert_eq!(args.next, "beta");
            assert_eq!(args.output_dir, PathBuf::from("out/ubuntu"));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_report_aliases_and_default_dir() {
        let cli = Cli::try_parse_from([
            "stackpromo", "report", "--stack", "xenial", "--cur", "edge", "--nxt", "beta",
        ])
        .unwrap();
        if let Command::Report(args) = cli.command {
            assert_eq!(args.current, "edge");
            assert_eq!(args.next, "beta");
            assert_eq!(args.output_dir, PathBuf::from("."));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn report_requires_groups() {
        assert!(Cli::try_parse_from(["stackpromo", "report", "--stack", "ubuntu"]).is_err());
    }

    #[test]
    fn parse_resolve() {
        let cli = Cli::try_parse_from([
            "stackpromo", "resolve", "--stack", "ubuntu", "--group", "stable",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Resolve(_)));
    }

    #[test]
    fn parse_inspect() {
        let cli = Cli::try_parse_from(["stackpromo", "inspect", "travis-ci-ubuntu-2"]).unwrap();
        if let Command::Inspect(args) = cli.command {
            assert_eq!(args.image, "travis-ci-ubuntu-2");
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_json_format_and_verbose() {
        let cli =
            Cli::try_parse_from(["stackpromo", "--format", "json", "-v", "inspect", "img"])
                .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.verbose);
    }

    #[test]
    fn overrides_apply_to_config() {
        let cli = Cli::try_parse_from([
            "stackpromo", "--images-url", "http://registry/images", "--diff-exe", "builtin",
            "--cache-dir", "/tmp/cache", "inspect", "img",
        ])
        .unwrap();
        let config = cli.apply_overrides(PromotionConfig::default());
        assert_eq!(config.images_url.as_deref(), Some("http://registry/images"));
        assert_eq!(config.diff_exe, "builtin");
        assert_eq!(config.metadata_cache_dir, PathBuf::from("/tmp/cache"));
        assert!(config.metadata_url.is_none());
    }
}
