use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use unity_changeset::{
    FilterOptions, FormatMode, GroupMode, OutputMode, SearchMode, get_unity_changeset,
    list_changesets,
};

const EXAMPLES: &str = "\
Examples:
  unity-changeset 2018.4.36f1
  unity-changeset list
  unity-changeset list --all --json
  unity-changeset list --version-only --min 2018.3 --max 2019.4
  unity-changeset list --version-only --grep '(2018.4|2019.4)'
  unity-changeset list --lts --latest-patch";

#[derive(Parser)]
#[command(name = "unity-changeset")]
#[command(version, about = "Find Unity changesets.", after_help = EXAMPLES)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Unity version to resolve, e.g. 2018.4.36f1
    #[arg(id = "version_arg", value_name = "VERSION")]
    version: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List Unity changesets
    List(ListArgs),
}

#[derive(Args)]
struct ListArgs {
    /// Search in all streams (alpha/beta included)
    #[arg(long, help_heading = "Search options")]
    all: bool,

    /// Search in the 'SUPPORTED' stream (including Unity 6000)
    #[arg(
        long,
        conflicts_with_all = ["all", "pre_release", "lts"],
        help_heading = "Search options"
    )]
    supported: bool,

    /// Search in the 'LTS' stream
    #[arg(
        long,
        conflicts_with_all = ["all", "supported", "pre_release"],
        help_heading = "Search options"
    )]
    lts: bool,

    /// Search in the 'ALPHA' and 'BETA' streams
    #[arg(
        long,
        visible_alias = "beta",
        conflicts_with_all = ["all", "supported", "lts"],
        help_heading = "Search options"
    )]
    pre_release: bool,

    /// Include XLTS entitlement versions (require an 'Enterprise' or
    /// 'Industry' license to install)
    #[arg(long, help_heading = "Filter options")]
    xlts: bool,

    /// Minimum version (included)
    #[arg(long, value_name = "VERSION", help_heading = "Filter options")]
    min: Option<String>,

    /// Maximum version (included)
    #[arg(long, value_name = "VERSION", help_heading = "Filter options")]
    max: Option<String>,

    /// Regular expression (e.g. '20(18|19).4.*')
    #[arg(long, value_name = "REGEX", help_heading = "Filter options")]
    grep: Option<String>,

    /// Only the latest lifecycle (default)
    #[arg(long, help_heading = "Filter options")]
    latest_lifecycle: bool,

    /// All lifecycles
    #[arg(long, conflicts_with = "latest_lifecycle", help_heading = "Filter options")]
    all_lifecycles: bool,

    /// The latest patch versions only
    #[arg(long, help_heading = "Group options")]
    latest_patch: bool,

    /// The oldest patch versions in the latest lifecycle only
    #[arg(long, conflicts_with = "latest_patch", help_heading = "Group options")]
    oldest_patch: bool,

    /// Output only the version (no changesets)
    #[arg(long, visible_alias = "versions", help_heading = "Output options")]
    version_only: bool,

    /// Output only the minor version (no changesets)
    #[arg(
        long,
        visible_alias = "minor-versions",
        conflicts_with = "version_only",
        help_heading = "Output options"
    )]
    minor_version_only: bool,

    /// Output in json format
    #[arg(long, help_heading = "Output options")]
    json: bool,

    /// Output in pretty json format
    #[arg(long, help_heading = "Output options")]
    pretty_json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    match (cli.command, cli.version) {
        (Some(Command::List(args)), _) => runtime.block_on(run_list(args)),
        (None, Some(version)) => runtime.block_on(run_resolve(&version)),
        (None, None) => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            std::process::exit(1);
        }
    }
}

async fn run_resolve(version: &str) -> anyhow::Result<()> {
    match get_unity_changeset(version).await {
        Ok(changeset) => {
            println!("{}", changeset.changeset);
            Ok(())
        }
        Err(_) => {
            eprintln!("The given version was not found.");
            std::process::exit(1);
        }
    }
}

async fn run_list(args: ListArgs) -> anyhow::Result<()> {
    let mode = if args.all {
        SearchMode::All
    } else if args.pre_release {
        SearchMode::PreRelease
    } else if args.lts {
        SearchMode::Lts
    } else if args.supported {
        SearchMode::Supported
    } else {
        SearchMode::Default
    };

    // --minor-version-only implies one record per minor version.
    let group = if args.latest_patch || args.minor_version_only {
        GroupMode::LatestPatch
    } else if args.oldest_patch {
        GroupMode::OldestPatch
    } else {
        GroupMode::All
    };

    let options = FilterOptions {
        min: args.min.unwrap_or_default(),
        max: args.max.unwrap_or_default(),
        grep: args.grep.unwrap_or_default(),
        all_lifecycles: args.all_lifecycles && !args.latest_lifecycle,
        xlts: args.xlts,
    };

    let output = if args.version_only {
        OutputMode::VersionOnly
    } else if args.minor_version_only {
        OutputMode::MinorVersionOnly
    } else {
        OutputMode::Changeset
    };

    let format = if args.json {
        FormatMode::Json
    } else if args.pretty_json {
        FormatMode::PrettyJson
    } else {
        FormatMode::None
    };

    let rendered = list_changesets(mode, &options, group, output, format).await?;
    println!("{rendered}");
    Ok(())
}
