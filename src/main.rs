// src/main.rs

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use jdkindex::{conf, find_java_home, jdk_index, Configuration};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "jdkindex")]
#[command(author, version, about = "Resolve JDK builds from a cached vendor index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct IndexArgs {
    /// Target operating system (default: detected)
    #[arg(long)]
    os: Option<String>,

    /// Target architecture (default: detected)
    #[arg(long)]
    arch: Option<String>,

    /// JDK to resolve, as vendor:version, vendor, or bare version
    #[arg(short, long, default_value = "")]
    jdk: String,

    /// Index URL (must be HTTPS)
    #[arg(long, default_value = conf::DEFAULT_INDEX_URL)]
    index_url: String,

    /// Seconds before the cached index is considered stale
    #[arg(long, default_value_t = conf::DEFAULT_INDEX_TTL.as_secs())]
    index_ttl: u64,

    /// Cache directory (default: platform cache dir)
    #[arg(long)]
    cache_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available vendor:version pairs for the target platform
    Ls {
        #[command(flatten)]
        index: IndexArgs,
    },
    /// Print the exact index version matching the request
    Resolve {
        #[command(flatten)]
        index: IndexArgs,
    },
    /// Print the download URL matching the request
    Url {
        #[command(flatten)]
        index: IndexArgs,
    },
    /// Locate the Java home within an extracted archive directory
    Home {
        /// Extraction root to search
        path: PathBuf,
    },
}

/// Split a "vendor:version" request into its parts
///
/// A bare "17" or "17+" is a version with the default vendor; a bare
/// "adoptium" is a vendor with the default (newest) version.
fn parse_jdk_arg(jdk: &str) -> (Option<String>, String) {
    match jdk.split_once(':') {
        Some((vendor, version)) => (Some(vendor.to_string()), version.to_string()),
        None if jdk.is_empty() => (None, String::new()),
        None if jdk.chars().next().is_some_and(|c| c.is_ascii_digit()) => {
            (None, jdk.to_string())
        }
        None => (Some(jdk.to_string()), String::new()),
    }
}

fn build_configuration(args: &IndexArgs) -> Configuration {
    let mut config = Configuration::default();
    let (vendor, version) = parse_jdk_arg(&args.jdk);
    if let Some(vendor) = vendor {
        config.vendor = vendor;
    }
    config.version = version;
    if let Some(ref os) = args.os {
        config.os = conf::canonical_os(os);
    }
    if let Some(ref arch) = args.arch {
        config.arch = conf::canonical_arch(arch);
    }
    config.index_url = args.index_url.clone();
    config.index_ttl = Duration::from_secs(args.index_ttl);
    if let Some(ref cache_dir) = args.cache_dir {
        config.cache_dir = cache_dir.clone();
    }
    config
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ls { index } => {
            let config = build_configuration(&index);
            let idx = jdk_index(&config)?;
            for (vendor, version) in idx.available_jdks(&config.os, &config.arch) {
                println!("{vendor}:{version}");
            }
            Ok(())
        }
        Commands::Resolve { index } => {
            let config = build_configuration(&index);
            let idx = jdk_index(&config)?;
            println!("{}", idx.resolve_version(&config)?);
            Ok(())
        }
        Commands::Url { index } => {
            let config = build_configuration(&index);
            let idx = jdk_index(&config)?;
            println!("{}", idx.url(&config)?);
            Ok(())
        }
        Commands::Home { path } => {
            println!("{}", find_java_home(&path)?.display());
            Ok(())
        }
    }
}
