#![forbid(unsafe_code)]
//! Praeparium command line interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use praeparium::commands::{
    execute_audit, execute_export, execute_generate, execute_post, execute_publish, execute_qa,
    output, AuditOptions, ExportOptions, GenerateOptions, PostOptions, PublishOptions, QaOptions,
};
use praeparium::export::PostStatus;
use praeparium::Config;

#[derive(Parser)]
#[command(name = "praeparium")]
#[command(about = "Preparedness article pipeline: render, write, repair, QA, audit, export")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true, default_value = praeparium::config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a bundle (.yaml) or write an article from a source pack (.json)
    BundleGenerate {
        /// Bundle or source pack file
        bundle: PathBuf,

        /// Output directory (default: paths.outputDir from config)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Output slug for source-pack articles
        #[arg(long)]
        slug: Option<String>,

        /// Registry root holding authors/ (default: paths.registryDir from config)
        #[arg(long)]
        registry: Option<PathBuf>,

        /// Directory of <kind>.md.hbs templates overriding the built-ins
        #[arg(long)]
        templates: Option<PathBuf>,
    },

    /// Run QA checks over every .md file in a directory
    QaReport {
        /// Directory to check
        #[arg(default_value = "out")]
        dir: PathBuf,

        /// Source pack enabling the claim-coverage check
        #[arg(long)]
        source_pack: Option<PathBuf>,

        /// Bundle supplying editorial targets and declared validation packs
        #[arg(long)]
        bundle: Option<PathBuf>,

        /// Domain validation pack to enable (repeatable)
        #[arg(long = "pack")]
        packs: Vec<String>,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Apply deterministic repairs to a markdown file
    Postprocess {
        /// Markdown file, rewritten in place
        file: PathBuf,

        /// Source pack with products, comparison columns and sources
        #[arg(long)]
        source_pack: Option<PathBuf>,

        /// Byline author override
        #[arg(long)]
        author: Option<String>,

        /// Append missing narrative sections
        #[arg(long)]
        scaffold: bool,

        /// Shorten long sentences
        #[arg(long)]
        simplify: bool,

        /// Show a diff without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Audit the methodology files next to a bundle
    Audit {
        /// Bundle file
        bundle: PathBuf,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export markdown to static HTML with JSON-LD
    Export {
        /// Source directory containing .md files
        #[arg(long)]
        src: PathBuf,

        /// Output directory for .html files
        #[arg(long)]
        out: PathBuf,

        /// Base site URL for the JSON-LD url
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Publish one markdown file to WordPress
    Publish {
        /// Markdown file
        file: PathBuf,

        /// Post status (draft, publish)
        #[arg(long, default_value = "draft")]
        status: String,
    },
}

fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose { "debug" } else { "warn" };

    let filter = tracing_subscriber::EnvFilter::try_from_env("PRAEPARIUM_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<bool> {
    let mut config = if cli.config.exists() {
        Config::load(&cli.config)?
    } else {
        Config::default()
    };
    config.apply_env(|key| std::env::var(key).ok());

    match cli.command {
        Commands::BundleGenerate { bundle, out, slug, registry, templates } => {
            let options = GenerateOptions {
                bundle,
                out: out.unwrap_or_else(|| config.paths.output_dir.clone()),
                slug,
                registry: registry.unwrap_or_else(|| config.paths.registry_dir.clone()),
                templates,
            };
            execute_generate(options, &config)
        }

        Commands::QaReport { dir, source_pack, bundle, packs, json } => {
            let options = QaOptions {
                dir,
                source_pack,
                bundle,
                packs,
                json,
            };
            execute_qa(options, &config)
        }

        Commands::Postprocess { file, source_pack, author, scaffold, simplify, dry_run } => {
            let options = PostOptions {
                file,
                source_pack,
                author,
                scaffold,
                simplify,
                dry_run,
            };
            execute_post(options, &config)
        }

        Commands::Audit { bundle, json } => execute_audit(AuditOptions { bundle, json }),

        Commands::Export { src, out, base_url } => {
            execute_export(ExportOptions { src, out, base_url })
        }

        Commands::Publish { file, status } => {
            let status = status
                .parse::<PostStatus>()
                .map_err(|e: String| anyhow::anyhow!(e))?;
            execute_publish(PublishOptions { file, status }, &config)
        }
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = init_tracing(cli.verbose) {
        eprintln!("{e}");
    }

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            output::fail(format!("{e:#}"));
            std::process::exit(1);
        }
    }
}
