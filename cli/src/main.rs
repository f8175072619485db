use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use schema_merge_core::loader::{read_bundle, Extracted};
use schema_merge_core::{convert, load_schemas, sync, MergeOptions, SchemaBundle};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "schema-merge")]
#[command(about = "Merge JSON Schema bundles into the components of an OpenAPI document")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to debug)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Update components.schemas of an OpenAPI document from bundle files
    Merge {
        /// Directory containing *.schema.strict.bundle.{json,yaml} files
        #[arg(long, default_value = "openapi/jsonschema")]
        schema_dir: PathBuf,

        /// OpenAPI document to update in place
        #[arg(long, default_value = "openapi/openapi.yaml")]
        openapi: PathBuf,

        /// Only accept bundles from this namespace
        #[arg(long)]
        namespace: Option<String>,

        /// Extension appended to the document name for the backup copy
        #[arg(long)]
        backup_extension: Option<String>,

        /// Report what would change without writing anything
        #[arg(long)]
        dry_run: bool,

        /// JSON file with merge options (flags take precedence)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Convert one JSON Schema file to the OpenAPI schema dialect
    Convert {
        /// Input schema or bundle file (.json, .yaml, .yml)
        input: PathBuf,

        /// Output file (defaults to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Convert the whole document instead of its first $defs entry
        #[arg(long)]
        root: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },

    /// List the schemas a bundle directory would contribute
    Inspect {
        /// Directory containing bundle files
        #[arg(long, default_value = "openapi/jsonschema")]
        schema_dir: PathBuf,

        /// Only accept bundles from this namespace
        #[arg(long)]
        namespace: Option<String>,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputFormat {
    Pretty,
    Compact,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for output
    let log_level = if cli.verbose {
        LevelFilter::DEBUG
    } else if cli.quiet {
        LevelFilter::WARN
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Merge {
            schema_dir,
            openapi,
            namespace,
            backup_extension,
            dry_run,
            config,
        } => {
            let mut options = match config {
                Some(path) => read_options(&path)?,
                None => MergeOptions::default(),
            };
            if namespace.is_some() {
                options.namespace = namespace;
            }
            if let Some(ext) = backup_extension {
                options.backup_extension = ext;
            }
            options.dry_run |= dry_run;

            tracing::info!(
                schema_dir = %schema_dir.display(),
                openapi = %openapi.display(),
                "updating OpenAPI schemas"
            );

            let outcome = sync(&schema_dir, &openapi, &options)
                .map_err(|e| anyhow::Error::from(e).context("Error updating OpenAPI spec"))?;

            if outcome.written {
                println!("Updated OpenAPI spec:");
            } else {
                println!("Dry run, OpenAPI spec not written:");
            }
            println!("{}", outcome.merge);
        }
        Commands::Convert {
            input,
            output,
            root,
            format,
        } => {
            let document = read_bundle(&input)
                .map_err(|e| anyhow::Error::from(e).context("Failed to load schema"))?;

            let schema = if root {
                document
            } else {
                let filename = input.display().to_string();
                match SchemaBundle::new(filename, document).extract() {
                    Extracted::Definition { schema, .. } => schema,
                    Extracted::Root(schema) => schema,
                    Extracted::Empty => {
                        bail!("No definitions found in $defs for {}", input.display())
                    }
                }
            };

            write_json(&convert(&schema), output.as_ref(), format)?;
        }
        Commands::Inspect {
            schema_dir,
            namespace,
        } => {
            let options = MergeOptions {
                namespace,
                ..MergeOptions::default()
            };
            let loaded = load_schemas(&schema_dir, &options)
                .map_err(|e| anyhow::Error::from(e).context("Failed to read schema directory"))?;

            let mut stdout = BufWriter::new(io::stdout());
            for (name, schema) in &loaded.schemas {
                let source = schema
                    .source
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let origin = if schema.from_root { "root" } else { "$defs" };
                writeln!(stdout, "{name}\t{origin}\t{source}")?;
            }
            stdout.flush()?;

            let report = &loaded.report;
            eprintln!(
                "{} loaded, {} duplicates, {} unmatched, {} empty, {} failed",
                report.loaded, report.duplicates, report.unmatched, report.empty, report.failed
            );

            if loaded.is_empty() {
                bail!("No schemas loaded from {}", schema_dir.display());
            }
        }
    }

    Ok(())
}

fn read_options(path: &Path) -> Result<MergeOptions> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open config file: {}", path.display()))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse config from: {}", path.display()))
}

fn write_json<T: serde::Serialize>(
    val: &T,
    path: Option<&PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let mut writer: Box<dyn Write> = if let Some(p) = path {
        let file = File::create(p)
            .with_context(|| format!("Failed to create output file: {}", p.display()))?;
        Box::new(BufWriter::new(file))
    } else {
        Box::new(BufWriter::new(io::stdout()))
    };

    match format {
        OutputFormat::Pretty => {
            serde_json::to_writer_pretty(&mut writer, val).context("Failed to write JSON")?;
        }
        OutputFormat::Compact => {
            serde_json::to_writer(&mut writer, val).context("Failed to write JSON")?;
        }
    }

    writeln!(writer).context("Failed to write trailing newline")?;
    writer.flush().context("Failed to flush output")?;

    Ok(())
}
