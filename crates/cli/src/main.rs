mod config;
mod render;

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use stallbook_core::{ExportFormat, RecordId, RecordInput, RecordPatch, TagFilter, ViewQuery, codec, image};
use stallbook_engine::Catalogue;
use stallbook_storage::{SqliteStorage, Storage};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "stallbook", version, about = "Local catalogue of photographed market items")]
struct Cli {
    /// Directory holding the catalogue database (or set STALLBOOK_DATA_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a picture with its metadata
    Add(AddArgs),
    /// Change fields of an existing item; omitted fields keep their value
    Edit(EditArgs),
    /// Delete an item
    Delete(DeleteArgs),
    /// Show items, optionally filtered
    List(ListArgs),
    /// Show every tag in use
    Tags,
    /// Write the catalogue to items-<timestamp>.json or .csv
    Export(ExportArgs),
    /// Replace the catalogue with the contents of a JSON export
    Import(ImportArgs),
}

#[derive(Args)]
struct AddArgs {
    /// Image file to attach
    #[arg(long, value_name = "PATH")]
    image: PathBuf,
    #[arg(long)]
    business: Option<String>,
    #[arg(long)]
    contact_name: Option<String>,
    /// Email, phone or handle
    #[arg(long)]
    contact_info: Option<String>,
    /// What the picture is
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// Comma-separated tags
    #[arg(long)]
    tags: Option<String>,
}

#[derive(Args)]
struct EditArgs {
    id: String,
    #[arg(long)]
    business: Option<String>,
    #[arg(long)]
    contact_name: Option<String>,
    #[arg(long)]
    contact_info: Option<String>,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    tags: Option<String>,
}

#[derive(Args)]
struct DeleteArgs {
    id: String,
    /// Skip the confirmation prompt
    #[arg(long, short)]
    yes: bool,
}

#[derive(Args)]
struct ListArgs {
    /// Case-insensitive text to look for in business, contact, title or description
    #[arg(long, short)]
    query: Option<String>,
    /// Only items carrying this exact tag ("all" for no filter)
    #[arg(long, short, default_value = stallbook_core::view::ALL_TAGS)]
    tag: String,
    /// Print matching items as JSON instead of cards
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ExportArgs {
    /// json or csv
    #[arg(value_parser = ExportFormat::parse)]
    format: ExportFormat,
    /// Directory to write into (or set STALLBOOK_EXPORT_DIR; default: current directory)
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,
}

#[derive(Args)]
struct ImportArgs {
    file: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json)?;

    let out_dir = match &cli.command {
        Commands::Export(args) => args.out.clone(),
        _ => None,
    };
    let config = AppConfig::resolve(cli.data_dir, out_dir)?;
    let db_path = config.ensure_data_dir()?;
    tracing::debug!(db = %db_path.display(), "opening catalogue");
    let mut catalogue = Catalogue::open(SqliteStorage::open(db_path)?)?;

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut out = std::io::stdout();
    run(cli.command, &mut catalogue, &config, &mut input, &mut out).await
}

/// Execute one command against `catalogue`, reading confirmations from
/// `input` and writing user-facing output to `out`.
async fn run<S: Storage>(
    command: Commands,
    catalogue: &mut Catalogue<S>,
    config: &AppConfig,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Commands::Add(args) => {
            let image_data = image::read_inline(&args.image).await?;
            let record = catalogue.add(RecordInput {
                image_data: Some(image_data),
                business_name: args.business.unwrap_or_default(),
                contact_name: args.contact_name.unwrap_or_default(),
                contact_info: args.contact_info.unwrap_or_default(),
                picture_title: args.title.unwrap_or_default(),
                picture_description: args.description.unwrap_or_default(),
                tags: args.tags.unwrap_or_default(),
            })?;
            writeln!(out, "{}", record.id)?;
        }
        Commands::Edit(args) => {
            let id = RecordId::from(args.id);
            let patch = RecordPatch {
                business_name: args.business,
                contact_name: args.contact_name,
                contact_info: args.contact_info,
                picture_title: args.title,
                picture_description: args.description,
                tags: args.tags,
            };
            // every field kept: nothing to write
            let record = if patch.is_empty() {
                catalogue
                    .get(&id)
                    .cloned()
                    .with_context(|| format!("no item with id {id}"))?
            } else {
                catalogue.edit(&id, &patch)?
            };
            write!(out, "{}", render::card(&record))?;
        }
        Commands::Delete(args) => {
            let id = RecordId::from(args.id);
            if catalogue.get(&id).is_none() {
                writeln!(out, "no item with id {id}")?;
                return Ok(());
            }
            if !args.yes && !confirm("Delete this item?", input, out)? {
                writeln!(out, "kept {id}")?;
                return Ok(());
            }
            catalogue.remove(&id)?;
            writeln!(out, "deleted {id}")?;
        }
        Commands::List(args) => {
            let query = ViewQuery::new(args.query.unwrap_or_default(), TagFilter::parse(&args.tag));
            let shown = catalogue.view(&query);
            if args.json {
                let owned: Vec<_> = shown.into_iter().cloned().collect();
                writeln!(out, "{}", codec::encode_json(&owned)?)?;
            } else {
                write!(out, "{}", render::cards(&shown))?;
            }
        }
        Commands::Tags => {
            for tag in catalogue.distinct_tags() {
                writeln!(out, "{tag}")?;
            }
        }
        Commands::Export(args) => {
            let file = catalogue.export(args.format)?;
            let path = config.export_dir.join(&file.filename);
            tokio::fs::write(&path, file.contents.as_bytes())
                .await
                .with_context(|| format!("cannot write {}", path.display()))?;
            tracing::info!(path = %path.display(), records = catalogue.len(), "catalogue exported");
            writeln!(out, "{}", path.display())?;
        }
        Commands::Import(args) => {
            let text = tokio::fs::read_to_string(&args.file)
                .await
                .with_context(|| format!("cannot read {}", args.file.display()))?;
            let count = catalogue.import_json(&text)?;
            writeln!(out, "imported {count} items")?;
        }
    }

    Ok(())
}

/// Anything but "y" or "yes" (including end of input) declines.
fn confirm(question: &str, input: &mut impl BufRead, out: &mut impl Write) -> Result<bool> {
    write!(out, "{question} [y/N] ")?;
    out.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn init_tracing(json: bool) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|error| anyhow::anyhow!("failed to initialize logging: {error}"))
}
