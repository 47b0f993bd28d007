//! Catalog loader: seeds tags and ingredients from JSON files.
//!
//! ```bash
//! DATABASE_URL=postgres://... catalog ingredients data/ingredients.json
//! DATABASE_URL=postgres://... catalog tags data/tags.json
//! ```
//!
//! Rows that already exist are skipped, so a file can be loaded repeatedly.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use sea_orm::Database;
use serde::Deserialize;
use tracing::info;

use foodgram_api::domain::types::{NewIngredient, NewTag};
use foodgram_api::error::ApiError;
use foodgram_api::infra::db::DbCatalogRepository;
use foodgram_api::usecase::catalog::{ImportIngredientsUseCase, ImportTagsUseCase};
use foodgram_core::tracing::init_tracing;

#[derive(Parser)]
#[command(about = "Load the Foodgram tag and ingredient catalog")]
struct Args {
    /// Database URL; falls back to the DATABASE_URL env var
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load ingredients from a JSON array of {name, measurement_unit}
    Ingredients { file: PathBuf },
    /// Load tags from a JSON array of {name, color, slug}
    Tags { file: PathBuf },
}

#[derive(Deserialize)]
struct IngredientRow {
    name: String,
    measurement_unit: String,
}

#[derive(Deserialize)]
struct TagRow {
    name: String,
    color: String,
    slug: String,
}

/// Keep the database cause behind `ApiError::Internal` in the reported chain.
fn import_failed(kind: &str, err: ApiError) -> anyhow::Error {
    anyhow::Error::new(err).context(format!("{kind} import failed"))
}

fn read_rows<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let db = Database::connect(&args.database_url)
        .await
        .context("failed to connect to database")?;
    let repo = DbCatalogRepository { db };

    let (kind, report) = match args.command {
        Command::Ingredients { file } => {
            let rows: Vec<IngredientRow> = read_rows(&file)?;
            let ingredients = rows
                .into_iter()
                .map(|row| NewIngredient {
                    name: row.name,
                    measurement_unit: row.measurement_unit,
                })
                .collect();
            let report = ImportIngredientsUseCase { repo }
                .execute(ingredients)
                .await
                .map_err(|e| import_failed("ingredient", e))?;
            ("ingredients", report)
        }
        Command::Tags { file } => {
            let rows: Vec<TagRow> = read_rows(&file)?;
            let tags = rows
                .into_iter()
                .map(|row| NewTag {
                    name: row.name,
                    color: row.color,
                    slug: row.slug,
                })
                .collect();
            let report = ImportTagsUseCase { repo }
                .execute(tags)
                .await
                .map_err(|e| import_failed("tag", e))?;
            ("tags", report)
        }
    };

    info!(
        kind,
        inserted = report.inserted,
        skipped = report.skipped,
        "catalog import finished"
    );
    println!(
        "{kind}: {} inserted, {} skipped",
        report.inserted, report.skipped
    );
    Ok(())
}
