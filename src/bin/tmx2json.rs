use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tmx_pipeline::{writer, CellOrder, ImportSettings, Map, PropertyPolicy};

/// Import a Tiled TMX map and write it out as JSON content.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// TMX map to import
    input: PathBuf,

    /// Output file (defaults to the input with a .json extension)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// JSON file with import settings
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Drop properties without a name or value instead of failing
    #[arg(long)]
    skip_malformed_properties: bool,

    /// Fill layer grids row by row instead of column by column
    #[arg(long)]
    row_major: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut settings = match &cli.settings {
        Some(path) => ImportSettings::from_file(path)
            .with_context(|| format!("Loading settings {}", path.display()))?,
        None => ImportSettings::default(),
    };
    if cli.skip_malformed_properties {
        settings.property_policy = PropertyPolicy::SkipMalformed;
    }
    if cli.row_major {
        settings.cell_order = CellOrder::RowMajor;
    }

    let map = Map::load_with(&cli.input, &settings)
        .with_context(|| format!("Importing map {}", cli.input.display()))?;

    log::info!(
        "{}: {}x{} tiles of {}x{} px, {} atlases, {} layers",
        cli.input.display(),
        map.width,
        map.height,
        map.tile_width,
        map.tile_height,
        map.atlases.len(),
        map.layers.len()
    );

    let output = cli.output.unwrap_or_else(|| cli.input.with_extension("json"));
    writer::write_content(&map, &output).with_context(|| format!("Writing content {}", output.display()))?;
    Ok(())
}
