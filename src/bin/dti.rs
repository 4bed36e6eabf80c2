use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use dti::payload::{AssetsPayload, GraphQlResponse, SpeciesAndColorsPayload};

#[derive(Parser, Debug)]
#[command(name = "dti", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report the legal poses of a species/color pair.
    Check(CheckArgs),
    /// Print the resolved closet and visible layer stack of an outfit.
    Layers(OutfitArgs),
    /// Render an outfit to PNG from locally mirrored layer images.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct CatalogArgs {
    /// Binary validity table as served by DTI.
    #[arg(long)]
    table: PathBuf,

    /// `{allSpecies, allColors}` JSON, bare or inside a GraphQL response.
    #[arg(long)]
    names: PathBuf,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    #[command(flatten)]
    catalog: CatalogArgs,

    /// Species id or name.
    #[arg(long)]
    species: String,

    /// Color id or name.
    #[arg(long)]
    color: String,

    /// Pose to test, e.g. HAPPY_FEM.
    #[arg(long)]
    pose: Option<dti::PetPose>,
}

#[derive(Parser, Debug)]
struct OutfitArgs {
    /// Assets JSON (`items` + `petAppearances`), bare or inside a GraphQL response.
    #[arg(long)]
    assets: PathBuf,

    /// Preferred pose; falls back to the closest legal pose with data.
    #[arg(long, default_value = "HAPPY_FEM")]
    pose: dti::PetPose,

    /// Validity table; with `--names`, validates the pair instead of trusting the assets.
    #[arg(long, requires = "names")]
    table: Option<PathBuf>,

    /// Species/color names JSON; used with `--table`.
    #[arg(long, requires = "table")]
    names: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    outfit: OutfitArgs,

    /// Directory holding layer PNGs named after the last segment of each image URL.
    #[arg(long)]
    layers: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Output size: 150, 300 or 600.
    #[arg(long, default_value = "600")]
    size: dti::LayerImageSize,

    /// Rayon threads for compositing.
    #[arg(long)]
    threads: Option<usize>,
}

/// Serves catalog data from files on disk.
struct FileSource {
    table: PathBuf,
    names: PathBuf,
}

#[async_trait]
impl dti::CatalogSource for FileSource {
    async fn fetch_validity_table(&self) -> dti::DtiResult<Vec<u8>> {
        tokio::fs::read(&self.table)
            .await
            .map_err(|e| dti::DtiError::fetch(format!("read '{}': {e}", self.table.display())))
    }

    async fn fetch_species_and_colors(&self) -> dti::DtiResult<SpeciesAndColorsPayload> {
        let bytes = tokio::fs::read(&self.names)
            .await
            .map_err(|e| dti::DtiError::fetch(format!("read '{}': {e}", self.names.display())))?;
        parse_maybe_wrapped(&bytes)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Check(args) => cmd_check(args).await,
        Command::Layers(args) => cmd_layers(args).await,
        Command::Render(args) => cmd_render(args).await,
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Accept either a bare payload or a `{data, errors}` GraphQL envelope.
fn parse_maybe_wrapped<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> dti::DtiResult<T> {
    let value: serde_json::Value = dti::payload::from_slice(bytes)?;
    let wrapped = value.get("data").is_some() || value.get("errors").is_some();
    if wrapped {
        let response: GraphQlResponse<T> = serde_json::from_value(value)
            .map_err(|e| dti::DtiError::payload(format!("parse GraphQL response: {e}")))?;
        response.into_data()
    } else {
        serde_json::from_value(value)
            .map_err(|e| dti::DtiError::payload(format!("parse JSON payload: {e}")))
    }
}

fn state_for(table: &Path, names: &Path) -> dti::StateCache {
    dti::StateCache::new(
        Arc::new(FileSource {
            table: table.to_path_buf(),
            names: names.to_path_buf(),
        }),
        dti::CacheConfig::default(),
    )
}

async fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let state = state_for(&args.catalog.table, &args.catalog.names);
    let species = state.species(&args.species).await?;
    let color = state.color(&args.color).await?;
    let mask = state.mask(species.id, color.id).await?;

    let poses: Vec<&str> = mask.poses().map(|p| p.name()).collect();
    println!(
        "{color} {species} ({}-{}): mask {:#010b} [{}]",
        species.id,
        color.id,
        mask.bits(),
        poses.join(", ")
    );

    if let Some(pose) = args.pose {
        let ok = mask.check(pose);
        println!("{pose}: {}", if ok { "valid" } else { "invalid" });
        if !ok {
            anyhow::bail!("{color} {species} has no {pose} pose");
        }
    } else if mask.is_empty() {
        anyhow::bail!("{color} {species} does not exist");
    }
    Ok(())
}

async fn load_neopet(args: &OutfitArgs, size: dti::LayerImageSize) -> anyhow::Result<dti::Neopet> {
    let bytes = std::fs::read(&args.assets)
        .with_context(|| format!("open assets '{}'", args.assets.display()))?;
    let payload: AssetsPayload = parse_maybe_wrapped(&bytes).context("parse assets JSON")?;

    if let (Some(table), Some(names)) = (&args.table, &args.names) {
        let first = payload
            .pet_appearances
            .first()
            .or(payload.pet_appearance.as_ref())
            .context("assets contain no pet appearance")?;
        let species = first.species.id.to_string_id();
        let color = first.color.id.to_string_id();
        let state = state_for(table, names);
        return Ok(
            dti::Neopet::from_assets(&state, &species, &color, payload, args.pose, size).await?,
        );
    }

    // Without a table, trust the poses the assets were modelled in.
    let assets = dti::payload::Assets::try_from(payload)?;
    let first = assets
        .pet_appearances
        .first()
        .context("assets contain no pet appearance")?;
    let mask = assets
        .pet_appearances
        .iter()
        .fold(dti::BitField::EMPTY, |acc, a| acc | a.pose);
    Ok(dti::Neopet::new(
        first.species.clone(),
        first.color.clone(),
        mask,
        args.pose,
        assets.pet_appearances.clone(),
    )
    .with_items(assets.items)
    .with_size(size))
}

async fn cmd_layers(args: OutfitArgs) -> anyhow::Result<()> {
    let pet = load_neopet(&args, dti::LayerImageSize::default()).await?;
    let appearance = pet.pick_appearance(None)?;
    println!("{} ({})", dti::RenderContext::for_appearance(appearance), appearance.label());

    let closet = pet.closet();
    for item in &closet.worn {
        println!("worn     {} {}", item.id, item.name);
    }
    for item in &closet.closeted {
        println!("closeted {} {}", item.id, item.name);
    }

    for layer in pet.layers(None)? {
        println!(
            "{:>4} {:<24} {}",
            layer.zone.depth,
            layer.describe(),
            layer.image_url.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

async fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let pet = load_neopet(&args.outfit, args.size).await?;
    let fetcher = dti::DirFetcher::new(&args.layers);
    let opts = dti::RenderOpts {
        size: args.size,
        threads: args.threads,
    };

    let png = pet.render_with(None, &opts, &fetcher).await?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let f = File::create(&args.out)
        .with_context(|| format!("create png '{}'", args.out.display()))?;
    let mut w = BufWriter::new(f);
    std::io::Write::write_all(&mut w, &png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;
    std::io::Write::flush(&mut w)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
