use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use glyph_packer_core::config::{EmptyPolicy, KeyColor, OverflowPolicy, PackerConfig, SortOrder};
use glyph_packer_core::palette::{IndexedDepth, distinct_colors, encode_indexed_png};
use glyph_packer_core::{estimate_atlas_size, extract_glyphs, pack_sprite_sheet};
use image::{ImageReader, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "glyph-packer",
    about = "Pack the glyphs of a key-color sprite sheet into a power-of-two atlas",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract glyphs from a sprite sheet and write the packed atlas
    Pack(PackArgs),
    /// Report glyphs, estimated atlas size and colors without writing anything
    Inspect(InspectArgs),
}

#[derive(Parser, Debug, Clone)]
struct PackArgs {
    // Input/Output
    /// Sprite sheet image (opens a file dialog when omitted and built with `dialog`)
    #[arg(help_heading = "Input/Output")]
    input: Option<PathBuf>,
    /// Output PNG (defaults to <input>_atlas.png)
    #[arg(short, long, help_heading = "Input/Output")]
    output: Option<PathBuf>,
    /// YAML config file path (overrides the options below)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,

    // Packing
    /// Background/border key color as rrggbb or rrggbbaa hex
    #[arg(long, default_value = "ff00ff", help_heading = "Packing")]
    key_color: String,
    /// Sort order: height_desc|area_desc|max_side_desc|none
    #[arg(long, default_value = "height_desc", help_heading = "Packing")]
    sort_order: String,
    /// On overflow of the estimated atlas: grow | fail
    #[arg(long, value_parser = ["grow", "fail"], default_value = "grow", help_heading = "Packing")]
    overflow: String,
    /// When the sheet has no glyphs: fail | blank
    #[arg(long, value_parser = ["fail", "blank"], default_value = "fail", help_heading = "Packing")]
    empty: String,
    /// Largest atlas side (power of two)
    #[arg(long, default_value_t = 16384, help_heading = "Packing")]
    max_dimension: u32,

    // Export
    /// Output pixel format: indexed | rgba
    #[arg(long, value_parser = ["indexed", "rgba"], default_value = "indexed", help_heading = "Export")]
    format: String,
    /// Indexed bit depth: auto|1|2|4|8
    #[arg(long, default_value = "2", help_heading = "Export")]
    bit_depth: String,
    /// Export packing stats (JSON) to this file
    #[arg(long, help_heading = "Export")]
    export_stats: Option<PathBuf>,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
    /// Dry run: pack and report stats but do not write files
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
struct InspectArgs {
    /// Sprite sheet image
    input: PathBuf,
    /// Background key color as rrggbb or rrggbbaa hex
    #[arg(long, default_value = "ff00ff")]
    key_color: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum OutputFormat {
    Indexed,
    Rgba,
}

/// Settings that only matter when writing the atlas to disk.
#[derive(Debug, Clone, Serialize)]
struct OutputSettings {
    format: OutputFormat,
    bit_depth: IndexedDepth,
}

#[derive(Serialize)]
struct MergedConfig<'a> {
    packer: &'a PackerConfig,
    output: &'a OutputSettings,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Pack(args) => run_pack(args),
        Commands::Inspect(args) => run_inspect(args),
    }
}

fn run_pack(cli: &PackArgs) -> anyhow::Result<()> {
    let (mut cfg, mut output) = parse_args(cli)?;
    if let Some(path) = &cli.config {
        let file = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)
            .with_context(|| format!("parse config {}", path.display()))?;
        y.apply(&mut cfg, &mut output)?;
    }
    cfg.validate()?;

    if cli.print_config {
        let merged = MergedConfig {
            packer: &cfg,
            output: &output,
        };
        match cli.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&merged)?),
            _ => println!("{}", serde_json::to_string_pretty(&merged)?),
        }
        return Ok(());
    }

    let input = resolve_input(cli.input.as_deref())?;
    let sheet = load_rgba(&input)?;
    info!(?input, width = sheet.width(), height = sheet.height(), "loaded sprite sheet");

    let out = pack_sprite_sheet(&sheet, &cfg)
        .with_context(|| format!("pack {}", input.display()))?;
    let stats = out.stats;
    info!(
        glyphs = stats.glyphs,
        width = stats.atlas_width,
        height = stats.atlas_height,
        shelves = stats.shelves,
        occupancy = %format!("{:.2}%", stats.occupancy * 100.0),
        "stats"
    );
    if stats.grow_steps > 0 {
        warn!(
            grow_steps = stats.grow_steps,
            "estimated atlas was too small and had to grow"
        );
    }

    if cli.dry_run {
        println!("{}", stats.summary());
    } else {
        let out_path = resolve_output(cli.output.as_deref(), &input)?;
        write_atlas(&out.atlas, &out_path, &cfg, &output)?;
        info!(?out_path, "atlas written");
    }

    if let Some(stats_path) = &cli.export_stats {
        if cli.dry_run {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        } else {
            fs::write(stats_path, serde_json::to_string_pretty(&stats)?)
                .with_context(|| format!("write {}", stats_path.display()))?;
            info!(?stats_path, "stats exported");
        }
    }
    Ok(())
}

fn run_inspect(args: &InspectArgs) -> anyhow::Result<()> {
    let key = parse_key_color(&args.key_color)?;
    let sheet = load_rgba(&args.input)?;
    let glyphs = extract_glyphs(&sheet, key);
    println!(
        "sheet={}x{} colors={} glyphs={}",
        sheet.width(),
        sheet.height(),
        distinct_colors(&sheet),
        glyphs.len()
    );
    if glyphs.is_empty() {
        return Ok(());
    }
    let tallest = glyphs.iter().map(|g| g.height()).max().unwrap_or(0);
    let widest = glyphs.iter().map(|g| g.width()).max().unwrap_or(0);
    let (w, h) = estimate_atlas_size(&glyphs)?;
    println!("tallest={tallest} widest={widest} estimated_atlas={w}x{h}");
    Ok(())
}

fn write_atlas(
    atlas: &RgbaImage,
    path: &Path,
    cfg: &PackerConfig,
    output: &OutputSettings,
) -> anyhow::Result<()> {
    match output.format {
        OutputFormat::Rgba => atlas
            .save(path)
            .with_context(|| format!("write {}", path.display())),
        OutputFormat::Indexed => {
            let file =
                fs::File::create(path).with_context(|| format!("create {}", path.display()))?;
            encode_indexed_png(atlas, cfg.key_color, output.bit_depth, BufWriter::new(file))
                .with_context(|| {
                    format!(
                        "write {} (try --bit-depth auto or --format rgba)",
                        path.display()
                    )
                })
        }
    }
}

fn parse_args(cli: &PackArgs) -> anyhow::Result<(PackerConfig, OutputSettings)> {
    let cfg = PackerConfig {
        key_color: parse_key_color(&cli.key_color)?,
        sort_order: parse_sort_order(&cli.sort_order)?,
        overflow_policy: parse_overflow(&cli.overflow)?,
        empty_policy: parse_empty(&cli.empty)?,
        max_dimension: cli.max_dimension,
    };
    let output = OutputSettings {
        format: parse_format(&cli.format)?,
        bit_depth: parse_bit_depth(&cli.bit_depth)?,
    };
    Ok((cfg, output))
}

fn parse_key_color(s: &str) -> anyhow::Result<KeyColor> {
    Ok(s.parse::<KeyColor>()?)
}

fn parse_sort_order(s: &str) -> anyhow::Result<SortOrder> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("unknown sort order: {}", s))
}

fn parse_overflow(s: &str) -> anyhow::Result<OverflowPolicy> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("unknown overflow policy: {}", s))
}

fn parse_empty(s: &str) -> anyhow::Result<EmptyPolicy> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("unknown empty policy: {}", s))
}

fn parse_format(s: &str) -> anyhow::Result<OutputFormat> {
    Ok(match s.to_ascii_lowercase().as_str() {
        "indexed" => OutputFormat::Indexed,
        "rgba" => OutputFormat::Rgba,
        other => anyhow::bail!("unknown output format: {}", other),
    })
}

fn parse_bit_depth(s: &str) -> anyhow::Result<IndexedDepth> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("unknown bit depth: {} (expected auto|1|2|4|8)", s))
}

const IMAGE_EXTS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "gif", "tiff"];

fn resolve_input(arg: Option<&Path>) -> anyhow::Result<PathBuf> {
    match arg {
        Some(p) => Ok(p.to_path_buf()),
        None => pick_input(),
    }
}

fn resolve_output(arg: Option<&Path>, input: &Path) -> anyhow::Result<PathBuf> {
    match arg {
        Some(p) => Ok(p.to_path_buf()),
        None => pick_output(default_output_path(input)),
    }
}

#[cfg(feature = "dialog")]
fn pick_input() -> anyhow::Result<PathBuf> {
    rfd::FileDialog::new()
        .set_directory(".")
        .add_filter("images", &IMAGE_EXTS)
        .pick_file()
        .ok_or_else(|| anyhow::anyhow!("no sprite sheet selected"))
}

#[cfg(not(feature = "dialog"))]
fn pick_input() -> anyhow::Result<PathBuf> {
    anyhow::bail!("no input image given (supported: {})", IMAGE_EXTS.join(", "))
}

#[cfg(feature = "dialog")]
fn pick_output(default: PathBuf) -> anyhow::Result<PathBuf> {
    let dir = default.parent().unwrap_or(Path::new("."));
    let name = default
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("atlas.png");
    rfd::FileDialog::new()
        .set_directory(dir)
        .set_file_name(name)
        .add_filter("png", &["png"])
        .save_file()
        .ok_or_else(|| anyhow::anyhow!("no output file selected"))
}

#[cfg(not(feature = "dialog"))]
fn pick_output(default: PathBuf) -> anyhow::Result<PathBuf> {
    Ok(default)
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("sheet");
    input.with_file_name(format!("{stem}_atlas.png"))
}

fn load_rgba(p: &Path) -> anyhow::Result<RgbaImage> {
    let img = ImageReader::open(p)
        .with_context(|| format!("open {}", p.display()))?
        .with_guessed_format()?
        .decode()
        .with_context(|| format!("decode {}", p.display()))?;
    Ok(img.to_rgba8())
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct YamlConfig {
    key_color: Option<String>,
    sort_order: Option<String>,
    overflow_policy: Option<String>,
    empty_policy: Option<String>,
    max_dimension: Option<u32>,
    format: Option<String>,
    bit_depth: Option<String>,
}

impl YamlConfig {
    fn apply(self, cfg: &mut PackerConfig, output: &mut OutputSettings) -> anyhow::Result<()> {
        if let Some(v) = self.key_color {
            cfg.key_color = parse_key_color(&v)?;
        }
        if let Some(v) = self.sort_order {
            cfg.sort_order = parse_sort_order(&v)?;
        }
        if let Some(v) = self.overflow_policy {
            cfg.overflow_policy = parse_overflow(&v)?;
        }
        if let Some(v) = self.empty_policy {
            cfg.empty_policy = parse_empty(&v)?;
        }
        if let Some(v) = self.max_dimension {
            cfg.max_dimension = v;
        }
        if let Some(v) = self.format {
            output.format = parse_format(&v)?;
        }
        if let Some(v) = self.bit_depth {
            output.bit_depth = parse_bit_depth(&v)?;
        }
        Ok(())
    }
}
