use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use log::{error, info, warn};

use anchored_chromosome::anchors::read_gene_list_from_path;
use anchored_chromosome::pipeline;
use anchored_chromosome::table::{write_grouped, write_merged, write_resolved, write_to_path};
use anchored_chromosome::{GeneIdKey, MapperConfig, PrefixStrip};

mod interactive;

use interactive::{prompt_inputs, Mode};

/// Map gene anchors onto target chromosomes using a GFF3 annotation.
#[derive(Parser, Debug)]
#[command(name = "anchored-chromosome")]
#[command(author, version, about)]
struct Cli {
    /// Log parse statistics (debug level)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Attach the target chromosome to every anchor of one anchor file
    Extract(ExtractArgs),

    /// Resolve an anchor and a lifted anchor file and merge them per query gene
    Combine(CombineArgs),

    /// Group an extract/combine table into one row per query gene
    Group(GroupArgs),
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// Anchors file (query target score ...)
    #[arg(long = "anchors-file", short = 'a')]
    anchors: Option<PathBuf>,

    /// GFF3 annotation of the target genome (.gff3 or .gff3.gz)
    #[arg(long = "gff3-file", short = 'g')]
    gff3: Option<PathBuf>,

    /// Only keep anchors of these query genes (one id per line)
    #[arg(long = "query-gene-list", short = 'q')]
    query_gene_list: Option<PathBuf>,

    /// Attribute holding the gene id: gene_id or ID
    #[arg(long = "gene-id-key", short = 'k', default_value = "gene_id")]
    gene_id_key: String,

    /// Prefix to strip from gene ids (removed only when the id starts with it)
    #[arg(long = "strip-prefix", short = 's')]
    strip_prefix: Option<String>,

    /// Output TSV (default: <anchors>_<gff3>_output.tsv)
    #[arg(long, short)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CombineArgs {
    /// Anchors file
    #[arg(long = "anchor", short = 'a')]
    anchors: Option<PathBuf>,

    /// Lifted anchors file
    #[arg(long = "lifted", short = 'l')]
    lifted: Option<PathBuf>,

    /// GFF3 annotation of the target genome (.gff3 or .gff3.gz)
    #[arg(long = "gff3", short = 'g')]
    gff3: Option<PathBuf>,

    /// Only keep anchors of these query genes (one id per line)
    #[arg(long = "query-gene-list", short = 'q')]
    query_gene_list: Option<PathBuf>,

    /// Attribute holding the gene id: gene_id or ID
    #[arg(long = "gene-id-key", short = 'k', default_value = "gene_id")]
    gene_id_key: String,

    /// Prefix to strip from gene ids
    #[arg(long = "strip-prefix", short = 's', conflicts_with = "strip_gene_prefix")]
    strip_prefix: Option<String>,

    /// Strip the `gene:` prefix from gene ids
    #[arg(long = "strip-gene-prefix")]
    strip_gene_prefix: bool,

    /// Output TSV (default: combined_<anchor>_<lifted>.tsv)
    #[arg(long, short)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct GroupArgs {
    /// Table written by `extract` or `combine`
    #[arg(long, short)]
    input: PathBuf,

    /// Only keep these query genes (one id per line)
    #[arg(long = "query-genes", short = 'q')]
    query_genes: Option<PathBuf>,

    /// Output TSV (default: grouped_<input>.tsv or grouped_filtered_<input>.tsv)
    #[arg(long, short)]
    output: Option<PathBuf>,
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn extract_output_name(anchors: &Path, gff3: &Path) -> PathBuf {
    PathBuf::from(format!("{}_{}_output.tsv", file_stem(anchors), file_stem(gff3)))
}

fn combine_output_name(anchors: &Path, lifted: &Path) -> PathBuf {
    PathBuf::from(format!("combined_{}_{}.tsv", file_name(anchors), file_name(lifted)))
}

fn group_output_name(input: &Path, filtered: bool) -> PathBuf {
    let prefix = if filtered { "grouped_filtered" } else { "grouped" };
    PathBuf::from(format!("{}_{}.tsv", prefix, file_stem(input)))
}

fn load_allowlist(cfg: MapperConfig, path: Option<&Path>) -> Result<MapperConfig> {
    let Some(path) = path else {
        return Ok(cfg);
    };
    let genes = read_gene_list_from_path(path)
        .with_context(|| format!("read query gene list {}", path.display()))?;
    if genes.is_empty() {
        warn!("{} lists no genes; using all query genes", path.display());
    } else {
        info!("{}: {} query genes", path.display(), genes.len());
    }
    Ok(cfg.allowlist(genes))
}

fn run_extract(args: ExtractArgs) -> Result<()> {
    let (anchors, gff3, gene_list, cfg) = match (args.anchors, args.gff3) {
        (Some(a), Some(g)) => {
            let cfg = MapperConfig::new()
                .gene_id_key(GeneIdKey::parse_or_default(&args.gene_id_key))
                .strip(PrefixStrip::from_option(args.strip_prefix.as_deref()));
            (a, g, args.query_gene_list, cfg)
        }
        (a, g) => {
            let p = prompt_inputs(Mode::Extract, a, None, g, args.query_gene_list)?;
            let cfg = MapperConfig::new().gene_id_key(p.gene_id_key).strip(p.strip);
            (p.anchors, p.gff3, p.gene_list, cfg)
        }
    };
    let cfg = load_allowlist(cfg, gene_list.as_deref())?;

    let rows = pipeline::extract(&anchors, &gff3, &cfg)?;

    let output = args
        .output
        .unwrap_or_else(|| extract_output_name(&anchors, &gff3));
    write_to_path(&output, |w| write_resolved(w, &rows))?;
    info!("Results saved to {}", output.display());
    Ok(())
}

fn run_combine(args: CombineArgs) -> Result<()> {
    let (anchors, lifted, gff3, gene_list, cfg) = match (args.anchors, args.lifted, args.gff3) {
        (Some(a), Some(l), Some(g)) => {
            let strip = if args.strip_gene_prefix {
                PrefixStrip::GenePrefix
            } else {
                PrefixStrip::from_option(args.strip_prefix.as_deref())
            };
            let cfg = MapperConfig::new()
                .gene_id_key(GeneIdKey::parse_or_default(&args.gene_id_key))
                .strip(strip);
            (a, l, g, args.query_gene_list, cfg)
        }
        (a, l, g) => {
            let p = prompt_inputs(Mode::Combine, a, l, g, args.query_gene_list)?;
            let cfg = MapperConfig::new().gene_id_key(p.gene_id_key).strip(p.strip);
            let lifted = p.lifted.context("lifted anchors file is required")?;
            (p.anchors, lifted, p.gff3, p.gene_list, cfg)
        }
    };
    let cfg = load_allowlist(cfg, gene_list.as_deref())?;

    let rows = pipeline::combine(&anchors, &lifted, &gff3, &cfg)?;

    let output = args
        .output
        .unwrap_or_else(|| combine_output_name(&anchors, &lifted));
    write_to_path(&output, |w| write_merged(w, &rows))?;
    info!("Results saved to {}", output.display());
    Ok(())
}

fn run_group(args: GroupArgs) -> Result<()> {
    let filter = match args.query_genes.as_deref() {
        Some(path) => Some(
            read_gene_list_from_path(path)
                .with_context(|| format!("read query genes {}", path.display()))?,
        ),
        None => None,
    };

    let rows = pipeline::group(&args.input, filter.as_ref())?;

    let output = args
        .output
        .unwrap_or_else(|| group_output_name(&args.input, args.query_genes.is_some()));
    write_to_path(&output, |w| write_grouped(w, &rows))?;
    info!("Grouped results saved to {}", output.display());
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    let result = match cli.cmd {
        Command::Extract(args) => run_extract(args),
        Command::Combine(args) => run_combine(args),
        Command::Group(args) => run_group(args),
    };

    if let Err(err) = result {
        error!("{:#}", err);
        std::process::exit(1);
    }
}
