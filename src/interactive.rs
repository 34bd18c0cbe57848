use std::path::PathBuf;

use anyhow::{bail, Result};
use dialoguer::{Confirm, Input};

use anchored_chromosome::{GeneIdKey, PrefixStrip};

/// Everything the `extract`/`combine` pipelines need that can be prompted for.
#[derive(Debug)]
pub struct PromptedInputs {
    pub anchors: PathBuf,
    pub lifted: Option<PathBuf>,
    pub gff3: PathBuf,
    pub gene_list: Option<PathBuf>,
    pub gene_id_key: GeneIdKey,
    pub strip: PrefixStrip,
}

/// Which prompts to show for the paths and prefix rule.
pub enum Mode {
    /// single anchor set, free-form prefix
    Extract,
    /// anchors + lifted anchors, yes/no for the `gene:` prefix
    Combine,
}

fn path_or_prompt(current: Option<PathBuf>, prompt: &str) -> Result<PathBuf> {
    if let Some(p) = current {
        return Ok(p);
    }
    let raw: String = Input::new().with_prompt(prompt).interact_text()?;
    let raw = raw.trim();
    if raw.is_empty() {
        bail!("{} is required", prompt);
    }
    Ok(PathBuf::from(raw))
}

fn optional_path(current: Option<PathBuf>, prompt: &str) -> Result<Option<PathBuf>> {
    if current.is_some() {
        return Ok(current);
    }
    let raw: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    let raw = raw.trim();
    Ok((!raw.is_empty()).then(|| PathBuf::from(raw)))
}

/// Ask for whatever the command line left out.
///
/// Paths given on the command line are kept; key and prefix rule are always asked.
pub fn prompt_inputs(
    mode: Mode,
    anchors: Option<PathBuf>,
    lifted: Option<PathBuf>,
    gff3: Option<PathBuf>,
    gene_list: Option<PathBuf>,
) -> Result<PromptedInputs> {
    eprintln!("Missing input paths, switching to interactive mode...");

    let anchors = path_or_prompt(anchors, "Anchors file path")?;
    let lifted = match mode {
        Mode::Combine => Some(path_or_prompt(lifted, "Lifted anchors file path")?),
        Mode::Extract => None,
    };
    let gff3 = path_or_prompt(gff3, "GFF3 file path")?;
    let gene_list = optional_path(
        gene_list,
        "Query gene list file (press Enter to use all genes)",
    )?;

    let key: String = Input::new()
        .with_prompt("Gene identifier key (gene_id or ID)")
        .default(GeneIdKey::default().to_string())
        .interact_text()?;
    let gene_id_key = GeneIdKey::parse_or_default(&key);

    let strip = match mode {
        Mode::Extract => {
            let prefix: String = Input::new()
                .with_prompt("Prefix to strip from gene IDs (press Enter to skip)")
                .allow_empty(true)
                .interact_text()?;
            PrefixStrip::from_option(Some(prefix.trim()))
        }
        Mode::Combine => {
            let strip = Confirm::new()
                .with_prompt(format!("Strip '{}' prefixes?", PrefixStrip::GENE_PREFIX))
                .default(false)
                .interact()?;
            if strip {
                PrefixStrip::GenePrefix
            } else {
                PrefixStrip::None
            }
        }
    };

    Ok(PromptedInputs {
        anchors,
        lifted,
        gff3,
        gene_list,
        gene_id_key,
        strip,
    })
}
