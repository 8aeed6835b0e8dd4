//! The `taggr tag` command: run one inference request end to end.

use clap::Args;
use std::path::PathBuf;
use taggr_core::{Config, TagInfo, Tagger};

/// Arguments for the `tag` command.
#[derive(Args, Debug)]
pub struct TagArgs {
    /// Image file to tag
    pub image: PathBuf,

    /// Path to the ONNX tagger model (overrides config)
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Path to the tag metadata CSV (overrides config)
    #[arg(long)]
    pub tags: Option<PathBuf>,

    /// Path to the output-map JSON (overrides config)
    #[arg(long)]
    pub labels: Option<PathBuf>,

    /// Print the result as JSON instead of a human summary
    #[arg(long)]
    pub json: bool,
}

/// Execute the tag command.
pub async fn execute(args: TagArgs) -> anyhow::Result<()> {
    let config = Config::load()?;

    let model = args.model.unwrap_or_else(|| config.model_path());
    let tags = args.tags.unwrap_or_else(|| config.tags_path());
    let labels = args.labels.unwrap_or_else(|| config.labels_path());

    let tagger = Tagger::load(&model, &tags, &labels, config.limits.clone())?;
    let result = tagger.tag_path(&args.image).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_group("Rating", &result.rating);
        print_group("General", &result.general);
        print_group("Character", &result.character);
    }

    Ok(())
}

fn print_group(title: &str, tags: &[TagInfo]) {
    println!("{title}:");
    if tags.is_empty() {
        println!("  (none)");
        return;
    }
    for tag in tags {
        println!("  - {} ({:.2}%)", tag.label, tag.score * 100.0);
    }
}
