//! Convert an XGBoost JSON tree dump into a Phish-Shield model artifact.
//!
//! ```text
//! import_xgboost --dump dump.json --out models/url_model.json --base-score 0.5
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};

use phish_shield::logic::model::{artifact, xgboost, LinkFunction, ModelArtifact};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Link {
    /// binary:logistic
    Sigmoid,
    /// reg:squarederror and friends
    Identity,
}

impl From<Link> for LinkFunction {
    fn from(link: Link) -> Self {
        match link {
            Link::Sigmoid => LinkFunction::Sigmoid,
            Link::Identity => LinkFunction::Identity,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "import_xgboost", about = "Convert an XGBoost JSON dump into a model artifact")]
struct Args {
    /// Output of `Booster.dump_model(path, dump_format="json")`
    #[arg(long)]
    dump: PathBuf,

    /// Artifact path; a `.sha256` sidecar is written next to it
    #[arg(long)]
    out: PathBuf,

    /// Booster `base_score` (probability space for the sigmoid link)
    #[arg(long = "base-score", default_value_t = 0.5)]
    base_score: f32,

    #[arg(long, default_value = "xgboost-url")]
    name: String,

    #[arg(long, value_enum, default_value_t = Link::Sigmoid)]
    link: Link,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "phish_shield=info".into()),
        )
        .init();

    let args = Args::parse();

    let json = std::fs::read_to_string(&args.dump)
        .with_context(|| format!("failed to read {}", args.dump.display()))?;

    let model = xgboost::from_dump(&json, args.base_score, args.link.into())
        .with_context(|| format!("failed to convert {}", args.dump.display()))?;

    let artifact = ModelArtifact::from_model(args.name.as_str(), &model);
    artifact::save(&args.out, &artifact)
        .with_context(|| format!("failed to write {}", args.out.display()))?;

    println!(
        "Wrote {} ({} trees, bias {:.6}, link {})",
        args.out.display(),
        model.trees().len(),
        model.bias(),
        model.link().as_str()
    );
    Ok(())
}
