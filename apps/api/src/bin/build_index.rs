//! Offline content-index builder. Reads the content directory, derives the
//! skill evidence graph, and emits the snapshot pair into the static
//! directory for the API (and any CDN in front of it) to serve.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use folio_api::index::builder::{build_content_index, BuildOptions};
use folio_api::index::snapshot::write_snapshot;

#[derive(Debug, Parser)]
#[command(name = "build-index", about = "Build the content index snapshot")]
struct Args {
    /// Directory holding projects/, blog/, and the resume YAML files
    #[arg(long, default_value = "content")]
    content_dir: PathBuf,

    /// Directory the snapshot files are written into
    #[arg(long, default_value = "static")]
    out_dir: PathBuf,

    /// Base URL used for absolute content links
    #[arg(long, default_value = "http://localhost:8080")]
    site_url: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Building content index from {}", args.content_dir.display());

    let index = build_content_index(&BuildOptions {
        content_dir: args.content_dir,
        site_url: args.site_url.trim_end_matches('/').to_string(),
    })?;

    info!(
        "Indexed {} skills, {} experience entries, {} projects, {} blog posts",
        index.metadata.skill_count,
        index.metadata.experience_count,
        index.metadata.project_count,
        index.metadata.blog_count
    );

    let pointer = write_snapshot(&args.out_dir, &index)?;
    info!(
        "Wrote {} (hash {}) and pointer into {}",
        pointer.filename,
        pointer.hash,
        args.out_dir.display()
    );

    Ok(())
}
