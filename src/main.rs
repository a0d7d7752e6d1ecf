mod cli;

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing::{debug, info};

use cli::{Cli, Commands, SortArg};
use content_retriever::config::default_config_path;
use content_retriever::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Fetch { base, path, sort } => {
            if let Some(base) = base { settings.base_address = base; }
            if let Some(path) = path { settings.relative_path = path; }

            let mut retriever = ContentRetriever::new(&settings, |items: &[ContentItem]| {
                debug!(count = items.len(), "content list changed");
            })?;
            let handle = retriever.refresh()?;
            match retriever.complete(handle).await {
                FetchEvent::Loaded(count) => info!(count, "content list loaded"),
                FetchEvent::Failed(err) => {
                    let code = err.code();
                    return Err(anyhow!(err).context(format!("fetch failed (error {code})")));
                }
            }
            finish(&mut retriever, sort);
        }
        Commands::Sample { sort } => {
            let mut retriever = ContentRetriever::new(&settings, |_: &[ContentItem]| {})?;
            retriever.load_sample()?;
            finish(&mut retriever, sort);
        }
        Commands::Config => {
            match cli.config.or_else(default_config_path) {
                Some(p) => println!("# settings file: {}", p.display()),
                None => println!("# no settings file location available"),
            }
            print!("{}", toml::to_string_pretty(&settings)?);
        }
    }
    Ok(())
}

fn finish(retriever: &mut ContentRetriever, sort: Option<SortArg>) {
    if let Some(sort) = sort {
        retriever.sort(sort.into());
    }
    for item in retriever.items() {
        println!("{:>10}  {}  {}", item.id(), item.title(), item.image_url().unwrap_or("(no image)"));
    }
}
