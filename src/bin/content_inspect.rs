use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use nurse_admin::config::{self, API_URL_ENV};
use nurse_admin::section::{descriptor_for_key, find_list, unwrap_items, Presence};
use nurse_admin::{ContentClient, ContentService, Section};

#[derive(Parser, Debug)]
#[command(about = "Dump a section's raw list response and show how it unwraps")]
struct Args {
    /// Path to YAML config
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Section key to inspect; unknown keys only show the fallback form
    #[arg(long)]
    section: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let cfg = config::load(Some(&args.config))?
        .with_base_url(std::env::var(API_URL_ENV).ok())?;
    let client = ContentClient::from_config(&cfg)?;

    let descriptor = descriptor_for_key(&args.section);
    println!("Form fields for '{}':", args.section);
    for spec in descriptor.fields {
        let marker = match spec.presence {
            Presence::Required => "*",
            _ => " ",
        };
        println!("  {}{} ({})", marker, spec.label, spec.key);
    }
    if let Some(key) = descriptor.media_key {
        println!("  file: {} ({})", key, descriptor.media.noun());
    }

    let Ok(section) = args.section.parse::<Section>() else {
        println!("'{}' is not a known section; nothing to fetch", args.section);
        return Ok(());
    };
    let body = match client.list(section).await {
        Ok(body) => body,
        Err(err) if err.is_not_found() => {
            println!("{} -> 404 (treated as empty)", section);
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };
    println!("{}", serde_json::to_string_pretty(&body)?);
    match find_list(&body) {
        Some((key, raw)) => {
            let parsed = unwrap_items(&body);
            println!("Unwrapped from '{}': {} entries, {} parsed", key, raw.len(), parsed.len());
            for item in parsed {
                println!("  {} -> {}", item.id, item.display_title());
            }
        }
        None => println!("No known list key present"),
    }
    Ok(())
}
