use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::info;

use nurse_admin::config::{self, API_URL_ENV};
use nurse_admin::model::SelectedFile;
use nurse_admin::render;
use nurse_admin::site::Site;
use nurse_admin::{AdminPanel, ContentClient, Field, Section};

#[derive(Debug, Parser)]
#[command(author, version, about = "Manage the nursing site's content through its content API")]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the items of a section
    List {
        #[arg(long)]
        section: Option<Section>,
    },
    /// Show item counts for every section
    Stats,
    /// Create a new item
    Create {
        #[arg(long)]
        section: Section,
        /// Field value as key=value (title, description, name, link, stars,
        /// testimonial, address, text/content, date/postDate)
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(Field, String)>,
        /// File to upload; may be repeated
        #[arg(long = "file")]
        files: Vec<PathBuf>,
    },
    /// Edit an existing item; unspecified fields keep their current values
    Update {
        #[arg(long)]
        section: Section,
        #[arg(long)]
        id: String,
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(Field, String)>,
        /// Replacement file; omit to keep the existing media
        #[arg(long = "file")]
        files: Vec<PathBuf>,
    },
    /// Delete an item after confirmation
    Delete {
        #[arg(long)]
        section: Section,
        #[arg(long)]
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Read the public pages
    Site {
        #[command(subcommand)]
        page: Page,
    },
}

#[derive(Debug, Subcommand)]
enum Page {
    Services,
    Service {
        #[arg(long)]
        id: String,
    },
    Blog,
    BlogPost {
        #[arg(long)]
        id: String,
    },
    Resources,
    Home,
    About,
}

fn parse_field(raw: &str) -> Result<(Field, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    let field = key.trim().parse::<Field>().map_err(|err| err.to_string())?;
    Ok((field, value.to_string()))
}

fn ask(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

async fn load_files(paths: &[PathBuf]) -> Result<Vec<SelectedFile>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        files.push(SelectedFile::from_path(path).await?);
    }
    Ok(files)
}

fn print_status(panel: &AdminPanel<ContentClient>) {
    if let Some(status) = panel.status() {
        println!("{status}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let cfg = config::load(Some(&args.config))?
        .with_base_url(std::env::var(API_URL_ENV).ok())?;
    let client = ContentClient::from_config(&cfg)?;
    info!(base_url = %client.base_url(), "using content api");

    match args.command {
        Command::List { section } => {
            let section = section.unwrap_or_else(|| cfg.default_section());
            let panel = AdminPanel::open(client, section).await;
            print!("{}", render::item_list(section, panel.items()));
        }
        Command::Stats => {
            let mut panel = AdminPanel::new(client, cfg.default_section());
            panel.refresh_stats().await;
            print!("{}", render::stats_summary(panel.stats()));
        }
        Command::Create {
            section,
            fields,
            files,
        } => {
            let mut panel = AdminPanel::new(client, section);
            for (field, value) in &fields {
                panel.set_field(*field, value);
            }
            if !files.is_empty() {
                panel.select_files(load_files(&files).await?);
                print_status(&panel);
            }
            let result = panel.submit().await;
            print_status(&panel);
            if let Some(item) = result.context("create failed")? {
                print!("{}", render::item_card(section, &item));
            }
        }
        Command::Update {
            section,
            id,
            fields,
            files,
        } => {
            let mut panel = AdminPanel::open(client, section).await;
            panel
                .begin_edit(&id)
                .with_context(|| format!("cannot edit {id}"))?;
            for (field, value) in &fields {
                panel.set_field(*field, value);
            }
            if !files.is_empty() {
                panel.select_files(load_files(&files).await?);
                print_status(&panel);
            }
            let result = panel.submit().await;
            print_status(&panel);
            result.context("update failed")?;
        }
        Command::Delete { section, id, yes } => {
            let mut panel = AdminPanel::open(client, section).await;
            let label = panel
                .items()
                .iter()
                .find(|item| item.id == id)
                .map(|item| item.display_title().to_string())
                .ok_or_else(|| anyhow!("no item with id '{id}' in {section}"))?;
            let confirm = |prompt: &str| yes || ask(prompt);
            let deleted = panel.remove(&id, &label, &confirm).await;
            print_status(&panel);
            if !deleted.context("delete failed")? {
                println!("Cancelled.");
            }
        }
        Command::Site { page } => {
            let site = Site::new(&client);
            match page {
                Page::Services => {
                    print!("{}", render::item_list(Section::Services, &site.services().await?))
                }
                Page::Service { id } => {
                    print!("{}", render::item_card(Section::Services, &site.service(&id).await?))
                }
                Page::Blog => {
                    print!("{}", render::item_list(Section::Blog, &site.blog_posts().await?))
                }
                Page::BlogPost { id } => {
                    print!("{}", render::item_card(Section::Blog, &site.blog_post(&id).await?))
                }
                Page::Resources => {
                    let resources = site.resources().await?;
                    print!("{}", render::item_list(Section::Pdf, &resources.pdfs));
                    println!();
                    print!(
                        "{}",
                        render::item_list(Section::Testimonials, &resources.testimonials)
                    );
                }
                Page::Home => {
                    if let Some(video) = site.featured_video(Section::HomeVideo).await {
                        print!("{}", render::item_card(Section::HomeVideo, &video));
                        println!();
                    }
                    print!(
                        "{}",
                        render::item_list(Section::HomeServices, &site.home_services().await?)
                    );
                    println!();
                    print!(
                        "{}",
                        render::item_list(Section::Testimonials, &site.testimonials().await?)
                    );
                }
                Page::About => match site.featured_video(Section::AboutVideo).await {
                    Some(video) => print!("{}", render::item_card(Section::AboutVideo, &video)),
                    None => bail!("no about video published"),
                },
            }
        }
    }

    Ok(())
}
