use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use tw_trends_bot::service::trends::{parse, parse_titles_only};

#[derive(Parser, Debug)]
#[command(name = "parse-feed", version, about = "Parse a saved Google Trends RSS file")]
struct Cli {
    /// RSS document to read
    file: PathBuf,
    #[arg(long, help = "Only print item titles")]
    titles_only: bool,
    #[arg(long, help = "Output machine-readable JSON")]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let raw = std::fs::read(&cli.file)
        .with_context(|| format!("failed to read {}", cli.file.display()))?;

    if cli.titles_only {
        let titles = parse_titles_only(&raw)?;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&titles)?);
        } else {
            for (index, title) in titles.iter().enumerate() {
                println!("# {} {}", index + 1, title);
            }
        }
        return Ok(());
    }

    let items = parse(&raw)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("No titles found. The XML may be empty or have an unexpected structure.");
        return Ok(());
    }

    for (index, item) in items.iter().enumerate() {
        let title = item.title.as_deref().unwrap_or("(untitled)");
        let traffic = item.traffic.as_deref().unwrap_or("");
        if item.news.is_empty() {
            println!("# {} {} {} N/A", index + 1, title, traffic);
            continue;
        }
        println!("# {} {} {}", index + 1, title, traffic);
        for (n_idx, news) in item.news.iter().enumerate() {
            println!("  [{}] {}", n_idx + 1, news.title.as_deref().unwrap_or("(untitled)"));
            if let Some(url) = news.url.as_deref() {
                println!("      {}", url);
            }
        }
    }
    Ok(())
}
