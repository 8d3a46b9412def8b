//! emblem command-line interface.
//!
//! Discover, summarize, save, and synthesize website favicons.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use emblem_color::Rgb;
use emblem_common::resolver;
use emblem_engine::letter::{LetterIcon, LetterIconRenderer};
use emblem_engine::{ContainerDecoder, IconPipeline, LetterIconError};
use emblem_links::{LinkDiscoverer, MalformedHrefPolicy};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

/// emblem - website favicon discovery and synthesis
#[derive(Parser, Debug)]
#[command(name = "emblem")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # List candidate icon URLs
    emblem links https://example.com

    # Summarize every decodable favicon
    emblem summary https://example.com --json

    # Save raw icon files, or every embedded sub-image
    emblem save https://example.com --out icons/
    emblem save https://example.com --out icons/ --embedded

    # Synthesize a 128px letter icon
    emblem letter https://example.com --out icon.png --size 128
"#)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print discovered candidate icon URLs
    Links {
        /// Site URL or local file URL
        #[arg(value_name = "URL")]
        url: String,

        /// Abort discovery on the first malformed href instead of skipping
        #[arg(long)]
        strict: bool,
    },

    /// Summarize every decodable favicon
    Summary {
        /// Site URL or local file URL
        #[arg(value_name = "URL")]
        url: String,

        /// Emit machine-readable JSON instead of a report
        #[arg(long)]
        json: bool,
    },

    /// Save discovered icons to a directory
    Save {
        /// Site URL or local file URL
        #[arg(value_name = "URL")]
        url: String,

        /// Target directory (must exist)
        #[arg(short, long, value_name = "DIR")]
        out: PathBuf,

        /// Save every embedded sub-image instead of the raw icon files
        #[arg(long)]
        embedded: bool,
    },

    /// Synthesize a letter icon PNG
    Letter {
        /// Site URL or local file URL
        #[arg(value_name = "URL")]
        url: String,

        /// Output PNG file
        #[arg(short, long, value_name = "FILE")]
        out: PathBuf,

        /// Icon size in pixels
        #[arg(long, default_value = "128")]
        size: u32,

        /// Fallback background color (rrggbb) when no favicon is usable
        #[arg(long, value_name = "RRGGBB", default_value = "4f4f4f")]
        fallback: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Links { url, strict } => links(&url, strict),
        Command::Summary { url, json } => summary(&url, json),
        Command::Save { url, out, embedded } => save(&url, &out, embedded),
        Command::Letter {
            url,
            out,
            size,
            fallback,
        } => letter(&url, &out, size, &fallback),
    }
}

/// Build a pipeline honoring the `--strict` discovery flag.
fn pipeline(strict: bool) -> IconPipeline {
    let policy = if strict {
        MalformedHrefPolicy::AbortDocument
    } else {
        MalformedHrefPolicy::SkipEntry
    };
    IconPipeline::with_discoverer(LinkDiscoverer::with_policy(policy))
}

fn links(url: &str, strict: bool) -> Result<()> {
    let candidates = pipeline(strict)
        .discover(url)
        .with_context(|| format!("discovering icon links for '{url}'"))?;
    for link in &candidates {
        println!("{}", link.url());
    }
    Ok(())
}

fn summary(url: &str, json: bool) -> Result<()> {
    let icons = pipeline(false)
        .retrieve_all(url)
        .with_context(|| format!("retrieving icons for '{url}'"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&icons)?);
        return Ok(());
    }

    println!(
        "{} icon(s) found for {}",
        icons.len().to_string().bold(),
        url.green()
    );
    for icon in &icons {
        println!("{}", icon.url.as_str().green());
        for image in &icon.images {
            println!(
                "  #{index} {format} {width}x{height}",
                index = image.index,
                format = image.format,
                width = image.width,
                height = image.height
            );
        }
    }
    Ok(())
}

fn save(url: &str, out: &Path, embedded: bool) -> Result<()> {
    let pipeline = pipeline(false);
    let icons = pipeline
        .retrieve_all(url)
        .with_context(|| format!("retrieving icons for '{url}'"))?;

    if embedded {
        emblem_engine::save_embedded_in_dir(&icons, out, &ContainerDecoder::new())
    } else {
        emblem_engine::save_raw_in_dir(&icons, out)
    }
    .with_context(|| format!("saving icons to '{}'", out.display()))?;

    println!(
        "{} icon(s) saved to {}",
        icons.len().to_string().bold(),
        out.display().to_string().green()
    );
    Ok(())
}

fn letter(url: &str, out: &Path, size: u32, fallback: &str) -> Result<()> {
    let fallback: Rgb = fallback
        .parse()
        .with_context(|| format!("parsing fallback color '{fallback}'"))?;
    let renderer = LetterIconRenderer::new();

    let image = match pipeline(false).letter_icon_for(&renderer, url, fallback, size) {
        Ok(image) => image,
        // An unusable favicon still gets a letter icon, just with the
        // fallback background.
        Err(err @ (LetterIconError::EmptyImage(_) | LetterIconError::UnusableFavicon { .. })) => {
            eprintln!("{}", format!("falling back to {fallback}: {err}").yellow());
            let glyph = resolver::first_letter(&resolver::parse_location(url)?);
            renderer.render(&LetterIcon::new(size, glyph, fallback))
        }
        Err(err) => return Err(err.into()),
    };

    image
        .save_with_format(out, image::ImageFormat::Png)
        .with_context(|| format!("writing letter icon to '{}'", out.display()))?;
    println!("letter icon saved to {}", out.display().to_string().green());
    Ok(())
}
