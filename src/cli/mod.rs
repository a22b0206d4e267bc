//! Command-line interface for truepedia.
//!
//! Provides commands for searching Wikipedia, reading and translating
//! articles, listing language versions, exporting to Markdown and managing
//! highlights.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::{self, ResolvedConfig};
use crate::domain::{language, Article};
use crate::export::{download_filename, render_markdown, ExportOptions};
use crate::highlights::{apply_highlights, HighlightStore};
use crate::text::split_sections;
use crate::translate::{translate_article, GoogleTranslator, TranslateOptions, Translator};
use crate::wiki::{CachedEncyclopedia, Encyclopedia, LookupError, MediaWikiClient};

pub mod highlight;

/// truepedia - Wikipedia reader with translation and review highlights
#[derive(Parser, Debug)]
#[command(name = "truepedia")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search for articles
    Search {
        /// Search query
        query: String,

        /// Wikipedia language code
        #[arg(short, long)]
        lang: Option<String>,
    },

    /// Show an article
    Show {
        /// Article title (falls back to the best search hit)
        title: String,

        /// Wikipedia language code
        #[arg(short, long)]
        lang: Option<String>,

        /// Translate the article into this language
        #[arg(short, long)]
        translate_to: Option<String>,

        /// Do not mark saved highlights
        #[arg(long)]
        no_reviews: bool,

        /// Show the full content, section by section
        #[arg(short, long)]
        full: bool,
    },

    /// List the languages an article is available in
    Languages {
        /// Article title
        title: String,

        /// Wikipedia language code of the title
        #[arg(short, long)]
        lang: Option<String>,
    },

    /// Manage highlights (text marked for review)
    Highlight {
        #[command(subcommand)]
        command: highlight::HighlightCommands,
    },

    /// Export an article as Markdown
    Export {
        /// Article title
        title: String,

        /// Wikipedia language code
        #[arg(short, long)]
        lang: Option<String>,

        /// Translate the article into this language
        #[arg(short, long)]
        translate_to: Option<String>,

        /// Output file (defaults to a name derived from the title)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List supported languages
    Langs,

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Search { query, lang } => search(&query, lang).await,
            Commands::Show {
                title,
                lang,
                translate_to,
                no_reviews,
                full,
            } => show_article(&title, lang, translate_to, !no_reviews, full).await,
            Commands::Languages { title, lang } => list_article_languages(&title, lang).await,
            Commands::Highlight { command } => highlight::execute(command).await,
            Commands::Export {
                title,
                lang,
                translate_to,
                output,
            } => export_article(&title, lang, translate_to, output).await,
            Commands::Langs => {
                list_supported_languages();
                Ok(())
            }
            Commands::Config => show_config(),
        }
    }
}

/// Build the cached Wikipedia client from configuration
fn encyclopedia(cfg: &ResolvedConfig) -> Result<CachedEncyclopedia<MediaWikiClient>> {
    let client = MediaWikiClient::new(&cfg.wiki).context("Failed to create Wikipedia client")?;
    Ok(CachedEncyclopedia::new(client, cfg.wiki.cache_ttl()))
}

fn translator(cfg: &ResolvedConfig) -> Result<Arc<dyn Translator>> {
    let translator =
        GoogleTranslator::new(&cfg.translation).context("Failed to create translator")?;
    Ok(Arc::new(translator))
}

fn translate_options(cfg: &ResolvedConfig) -> TranslateOptions {
    TranslateOptions {
        max_workers: cfg.translation.max_workers,
        chunk_size: cfg.translation.chunk_size,
    }
}

/// Pick the requested language or the configured default, rejecting unknown codes
pub(crate) fn resolve_language(cfg: &ResolvedConfig, lang: Option<String>) -> Result<String> {
    let lang = lang.unwrap_or_else(|| cfg.wiki.default_language.clone());
    if !language::is_supported(&lang) {
        anyhow::bail!(
            "Unsupported language '{}'. Run 'truepedia langs' for the list",
            lang
        );
    }
    Ok(lang)
}

/// Fetch by exact title, falling back to the best search hit
pub(crate) async fn fetch_article<E: Encyclopedia>(
    wiki: &E,
    title: &str,
    lang: &str,
) -> Result<Article> {
    match wiki.fetch_article(title, lang).await {
        Ok(article) => Ok(article),
        Err(LookupError::NotFound(_)) => {
            info!(title, lang, "No exact match, using best search hit");
            wiki.fetch_best_match(title, lang)
                .await
                .with_context(|| format!("No article found for '{}' ({})", title, lang))
        }
        Err(e) => Err(e).with_context(|| format!("Failed to fetch '{}' ({})", title, lang)),
    }
}

async fn search(query: &str, lang: Option<String>) -> Result<()> {
    let cfg = config::config()?;
    let lang = resolve_language(cfg, lang)?;
    let wiki = encyclopedia(cfg)?;

    let titles = wiki
        .search(query, &lang)
        .await
        .with_context(|| format!("Search failed for '{}'", query))?;

    if titles.is_empty() {
        println!("No results found for: {}", query);
        return Ok(());
    }

    println!("{}\n", results_header(&wiki, titles.len(), query, &lang));
    for (i, title) in titles.iter().enumerate() {
        println!("{:>3}. {}", i + 1, title);
    }

    Ok(())
}

/// Heading line for search results, naming the source it came from
fn results_header<E: Encyclopedia>(wiki: &E, count: usize, query: &str, lang: &str) -> String {
    format!(
        "Found {} result(s) for \"{}\" on {} ({}):",
        count,
        query,
        wiki.name(),
        language::language_name(lang)
    )
}

async fn show_article(
    title: &str,
    lang: Option<String>,
    translate_to: Option<String>,
    with_reviews: bool,
    full: bool,
) -> Result<()> {
    let cfg = config::config()?;
    let lang = resolve_language(cfg, lang)?;
    let wiki = encyclopedia(cfg)?;

    let article = fetch_article(&wiki, title, &lang).await?;
    let article_id = article.id();

    let shown = match &translate_to {
        Some(target) => {
            let target = resolve_language(cfg, Some(target.clone()))?;
            eprintln!("Translating to {}...", language::language_name(&target));
            translate_article(translator(cfg)?, &article, &target, translate_options(cfg)).await
        }
        None => article.clone(),
    };

    let highlights = if with_reviews {
        HighlightStore::open_default()?.get(&article_id)?
    } else {
        Vec::new()
    };

    println!("# {}", shown.title);
    println!("{}", shown.url);
    match &translate_to {
        Some(target) if target != &article.language => println!(
            "Original: {} | Translated to: {}",
            language::language_name(&article.language),
            language::language_name(target)
        ),
        _ => println!("Language: {}", language::language_name(&article.language)),
    }
    if !highlights.is_empty() {
        println!("Highlights: {}", highlights.len());
    }
    println!();

    println!("## Summary\n");
    println!("{}", apply_highlights(&shown.summary, &highlights));

    if full {
        for (i, section) in split_sections(&shown.content).iter().enumerate() {
            println!("\n## [{}] {}\n", i, section.display_title());
            println!("{}", apply_highlights(&section.content, &highlights));
        }
    } else {
        println!("\nUse --full to show all sections");
    }

    Ok(())
}

async fn list_article_languages(title: &str, lang: Option<String>) -> Result<()> {
    let cfg = config::config()?;
    let lang = resolve_language(cfg, lang)?;
    let wiki = encyclopedia(cfg)?;

    let links = wiki
        .language_links(title, &lang)
        .await
        .with_context(|| format!("Failed to list languages for '{}'", title))?;

    let mut available: Vec<(String, &String)> = links
        .iter()
        .filter(|(code, _)| language::is_supported(code))
        .map(|(code, linked_title)| (language::display_label(code), linked_title))
        .collect();
    available.sort();

    println!("'{}' is available in {} supported language(s):\n", title, available.len());
    for (label, linked_title) in &available {
        println!("  {:<40} {}", label, linked_title);
    }

    let other = links.len() - available.len();
    if other > 0 {
        println!("\n(+{} other language(s) not supported by truepedia)", other);
    }

    Ok(())
}

async fn export_article(
    title: &str,
    lang: Option<String>,
    translate_to: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    let cfg = config::config()?;
    let lang = resolve_language(cfg, lang)?;
    let wiki = encyclopedia(cfg)?;

    let article = fetch_article(&wiki, title, &lang).await?;

    let target = translate_to
        .map(|t| resolve_language(cfg, Some(t)))
        .transpose()?
        .filter(|t| t != &article.language);

    let exported = match &target {
        Some(target) => {
            eprintln!("Translating to {}...", language::language_name(target));
            translate_article(translator(cfg)?, &article, target, translate_options(cfg)).await
        }
        None => article,
    };

    let options = ExportOptions {
        translated_to: target.clone(),
    };
    let markdown = render_markdown(&exported, &options);

    let path = output
        .unwrap_or_else(|| PathBuf::from(download_filename(&exported.title, target.as_deref())));
    std::fs::write(&path, markdown)
        .with_context(|| format!("Failed to write export: {}", path.display()))?;

    eprintln!("Exported '{}' to {}", exported.title, path.display());
    Ok(())
}

fn list_supported_languages() {
    println!("{:<6} {:<14} {}", "CODE", "LANGUAGE", "NATIVE");
    println!("{}", "-".repeat(36));
    for lang in language::LANGUAGES {
        println!("{:<6} {:<14} {}", lang.code, lang.name, lang.native);
    }
}

/// Show resolved configuration
fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("truepedia configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Paths:");
    println!("  Home:       {}", cfg.home.display());
    println!("  Highlights: {}", cfg.highlights.display());
    println!();
    println!("Wikipedia:");
    println!("  Default language: {}", language::display_label(&cfg.wiki.default_language));
    println!("  API URL:          {}", cfg.wiki.api_url);
    println!("  Search limit:     {}", cfg.wiki.search_limit);
    println!("  Timeout:          {}s", cfg.wiki.timeout_seconds);
    println!("  Cache TTL:        {}s", cfg.wiki.cache_ttl_seconds);
    println!();
    println!("Translation:");
    println!("  Endpoint:    {}", cfg.translation.endpoint);
    println!("  Max workers: {}", cfg.translation.max_workers);
    println!("  Chunk size:  {} bytes", cfg.translation.chunk_size);
    println!("  Timeout:     {}s", cfg.translation.timeout_seconds);

    Ok(())
}
