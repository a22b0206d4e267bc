//! Highlight CLI subcommands.
//!
//! Provides commands to:
//! - `add`: Mark text from an article passage for review
//! - `list`: Show saved highlights with their indices
//! - `remove`: Delete one highlight by index
//! - `clear`: Delete the highlight file

use anyhow::{Context, Result};
use clap::Subcommand;

use tracing::debug;

use super::{encyclopedia, fetch_article, resolve_language};
use crate::config;
use crate::domain::{Article, ArticleId};
use crate::highlights::{mark_for_review, Highlight, HighlightStore};
use crate::text::split_sections;
use crate::wiki::{Encyclopedia, LookupError};

/// Highlight-related subcommands
#[derive(Subcommand, Debug)]
pub enum HighlightCommands {
    /// Mark text from an article for review
    Add {
        /// Article title
        title: String,

        /// Text to mark (must appear exactly in the passage)
        text: String,

        /// Wikipedia language code
        #[arg(short, long)]
        lang: Option<String>,

        /// Label stored with the highlight (defaults to the passage name)
        #[arg(short, long)]
        context: Option<String>,

        /// Take the passage from this section (see `show --full`) instead of the summary
        #[arg(short, long)]
        section: Option<usize>,
    },

    /// List saved highlights
    List {
        /// Article title (all articles if omitted)
        title: Option<String>,

        /// Wikipedia language code
        #[arg(short, long)]
        lang: Option<String>,
    },

    /// Remove a highlight by index
    Remove {
        /// Article title
        title: String,

        /// Index shown by `highlight list`
        index: usize,

        /// Wikipedia language code
        #[arg(short, long)]
        lang: Option<String>,
    },

    /// Delete every saved highlight
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}

/// Execute highlight subcommands
pub async fn execute(command: HighlightCommands) -> Result<()> {
    match command {
        HighlightCommands::Add {
            title,
            text,
            lang,
            context,
            section,
        } => execute_add(&title, &text, lang, context, section).await,
        HighlightCommands::List { title, lang } => execute_list(title, lang).await,
        HighlightCommands::Remove { title, index, lang } => {
            execute_remove(&title, index, lang).await
        }
        HighlightCommands::Clear { yes } => execute_clear(yes),
    }
}

/// The passage a highlight is taken from and its default context label
fn select_passage(article: &Article, section: Option<usize>) -> Result<(String, String)> {
    let Some(index) = section else {
        return Ok((article.summary.clone(), "summary".to_string()));
    };

    let sections = split_sections(&article.content);
    let len = sections.len();
    let section = sections.into_iter().nth(index).with_context(|| {
        format!(
            "'{}' has {} section(s); use an index below {}",
            article.title, len, len
        )
    })?;

    Ok((section.content, format!("section_{}", index)))
}

/// Highlight key for a typed title.
///
/// A title already holding highlights is used as is. Otherwise it is
/// resolved to the canonical title the article is stored under; titles the
/// encyclopedia does not know keep their typed form.
async fn resolve_article_id<E: Encyclopedia>(
    wiki: &E,
    store: &HighlightStore,
    title: &str,
    lang: &str,
) -> Result<ArticleId> {
    let typed = ArticleId::new(title, lang);
    if !store.get(&typed)?.is_empty() {
        return Ok(typed);
    }

    match wiki.canonical_title(title, lang).await {
        Ok(canonical) => {
            debug!(title, %canonical, "Resolved highlight key");
            Ok(ArticleId::new(&canonical, lang))
        }
        Err(LookupError::NotFound(_)) => Ok(typed),
        Err(e) => Err(e).with_context(|| format!("Failed to resolve '{}' ({})", title, lang)),
    }
}

async fn execute_add(
    title: &str,
    text: &str,
    lang: Option<String>,
    context: Option<String>,
    section: Option<usize>,
) -> Result<()> {
    let cfg = config::config()?;
    let lang = resolve_language(cfg, lang)?;
    let wiki = encyclopedia(cfg)?;

    let article = fetch_article(&wiki, title, &lang).await?;
    let (passage, default_context) = select_passage(&article, section)?;
    let context = context.unwrap_or(default_context);

    let store = HighlightStore::open_default()?;
    let highlight = mark_for_review(&store, &article.id(), &passage, text, &context)?;

    println!(
        "Marked for review in '{}' ({}): \"{}\"",
        article.title, highlight.context, highlight.text
    );
    Ok(())
}

fn print_highlights(article_id: &ArticleId, highlights: &[Highlight]) {
    println!("{} ({} highlight(s))", article_id, highlights.len());
    for (i, highlight) in highlights.iter().enumerate() {
        let when = highlight
            .created_at()
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  [{}] {:<12} {:<16} {}",
            i, highlight.context, when, highlight.text
        );
    }
}

async fn execute_list(title: Option<String>, lang: Option<String>) -> Result<()> {
    let store = HighlightStore::open_default()?;

    match title {
        Some(title) => {
            let cfg = config::config()?;
            let lang = resolve_language(cfg, lang)?;
            let wiki = encyclopedia(cfg)?;
            let article_id = resolve_article_id(&wiki, &store, &title, &lang).await?;

            let highlights = store.get(&article_id)?;
            if highlights.is_empty() {
                println!("No highlights for {}", article_id);
            } else {
                print_highlights(&article_id, &highlights);
            }
        }
        None => {
            let all = store.load()?;
            if all.is_empty() {
                println!("No highlights saved. Use 'truepedia highlight add' to mark text.");
                return Ok(());
            }
            for (article_id, highlights) in &all {
                print_highlights(article_id, highlights);
            }
            println!("\nStore: {}", store.path().display());
        }
    }

    Ok(())
}

async fn execute_remove(title: &str, index: usize, lang: Option<String>) -> Result<()> {
    let cfg = config::config()?;
    let lang = resolve_language(cfg, lang)?;
    let wiki = encyclopedia(cfg)?;

    let store = HighlightStore::open_default()?;
    let article_id = resolve_article_id(&wiki, &store, title, &lang).await?;
    let removed = store.remove_highlight(&article_id, index)?;

    println!("Removed from {}: \"{}\"", article_id, removed.text);
    Ok(())
}

fn execute_clear(yes: bool) -> Result<()> {
    if !yes {
        anyhow::bail!("Refusing to delete all highlights without --yes");
    }

    let store = HighlightStore::open_default()?;
    store.clear()?;

    println!("Cleared all highlights ({})", store.path().display());
    Ok(())
}
