//! Performance rewrites for the site's HTML pages.
//!
//! Plain pattern substitution over the page text: an inline above-the-fold
//! style block, preconnect hints for the chat widget's origins, and a deferred
//! loader replacing the widget's blocking embed. Every rewrite is idempotent.

use crate::constants::{SKIP_PREFIX, SUCCESS_PREFIX};
use crate::error::Result;
use crate::logger::rule;
use crate::report::display_name;
use crate::{error, info, verbose};
use glob::glob;
use regex::{Captures, Regex};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

const CRITICAL_CSS_SIGNATURE: &str = "Critical Above-the-Fold CSS";
const WIDGET_CONTAINER_ID: &str = "elevenlabs-widget-container";
const PRECONNECT_MARKER: &str = "<!-- Preconnect for ElevenLabs Widget";

const CRITICAL_CSS_BLOCK: &str = r#"        <!-- Critical CSS - Inline for Above-the-Fold -->
        <style>
            /* Critical Above-the-Fold CSS - Prevents Render Blocking */
            .cs_preloader{position:fixed;top:0;left:0;width:100%;height:100%;background:#000;z-index:99999;display:flex;align-items:center;justify-content:center}.cs_preloader_in{text-align:center}.cs_site_header{position:fixed;top:0;left:0;width:100%;z-index:1000;transition:transform .3s}.cs_hero_section{position:relative;width:100%;min-height:100vh;display:flex;align-items:center}.cs_hero_bg_base{position:absolute;width:100%;height:100%;background-size:cover;background-position:center;background-repeat:no-repeat}.cs_hero_text{position:relative;z-index:10;color:#fff}.body{font-family:system-ui,-apple-system,sans-serif;margin:0;padding:0}
        </style>

        "#;

const PRECONNECT_BLOCK: &str = r#"        <!-- Preconnect for ElevenLabs Widget (Early Connection) -->
        <link rel="preconnect" href="https://elevenlabs.io" crossorigin />
        <link rel="preconnect" href="https://unpkg.com" crossorigin />
        <link rel="dns-prefetch" href="https://elevenlabs.io" />
        <link rel="dns-prefetch" href="https://unpkg.com" />"#;

// Starts at the comment so that re-running the legacy-block replacement over
// its own output reproduces it byte for byte. Must not contain a closing
// script tag before the final one.
const WIDGET_LOADER_TEMPLATE: &str = r#"<!-- ElevenLabs ConvAI Widget - Optimized Smart Loading -->
    <div id="elevenlabs-widget-container"></div>
    <script>
        (function() {
            'use strict';
            var loaded = false, attempts = 0, maxAttempts = 3;

            function retry(delay) {
                if (attempts < maxAttempts) {
                    loaded = false;
                    setTimeout(load, delay);
                }
            }

            function load() {
                if (loaded) return;
                attempts++;
                try {
                    var container = document.getElementById('elevenlabs-widget-container');
                    if (!container) { retry(500); return; }
                    loaded = true;
                    container.innerHTML = '<elevenlabs-convai agent-id="{agent_id}"></elevenlabs-convai>';
                    var script = document.createElement('script');
                    script.src = 'https://unpkg.com/@elevenlabs/convai-widget-embed';
                    script.type = 'text/javascript';
                    script.async = true;
                    script.crossOrigin = 'anonymous';
                    script.onerror = function() { retry(1000); };
                    document.body.appendChild(script);
                } catch (e) {
                    retry(1000);
                }
            }

            if (window.requestAnimationFrame) {
                requestAnimationFrame(function() {
                    requestAnimationFrame(function() { setTimeout(load, 500); });
                });
            }
            if (document.readyState === 'loading') {
                document.addEventListener('DOMContentLoaded', function() { setTimeout(load, 800); });
            } else {
                setTimeout(load, 800);
            }
            ['scroll', 'click', 'touchstart'].forEach(function(evt) {
                window.addEventListener(evt, function() { if (!loaded) load(); }, { once: true, passive: true });
            });
            setTimeout(function() { if (!loaded) load(); }, 3000);
        })();
    </script>"#;

static CRITICAL_MARKER_WITH_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<!-- Critical CSS - Load Immediately -->\s*<link rel="stylesheet""#).unwrap()
});
static CRITICAL_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<!-- Critical CSS - Load Immediately -->").unwrap());
static FIRST_STYLESHEET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<link rel="stylesheet" href="assets/css"#).unwrap());
static LEGACY_WIDGET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!-- ElevenLabs ConvAI Widget.*?</script>").unwrap());
static BODY_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"</body>").unwrap());
static DNS_PREFETCH_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"<!-- DNS Prefetch for External Domains -->(?:\s*<link rel="(?:dns-prefetch|preconnect)"[^>]*>)*"#,
    )
    .unwrap()
});

#[derive(Debug, Clone)]
pub struct HtmlRewriteOptions {
    pub widget_agent_id: String,
}

impl Default for HtmlRewriteOptions {
    fn default() -> Self {
        Self {
            widget_agent_id: crate::constants::DEFAULT_WIDGET_AGENT_ID.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlRunSummary {
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Inserts the inline critical CSS block once.
pub fn add_critical_css(content: &str) -> String {
    if CRITICAL_MARKER_WITH_LINK.is_match(content) {
        if content.contains(CRITICAL_CSS_SIGNATURE) {
            return content.to_string();
        }
        return insert_before_first(&CRITICAL_MARKER, content, CRITICAL_CSS_BLOCK);
    }
    if content.contains(CRITICAL_CSS_SIGNATURE) {
        return content.to_string();
    }
    insert_before_first(&FIRST_STYLESHEET, content, CRITICAL_CSS_BLOCK)
}

fn insert_before_first(re: &Regex, content: &str, block: &str) -> String {
    re.replacen(content, 1, |caps: &Captures| format!("{}{}", block, &caps[0]))
        .into_owned()
}

/// Adds preconnect and dns-prefetch links for the widget origins after the
/// page's DNS prefetch section.
pub fn ensure_preconnect_hints(content: &str) -> String {
    let has_hints =
        content.contains("elevenlabs.io") && content.to_lowercase().contains("preconnect");
    if has_hints || content.contains(PRECONNECT_MARKER) {
        return content.to_string();
    }
    DNS_PREFETCH_SECTION
        .replace_all(content, |caps: &Captures| {
            format!("{}\n{}", &caps[0], PRECONNECT_BLOCK)
        })
        .into_owned()
}

/// The deferred widget loader for `agent_id`.
pub fn widget_loader(agent_id: &str) -> String {
    WIDGET_LOADER_TEMPLATE.replace("{agent_id}", agent_id)
}

/// Replaces blocking widget embeds with the deferred loader, or appends the
/// loader before `</body>` when the page has neither.
pub fn optimize_widget_loading(content: &str, options: &HtmlRewriteOptions) -> String {
    let loader = widget_loader(&options.widget_agent_id);
    if LEGACY_WIDGET.is_match(content) {
        return LEGACY_WIDGET
            .replace_all(content, regex::NoExpand(&loader))
            .into_owned();
    }
    if content.contains(WIDGET_CONTAINER_ID) {
        return content.to_string();
    }
    BODY_CLOSE
        .replace_all(content, |caps: &Captures| format!("    {}\n    {}", loader, &caps[0]))
        .into_owned()
}

/// Applies every rewrite to one page in memory.
pub fn rewrite_html(content: &str, options: &HtmlRewriteOptions) -> String {
    let content = ensure_preconnect_hints(content);
    let content = add_critical_css(&content);
    optimize_widget_loading(&content, options)
}

/// Rewrites `path` in place; returns whether the file changed.
pub fn rewrite_html_file(path: &Path, options: &HtmlRewriteOptions) -> Result<bool> {
    let original = fs::read_to_string(path)?;
    let rewritten = rewrite_html(&original, options);
    if rewritten == original {
        return Ok(false);
    }
    fs::write(path, rewritten)?;
    Ok(true)
}

/// `*.html` directly inside `dir`, sorted.
pub fn collect_html_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = dir.join("*.html");
    let mut files: Vec<PathBuf> = glob(&pattern.to_string_lossy())?
        .flatten()
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    Ok(files)
}

pub fn rewrite_html_directory(dir: &Path, options: &HtmlRewriteOptions) -> Result<HtmlRunSummary> {
    let files = collect_html_files(dir)?;
    let mut summary = HtmlRunSummary::default();

    info!("Applying performance optimizations to HTML files...");
    rule('=');

    for file in &files {
        let name = display_name(file);
        match rewrite_html_file(file, options) {
            Ok(true) => {
                info!("{} Updated: {}", SUCCESS_PREFIX, name);
                summary.updated += 1;
            }
            Ok(false) => {
                info!("{}  Skipped: {}", SKIP_PREFIX, name);
                summary.skipped += 1;
            }
            Err(e) => {
                error!("Error processing {}: {}", name, e);
                info!("{}  Skipped: {}", SKIP_PREFIX, name);
                summary.failed += 1;
            }
        }
    }

    rule('=');
    info!("{} Updated: {} files", SUCCESS_PREFIX, summary.updated);
    verbose!("{} unchanged, {} failed", summary.skipped, summary.failed);
    rule('=');
    Ok(summary)
}
