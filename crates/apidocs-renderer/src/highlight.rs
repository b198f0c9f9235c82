//! Syntax highlighting for code blocks.
//!
//! [`Highlighter`] is constructed explicitly and shared by reference. The
//! syntect syntax and theme tables are loaded on first use, exactly once,
//! even when several threads highlight concurrently.
//!
//! Output uses CSS classes (prefixed `hl-`) instead of inline colors, so one
//! rendering serves both themes; [`Highlighter::theme_css`] produces the
//! matching stylesheet.

use std::sync::OnceLock;

use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{ClassStyle, ClassedHTMLGenerator, css_for_theme_with_class_style};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::error::HighlightError;
use crate::util::escape_html;

const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };

/// Language used when nothing else matches.
pub const PLAIN_TEXT: &str = "text";

/// Shorthand names and the language they stand for.
const ALIASES: &[(&str, &str)] = &[
    ("js", "javascript"),
    ("ts", "typescript"),
    ("sh", "bash"),
    ("zsh", "bash"),
    ("curl", "bash"),
];

/// Supported languages and the syntect token selecting their grammar.
/// The bundled grammars have no TypeScript, so it shares the JavaScript one.
const LANGUAGES: &[(&str, &str)] = &[
    ("bash", "bash"),
    ("json", "json"),
    ("javascript", "js"),
    ("typescript", "js"),
    ("php", "php"),
    ("html", "html"),
    ("css", "css"),
    ("xml", "xml"),
    ("yaml", "yaml"),
    ("shell", "bash"),
];

/// Resolve a fence language through the alias table.
///
/// Matching is case-insensitive. Unsupported languages resolve to
/// [`PLAIN_TEXT`].
#[must_use]
pub fn resolve_language(lang: &str) -> &'static str {
    let lower = lang.trim().to_ascii_lowercase();
    let name = ALIASES
        .iter()
        .find(|&&(alias, _)| alias == lower)
        .map_or(lower.as_str(), |&(_, target)| target);
    LANGUAGES
        .iter()
        .find(|&&(supported, _)| supported == name)
        .map_or(PLAIN_TEXT, |&(supported, _)| supported)
}

/// Theme names for the generated stylesheet.
#[derive(Debug, Clone)]
pub struct HighlightConfig {
    pub light_theme: String,
    pub dark_theme: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            light_theme: "InspiredGitHub".to_owned(),
            dark_theme: "base16-ocean.dark".to_owned(),
        }
    }
}

struct Engine {
    syntaxes: SyntaxSet,
    themes: ThemeSet,
}

/// Code highlighting service with lazily loaded grammars.
pub struct Highlighter {
    config: HighlightConfig,
    engine: OnceLock<Engine>,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new(HighlightConfig::default())
    }
}

impl Highlighter {
    #[must_use]
    pub fn new(config: HighlightConfig) -> Self {
        Self {
            config,
            engine: OnceLock::new(),
        }
    }

    /// Whether the grammars have been loaded.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.engine.get().is_some()
    }

    fn engine(&self) -> &Engine {
        self.engine.get_or_init(|| {
            tracing::debug!("Loading syntax highlighting grammars and themes");
            Engine {
                syntaxes: SyntaxSet::load_defaults_newlines(),
                themes: ThemeSet::load_defaults(),
            }
        })
    }

    /// Render `code` as a highlighted `<pre>` block.
    ///
    /// Never fails: unsupported languages are rendered as plain text, and a
    /// grammar error falls back to escaped text.
    #[must_use]
    pub fn highlight(&self, code: &str, lang: &str) -> String {
        let language = resolve_language(lang);
        let body = self.highlight_lines(code, language).unwrap_or_else(|err| {
            tracing::warn!(language, error = %err, "Highlighting failed, using plain text");
            escape_html(code)
        });
        format!(r#"<pre class="highlight" data-language="{language}"><code>{body}</code></pre>"#)
    }

    fn highlight_lines(&self, code: &str, language: &str) -> Result<String, syntect::Error> {
        let engine = self.engine();
        let syntax = Self::syntax_for(&engine.syntaxes, language);
        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &engine.syntaxes, CLASS_STYLE);
        for line in LinesWithEndings::from(code) {
            generator.parse_html_for_line_which_includes_newline(line)?;
        }
        Ok(generator.finalize())
    }

    fn syntax_for<'s>(syntaxes: &'s SyntaxSet, language: &str) -> &'s SyntaxReference {
        LANGUAGES
            .iter()
            .find(|&&(name, _)| name == language)
            .and_then(|&(_, token)| syntaxes.find_syntax_by_token(token))
            .unwrap_or_else(|| syntaxes.find_syntax_plain_text())
    }

    /// Stylesheet for the highlight classes.
    ///
    /// Light theme rules apply at the root; dark theme rules are nested
    /// under `.dark`.
    pub fn theme_css(&self) -> Result<String, HighlightError> {
        let light = css_for_theme_with_class_style(self.theme(&self.config.light_theme)?, CLASS_STYLE)?;
        let dark = css_for_theme_with_class_style(self.theme(&self.config.dark_theme)?, CLASS_STYLE)?;
        Ok(format!("{light}\n.dark {{\n{dark}}}\n"))
    }

    fn theme(&self, name: &str) -> Result<&Theme, HighlightError> {
        self.engine()
            .themes
            .themes
            .get(name)
            .ok_or_else(|| HighlightError::UnknownTheme(name.to_owned()))
    }
}
