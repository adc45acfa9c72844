//! Page rendering for records.
//!
//! Handlers only see the [`RenderSink`] trait. The built-in [`HtmlRenderer`]
//! compiles its templates once at startup and is read-only afterwards, so one
//! instance is shared by every request.
//!
//! Templates are plain HTML with two placeholders, `{{name}}` and `{{body}}`.
//! Substituted values are HTML-escaped.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::record::Record;

/// Template key for the record page.
pub const VIEW_TEMPLATE: &str = "view";

/// Template key for the edit form.
pub const EDIT_TEMPLATE: &str = "edit";

/// File accepted in place of `view.html` in a templates directory.
const VIEW_TEMPLATE_ALIAS: &str = "dog.html";

const DEFAULT_VIEW: &str = r#"<!DOCTYPE html>
<html>
<head><title>{{name}}</title></head>
<body>
<h1>{{name}}</h1>
<p>[<a href="/edit/{{name}}">edit</a>]</p>
<div>{{body}}</div>
</body>
</html>
"#;

const DEFAULT_EDIT: &str = r#"<!DOCTYPE html>
<html>
<head><title>Editing {{name}}</title></head>
<body>
<h1>Editing {{name}}</h1>
<form action="/save/{{name}}" method="POST">
<div><textarea name="about" rows="20" cols="80">{{body}}</textarea></div>
<div><input type="submit" value="Save"></div>
</form>
</body>
</html>
"#;

/// Turns a record into a response body.
pub trait RenderSink: Send + Sync + std::fmt::Debug {
    /// Render `record` with the template registered under `template`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the template is unknown or rendering fails.
    fn render(&self, template: &str, record: &Record) -> Result<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Name,
    Body,
}

/// A template parsed into literal text and placeholder slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTemplate {
    segments: Vec<Segment>,
}

impl CompiledTemplate {
    /// Parse template source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Template`] for an unknown placeholder or an
    /// unterminated `{{`.
    pub fn compile(key: &str, source: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut rest = source;

        while let Some(start) = rest.find("{{") {
            if start > 0 {
                segments.push(Segment::Literal(rest[..start].to_string()));
            }
            let after = &rest[start + 2..];
            let end = after
                .find("}}")
                .ok_or_else(|| Error::template(key, "unterminated placeholder"))?;
            let segment = match after[..end].trim() {
                "name" => Segment::Name,
                "body" => Segment::Body,
                other => {
                    return Err(Error::template(
                        key,
                        format!("unknown placeholder '{other}'"),
                    ))
                }
            };
            segments.push(segment);
            rest = &after[end + 2..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Ok(Self { segments })
    }

    /// Fill the placeholders from `record`.
    #[must_use]
    pub fn render(&self, record: &Record) -> String {
        let body = record.body_text();
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Name => escape_html_into(&mut out, record.name.as_str()),
                Segment::Body => escape_html_into(&mut out, &body),
            }
        }
        out
    }
}

/// HTML renderer backed by compiled templates.
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    templates: BTreeMap<String, CompiledTemplate>,
}

impl HtmlRenderer {
    /// Build a renderer from the built-in templates.
    ///
    /// # Errors
    ///
    /// Returns an error if a built-in template fails to compile.
    pub fn builtin() -> Result<Self> {
        Self::from_sources([(VIEW_TEMPLATE, DEFAULT_VIEW), (EDIT_TEMPLATE, DEFAULT_EDIT)])
    }

    /// Build a renderer from `view.html` and `edit.html` in `dir`.
    ///
    /// A directory without `view.html` may provide the record page as
    /// `dog.html` instead.
    ///
    /// # Errors
    ///
    /// Returns an error if either file can't be read or compiled.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut templates = BTreeMap::new();
        for key in [VIEW_TEMPLATE, EDIT_TEMPLATE] {
            let mut path = dir.join(format!("{key}.html"));
            if key == VIEW_TEMPLATE && !path.exists() {
                let alias = dir.join(VIEW_TEMPLATE_ALIAS);
                if alias.exists() {
                    debug!("Using {} for the {key} template", alias.display());
                    path = alias;
                }
            }
            let source = fs::read_to_string(&path)
                .map_err(|err| Error::template(path.display().to_string(), err.to_string()))?;
            templates.insert(key.to_string(), CompiledTemplate::compile(key, &source)?);
        }
        Ok(Self { templates })
    }

    /// Build a renderer from `(key, source)` pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if any source fails to compile.
    pub fn from_sources<'a>(sources: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<Self> {
        let templates = sources
            .into_iter()
            .map(|(key, source)| -> Result<(String, CompiledTemplate)> {
                Ok((key.to_string(), CompiledTemplate::compile(key, source)?))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;
        Ok(Self { templates })
    }

    /// Load templates from `dir` if given, otherwise use the built-ins.
    ///
    /// # Errors
    ///
    /// Returns an error if the templates can't be loaded or compiled.
    pub fn load(dir: Option<&Path>) -> Result<Self> {
        match dir {
            Some(dir) => Self::from_dir(dir),
            None => Self::builtin(),
        }
    }
}

impl RenderSink for HtmlRenderer {
    fn render(&self, template: &str, record: &Record) -> Result<String> {
        let compiled = self
            .templates
            .get(template)
            .ok_or_else(|| Error::render(template, "no such template"))?;
        Ok(compiled.render(record))
    }
}

/// Escape `text` for use in HTML element content and quoted attributes.
fn escape_html_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
}
