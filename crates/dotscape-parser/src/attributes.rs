//! Attribute list parsing and mapping onto node and edge styles.

use once_cell::sync::Lazy;
use regex::Regex;

use dotscape_core::model::{EdgeAttributes, NodeStyle, RenderKind};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    scanner::unescape,
    span::Span,
};

static ATTRIBUTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?P<key>[\w.]+)\s*=\s*(?:"(?P<quoted>(?:[^"\\]|\\.)*)"|<(?P<html>(?:[^<>]|<[^<>]*>)*)>|(?P<bare>[^,;\s\]"]+))"#,
    )
    .expect("attribute regex is valid")
});

/// A single `key=value` pair with the span it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub key: String,
    pub value: String,
    pub span: Span,
}

/// Parses the content of one `[...]` list.
///
/// Pairs may be separated by `,`, `;` or whitespace. Any other text that is
/// not part of a pair is skipped and reported as a [`ErrorCode::W201`]
/// warning.
pub fn parse_list(
    text: &str,
    content: Span,
    diagnostics: &mut DiagnosticCollector,
) -> Vec<Attribute> {
    let source = &text[content.range()];
    let base = content.start();
    let mut attributes = Vec::new();
    let mut cursor = 0;

    for captures in ATTRIBUTE_RE.captures_iter(source) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        report_leftover(source, base, cursor, whole.start(), diagnostics);
        cursor = whole.end();

        let value = if let Some(quoted) = captures.name("quoted") {
            unescape(quoted.as_str())
        } else if let Some(html) = captures.name("html") {
            html.as_str().to_string()
        } else if let Some(bare) = captures.name("bare") {
            bare.as_str().to_string()
        } else {
            continue;
        };

        attributes.push(Attribute {
            key: captures["key"].to_string(),
            value,
            span: Span::new(base + whole.start()..base + whole.end()),
        });
    }
    report_leftover(source, base, cursor, source.len(), diagnostics);

    attributes
}

fn report_leftover(
    source: &str,
    base: usize,
    from: usize,
    to: usize,
    diagnostics: &mut DiagnosticCollector,
) {
    let gap = &source[from..to];
    let is_separator = |c: char| c.is_whitespace() || c == ',' || c == ';';
    let trimmed = gap.trim_matches(is_separator);
    if trimmed.is_empty() {
        return;
    }

    let offset = gap.find(|c: char| !is_separator(c)).unwrap_or(0);
    let start = base + from + offset;
    diagnostics.emit(
        Diagnostic::warning(format!("malformed attribute `{trimmed}`"))
            .with_code(ErrorCode::W201)
            .with_label(Span::new(start..start + trimmed.len()), "skipped")
            .with_help("attributes are written as key=value or key=\"value\""),
    );
}

/// The structured form of a node's attribute lists.
#[derive(Debug, Default)]
pub struct NodeAttributes {
    pub label: Option<String>,
    pub style: NodeStyle,
}

/// Maps node attributes onto a label and [`NodeStyle`].
///
/// `color` becomes the stroke, `fillcolor` the background; unrecognized keys
/// are kept verbatim in the extension map. Later keys win.
pub fn node_attributes(attributes: Vec<Attribute>) -> NodeAttributes {
    let mut result = NodeAttributes::default();
    for Attribute { key, value, .. } in attributes {
        match key.as_str() {
            "label" => result.label = Some(value),
            "color" => result.style.stroke = Some(value),
            "fillcolor" => result.style.background = Some(value),
            "style" => result.style.style = Some(value),
            "shape" => result.style.shape = Some(value),
            _ => {
                result.style.extra.insert(key, value);
            }
        }
    }
    result
}

/// The structured form of an edge's attribute lists.
#[derive(Debug, Default)]
pub struct EdgeSettings {
    pub attributes: EdgeAttributes,
    /// Set when the edge carries its own `splines` value.
    pub render_kind: Option<RenderKind>,
}

/// Maps edge attributes onto [`EdgeAttributes`] and an explicit render kind.
pub fn edge_attributes(attributes: Vec<Attribute>) -> EdgeSettings {
    let mut result = EdgeSettings::default();
    for Attribute { key, value, .. } in attributes {
        match key.as_str() {
            "label" => result.attributes.label = Some(value),
            "color" => result.attributes.stroke = Some(value),
            "style" => result.attributes.style = Some(value),
            "splines" => match value.parse::<RenderKind>() {
                Ok(kind) => result.render_kind = Some(kind),
                Err(_) => {
                    result.attributes.extra.insert(key, value);
                }
            },
            _ => {
                result.attributes.extra.insert(key, value);
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> (Vec<Attribute>, Vec<Diagnostic>) {
        let mut diagnostics = DiagnosticCollector::new();
        let attributes = parse_list(content, Span::new(0..content.len()), &mut diagnostics);
        let warnings = diagnostics.finish().expect("only warnings");
        (attributes, warnings)
    }

    #[test]
    fn test_parse_list_separators() {
        let (attributes, warnings) = parse(r#"label="Hello World", color=red; shape=box style = filled"#);

        let pairs: Vec<(&str, &str)> = attributes
            .iter()
            .map(|a| (a.key.as_str(), a.value.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("label", "Hello World"),
                ("color", "red"),
                ("shape", "box"),
                ("style", "filled"),
            ]
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_parse_list_escaped_quote_and_html() {
        let (attributes, _) = parse(r#"label="say \"hi\"", tooltip=<<b>x</b>>"#);

        assert_eq!(attributes[0].value, "say \"hi\"");
        assert_eq!(attributes[1].value, "<b>x</b>");
    }

    #[test]
    fn test_parse_list_skips_malformed_fragments() {
        let source = "=red, bold, label=ok";
        let (attributes, warnings) = parse(source);

        assert_eq!(attributes.len(), 1);
        assert_eq!(attributes[0].key, "label");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code(), Some(ErrorCode::W201));

        let span = warnings[0].labels()[0].span();
        assert_eq!(&source[span.range()], "=red, bold");
    }

    #[test]
    fn test_node_attributes_mapping() {
        let (attributes, _) = parse(r##"label=Start, color=blue, fillcolor="#eee", shape=box, width=2"##);
        let mapped = node_attributes(attributes);

        assert_eq!(mapped.label.as_deref(), Some("Start"));
        assert_eq!(mapped.style.stroke.as_deref(), Some("blue"));
        assert_eq!(mapped.style.background.as_deref(), Some("#eee"));
        assert_eq!(mapped.style.shape.as_deref(), Some("box"));
        assert_eq!(mapped.style.extra.get("width").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_edge_attributes_mapping() {
        let (attributes, _) = parse("label=go, color=red, splines=ortho, weight=3");
        let mapped = edge_attributes(attributes);

        assert_eq!(mapped.attributes.label.as_deref(), Some("go"));
        assert_eq!(mapped.attributes.stroke.as_deref(), Some("red"));
        assert_eq!(mapped.render_kind, Some(RenderKind::Orthogonal));
        assert_eq!(
            mapped.attributes.extra.get("weight").map(String::as_str),
            Some("3")
        );
    }
}
