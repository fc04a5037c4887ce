//! Lexical helpers: comment stripping, header detection, statement
//! splitting and tokenization.
//!
//! Every function works on text whose byte offsets match the original input,
//! so the spans it produces can be reported against the source directly.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::span::Span;

static HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)^\s*(?:(?P<strict>strict)\s+)?(?P<kind>digraph|graph)\b\s*(?P<name>"(?:[^"\\]|\\.)*"|[^\s{]+)?\s*\{"#,
    )
    .expect("header regex is valid")
});

const BOM: char = '\u{FEFF}';

static DIGRAPH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bdigraph\b").expect("digraph regex is valid"));

/// Replaces comments with spaces, keeping newlines and byte offsets intact.
///
/// Handles `// line`, `/* block */` and `#` lines (a `#` preceded only by
/// whitespace on its line). Comment markers inside quoted strings are text.
/// A leading byte-order mark is blanked as well.
pub fn strip_comments(source: &str) -> String {
    let bytes = source.as_bytes();
    let mut out = bytes.to_vec();
    let mut i = 0;
    let mut in_string = false;
    let mut at_line_start = true;

    let blank = |out: &mut [u8], from: usize, to: usize| {
        for byte in &mut out[from..to] {
            if *byte != b'\n' {
                *byte = b' ';
            }
        }
    };

    if source.starts_with(BOM) {
        blank(&mut out, 0, BOM.len_utf8());
        i = BOM.len_utf8();
    }

    while i < bytes.len() {
        let byte = bytes[i];

        if in_string {
            match byte {
                b'\\' => i += 1,
                b'"' => in_string = false,
                _ => {}
            }
            i += 1;
            continue;
        }

        match byte {
            b'"' => {
                in_string = true;
                at_line_start = false;
                i += 1;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                let end = line_end(bytes, i);
                blank(&mut out, i, end);
                i = end;
            }
            b'#' if at_line_start => {
                let end = line_end(bytes, i);
                blank(&mut out, i, end);
                i = end;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let end = find_from(bytes, i + 2, b"*/").map_or(bytes.len(), |pos| pos + 2);
                blank(&mut out, i, end);
                i = end;
            }
            b'\n' => {
                at_line_start = true;
                i += 1;
            }
            b' ' | b'\t' | b'\r' => i += 1,
            _ => {
                at_line_start = false;
                i += 1;
            }
        }
    }

    // Only whole comments and the byte-order mark are blanked, and those end
    // on character boundaries, so the buffer is still valid UTF-8.
    String::from_utf8_lossy(&out).into_owned()
}

fn line_end(bytes: &[u8], from: usize) -> usize {
    bytes[from..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(bytes.len(), |pos| from + pos)
}

fn find_from(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if from >= bytes.len() {
        return None;
    }
    bytes[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| from + pos)
}

/// The `[strict] (di)graph [name] {` header of a graph description.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub strict: bool,
    pub directed: bool,
    pub name: Option<String>,
    /// The header text itself, up to and including `{`.
    pub span: Span,
    /// The graph body between the header and its closing brace.
    pub body: Span,
    /// Whether a closing `}` was found.
    pub closed: bool,
}

/// Detects the graph header of a comment-stripped text.
pub fn find_header(text: &str) -> Option<Header> {
    let captures = HEADER_RE.captures(text)?;
    let whole = captures.get(0)?;

    let name = captures.name("name").map(|m| {
        let raw = m.as_str();
        if raw.starts_with('"') {
            unescape(raw.trim_start_matches('"').trim_end_matches('"'))
        } else {
            raw.to_string()
        }
    });

    let body_start = whole.end();
    let close = text[body_start..].rfind('}').map(|pos| body_start + pos);

    Some(Header {
        strict: captures.name("strict").is_some(),
        directed: captures
            .name("kind")
            .is_some_and(|m| m.as_str().eq_ignore_ascii_case("digraph")),
        name,
        span: Span::new(whole.start()..whole.end()),
        body: Span::new(body_start..close.unwrap_or(text.len())),
        closed: close.is_some(),
    })
}

/// Returns `true` if the `digraph` keyword appears anywhere in the text.
pub fn mentions_digraph(text: &str) -> bool {
    DIGRAPH_RE.is_match(text)
}

/// Splits a body into statement chunks.
///
/// Statements end at `;`, newline, `{` or `}` when these occur outside
/// quotes and outside an attribute list. A `[` only opens a list when its
/// `]` comes before the next `{`, `}` or `[`, so an unclosed list ends its
/// own statement and nothing after it. Blank chunks are dropped.
pub fn split_statements(text: &str, body: Span) -> Vec<Span> {
    let bytes = text.as_bytes();
    let mut chunks = Vec::new();
    let mut start = body.start();
    let mut in_string = false;
    let mut i = body.start();

    let push = |chunks: &mut Vec<Span>, from: usize, to: usize| {
        if text[from..to].trim().is_empty() {
            return;
        }
        chunks.push(Span::new(from..to));
    };

    while i < body.end() {
        let byte = bytes[i];
        if in_string {
            match byte {
                b'\\' => i += 1,
                b'"' => in_string = false,
                _ => {}
            }
            i += 1;
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'[' => {
                if let Ok(close) = find_list_end(bytes, i + 1, body.end()) {
                    i = close;
                }
            }
            b';' | b'\n' | b'{' | b'}' => {
                push(&mut chunks, start, i);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    push(&mut chunks, start, body.end().min(text.len()));

    chunks
}

/// An edge operator as written in the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOp {
    /// `->`
    Directed,
    /// `--`
    Undirected,
}

impl EdgeOp {
    pub fn as_str(self) -> &'static str {
        match self {
            EdgeOp::Directed => "->",
            EdgeOp::Undirected => "--",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// A node id or value. `quoted` ids are never keywords.
    Ident { text: String, quoted: bool },
    EdgeOp(EdgeOp),
    /// A bracketed attribute list; `content` excludes the brackets.
    AttrList { content: Span, terminated: bool },
    Equals,
    /// A quoted string without its closing quote.
    Unterminated,
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

fn is_ident_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'.' || byte >= 0x80
}

/// Tokenizes one statement chunk.
pub fn tokenize(text: &str, chunk: Span) -> Vec<Token> {
    let bytes = text.as_bytes();
    let end = chunk.end();
    let mut tokens = Vec::new();
    let mut i = chunk.start();

    while i < end {
        let byte = bytes[i];
        let start = i;

        if byte.is_ascii_whitespace() || byte == b',' {
            i += 1;
            continue;
        }

        let kind = match byte {
            b'-' if bytes.get(i + 1) == Some(&b'>') => {
                i += 2;
                TokenKind::EdgeOp(EdgeOp::Directed)
            }
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                i += 2;
                TokenKind::EdgeOp(EdgeOp::Undirected)
            }
            b'=' => {
                i += 1;
                TokenKind::Equals
            }
            b'[' => {
                let (close, terminated) = match find_list_end(bytes, i + 1, end) {
                    Ok(pos) => (pos, true),
                    Err(stop) => (stop, false),
                };
                i = if terminated { close + 1 } else { close };
                TokenKind::AttrList {
                    content: Span::new(start + 1..close),
                    terminated,
                }
            }
            b'"' => match find_string_end(bytes, i + 1, end) {
                Some(close) => {
                    i = skip_port(bytes, close + 1, end);
                    TokenKind::Ident {
                        text: unescape(&text[start + 1..close]),
                        quoted: true,
                    }
                }
                None => {
                    i = end;
                    TokenKind::Unterminated
                }
            },
            b'-' if bytes.get(i + 1).is_some_and(|b| b.is_ascii_digit() || *b == b'.') => {
                i = scan_ident(bytes, i + 1, end);
                let text_end = i;
                i = skip_port(bytes, i, end);
                TokenKind::Ident {
                    text: text[start..text_end].to_string(),
                    quoted: false,
                }
            }
            b if is_ident_byte(b) => {
                i = scan_ident(bytes, i, end);
                let text_end = i;
                i = skip_port(bytes, i, end);
                TokenKind::Ident {
                    text: text[start..text_end].to_string(),
                    quoted: false,
                }
            }
            _ => {
                i += 1;
                TokenKind::Other
            }
        };

        tokens.push(Token {
            kind,
            span: Span::new(start..i.min(end)),
        });
    }

    tokens
}

fn scan_ident(bytes: &[u8], mut i: usize, end: usize) -> usize {
    while i < end && is_ident_byte(bytes[i]) {
        i += 1;
    }
    i
}

/// Skips `:port` and `:port:compass` suffixes.
fn skip_port(bytes: &[u8], mut i: usize, end: usize) -> usize {
    while i < end && bytes[i] == b':' {
        let next = i + 1;
        if next < end && bytes[next] == b'"' {
            match find_string_end(bytes, next + 1, end) {
                Some(close) => i = close + 1,
                None => return i,
            }
        } else if next < end && is_ident_byte(bytes[next]) {
            i = scan_ident(bytes, next, end);
        } else {
            return i;
        }
    }
    i
}

fn find_string_end(bytes: &[u8], mut i: usize, end: usize) -> Option<usize> {
    while i < end {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Some(i),
            _ => i += 1,
        }
    }
    None
}

/// Finds the `]` closing a list whose content starts at `i`.
///
/// Returns `Err` with the position of the first `{`, `}` or `[` outside
/// quotes (or `end`) when the list is never closed before it. A `;` is a
/// pair separator inside a list, not a boundary.
fn find_list_end(bytes: &[u8], mut i: usize, end: usize) -> Result<usize, usize> {
    let mut in_string = false;
    while i < end {
        let byte = bytes[i];
        if in_string {
            match byte {
                b'\\' => i += 1,
                b'"' => in_string = false,
                _ => {}
            }
        } else {
            match byte {
                b'"' => in_string = true,
                b']' => return Ok(i),
                b'{' | b'}' | b'[' => return Err(i),
                _ => {}
            }
        }
        i += 1;
    }
    Err(end.min(bytes.len()))
}

/// Resolves `\"` escapes and backslash-newline continuations.
///
/// Other escapes such as `\n` are kept verbatim for downstream renderers.
pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('"') => {
                out.push('"');
                chars.next();
            }
            Some('\n') => {
                chars.next();
            }
            Some('\r') => {
                chars.next();
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            _ => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idents(text: &str) -> Vec<String> {
        tokenize(text, Span::new(0..text.len()))
            .into_iter()
            .filter_map(|token| match token.kind {
                TokenKind::Ident { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_strip_comments_preserves_offsets() {
        let source = "A // note\n/* x\ny */ B\n# pre\nC \"//kept\"";
        let stripped = strip_comments(source);

        assert_eq!(stripped.len(), source.len());
        assert_eq!(stripped.lines().count(), source.lines().count());
        assert!(!stripped.contains("note"));
        assert!(!stripped.contains("pre"));
        assert!(stripped.contains("\"//kept\""));
        assert_eq!(stripped.find('B'), source.find('B'));
    }

    #[test]
    fn test_hash_mid_line_is_text() {
        let stripped = strip_comments("A [color=\"#ff0000\"] B #x");
        assert!(stripped.contains("#ff0000"));
        assert!(stripped.contains("#x"));
    }

    #[test]
    fn test_find_header() {
        let text = "strict digraph \"My Graph\" {\n A -> B\n}";
        let header = find_header(text).expect("header present");

        assert!(header.strict);
        assert!(header.directed);
        assert!(header.closed);
        assert_eq!(header.name.as_deref(), Some("My Graph"));
        assert_eq!(text[header.body.range()].trim(), "A -> B");
    }

    #[test]
    fn test_find_header_anonymous_graph() {
        let header = find_header("graph { A -- B }").expect("header present");
        assert!(!header.directed);
        assert_eq!(header.name, None);
    }

    #[test]
    fn test_split_statements_respects_lists_and_quotes() {
        let text = "A [label=\"x;y\",\n color=red]; B\nC { D }";
        let chunks: Vec<&str> = split_statements(text, Span::new(0..text.len()))
            .into_iter()
            .map(|span| text[span.range()].trim())
            .collect();

        assert_eq!(chunks, vec!["A [label=\"x;y\",\n color=red]", "B", "C", "D"]);
    }

    #[test]
    fn test_unclosed_list_ends_its_statement() {
        let text = "A -> B [label=\"x\" ; C; D -> E";
        let chunks: Vec<&str> = split_statements(text, Span::new(0..text.len()))
            .into_iter()
            .map(|span| text[span.range()].trim())
            .collect();

        assert_eq!(chunks, vec!["A -> B [label=\"x\"", "C", "D -> E"]);
    }

    #[test]
    fn test_semicolon_inside_closed_list() {
        let text = "A [color=red; label=x]; B";
        let chunks: Vec<&str> = split_statements(text, Span::new(0..text.len()))
            .into_iter()
            .map(|span| text[span.range()].trim())
            .collect();

        assert_eq!(chunks, vec!["A [color=red; label=x]", "B"]);
    }

    #[test]
    fn test_tokenize_unclosed_list_stops_at_next_list() {
        let text = "A [color=red [label=x]";
        let tokens = tokenize(text, Span::new(0..text.len()));

        let lists: Vec<(&str, bool)> = tokens
            .iter()
            .filter_map(|token| match token.kind {
                TokenKind::AttrList {
                    content,
                    terminated,
                } => Some((text[content.range()].trim(), terminated)),
                _ => None,
            })
            .collect();
        assert_eq!(lists, vec![("color=red", false), ("label=x", true)]);
    }

    #[test]
    fn test_strip_comments_blanks_byte_order_mark() {
        let source = "\u{FEFF}digraph G { A }";
        let stripped = strip_comments(source);

        assert_eq!(stripped.len(), source.len());
        assert!(stripped.starts_with("   digraph"));
        let header = find_header(&stripped).expect("header present");
        assert_eq!(header.name.as_deref(), Some("G"));
    }

    #[test]
    fn test_tokenize_edge_chain() {
        let text = "\"Long Name\" -> b:p1:n -> c.d [style=dashed]";
        let tokens = tokenize(text, Span::new(0..text.len()));

        assert_eq!(idents(text), vec!["Long Name", "b", "c.d"]);
        assert!(matches!(
            tokens.last().map(|t| &t.kind),
            Some(TokenKind::AttrList {
                terminated: true,
                ..
            })
        ));
    }

    #[test]
    fn test_tokenize_negative_number_value() {
        assert_eq!(idents("x = -1.5"), vec!["x", "-1.5"]);
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r#"say \"hi\""#), "say \"hi\"");
        assert_eq!(unescape("a\\\nb"), "ab");
        assert_eq!(unescape(r"line\nbreak"), r"line\nbreak");
    }
}
