//! Statement-level parsing of a comment-stripped graph description.
//!
//! The parser walks the body statement by statement. Within a statement the
//! token stream is consumed greedily, one statement shape at a time, so DOT
//! bodies without separators (`A B C`) still produce three nodes.

use log::{debug, trace};

use dotscape_core::model::{Graph, RenderKind};

use crate::{
    ParseOutput,
    attributes::{self, Attribute, NodeAttributes},
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    scanner::{self, EdgeOp, Token, TokenKind},
    span::Span,
};

/// Graph-level keywords. A bare occurrence at statement level is never a node.
const GRAPH_KEYWORDS: [&str; 9] = [
    "layout",
    "ranksep",
    "concentrate",
    "overlap",
    "splines",
    "nodesep",
    "rankdir",
    "size",
    "ratio",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    Node,
    Edge,
    Graph,
    Digraph,
    Subgraph,
    Strict,
}

impl Keyword {
    fn from_ident(text: &str) -> Option<Self> {
        match text.to_ascii_lowercase().as_str() {
            "node" => Some(Self::Node),
            "edge" => Some(Self::Edge),
            "graph" => Some(Self::Graph),
            "digraph" => Some(Self::Digraph),
            "subgraph" => Some(Self::Subgraph),
            "strict" => Some(Self::Strict),
            _ => None,
        }
    }
}

fn is_graph_keyword(text: &str) -> bool {
    GRAPH_KEYWORDS
        .iter()
        .any(|keyword| keyword.eq_ignore_ascii_case(text))
}

/// Parses `source` into a graph plus the warnings for skipped fragments.
pub fn parse_source(source: &str) -> Result<ParseOutput, ParseError> {
    let text = scanner::strip_comments(source);
    if text.trim().is_empty() {
        return Err(Diagnostic::error("input contains no graph")
            .with_code(ErrorCode::E100)
            .with_label(Span::new(0..source.len()), "nothing to parse")
            .with_help("start with `digraph G { ... }` or `graph G { ... }`")
            .into());
    }

    let mut diagnostics = DiagnosticCollector::new();

    let header = scanner::find_header(&text);
    let body = match &header {
        Some(header) => {
            if !header.closed {
                diagnostics.emit(
                    Diagnostic::warning("graph body is never closed")
                        .with_code(ErrorCode::W205)
                        .with_label(Span::new(text.len()..text.len()), "expected `}`")
                        .with_secondary_label(header.span, "graph opened here"),
                );
            }
            header.body
        }
        None => Span::new(0..text.len()),
    };

    let statements: Vec<Vec<Token>> = scanner::split_statements(&text, body)
        .into_iter()
        .map(|chunk| scanner::tokenize(&text, chunk))
        .collect();

    let directed = match &header {
        Some(header) => header.directed,
        None => scanner::mentions_digraph(&text) || first_edge_op(&statements) == Some(EdgeOp::Directed),
    };

    let mut graph = Graph::new(directed);
    if let Some(name) = header.as_ref().and_then(|h| h.name.clone()) {
        graph = graph.with_name(name);
    }
    if let Some(header) = &header {
        debug!(
            directed = header.directed,
            strict = header.strict,
            name:? = graph.name();
            "Detected graph header"
        );
    }

    let mut parser = Parser {
        text: &text,
        graph,
        diagnostics,
        operator: if directed {
            EdgeOp::Directed
        } else {
            EdgeOp::Undirected
        },
        explicit_kind: Vec::new(),
        recognized: 0,
    };

    for tokens in &statements {
        parser.parse_tokens(tokens);
    }

    if header.is_none() && parser.recognized == 0 {
        parser.diagnostics.emit(
            Diagnostic::error("no graph header or statement could be recognized")
                .with_code(ErrorCode::E101)
                .with_label(Span::new(0..source.len()), "unreadable input")
                .with_help("start with `digraph G { ... }` or `graph G { ... }`"),
        );
    }

    parser.apply_graph_splines();

    let Parser {
        graph, diagnostics, ..
    } = parser;
    let warnings = diagnostics.finish()?;

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        warnings = warnings.len();
        "Parsed graph"
    );

    Ok(ParseOutput { graph, warnings })
}

fn first_edge_op(statements: &[Vec<Token>]) -> Option<EdgeOp> {
    statements.iter().flatten().find_map(|token| match token.kind {
        TokenKind::EdgeOp(op) => Some(op),
        _ => None,
    })
}

struct Parser<'a> {
    text: &'a str,
    graph: Graph,
    diagnostics: DiagnosticCollector,
    operator: EdgeOp,
    /// Per edge, whether it carried its own `splines` attribute.
    explicit_kind: Vec<bool>,
    /// Number of node, edge and assignment statements seen.
    recognized: usize,
}

impl Parser<'_> {
    fn parse_tokens(&mut self, tokens: &[Token]) {
        let mut i = 0;
        while i < tokens.len() {
            i = self.statement(tokens, i);
        }
    }

    /// Parses one statement starting at `i` and returns the index after it.
    fn statement(&mut self, tokens: &[Token], i: usize) -> usize {
        let token = &tokens[i];
        match &token.kind {
            TokenKind::Ident { text, quoted } => {
                if matches!(kind_at(tokens, i + 1), Some(TokenKind::Equals)) {
                    return self.assignment(tokens, i);
                }
                let starts_edge = matches!(kind_at(tokens, i + 1), Some(TokenKind::EdgeOp(_)));
                if !quoted {
                    if let Some(keyword) = Keyword::from_ident(text) {
                        return self.keyword_statement(keyword, tokens, i);
                    }
                    if is_graph_keyword(text) && !starts_edge {
                        self.unexpected(token, "graph attribute without a value");
                        return i + 1;
                    }
                }
                self.node_or_edge(tokens, i)
            }
            TokenKind::EdgeOp(op) => {
                self.diagnostics.emit(
                    Diagnostic::warning(format!("edge operator `{}` has no source", op.as_str()))
                        .with_code(ErrorCode::W202)
                        .with_label(token.span, "missing source node"),
                );
                i + 1
            }
            TokenKind::AttrList { .. } => {
                self.unexpected(token, "attribute list without a node or edge");
                i + 1
            }
            TokenKind::Equals => {
                self.unexpected(token, "assignment without a key");
                i + 1
            }
            TokenKind::Unterminated => {
                self.diagnostics.emit(
                    Diagnostic::warning("unterminated string")
                        .with_code(ErrorCode::W203)
                        .with_label(token.span, "missing closing `\"`"),
                );
                i + 1
            }
            TokenKind::Other => {
                self.unexpected(token, "not part of any statement");
                i + 1
            }
        }
    }

    /// `key = value` at statement level: a graph attribute, never a node.
    fn assignment(&mut self, tokens: &[Token], i: usize) -> usize {
        let key = ident_text(&tokens[i]).unwrap_or_default().to_string();
        match tokens.get(i + 2) {
            Some(Token {
                kind: TokenKind::Ident { text, .. },
                ..
            }) => {
                trace!(key = key.as_str(), value = text.as_str(); "Graph attribute");
                self.graph.set_attribute(key, text.clone());
                self.recognized += 1;
                i + 3
            }
            _ => {
                let span = tokens[i].span.union(tokens[i + 1].span);
                self.diagnostics.emit(
                    Diagnostic::warning(format!("attribute `{key}` has no value"))
                        .with_code(ErrorCode::W201)
                        .with_label(span, "skipped"),
                );
                i + 2
            }
        }
    }

    fn keyword_statement(&mut self, keyword: Keyword, tokens: &[Token], i: usize) -> usize {
        match keyword {
            Keyword::Node | Keyword::Edge | Keyword::Graph => {
                if !matches!(kind_at(tokens, i + 1), Some(TokenKind::AttrList { .. })) {
                    self.unexpected(&tokens[i], "keyword without an attribute list");
                    return i + 1;
                }
                let (attributes, next) = self.attribute_lists(tokens, i + 1);
                if keyword == Keyword::Graph {
                    for Attribute { key, value, .. } in attributes {
                        self.graph.set_attribute(key, value);
                    }
                } else {
                    trace!(keyword:? = keyword, count = attributes.len(); "Discarded default attributes");
                }
                self.recognized += 1;
                next
            }
            Keyword::Subgraph => {
                // A subgraph name is never a node; its body is flattened.
                match kind_at(tokens, i + 1) {
                    Some(TokenKind::Ident { .. })
                        if !matches!(kind_at(tokens, i + 2), Some(TokenKind::EdgeOp(_))) =>
                    {
                        i + 2
                    }
                    _ => i + 1,
                }
            }
            Keyword::Digraph | Keyword::Strict => {
                self.unexpected(&tokens[i], "keyword outside a graph header");
                i + 1
            }
        }
    }

    fn node_or_edge(&mut self, tokens: &[Token], i: usize) -> usize {
        let mut ids: Vec<String> = ident_text(&tokens[i]).map(str::to_string).into_iter().collect();
        let mut j = i + 1;

        while let Some(TokenKind::EdgeOp(op)) = kind_at(tokens, j) {
            let op = *op;
            let op_span = tokens[j].span;
            match tokens.get(j + 1) {
                Some(Token {
                    kind: TokenKind::Ident { text, .. },
                    ..
                }) => {
                    if op != self.operator {
                        self.diagnostics.emit(
                            Diagnostic::warning(format!(
                                "`{}` used in {} graph",
                                op.as_str(),
                                if self.graph.is_directed() {
                                    "a directed"
                                } else {
                                    "an undirected"
                                }
                            ))
                            .with_code(ErrorCode::W204)
                            .with_label(op_span, "edge created anyway")
                            .with_help(format!("use `{}`", self.operator.as_str())),
                        );
                    }
                    ids.push(text.clone());
                    j += 2;
                }
                _ => {
                    self.diagnostics.emit(
                        Diagnostic::warning(format!("edge operator `{}` has no target", op.as_str()))
                            .with_code(ErrorCode::W202)
                            .with_label(op_span, "missing target node"),
                    );
                    j += 1;
                    break;
                }
            }
        }

        let (attributes, next) = self.attribute_lists(tokens, j);
        self.recognized += 1;

        if ids.len() == 1 {
            let NodeAttributes { label, style } = attributes::node_attributes(attributes);
            self.graph.ensure_node(&ids[0]).merge_definition(label, style);
        } else {
            let settings = attributes::edge_attributes(attributes);
            for hop in ids.windows(2) {
                let edge = self.graph.connect(&hop[0], &hop[1]);
                edge.set_attributes(settings.attributes.clone());
                if let Some(kind) = settings.render_kind {
                    edge.set_render_kind(kind);
                }
                self.explicit_kind.push(settings.render_kind.is_some());
            }
        }

        next
    }

    /// Consumes consecutive attribute lists starting at `i`.
    fn attribute_lists(&mut self, tokens: &[Token], mut i: usize) -> (Vec<Attribute>, usize) {
        let mut collected = Vec::new();
        while let Some(token) = tokens.get(i) {
            let TokenKind::AttrList {
                content,
                terminated,
            } = token.kind
            else {
                break;
            };
            if !terminated {
                self.diagnostics.emit(
                    Diagnostic::warning("attribute list is never closed")
                        .with_code(ErrorCode::W203)
                        .with_label(token.span, "missing `]`"),
                );
            }
            collected.extend(attributes::parse_list(
                self.text,
                content,
                &mut self.diagnostics,
            ));
            i += 1;
        }
        (collected, i)
    }

    fn unexpected(&mut self, token: &Token, reason: &str) {
        let fragment = self.text[token.span.range()].trim();
        self.diagnostics.emit(
            Diagnostic::warning(format!("skipped `{fragment}`"))
                .with_code(ErrorCode::W200)
                .with_label(token.span, reason),
        );
    }

    /// Applies a graph-level `splines` value to edges without their own.
    fn apply_graph_splines(&mut self) {
        let Some(kind) = self
            .graph
            .attribute("splines")
            .and_then(|value| value.parse::<RenderKind>().ok())
        else {
            return;
        };

        for (edge, explicit) in self.graph.edges_mut().zip(&self.explicit_kind) {
            if !explicit {
                edge.set_render_kind(kind);
            }
        }
    }
}

fn kind_at(tokens: &[Token], i: usize) -> Option<&TokenKind> {
    tokens.get(i).map(|token| &token.kind)
}

fn ident_text(token: &Token) -> Option<&str> {
    match &token.kind {
        TokenKind::Ident { text, .. } => Some(text),
        _ => None,
    }
}
