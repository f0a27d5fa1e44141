//! EJS templates (asynchronous renderer).
//!
//! Supported tags:
//!
//! | tag                              | effect                                  |
//! |----------------------------------|-----------------------------------------|
//! | `<%= expr %>`                    | HTML-escaped output                     |
//! | `<%- expr %>`                    | raw output                              |
//! | `<%- include('path') %>`         | render a partial with the same bindings |
//! | `<% if (cond) { %>`              | conditional, with `} else if` / `} else` |
//! | `<% for (const x of xs) { %>`    | loop over an array                      |
//! | `<% xs.forEach((x, i) => { %>`   | loop with an optional index             |
//! | `<% } %>` / `<% }) %>`           | close the innermost block               |
//! | `<%# ... %>`                     | comment                                 |
//! | `<%%`                            | literal `<%`                            |
//! | `-%>`                            | trim the following newline              |
//! | `_%>` / `<%_`                    | slurp whitespace after / before the tag |
//!
//! Expressions are variable paths (`title`, `user.name`, `items[0]`,
//! `items.length`, `locals.title`) or literals. Conditions combine them
//! with comparisons, `!`, `&&` and `||`. Any other scriptlet is rejected
//! at compile time. Loop variables shadow bindings of the same name.
//!
//! Includes are read at render time, relative to the including file;
//! paths starting with `/` resolve against the load root.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;

use super::{Renderer, TemplateContext, TemplateEngine};
use crate::utils::html::escape;

/// Maximum include nesting depth.
const MAX_INCLUDE_DEPTH: usize = 32;

/// Built-in EJS-compatible engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct EjsEngine;

impl TemplateEngine for EjsEngine {
    fn compile(&self, source: &str, cx: &TemplateContext<'_>) -> Result<Renderer> {
        let template = Arc::new(Template::parse(source, cx.path, cx.root)?);
        Ok(Renderer::from_async(move |bindings| {
            let template = Arc::clone(&template);
            async move { template.render(&bindings, 0).await }.boxed()
        }))
    }
}

// =============================================================================
// Syntax
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Text(String),
    Output {
        expr: Expr,
        escape: bool,
    },
    Include {
        path: String,
        escape: bool,
    },
    /// First branch whose condition holds wins; `otherwise` runs if none does.
    If {
        branches: Vec<(Cond, Vec<Node>)>,
        otherwise: Vec<Node>,
    },
    Each {
        items: Expr,
        item: String,
        index: Option<String>,
        body: Vec<Node>,
    },
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Literal(Value),
    /// `locals` marks an explicit `locals.` prefix (lenient lookup).
    Path { locals: bool, segments: Vec<Segment> },
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Key(String),
    Index(usize),
}

#[derive(Debug, Clone, PartialEq)]
enum Cond {
    Any(Vec<Cond>),
    All(Vec<Cond>),
    Not(Box<Cond>),
    Compare(Expr, CmpOp, Expr),
    Truthy(Expr),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// Longest spellings first so `===` is not read as `==`.
const COMPARISONS: [(&str, CmpOp); 8] = [
    ("===", CmpOp::Eq),
    ("!==", CmpOp::Ne),
    ("==", CmpOp::Eq),
    ("!=", CmpOp::Ne),
    (">=", CmpOp::Ge),
    ("<=", CmpOp::Le),
    (">", CmpOp::Gt),
    ("<", CmpOp::Lt),
];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Open {
    Escaped,
    Raw,
    Comment,
    Scriptlet,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Close {
    Plain,
    TrimNewline,
    Slurp,
}

/// What a scriptlet tag does to the block structure.
#[derive(Debug, Clone, PartialEq)]
enum Directive {
    If(Cond),
    ElseIf(Cond),
    Else,
    Each {
        items: Expr,
        item: String,
        index: Option<String>,
    },
    End,
}

#[derive(Debug)]
struct Template {
    nodes: Vec<Node>,
    path: PathBuf,
    root: PathBuf,
}

/// Bindings plus loop variables, innermost last.
struct Scope<'v> {
    bindings: &'v Value,
    locals: Vec<(String, Value)>,
}

impl Template {
    fn parse(source: &str, path: &Path, root: &Path) -> Result<Self> {
        let nodes = parse(source).with_context(|| format!("cannot compile {}", path.display()))?;
        Ok(Self {
            nodes,
            path: path.to_path_buf(),
            root: root.to_path_buf(),
        })
    }

    fn render<'a>(&'a self, bindings: &'a Value, depth: usize) -> BoxFuture<'a, Result<String>> {
        async move {
            let scope = Scope {
                bindings,
                locals: Vec::new(),
            };
            let mut out = String::new();
            self.render_nodes(&self.nodes, &scope, depth, &mut out).await?;
            Ok(out)
        }
        .boxed()
    }

    fn render_nodes<'s>(
        &'s self,
        nodes: &'s [Node],
        scope: &'s Scope<'s>,
        depth: usize,
        out: &'s mut String,
    ) -> BoxFuture<'s, Result<()>> {
        async move {
            for node in nodes {
                match node {
                    Node::Text(text) => out.push_str(text),
                    Node::Output { expr, escape: esc } => {
                        let value = self.evaluate(expr, scope)?;
                        push_output(out, &value, *esc);
                    }
                    Node::Include { path, escape: esc } => {
                        let html = self.include(path, scope.bindings, depth).await?;
                        if *esc {
                            out.push_str(&escape(&html));
                        } else {
                            out.push_str(&html);
                        }
                    }
                    Node::If {
                        branches,
                        otherwise,
                    } => {
                        let mut chosen = otherwise;
                        for (cond, body) in branches {
                            if self.test(cond, scope)? {
                                chosen = body;
                                break;
                            }
                        }
                        self.render_nodes(chosen, scope, depth, out).await?;
                    }
                    Node::Each {
                        items,
                        item,
                        index,
                        body,
                    } => {
                        let list = match self.evaluate(items, scope)? {
                            Value::Array(list) => list,
                            other => bail!(
                                "cannot iterate over {} in {}",
                                type_name(&other),
                                self.path.display()
                            ),
                        };
                        for (i, value) in list.into_iter().enumerate() {
                            let mut inner = Scope {
                                bindings: scope.bindings,
                                locals: scope.locals.clone(),
                            };
                            inner.locals.push((item.clone(), value));
                            if let Some(index) = index {
                                inner.locals.push((index.clone(), Value::from(i)));
                            }
                            self.render_nodes(body, &inner, depth, out).await?;
                        }
                    }
                }
            }
            Ok(())
        }
        .boxed()
    }

    async fn include(&self, name: &str, bindings: &Value, depth: usize) -> Result<String> {
        if depth >= MAX_INCLUDE_DEPTH {
            bail!(
                "include nesting exceeds {MAX_INCLUDE_DEPTH} levels in {}",
                self.path.display()
            );
        }

        let path = self.resolve_include(name);
        let source = tokio::fs::read_to_string(&path).await.with_context(|| {
            format!(
                "cannot include {} from {}",
                path.display(),
                self.path.display()
            )
        })?;

        let partial = Self::parse(&source, &path, &self.root)?;
        partial.render(bindings, depth + 1).await
    }

    fn resolve_include(&self, name: &str) -> PathBuf {
        let mut path = match name.strip_prefix('/') {
            Some(rel) => self.root.join(rel),
            None => self
                .path
                .parent()
                .map_or_else(|| PathBuf::from(name), |dir| dir.join(name)),
        };
        if path.extension().is_none() {
            path.set_extension("ejs");
        }
        path
    }

    fn evaluate(&self, expr: &Expr, scope: &Scope<'_>) -> Result<Value> {
        let (locals, segments) = match expr {
            Expr::Literal(value) => return Ok(value.clone()),
            Expr::Path { locals, segments } => (*locals, segments.as_slice()),
        };

        // Loop variables shadow bindings.
        let local = match segments.split_first() {
            Some((Segment::Key(name), rest)) if !locals => scope
                .locals
                .iter()
                .rev()
                .find(|(local, _)| local == name)
                .map(|(_, value)| (value, rest)),
            _ => None,
        };
        let from_bindings = local.is_none();
        let (mut current, segments) = local.unwrap_or((scope.bindings, segments));

        for (i, segment) in segments.iter().enumerate() {
            if let (Segment::Key(key), Some(len)) = (segment, length(current))
                && key == "length"
            {
                let last = i + 1 == segments.len();
                return Ok(if last { Value::from(len) } else { Value::Null });
            }
            let next = match segment {
                Segment::Key(key) => current.get(key.as_str()),
                Segment::Index(index) => current.get(*index),
            };
            match next {
                Some(value) => current = value,
                None if i == 0 && from_bindings && !locals => {
                    bail!(
                        "`{}` is not defined in {}",
                        describe(segment),
                        self.path.display()
                    );
                }
                None => return Ok(Value::Null),
            }
        }
        Ok(current.clone())
    }

    fn test(&self, cond: &Cond, scope: &Scope<'_>) -> Result<bool> {
        Ok(match cond {
            Cond::Any(conds) => {
                for cond in conds {
                    if self.test(cond, scope)? {
                        return Ok(true);
                    }
                }
                false
            }
            Cond::All(conds) => {
                for cond in conds {
                    if !self.test(cond, scope)? {
                        return Ok(false);
                    }
                }
                true
            }
            Cond::Not(cond) => !self.test(cond, scope)?,
            Cond::Truthy(expr) => truthy(&self.evaluate(expr, scope)?),
            Cond::Compare(left, op, right) => {
                let left = self.evaluate(left, scope)?;
                let right = self.evaluate(right, scope)?;
                compare(&left, *op, &right)
            }
        })
    }
}

fn describe(segment: &Segment) -> String {
    match segment {
        Segment::Key(key) => key.clone(),
        Segment::Index(index) => index.to_string(),
    }
}

/// Append a value the way JavaScript stringifies it.
fn push_output(out: &mut String, value: &Value, esc: bool) {
    let text = stringify(value);
    if esc {
        out.push_str(&escape(&text));
    } else {
        out.push_str(&text);
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// `.length` of arrays and strings.
fn length(value: &Value) -> Option<usize> {
    match value {
        Value::Array(items) => Some(items.len()),
        Value::String(s) => Some(s.encode_utf16().count()),
        _ => None,
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn compare(left: &Value, op: CmpOp, right: &Value) -> bool {
    let ordering = match (left, right) {
        (Value::Number(a), Value::Number(b)) => a
            .as_f64()
            .zip(b.as_f64())
            .and_then(|(a, b)| a.partial_cmp(&b)),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    };
    match op {
        CmpOp::Eq => ordering.map_or(left == right, Ordering::is_eq),
        CmpOp::Ne => ordering.map_or(left != right, Ordering::is_ne),
        CmpOp::Lt => ordering.is_some_and(Ordering::is_lt),
        CmpOp::Le => ordering.is_some_and(Ordering::is_le),
        CmpOp::Gt => ordering.is_some_and(Ordering::is_gt),
        CmpOp::Ge => ordering.is_some_and(Ordering::is_ge),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "undefined",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// =============================================================================
// Parser
// =============================================================================

/// An open `if` or loop while parsing.
struct Block {
    kind: BlockKind,
    body: Vec<Node>,
    line: usize,
}

enum BlockKind {
    If {
        done: Vec<(Cond, Vec<Node>)>,
        /// `None` once inside the `else` branch.
        pending: Option<Cond>,
    },
    Each {
        items: Expr,
        item: String,
        index: Option<String>,
    },
}

/// Builds the node tree from a flat tag stream.
#[derive(Default)]
struct TreeBuilder {
    root: Vec<Node>,
    open: Vec<Block>,
}

impl TreeBuilder {
    fn push(&mut self, node: Node) {
        match self.open.last_mut() {
            Some(block) => block.body.push(node),
            None => self.root.push(node),
        }
    }

    fn apply(&mut self, directive: Directive, line: usize) -> Result<()> {
        match directive {
            Directive::If(cond) => self.open.push(Block {
                kind: BlockKind::If {
                    done: Vec::new(),
                    pending: Some(cond),
                },
                body: Vec::new(),
                line,
            }),
            Directive::Each { items, item, index } => self.open.push(Block {
                kind: BlockKind::Each { items, item, index },
                body: Vec::new(),
                line,
            }),
            Directive::ElseIf(next) => self.next_branch(Some(next), line)?,
            Directive::Else => self.next_branch(None, line)?,
            Directive::End => {
                let block = self
                    .open
                    .pop()
                    .ok_or_else(|| anyhow!("unexpected `}}` at line {line}"))?;
                let node = match block.kind {
                    BlockKind::If { mut done, pending } => match pending {
                        Some(cond) => {
                            done.push((cond, block.body));
                            Node::If {
                                branches: done,
                                otherwise: Vec::new(),
                            }
                        }
                        None => Node::If {
                            branches: done,
                            otherwise: block.body,
                        },
                    },
                    BlockKind::Each { items, item, index } => Node::Each {
                        items,
                        item,
                        index,
                        body: block.body,
                    },
                };
                self.push(node);
            }
        }
        Ok(())
    }

    /// Close the current `if` branch and open the next one.
    fn next_branch(&mut self, next: Option<Cond>, line: usize) -> Result<()> {
        let Some(Block {
            kind: BlockKind::If { done, pending },
            body,
            ..
        }) = self.open.last_mut()
        else {
            bail!("`else` outside of an `if` block at line {line}");
        };
        let Some(cond) = pending.take() else {
            bail!("`else` after `else` at line {line}");
        };
        done.push((cond, std::mem::take(body)));
        *pending = next;
        Ok(())
    }

    fn finish(self) -> Result<Vec<Node>> {
        if let Some(block) = self.open.last() {
            bail!("block opened at line {} is never closed", block.line);
        }
        Ok(self.root)
    }
}

fn parse(source: &str) -> Result<Vec<Node>> {
    let mut tree = TreeBuilder::default();
    let mut text = String::new();
    let mut rest = source;

    while let Some(start) = rest.find("<%") {
        text.push_str(&rest[..start]);
        let tag_offset = source.len() - rest.len() + start;
        let line = line_of(source, tag_offset);
        rest = &rest[start + 2..];

        if let Some(after) = rest.strip_prefix('%') {
            text.push_str("<%");
            rest = after;
            continue;
        }

        let (open, after_open) = match rest.as_bytes().first() {
            Some(b'=') => (Open::Escaped, &rest[1..]),
            Some(b'-') => (Open::Raw, &rest[1..]),
            Some(b'#') => (Open::Comment, &rest[1..]),
            Some(b'_') => {
                let trimmed = text.trim_end().len();
                text.truncate(trimmed);
                (Open::Scriptlet, &rest[1..])
            }
            _ => (Open::Scriptlet, rest),
        };

        let end = after_open
            .find("%>")
            .ok_or_else(|| anyhow!("unclosed tag at line {line}"))?;
        let inner = &after_open[..end];
        rest = &after_open[end + 2..];

        let (inner, close) = if let Some(s) = inner.strip_suffix('-') {
            (s, Close::TrimNewline)
        } else if let Some(s) = inner.strip_suffix('_') {
            (s, Close::Slurp)
        } else {
            (inner, Close::Plain)
        };

        match close {
            Close::Plain => {}
            Close::TrimNewline => {
                rest = rest
                    .strip_prefix("\r\n")
                    .or_else(|| rest.strip_prefix('\n'))
                    .unwrap_or(rest);
            }
            Close::Slurp => rest = rest.trim_start(),
        }

        let escape = match open {
            Open::Comment => continue,
            Open::Scriptlet if inner.trim().is_empty() => continue,
            Open::Scriptlet => {
                let directive =
                    parse_scriptlet(inner.trim()).with_context(|| format!("line {line}"))?;
                if !text.is_empty() {
                    tree.push(Node::Text(std::mem::take(&mut text)));
                }
                tree.apply(directive, line)?;
                continue;
            }
            Open::Escaped => true,
            Open::Raw => false,
        };

        if !text.is_empty() {
            tree.push(Node::Text(std::mem::take(&mut text)));
        }
        let node = parse_output(inner.trim(), escape).with_context(|| format!("line {line}"))?;
        tree.push(node);
    }

    text.push_str(rest);
    if !text.is_empty() {
        tree.push(Node::Text(text));
    }
    tree.finish()
}

fn line_of(source: &str, offset: usize) -> usize {
    source[..offset].matches('\n').count() + 1
}

fn parse_scriptlet(code: &str) -> Result<Directive> {
    let unsupported = || anyhow!("unsupported scriptlet `{code}`");
    let code = code.trim_end_matches(';').trim_end();

    if matches!(code, "}" | "})" | "} )") {
        return Ok(Directive::End);
    }
    if let Some(rest) = code.strip_prefix('}').map(str::trim_start) {
        let rest = rest.strip_prefix("else").ok_or_else(unsupported)?.trim_start();
        if rest == "{" {
            return Ok(Directive::Else);
        }
        let cond = rest.strip_prefix("if").ok_or_else(unsupported)?;
        let cond = block_head(cond).ok_or_else(unsupported)?;
        return Ok(Directive::ElseIf(parse_cond(cond)?));
    }
    if let Some(cond) = code.strip_prefix("if").and_then(block_head) {
        return Ok(Directive::If(parse_cond(cond)?));
    }
    if let Some(head) = code.strip_prefix("for").and_then(block_head) {
        let head = ["const ", "let ", "var "]
            .iter()
            .find_map(|kw| head.strip_prefix(*kw))
            .ok_or_else(unsupported)?;
        let (item, rest) = take_ident(head.trim_start()).ok_or_else(unsupported)?;
        let items = rest.trim_start().strip_prefix("of ").ok_or_else(unsupported)?;
        return Ok(Directive::Each {
            items: parse_expr(items.trim())?,
            item: item.to_string(),
            index: None,
        });
    }
    if let Some((items, callback)) = code.split_once(".forEach(") {
        let (item, index) = parse_callback(callback.trim()).ok_or_else(unsupported)?;
        return Ok(Directive::Each {
            items: parse_expr(items.trim())?,
            item,
            index,
        });
    }
    Err(unsupported())
}

/// `(cond) {` → `cond`.
fn block_head(s: &str) -> Option<&str> {
    let s = s.trim_start().strip_prefix('(')?;
    let s = s.trim_end().strip_suffix('{')?.trim_end().strip_suffix(')')?;
    Some(s.trim())
}

/// `function (x, i) {`, `(x, i) => {` or `x => {`.
fn parse_callback(s: &str) -> Option<(String, Option<String>)> {
    let params = if let Some(rest) = s.strip_prefix("function") {
        rest.trim_start()
            .strip_prefix('(')?
            .trim_end()
            .strip_suffix('{')?
            .trim_end()
            .strip_suffix(')')?
    } else {
        let head = s.strip_suffix('{')?.trim_end().strip_suffix("=>")?.trim();
        head.strip_prefix('(')
            .and_then(|h| h.strip_suffix(')'))
            .unwrap_or(head)
    };

    let mut names = params.split(',').map(str::trim);
    let item = names.next().filter(|n| is_ident(n))?.to_string();
    let index = match names.next() {
        Some(n) if is_ident(n) => Some(n.to_string()),
        Some(_) => return None,
        None => None,
    };
    names.next().is_none().then_some((item, index))
}

fn is_ident(s: &str) -> bool {
    take_ident(s).is_some_and(|(_, rest)| rest.is_empty())
}

fn parse_cond(s: &str) -> Result<Cond> {
    let any: Vec<_> = split_top(s, "||")
        .into_iter()
        .map(parse_all)
        .collect::<Result<_>>()?;
    Ok(match <[Cond; 1]>::try_from(any) {
        Ok([single]) => single,
        Err(any) => Cond::Any(any),
    })
}

fn parse_all(s: &str) -> Result<Cond> {
    let all: Vec<_> = split_top(s, "&&")
        .into_iter()
        .map(parse_atom)
        .collect::<Result<_>>()?;
    Ok(match <[Cond; 1]>::try_from(all) {
        Ok([single]) => single,
        Err(all) => Cond::All(all),
    })
}

/// Split on `sep` outside parentheses and quotes.
fn split_top<'a>(s: &'a str, sep: &str) -> Vec<&'a str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote = None;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"' | '`') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, _) if depth == 0 && i >= start && s[i..].starts_with(sep) => {
                parts.push(&s[start..i]);
                start = i + sep.len();
            }
            (None, _) => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

fn parse_atom(s: &str) -> Result<Cond> {
    let s = s.trim();
    if let Some(inner) = s.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        return parse_cond(inner);
    }
    if let Some(inner) = s.strip_prefix("!(").and_then(|s| s.strip_suffix(')')) {
        return Ok(Cond::Not(Box::new(parse_cond(inner)?)));
    }
    for (token, op) in COMPARISONS {
        if let Some((left, right)) = s.split_once(token) {
            return Ok(Cond::Compare(
                parse_expr(left.trim())?,
                op,
                parse_expr(right.trim())?,
            ));
        }
    }
    if let Some(inner) = s.strip_prefix('!') {
        return Ok(Cond::Not(Box::new(parse_atom(inner)?)));
    }
    Ok(Cond::Truthy(parse_expr(s)?))
}

fn parse_output(inner: &str, escape: bool) -> Result<Node> {
    if let Some(args) = inner
        .strip_prefix("include")
        .map(str::trim_start)
        .and_then(|s| s.strip_prefix('('))
        .and_then(|s| s.strip_suffix(')'))
    {
        let path = parse_literal(args.trim())
            .ok_or_else(|| anyhow!("include expects a single quoted path: `{inner}`"))?;
        return Ok(Node::Include { path, escape });
    }
    Ok(Node::Output {
        expr: parse_expr(inner)?,
        escape,
    })
}

fn parse_literal(s: &str) -> Option<String> {
    let quote = s.chars().next().filter(|c| matches!(c, '\'' | '"' | '`'))?;
    let body = s.strip_prefix(quote)?.strip_suffix(quote)?;
    (!body.contains(quote)).then(|| body.to_string())
}

fn parse_expr(s: &str) -> Result<Expr> {
    if let Some(literal) = parse_literal(s) {
        return Ok(Expr::Literal(Value::String(literal)));
    }
    match s {
        "true" => return Ok(Expr::Literal(Value::Bool(true))),
        "false" => return Ok(Expr::Literal(Value::Bool(false))),
        "null" | "undefined" => return Ok(Expr::Literal(Value::Null)),
        _ => {}
    }
    if s.starts_with(|c: char| c.is_ascii_digit() || c == '-')
        && let Ok(number @ Value::Number(_)) = serde_json::from_str::<Value>(s)
    {
        return Ok(Expr::Literal(number));
    }

    let unsupported = || anyhow!("unsupported expression `{s}`");
    let mut segments = Vec::new();
    let (locals, mut rest) = match s.strip_prefix("locals") {
        Some(r) if r.is_empty() || r.starts_with(['.', '[']) => (true, r),
        _ => {
            let (ident, r) = take_ident(s).ok_or_else(unsupported)?;
            segments.push(Segment::Key(ident.to_string()));
            (false, r)
        }
    };
    parse_accessors(&mut rest, &mut segments).ok_or_else(unsupported)?;
    Ok(Expr::Path { locals, segments })
}

/// Parse `.key`, `[0]` and `['key']` accessors until the input is consumed.
fn parse_accessors(rest: &mut &str, segments: &mut Vec<Segment>) -> Option<()> {
    while !rest.is_empty() {
        if let Some(r) = rest.strip_prefix('.') {
            let (ident, r) = take_ident(r)?;
            segments.push(Segment::Key(ident.to_string()));
            *rest = r;
        } else if let Some(r) = rest.strip_prefix('[') {
            let close = r.find(']')?;
            let inside = r[..close].trim();
            let segment = match parse_literal(inside) {
                Some(key) => Segment::Key(key),
                None => Segment::Index(inside.parse().ok()?),
            };
            segments.push(segment);
            *rest = &r[close + 1..];
        } else {
            return None;
        }
    }
    Some(())
}

fn take_ident(s: &str) -> Option<(&str, &str)> {
    let first = s.chars().next()?;
    if !(first.is_ascii_alphabetic() || first == '_' || first == '$') {
        return None;
    }
    let end = s
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '$'))
        .unwrap_or(s.len());
    Some((&s[..end], &s[end..]))
}

// =============================================================================
// Tests
// =============================================================================
