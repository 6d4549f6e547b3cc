//! Line-reference lexer for numbered Boolean search strategies.
//!
//! Search strategies reported in systematic reviews are usually numbered line
//! by line, with later lines combining earlier ones by reference:
//!
//! ```text
//! 1. exp Sleep Apnea Syndromes/
//! 2. (sleep$ adj3 (apnea$ or apnoea$)).mp.
//! 3. OSA.mp.
//! 4. or/1-3
//! ```
//!
//! This crate resolves those references into a tree of [`Node`]s. It only
//! builds the tree; the individual keyword expressions on each line are left
//! as raw text for a dialect parser. Inputs without reference lines come back
//! as a single flat node.

#![warn(missing_docs)]

use std::collections::HashMap;

mod error;

pub use error::LexError;

/// Expansion budget shared across one `lex` call. A strategy that needs more
/// expansions than this is referencing itself somewhere.
const RECURSION_LIMIT: usize = 10_000;

/// A node in the line-reference tree.
///
/// A node with a non-empty `operator` combines its children, which were
/// referenced by line number. A node with an empty operator is a terminal
/// carrying one raw keyword-expression line in `value`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    /// Raw line content (terminal nodes only).
    pub value: String,
    /// The line number this node came from, starting at 1.
    pub reference: usize,
    /// The operator combining `children`, lowercased.
    pub operator: String,
    /// Referenced operand nodes.
    pub children: Vec<Node>,
}

impl Node {
    /// Wraps a whole query in a single terminal node.
    pub fn flat(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            reference: 1,
            operator: String::new(),
            children: Vec::new(),
        }
    }
}

/// Configuration for lexing.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexOptions {
    /// Insert whitespace around parentheses before any other processing, so
    /// dialects that allow `(term)or(term)` still tokenize.
    pub format_parenthesis: bool,
}

/// A classified reference line: an operator over referenced line numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ReferenceLine {
    operator: String,
    operands: Vec<usize>,
}

/// Builds the line-reference tree for a search strategy.
///
/// The query is preprocessed to strip per-line numbering, each line is
/// classified as either a reference expression (`1 and 2`, `or/1-6`,
/// `and/3,4`) or a raw keyword expression, and the references are expanded
/// into a tree rooted at the highest-numbered reference line.
pub fn lex(query: &str, options: LexOptions) -> Result<Node, LexError> {
    let query = preprocess(query, options);

    let mut references: HashMap<usize, ReferenceLine> = HashMap::new();
    let mut lines: HashMap<usize, String> = HashMap::new();

    for (index, line) in query.lines().enumerate() {
        let number = index + 1;
        let line = line.trim();
        if let Some(reference) = classify_reference(line, number)? {
            references.insert(number, reference);
        }
        lines.insert(number, line.to_string());
    }

    if references.is_empty() {
        return Ok(Node::flat(query.trim()));
    }

    let root = *references.keys().max().expect("references is non-empty");
    let mut expansions = 0;
    let mut path = Vec::new();
    expand(root, root, &references, &lines, &mut expansions, &mut path)
}

/// Recursively expands a reference line into a tree node.
///
/// Two guards bound the walk: a line already on the expansion path is a
/// definite cycle, and the total expansion budget catches strategies whose
/// shared references blow up combinatorially.
fn expand(
    number: usize,
    root: usize,
    references: &HashMap<usize, ReferenceLine>,
    lines: &HashMap<usize, String>,
    expansions: &mut usize,
    path: &mut Vec<usize>,
) -> Result<Node, LexError> {
    *expansions += 1;
    if *expansions > RECURSION_LIMIT || path.contains(&number) {
        return Err(LexError::RecursionLimit { line: root });
    }
    path.push(number);

    let reference = &references[&number];
    let mut node = Node {
        value: String::new(),
        reference: number,
        operator: reference.operator.clone(),
        children: Vec::new(),
    };

    for &operand in &reference.operands {
        if references.contains_key(&operand) {
            node.children
                .push(expand(operand, root, references, lines, expansions, path)?);
        } else if let Some(value) = lines.get(&operand) {
            node.children.push(Node {
                value: value.clone(),
                reference: operand,
                operator: String::new(),
                children: Vec::new(),
            });
        } else {
            return Err(LexError::UnknownLine {
                line: number,
                referenced: operand,
            });
        }
    }

    path.pop();
    Ok(node)
}

/// Classifies one preprocessed line.
///
/// Three reference shapes are recognized, in order: an infix expression
/// (`1 and 2 and 3`, any line whose first token is a number), a prefix range
/// (`or/1-6`), and a named list (`and/3,4`). Anything else is a raw keyword
/// expression and classifies as `None`.
fn classify_reference(line: &str, number: usize) -> Result<Option<ReferenceLine>, LexError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some(&first) = tokens.first() else {
        return Ok(None);
    };

    if is_number(first) {
        return infix_reference(&tokens, number).map(Some);
    }

    if tokens.len() == 1 {
        if let Some(reference) = compact_reference(first, number)? {
            return Ok(Some(reference));
        }
    }

    Ok(None)
}

/// Parses `N OP N OP N …` into a reference line. The operator may repeat; the
/// last occurrence wins.
fn infix_reference(tokens: &[&str], number: usize) -> Result<ReferenceLine, LexError> {
    let mut operator = String::new();
    let mut operands = Vec::new();

    for (index, token) in tokens.iter().enumerate() {
        if index % 2 == 0 {
            operands.push(parse_line_number(token, number)?);
        } else {
            operator = token.to_lowercase();
        }
    }

    Ok(ReferenceLine { operator, operands })
}

/// Parses the compact forms `OP/N-M` (range) and `OP/N,M[,K…]` (named list),
/// returning `None` when the token is not shaped like either.
fn compact_reference(token: &str, number: usize) -> Result<Option<ReferenceLine>, LexError> {
    let Some((operator, numbers)) = token.split_once('/') else {
        return Ok(None);
    };
    let operator = operator.to_lowercase();
    if !matches!(operator.as_str(), "and" | "or" | "not") {
        return Ok(None);
    }

    if let Some((from, to)) = numbers.split_once('-') {
        if !is_number(from) || !is_number(to) {
            return Ok(None);
        }
        let from = parse_line_number(from, number)?;
        let to = parse_line_number(to, number)?;
        if from > to {
            return Err(LexError::InvertedRange {
                from,
                to,
                line: number,
            });
        }
        return Ok(Some(ReferenceLine {
            operator,
            operands: (from..=to).collect(),
        }));
    }

    if numbers.contains(',') {
        let parts: Vec<&str> = numbers.split(',').collect();
        if parts.iter().any(|part| !is_number(part)) {
            return Ok(None);
        }
        let mut operands = Vec::new();
        for part in parts {
            operands.push(parse_line_number(part, number)?);
        }
        return Ok(Some(ReferenceLine { operator, operands }));
    }

    Ok(None)
}

fn is_number(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

fn parse_line_number(token: &str, line: usize) -> Result<usize, LexError> {
    token.parse().map_err(|_| LexError::InvalidReference {
        token: token.to_string(),
        line,
    })
}

/// Strips per-line numbering from a search strategy.
///
/// When the first line looks numbered (its first token contains a digit and
/// the line has more than one token), everything up to and including the
/// first whitespace of every line is discarded, escape backslashes are
/// removed, and each line is trimmed. Other inputs pass through untouched.
fn preprocess(query: &str, options: LexOptions) -> String {
    let query = if options.format_parenthesis {
        query.replace('(', " ( ").replace(')', " ) ")
    } else {
        query.to_string()
    };

    let first = query.lines().next().unwrap_or("").trim();
    if !first.contains(' ') {
        return query;
    }
    let first_token = first.split(' ').next().unwrap_or("");
    if !first_token.chars().any(|c| c.is_ascii_digit()) {
        return query;
    }

    let mut cleaned = String::new();
    for line in query.lines() {
        let line = line.trim();
        let mut rest = String::new();
        let mut found_start = false;
        for ch in line.chars() {
            if found_start {
                rest.push(ch);
            } else if ch.is_whitespace() {
                found_start = true;
            }
        }
        let rest = rest.replace('\\', "");
        cleaned.push_str(rest.trim());
        cleaned.push('\n');
    }
    cleaned
}
