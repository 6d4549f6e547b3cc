//! End-to-end compilation pipelines.
//!
//! A [`Pipeline`] owns a dialect parser, a backend, and the per-dialect
//! options that differ between inputs: whether the text needs the
//! line-reference lexer at all, whether a one-line query should be wrapped in
//! an extra pair of parentheses, and how the lexer treats parentheses.
//! Pipelines are immutable after construction and safe to share between
//! threads.
//!
//! The common combinations ship preconstructed:
//!
//! ```
//! use sift_pipeline::medline_to_cqr;
//!
//! let pipeline = medline_to_cqr();
//! let compiled = pipeline.execute("1. OSA.mp.\n2. SHS.mp.\n3. or/1-2").unwrap();
//! assert!(compiled.to_compact_string().unwrap().contains("\"operator\":\"or\""));
//! ```

#![warn(missing_docs)]

use sift_backend::{Backend, BackendError, CompiledQuery, CqrBackend, MedlineBackend, PubmedBackend};
use sift_ir::FieldMapping;
use sift_lexer::{lex, LexError, LexOptions, Node};
use sift_parser::{ParseError, QueryParser};
use thiserror::Error;

/// Errors from any stage of a pipeline execution.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The lexer rejected the search strategy.
    #[error(transparent)]
    Lex(#[from] LexError),

    /// A dialect parser rejected a keyword expression.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The backend rejected the canonical tree.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Per-dialect pipeline configuration.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Options forwarded to the lexer.
    pub lex_options: LexOptions,
    /// Replaces the parser's built-in field mapping.
    pub field_mapping: Option<FieldMapping>,
    /// Wrap one-line queries in an extra pair of parentheses, which the
    /// infix parsers need to treat the line as a group.
    pub add_redundant_parenthesis: bool,
    /// Whether the input is a line-numbered strategy that needs the lexer.
    /// One-line PubMed queries and CQR documents skip it.
    pub requires_lexing: bool,
}

/// A parser and a backend wired together.
pub struct Pipeline {
    parser: QueryParser,
    backend: Box<dyn Backend>,
    options: PipelineOptions,
}

impl Pipeline {
    /// Wires a parser to a backend. A field mapping in the options replaces
    /// the parser's own at construction, so execution never mutates.
    pub fn new(
        mut parser: QueryParser,
        backend: Box<dyn Backend>,
        options: PipelineOptions,
    ) -> Self {
        if let Some(mapping) = options.field_mapping.clone() {
            parser.set_field_mapping(mapping);
        }
        Self {
            parser,
            backend,
            options,
        }
    }

    /// Lexes, parses, and compiles one query.
    pub fn execute(&self, query: &str) -> Result<CompiledQuery, PipelineError> {
        let mut query = query.to_string();
        if self.options.add_redundant_parenthesis && !query.contains('\n') {
            query = format!("({query})");
        }

        let ast = if self.options.requires_lexing {
            lex(&query, self.options.lex_options)?
        } else {
            Node::flat(query)
        };

        let parsed = self.parser.parse(&ast)?;
        Ok(self.backend.compile(&parsed)?)
    }
}

/// Medline search strategies to CQR.
pub fn medline_to_cqr() -> Pipeline {
    Pipeline::new(
        QueryParser::medline(),
        Box::new(CqrBackend::new()),
        PipelineOptions {
            lex_options: LexOptions {
                format_parenthesis: false,
            },
            add_redundant_parenthesis: true,
            requires_lexing: true,
            ..PipelineOptions::default()
        },
    )
}

/// One-line PubMed queries to CQR.
pub fn pubmed_to_cqr() -> Pipeline {
    Pipeline::new(
        QueryParser::pubmed(),
        Box::new(CqrBackend::new()),
        PipelineOptions {
            lex_options: LexOptions {
                format_parenthesis: true,
            },
            add_redundant_parenthesis: true,
            requires_lexing: false,
            ..PipelineOptions::default()
        },
    )
}

/// CQR documents to a Medline strategy.
pub fn cqr_to_medline() -> Pipeline {
    Pipeline::new(
        QueryParser::cqr(),
        Box::new(MedlineBackend::new()),
        PipelineOptions::default(),
    )
}

/// CQR documents to a PubMed query.
pub fn cqr_to_pubmed() -> Pipeline {
    Pipeline::new(
        QueryParser::cqr(),
        Box::new(PubmedBackend::new()),
        PipelineOptions::default(),
    )
}
