//! Command-line interface for the `sift` query transpiler.

use std::{
    error::Error,
    fs,
    io::{self, Read, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::{Parser, ValueEnum};
use sift_backend::{
    Backend, CqrBackend, ElasticsearchBackend, IrBackend, MedlineBackend, PubmedBackend,
    TerrierBackend,
};
use sift_ir::mapping_from_file;
use sift_lexer::LexOptions;
use sift_parser::QueryParser;
use sift_pipeline::{Pipeline, PipelineOptions};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "sift")]
#[command(about = "Transpiles Boolean search strategies between biomedical database dialects")]
struct Cli {
    /// File containing a search strategy [default: stdin]
    #[arg(long)]
    input: Option<PathBuf>,

    /// File to write the transformed query to [default: stdout]
    #[arg(long)]
    output: Option<PathBuf>,

    /// Dialect to parse the input as
    #[arg(long, value_enum)]
    parser: ParserKind,

    /// Backend to compile the query with
    #[arg(long, value_enum)]
    backend: BackendKind,

    /// JSON field mapping file ({name: [canonical-field, …]}, with a
    /// mandatory `default` entry)
    #[arg(long)]
    field_mapping: Option<PathBuf>,
}

/// Supported input dialects.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ParserKind {
    Medline,
    Pubmed,
    Cqr,
}

/// Supported output backends.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum BackendKind {
    Elasticsearch,
    Ir,
    Cqr,
    Terrier,
    Medline,
    Pubmed,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let query = match &cli.input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let pipeline = build_pipeline(cli)?;
    let compiled = pipeline.execute(&query)?;
    let rendered = compiled.to_pretty_string()?;

    match &cli.output {
        Some(path) => fs::write(path, rendered)?,
        None => io::stdout().write_all(rendered.as_bytes())?,
    }
    Ok(())
}

fn build_pipeline(cli: &Cli) -> Result<Pipeline, Box<dyn Error>> {
    let parser = match cli.parser {
        ParserKind::Medline => QueryParser::medline(),
        ParserKind::Pubmed => QueryParser::pubmed(),
        ParserKind::Cqr => QueryParser::cqr(),
    };

    let backend: Box<dyn Backend> = match cli.backend {
        BackendKind::Elasticsearch => Box::new(ElasticsearchBackend::new()),
        BackendKind::Ir => Box::new(IrBackend::new()),
        BackendKind::Cqr => Box::new(CqrBackend::new()),
        BackendKind::Terrier => Box::new(TerrierBackend::new()),
        BackendKind::Medline => Box::new(MedlineBackend::new()),
        BackendKind::Pubmed => Box::new(PubmedBackend::new()),
    };

    let field_mapping = match &cli.field_mapping {
        Some(path) => Some(mapping_from_file(path)?),
        None => None,
    };

    // CQR documents are already structured; the infix dialects go through
    // the lexer, and PubMed additionally needs its parentheses padded.
    let structured_input = matches!(cli.parser, ParserKind::Cqr);
    let options = PipelineOptions {
        lex_options: LexOptions {
            format_parenthesis: matches!(cli.parser, ParserKind::Pubmed),
        },
        field_mapping,
        add_redundant_parenthesis: !structured_input,
        requires_lexing: !structured_input,
    };

    Ok(Pipeline::new(parser, backend, options))
}
