//! Export a structural document as an overlay PDF
//!
//! Builds editor pages from a structural JSON file and writes the PDF the
//! editor would produce for them without any edits.
//!
//! Usage:
//!   cargo run --release --bin overlay_export -- doc.json out.pdf
//!   cargo run --release --bin overlay_export -- doc.json out.pdf --fallback-font NotoSans.ttf --compress

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use pdf_overlay::layout::build_editor_pages;
use pdf_overlay::model::StructuralDocument;
use pdf_overlay::writer::export_pages;
use pdf_overlay::{EditorConfig, Error, ExportConfig};

struct Args {
    input: PathBuf,
    output: PathBuf,
    fallback_font: Option<PathBuf>,
    outline_fonts: Vec<PathBuf>,
    compress: bool,
}

impl Args {
    fn from_args() -> Option<Self> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut positional = Vec::new();
        let mut fallback_font = None;
        let mut outline_fonts = Vec::new();
        let mut compress = false;

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--fallback-font" => {
                    i += 1;
                    fallback_font = Some(PathBuf::from(args.get(i)?));
                },
                "--outline-font" => {
                    i += 1;
                    outline_fonts.push(PathBuf::from(args.get(i)?));
                },
                "--compress" => {
                    compress = true;
                },
                other => positional.push(PathBuf::from(other)),
            }
            i += 1;
        }

        if positional.len() != 2 {
            return None;
        }
        let output = positional.pop()?;
        let input = positional.pop()?;
        Some(Self {
            input,
            output,
            fallback_font,
            outline_fonts,
            compress,
        })
    }
}

fn run(args: &Args) -> Result<usize, Error> {
    let json = std::fs::read_to_string(&args.input)?;
    let document = StructuralDocument::from_json(&json)?;
    if document.is_empty() {
        return Err(Error::EmptyDocument);
    }

    let pages = build_editor_pages(&document, &[], &EditorConfig::default());

    let mut config = ExportConfig::default().with_compress(args.compress);
    for path in &args.outline_fonts {
        config = config.with_outline_font(std::fs::read(path)?);
    }
    let fallback = match &args.fallback_font {
        Some(path) => Some(Arc::new(std::fs::read(path)?)),
        None => None,
    };

    let bytes = export_pages(&pages, &document.fonts, fallback, &config)?;
    std::fs::write(&args.output, &bytes)?;
    Ok(bytes.len())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Some(args) = Args::from_args() else {
        eprintln!(
            "Usage: overlay_export <structural.json> <out.pdf> [--fallback-font FILE] [--outline-font FILE]... [--compress]"
        );
        return ExitCode::from(2);
    };

    match run(&args) {
        Ok(size) => {
            log::info!("Wrote {} ({} bytes)", args.output.display(), size);
            ExitCode::SUCCESS
        },
        Err(e) if e.is_empty_state() => {
            eprintln!("{}: nothing to export", args.input.display());
            ExitCode::from(1)
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        },
    }
}
