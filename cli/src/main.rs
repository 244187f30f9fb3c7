//! pdfmd CLI - layout-aware PDF to Markdown conversion

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfmd::convert::open_source;
use pdfmd::{
    detect_input_from_path, fragments_from_json, render, ConvertOptions, ConvertResult,
    InputKind, JsonFormat, PageAssembler, PageSelection, PageSource,
};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "pdfmd")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Reconstruct Markdown from PDF page layout", long_about = None)]
struct Cli {
    /// Input PDF file or fragment dump
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert PDF to Markdown
    #[command(alias = "md")]
    Markdown {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// Process pages one at a time
        #[arg(long)]
        sequential: bool,

        /// Text placed between pages
        #[arg(long, value_name = "TEXT")]
        separator: Option<String>,
    },

    /// Convert PDF to JSON (pages with typed blocks)
    Json {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,
    },

    /// Convert a pdf.js text-item dump (JSON array of pages) to Markdown
    Fragments {
        /// Fragment dump file
        #[arg(value_name = "FRAGMENTS")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Markdown {
            input,
            output,
            pages,
            sequential,
            separator,
        }) => parse_options(pages.as_deref(), sequential, separator)
            .and_then(|options| cmd_markdown(&input, output.as_deref(), options)),
        Some(Commands::Json {
            input,
            output,
            compact,
            pages,
        }) => parse_options(pages.as_deref(), false, None)
            .and_then(|options| cmd_json(&input, output.as_deref(), compact, options)),
        Some(Commands::Fragments { input, output }) => cmd_fragments(&input, output.as_deref()),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                cmd_default(&input, cli.output.as_deref())
            } else {
                println!("{}", "Usage: pdfmd <FILE> [OUTPUT]".yellow());
                println!("       pdfmd --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn parse_options(
    pages: Option<&str>,
    sequential: bool,
    separator: Option<String>,
) -> CliResult<ConvertOptions> {
    let page_selection = match pages {
        Some(p) => PageSelection::parse(p)?,
        None => PageSelection::All,
    };

    let mut options = ConvertOptions::new()
        .with_pages(page_selection)
        .with_parallel(!sequential);
    if let Some(separator) = separator {
        options.render = options.render.with_page_separator(separator);
    }
    Ok(options)
}

/// Shorthand: PDFs and fragment dumps are told apart by their first bytes.
fn cmd_default(input: &Path, output: Option<&Path>) -> CliResult<()> {
    match detect_input_from_path(input)? {
        InputKind::Pdf { .. } => cmd_markdown(input, output, ConvertOptions::default()),
        InputKind::Fragments => cmd_fragments(input, output),
    }
}

fn cmd_markdown(input: &Path, output: Option<&Path>, options: ConvertOptions) -> CliResult<()> {
    let result = convert_with_progress(input, options, output.is_some())?;
    write_output(output, &result.markdown)
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    options: ConvertOptions,
) -> CliResult<()> {
    let result = convert_with_progress(input, options, output.is_some())?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = render::to_json(&result.pages, format)?;
    write_output(output, &json)
}

fn cmd_fragments(input: &Path, output: Option<&Path>) -> CliResult<()> {
    let json = fs::read_to_string(input)?;
    let pages = fragments_from_json(&json)?;
    log::info!("loaded {} pages of fragments", pages.len());

    let result = PageAssembler::new(ConvertOptions::default()).assemble(pages.as_slice())?;
    write_output(output, &result.markdown)
}

fn cmd_info(input: &Path) -> CliResult<()> {
    let source = open_source(input)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), source.version());
    println!("{}: {}", "Pages".bold(), source.page_count());
    println!(
        "{}: {}",
        "Encrypted".bold(),
        if source.is_encrypted() { "Yes" } else { "No" }
    );

    let result = PageAssembler::new(ConvertOptions::default()).assemble(&source)?;
    let blocks: usize = result.pages.iter().map(|p| p.blocks.len()).sum();
    let empty = result.pages.iter().filter(|p| p.is_empty()).count();

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Blocks".bold(), blocks);
    println!("{}: {}", "Empty pages".bold(), empty);
    println!(
        "{}: {}",
        "Words".bold(),
        result.markdown.split_whitespace().count()
    );

    let outline = outline(&result);
    println!("{}: {}", "Headings".bold(), outline.len());
    for entry in &outline {
        println!("  {}", entry);
    }

    Ok(())
}

/// Heading titles indented by level, in document order.
fn outline(result: &ConvertResult) -> Vec<String> {
    result
        .pages
        .iter()
        .flat_map(|page| &page.blocks)
        .filter_map(|block| {
            let level = block.level()?;
            let indent = "  ".repeat(usize::from(level.saturating_sub(1)));
            Some(format!("{}{}", indent, block.content))
        })
        .collect()
}

fn cmd_version() {
    println!("{} {}", "pdfmd".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Layout-aware PDF to Markdown conversion");
    println!();
    println!("License: MIT");
}

/// Convert a PDF, drawing a per-page progress bar when `show_progress` is
/// set (stdout is left clean otherwise).
fn convert_with_progress(
    input: &Path,
    options: ConvertOptions,
    show_progress: bool,
) -> CliResult<ConvertResult> {
    let source = open_source(input)?;
    let assembler = PageAssembler::new(options);

    if !show_progress {
        return Ok(assembler.assemble(&source)?);
    }

    let pb = ProgressBar::new(u64::from(source.page_count()));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} pages")?
            .progress_chars("#>-"),
    );

    let result = assembler.assemble_with_progress(&source, |done, total| {
        pb.set_length(u64::from(total));
        pb.set_position(u64::from(done));
    });
    pb.finish_and_clear();

    Ok(result?)
}

fn write_output(output: Option<&Path>, content: &str) -> CliResult<()> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pdfmd::PositionedTextFragment;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_options() {
        let options = parse_options(Some("2-3"), true, Some("\n\n".to_string())).unwrap();
        assert_eq!(options.pages, PageSelection::Range(2..=3));
        assert!(!options.parallel);
        assert_eq!(options.render.page_separator, "\n\n");

        assert!(parse_options(Some("3-1"), false, None).is_err());
    }

    #[test]
    fn test_outline_indents_by_heading_level() {
        let page = vec![
            PositionedTextFragment::new("Report", 72.0, 740.0, 24.0),
            PositionedTextFragment::new("Body text here.", 72.0, 700.0, 10.0),
            PositionedTextFragment::new("More body text.", 72.0, 686.0, 10.0),
            PositionedTextFragment::new("Details", 72.0, 650.0, 18.0),
            PositionedTextFragment::new("Closing body text.", 72.0, 620.0, 10.0),
        ];
        let pages = vec![page];
        let result = PageAssembler::new(ConvertOptions::default())
            .assemble(pages.as_slice())
            .unwrap();

        assert_eq!(outline(&result), vec!["Report", "  Details"]);
    }

    #[test]
    fn test_fragments_command_writes_markdown() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("dump.json");
        let output = dir.path().join("out.md");
        fs::write(
            &input,
            r#"[[{"str":"Hello","transform":[12,0,0,12,72,700],"fontName":"F1"}],[]]"#,
        )
        .unwrap();

        cmd_default(&input, Some(&output)).unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), "Hello");
    }
}
