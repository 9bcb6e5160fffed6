use std::error::Error;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::debug;

use resume_render::legacy::{SavedResume, DEFAULT_SKILLS_CATEGORY};
use resume_render::validate::{missing_fields, missing_saved_fields};
use resume_render::{
    assemble, parse_model_response, render, DocumentWriter, OutputTarget, PdfWriter,
    PlainTextWriter, RenderConfig, ResumeRecord,
};

/// Renders resume JSON into PDF or plain-text documents.
///
/// Fonts are looked up under `assets/fonts` next to the binary or in the crate checkout, or in
/// the directory named by `RESUME_RENDER_FONTS_DIR`.  Set `RUST_LOG=debug` for layout details.
#[derive(Parser)]
#[command(name = "resume-render", author, version, about = "Render resume records to PDF")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a resume to a file.
    Render {
        #[command(flatten)]
        input: InputArgs,

        /// Output file; replaced if it exists.
        #[arg(short, long, value_name = "FILE", conflicts_with = "out_dir")]
        output: Option<PathBuf>,

        /// Directory for a timestamped output file.
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,

        /// File name prefix used with --out-dir.
        #[arg(long, default_value = "resume")]
        stem: String,

        /// Output format.
        #[arg(short, long, value_enum, default_value = "pdf")]
        format: Format,
    },

    /// Print the plain-text rendition to stdout.
    Preview {
        #[command(flatten)]
        input: InputArgs,

        /// Line width in characters.
        #[arg(long, default_value = "90")]
        width: usize,
    },

    /// Report required fields that are blank.
    Check {
        /// Input JSON file, or `-` for stdin.
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Input uses the saved-history field names.
        #[arg(long)]
        legacy: bool,

        /// Print the report as a JSON array.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Input JSON file, or `-` for stdin.
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Render configuration (JSON).
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Input uses the saved-history field names.
    #[arg(long, conflicts_with = "model_response")]
    legacy: bool,

    /// Input is a raw model reply, possibly wrapped in a code fence.
    #[arg(long)]
    model_response: bool,

    /// Category for a flat skill list in saved-history input.
    #[arg(long, default_value = DEFAULT_SKILLS_CATEGORY)]
    skills_category: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Pdf,
    Text,
}

type CliResult<T> = Result<T, Box<dyn Error>>;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render {
            input,
            output,
            out_dir,
            stem,
            format,
        } => cmd_render(&input, output, out_dir, stem, format),
        Commands::Preview { input, width } => cmd_preview(&input, width),
        Commands::Check {
            input,
            legacy,
            json,
        } => cmd_check(&input, legacy, json),
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}

fn read_input(path: &Path) -> CliResult<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    fs::read_to_string(path)
        .map_err(|err| format!("failed to read {}: {}", path.display(), err).into())
}

fn load(args: &InputArgs) -> CliResult<(ResumeRecord, RenderConfig)> {
    let config = match &args.config {
        Some(path) => RenderConfig::from_json_file(path)?,
        None => RenderConfig::default(),
    };

    let text = read_input(&args.input)?;
    let record = if args.model_response {
        parse_model_response(&text)?
    } else if args.legacy {
        SavedResume::from_json_str(&text)?.into_record_with_category(&args.skills_category)
    } else {
        ResumeRecord::from_json_str(&text)?
    };
    debug!("loaded record from {}", args.input.display());

    Ok((record, config))
}

fn cmd_render(
    input: &InputArgs,
    output: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    stem: String,
    format: Format,
) -> CliResult<()> {
    let (record, config) = load(input)?;
    let target = match (output, out_dir) {
        (Some(path), _) => OutputTarget::path(path),
        (None, Some(dir)) => OutputTarget::timestamped(dir, stem),
        (None, None) => OutputTarget::timestamped(".", stem),
    };

    let writer: Box<dyn DocumentWriter> = match format {
        Format::Pdf => Box::new(PdfWriter::new()),
        Format::Text => Box::new(PlainTextWriter::new()),
    };

    let path = render(&record, &config, writer.as_ref(), &target)?;
    println!("{}", path.display());
    Ok(())
}

fn cmd_preview(input: &InputArgs, width: usize) -> CliResult<()> {
    let (record, config) = load(input)?;
    let document = assemble(&record, &config);
    let text = PlainTextWriter::new()
        .with_width(width)
        .render_to_string(&document);
    io::stdout().write_all(text.as_bytes())?;
    Ok(())
}

fn cmd_check(input: &Path, legacy: bool, json: bool) -> CliResult<()> {
    let text = read_input(input)?;
    let missing = if legacy {
        missing_saved_fields(&SavedResume::from_json_str(&text)?)
    } else {
        missing_fields(&ResumeRecord::from_json_str(&text)?)
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&missing)?);
    } else if missing.is_empty() {
        println!("All required fields are present.");
    } else {
        println!("Missing: {}", missing.join(", "));
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(format!("{} required field(s) missing", missing.len()).into())
    }
}
