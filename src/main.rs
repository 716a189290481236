// Command line front end for passport region clustering and MRZ checks

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::info;
use passmatch::{
    models::{FormField, FormSubmission, OcrBackend, PipelineConfig, ValidationReport},
    processing::Rectangle,
    utils::PassportError,
    validation::{check_digit, MrzDecoder},
    PassportValidator,
};

#[derive(Parser)]
#[command(name = "passmatch", version, about = "Passport MRZ decoding and form cross-checking")]
struct Cli {
    /// JSON pipeline configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the ICAO check digit of a field
    Checksum { field: String },
    /// Decode a two-line MRZ (from a file, or stdin when omitted)
    Decode { path: Option<PathBuf> },
    /// Merge detected text regions into padded crop rectangles
    Cluster {
        /// JSON array of {x, y, width, height}
        regions: PathBuf,
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: u32,
    },
    /// Cross-check a submitted form against OCR output
    Validate {
        /// JSON array of OCR text chunks, or plain text with --plain
        chunks: PathBuf,
        /// JSON object with the submitted form fields
        form: PathBuf,
        /// Treat the chunks file as line-oriented plain text
        #[arg(long)]
        plain: bool,
        #[arg(long, value_enum)]
        backend: Option<OcrBackend>,
        /// Print a readable report instead of JSON
        #[arg(long)]
        report: bool,
    },
}

fn read_input(path: Option<&Path>) -> Result<String, PassportError> {
    match path {
        Some(p) => Ok(std::fs::read_to_string(p)?),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn print_detailed_report(report: &ValidationReport) {
    println!("\n===============================================");
    println!("      PASSPORT FORM VALIDATION REPORT");
    println!("===============================================\n");

    match &report.mrz_text {
        Some(mrz) => println!("MRZ TEXT: {}", mrz),
        None => println!("MRZ TEXT: not located"),
    }

    println!("\nFIELDS:");
    for field in FormField::ALL {
        println!(
            "  {:<20} {}",
            field.form_name(),
            if report.fields.get(field) { "PASSED" } else { "FAILED" }
        );
    }

    println!(
        "\nPassport validation result: {}",
        if report.is_valid { "VALID" } else { "INVALID" }
    );
}

fn main() -> Result<(), PassportError> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };

    match cli.command {
        Command::Checksum { field } => {
            println!("{}", check_digit(field.trim())?);
        }
        Command::Decode { path } => {
            let raw = read_input(path.as_deref())?;
            let record = MrzDecoder::decode(raw.trim_end())?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Command::Cluster { regions, width, height } => {
            let detections: Vec<Rectangle> = serde_json::from_str(&read_input(Some(regions.as_path()))?)?;
            info!("Loaded {} detections from {:?}", detections.len(), regions);
            let crops = PassportValidator::with_config(config).plan_crops(&detections, width, height);
            println!("{}", serde_json::to_string_pretty(&crops)?);
        }
        Command::Validate {
            chunks,
            form,
            plain,
            backend,
            report,
        } => {
            let mut config = config;
            if let Some(backend) = backend {
                config.backend = backend;
            }
            let validator = PassportValidator::with_config(config);
            info!("Validating with {:?} backend", validator.config().backend);

            let fields: HashMap<String, String> = serde_json::from_str(&read_input(Some(form.as_path()))?)?;
            let form = FormSubmission::from_map(&fields)?;
            let text = read_input(Some(chunks.as_path()))?;
            let result = if plain {
                validator.validate_text(&text, &form)
            } else {
                let chunks: Vec<String> = serde_json::from_str(&text)?;
                validator.validate(&chunks, &form)
            };

            if report {
                print_detailed_report(&result);
            } else {
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
        }
    }

    Ok(())
}
