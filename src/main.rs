//! flyer-forge – renders a flyer record into every print format and writes
//! the ZIP archive.
//!
//! Usage:
//!   flyer-forge <record.json> [--out-dir DIR] [--date YYYY-MM-DD]
//!   flyer-forge --list-formats
//!   flyer-forge --dump-template <format-id>

use std::path::PathBuf;
use std::{fs, process};

use clap::Parser;

use flyer_forge::pipeline::{generate_and_deliver, PipelineConfig, Stage};
use flyer_forge::{builder, calendar, registry, ContentRecord, PdfRenderer};

#[derive(Parser)]
#[command(name = "flyer-forge")]
#[command(version, about = "Render a flyer in every print format and bundle the PDFs", long_about = None)]
struct Cli {
    /// Content record as JSON (`title`, `datetime`, `location`, `speaker`, `desc`, `qr`)
    #[arg(required_unless_present_any = ["list_formats", "dump_template"])]
    record: Option<PathBuf>,

    /// Directory the archive is written to
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Date used in the archive name (default: today, UTC)
    #[arg(long)]
    date: Option<String>,

    /// Print the registered layout formats and exit
    #[arg(long)]
    list_formats: bool,

    /// Print the template description of one format as JSON and exit
    #[arg(long, value_name = "FORMAT")]
    dump_template: Option<String>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if cli.list_formats {
        for &format in registry::all() {
            let config = registry::get(format);
            println!(
                "{:<18} {:<13} {:>3}×{:<3} mm  {}",
                format.id(),
                config.name,
                config.width_mm,
                config.height_mm,
                config.file_name
            );
        }
        return;
    }

    if let Some(id) = cli.dump_template {
        match builder::build_by_id(&id) {
            Ok(template) => println!("{}", template.to_json()),
            Err(e) => fail(&e.to_string()),
        }
        return;
    }

    let Some(record_path) = cli.record else {
        fail("no record file specified");
    };

    let json = match fs::read_to_string(&record_path) {
        Ok(s) => s,
        Err(e) => fail(&format!("reading '{}': {e}", record_path.display())),
    };
    let record = match ContentRecord::from_json(&json) {
        Ok(r) => r,
        Err(e) => fail(&format!("parsing '{}': {e}", record_path.display())),
    };

    let date = match cli.date.as_deref().map(calendar::parse_date) {
        None => None,
        Some(Some(date)) => Some(date),
        Some(None) => fail("--date must be YYYY-MM-DD"),
    };
    let config = PipelineConfig {
        output_dir: cli.out_dir,
        date,
    };

    let result = generate_and_deliver(&record, &config, &PdfRenderer, |progress| {
        match (progress.stage, progress.format) {
            (Stage::Generating, Some(format)) => eprintln!(
                "[{}/{}] rendering {}",
                progress.current,
                progress.total,
                registry::get(format).name
            ),
            (Stage::Zipping, _) => eprintln!("packing archive"),
            (Stage::Downloading, _) => eprintln!("saving archive"),
            _ => {}
        }
    });

    match result {
        Ok(path) => eprintln!("Wrote '{}'", path.display()),
        Err(e) => fail(&e.to_string()),
    }
}

fn fail(message: &str) -> ! {
    eprintln!("Error: {message}");
    process::exit(1);
}
