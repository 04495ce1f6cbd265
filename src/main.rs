//! Tradegen CLI - transform trade spreadsheets to villager trade JSON
//!
//! # Main Command
//!
//! ```bash
//! tradegen transform trades.csv -p createengineers   # emit one JSON per profession
//! ```
//!
//! When no input is given, the first `.csv` file in the current directory is
//! used; when no profession prefix is given, it is prompted for.
//!
//! # Debug Commands (for development)
//!
//! ```bash
//! tradegen parse trades.csv          # just parse the sheet to JSON rows
//! tradegen validate Blacksmith.json  # validate generated files against the schema
//! ```

use clap::{Parser, Subcommand};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tradegen::{
    parse_sheet_file, transform_sheet, validate_profession_document, write_documents,
    TransformOptions,
};

#[derive(Parser)]
#[command(name = "tradegen")]
#[command(about = "Transform trade spreadsheets to villager trade JSON configs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full pipeline: spreadsheet → per-profession JSON files
    Transform {
        /// Input sheet (first .csv in the current directory if omitted)
        input: Option<PathBuf>,

        /// Profession prefix, e.g. createengineers (prompted if omitted)
        #[arg(short = 'p', long)]
        profession_prefix: Option<String>,

        /// Trade type prefix (defaults to the profession prefix)
        #[arg(short = 't', long)]
        trade_type_prefix: Option<String>,

        /// Directory for the generated JSON files
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Seed for randomized fallback values (reproducible output)
        #[arg(long)]
        seed: Option<u64>,

        /// Skip schema validation of the generated documents
        #[arg(long)]
        no_validate: bool,
    },

    /// Parse a spreadsheet and output its rows as JSON
    Parse {
        /// Input sheet
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate generated profession JSON files against the schema
    Validate {
        /// Files to check
        inputs: Vec<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Transform {
            input,
            profession_prefix,
            trade_type_prefix,
            out_dir,
            seed,
            no_validate,
        } => cmd_transform(
            input,
            profession_prefix,
            trade_type_prefix,
            &out_dir,
            seed,
            no_validate,
        ),

        Commands::Parse { input, output } => cmd_parse(&input, output.as_deref()),

        Commands::Validate { inputs } => cmd_validate(&inputs),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_transform(
    input: Option<PathBuf>,
    profession_prefix: Option<String>,
    trade_type_prefix: Option<String>,
    out_dir: &Path,
    seed: Option<u64>,
    no_validate: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let input = match input {
        Some(path) => path,
        None => find_sheet_in_cwd()?,
    };

    let profession_prefix = match profession_prefix {
        Some(p) => p,
        None => prompt("Enter the profession prefix (e.g. createengineers or delightfulchefs): ")?,
    };

    // A bare "minecraft" profession prefix would collide with the vanilla
    // trade registry, so the trade type prefix must then be its own namespace.
    let trade_type_prefix = match trade_type_prefix {
        Some(t) => t,
        None if profession_prefix.eq_ignore_ascii_case("minecraft") => {
            prompt("Enter the trade type prefix (e.g. createengineers or delightfulchefs): ")?
        }
        None => profession_prefix.clone(),
    };

    eprintln!("📄 Processing: {}", input.display());

    let options = TransformOptions {
        profession_prefix,
        trade_type_prefix,
        skip_validation: no_validate,
        seed,
    };

    let outcome = transform_sheet(&input, &options)?;

    eprintln!("   Encoding: {}", outcome.sheet.encoding);
    eprintln!("   Delimiter: '{}'", format_delimiter(outcome.sheet.delimiter));
    eprintln!("   Rows: {}", outcome.sheet.row_count);
    eprintln!("\n⚙️  Transformed: {} professions", outcome.documents.len());

    if !no_validate {
        if outcome.invalid_count > 0 {
            eprintln!("\n✔️  Validation:");
            eprintln!("   ✅ Valid: {}", outcome.valid_count);
            eprintln!("   ❌ Invalid: {}", outcome.invalid_count);
            for (profession, errors) in outcome.validation_errors.iter().take(5) {
                eprintln!("\n   {}:", profession);
                for err in errors.iter().take(3) {
                    eprintln!("     - {}", err);
                }
            }
        } else {
            eprintln!("   ✅ All {} documents valid!", outcome.valid_count);
        }
    }

    let written = write_documents(out_dir, &options.profession_prefix, &outcome.documents)?;
    for path in &written {
        eprintln!("💾 {}", path.display());
    }

    eprintln!("\n✨ Done!");
    Ok(())
}

fn cmd_parse(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing sheet: {}", input.display());

    let sheet = parse_sheet_file(input)?;

    eprintln!("   Encoding: {}", sheet.encoding);
    eprintln!("   Delimiter: '{}'", format_delimiter(sheet.delimiter));
    eprintln!("   Columns: {}", sheet.headers.join(", "));
    eprintln!("✅ Parsed {} rows", sheet.rows.len());

    let json = serde_json::to_string_pretty(&sheet.to_json_records())?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_validate(inputs: &[PathBuf]) -> Result<(), Box<dyn std::error::Error>> {
    let mut invalid = 0;

    for input in inputs {
        let content = fs::read_to_string(input)?;
        let document: serde_json::Value = serde_json::from_str(&content)?;

        match validate_profession_document(&document) {
            Ok(()) => eprintln!("✅ {}", input.display()),
            Err(errors) => {
                invalid += 1;
                eprintln!("❌ {}:", input.display());
                for err in errors.iter().take(5) {
                    eprintln!("   - {}", err);
                }
            }
        }
    }

    eprintln!("\n📊 Results: {} valid, {} invalid", inputs.len() - invalid, invalid);

    if invalid > 0 {
        std::process::exit(1);
    }

    Ok(())
}

/// First `.csv` file in the current directory, in name order.
fn find_sheet_in_cwd() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut candidates: Vec<PathBuf> = fs::read_dir(".")?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        })
        .collect();
    candidates.sort();

    candidates
        .into_iter()
        .next()
        .ok_or_else(|| "No spreadsheet files found in the current directory".into())
}

fn prompt(message: &str) -> Result<String, Box<dyn std::error::Error>> {
    eprint!("{}", message);
    std::io::stderr().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
