/// Print the contents of an .xlsx workbook as tab-separated text.
///
/// Set `RUST_LOG=quince=debug` to trace each decode stage.
use std::path::PathBuf;

use clap::Parser;
use quince::{LoadOptions, Sheet, StyleInheritance, Workbook};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "dump", about = "Dump the sheets of an Excel workbook", version)]
struct Args {
    /// Workbook to read
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Only print the sheet with this name
    #[arg(short, long)]
    sheet: Option<String>,

    /// Print the resolved style of every non-empty cell as JSON
    #[arg(long)]
    styles: bool,

    /// Decode worksheets one at a time
    #[arg(long)]
    sequential: bool,

    /// Let cell formats inherit from their named cell style
    #[arg(long)]
    named_styles: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let inheritance = if args.named_styles {
        StyleInheritance::Named
    } else {
        StyleInheritance::Direct
    };
    let options = LoadOptions::new()
        .with_parallel_sheets(!args.sequential)
        .with_style_inheritance(inheritance);

    let workbook = Workbook::open_with_options(&args.input, &options)?;

    match &args.sheet {
        Some(name) => match workbook.sheet_by_name(name) {
            Some(sheet) => print_sheet(sheet, args.styles)?,
            None => {
                eprintln!(
                    "no sheet named '{}'; available: {}",
                    name,
                    workbook.sheet_names().join(", ")
                );
                std::process::exit(1);
            },
        },
        None => {
            for sheet in &workbook {
                print_sheet(sheet, args.styles)?;
            }
        },
    }

    Ok(())
}

fn print_sheet(sheet: &Sheet, styles: bool) -> Result<(), Box<dyn std::error::Error>> {
    println!(
        "== {} ({}, {} rows x {} columns) ==",
        sheet.name(),
        sheet.state(),
        sheet.max_row(),
        sheet.max_col()
    );

    for row in sheet.rows() {
        let values: Vec<&str> = row.iter().map(|cell| cell.text()).collect();
        println!("{}\t{}", row.index() + 1, values.join("\t"));

        if styles {
            for cell in row.iter().filter(|cell| !cell.is_empty()) {
                println!("  {} {}", cell.reference(), serde_json::to_string(&cell.style())?);
            }
        }
    }

    for range in sheet.merged_ranges() {
        println!("merged {}", range);
    }
    println!();
    Ok(())
}
