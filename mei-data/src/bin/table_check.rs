use std::fs::File;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use mei_core::TaxRules;
use mei_data::TaxTableLoader;

/// Validate a progressive bracket table stored as CSV.
///
/// The CSV file should have the following columns:
/// - tax_year: the tax year (e.g., 2025)
/// - upper_bound: inclusive ceiling (empty for the top bracket)
/// - rate: marginal rate as a decimal (e.g., 0.075)
/// - deductible: cumulative deductible for the one-step formula
#[derive(Parser, Debug)]
#[command(name = "mei-table-check")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing the bracket table
    #[arg(short, long)]
    file: PathBuf,

    /// Tax year to check; defaults to every year in the file
    #[arg(short, long)]
    year: Option<i32>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open: {}", args.file.display()))?;

    let records = TaxTableLoader::parse(file)
        .with_context(|| format!("Failed to parse CSV: {}", args.file.display()))?;

    println!("Parsed {} records from CSV", records.len());

    let years = match args.year {
        Some(year) => vec![year],
        None => TaxTableLoader::tax_years(&records),
    };

    let mut problems = 0;
    for year in years {
        let rules = TaxTableLoader::apply(TaxRules::default(), &records, year)
            .with_context(|| format!("Table for {year} is invalid"))?;

        println!("{year}: {} brackets", rules.brackets.len());
        for bracket in &rules.brackets {
            let ceiling = bracket
                .upper_bound
                .map_or_else(|| "unbounded".to_string(), |upper| upper.to_string());
            println!(
                "  up to {ceiling:>12}  rate {:>6}  deductible {:>10}",
                bracket.rate, bracket.deductible
            );
        }

        for mismatch in TaxTableLoader::check_deductibles(&rules.brackets) {
            problems += 1;
            println!(
                "  bracket {}: deductible {} but bounds imply {}",
                mismatch.index + 1,
                mismatch.published,
                mismatch.expected
            );
        }
    }

    if problems > 0 {
        bail!("{problems} deductible(s) disagree with the bracket bounds");
    }

    println!("Table is consistent.");
    Ok(())
}
