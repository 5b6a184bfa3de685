//! Interactive symptom checker CLI
//!
//! Reads a comma-separated symptom string per line, tries greeting
//! detection first, then resolves against the disease catalog and renders
//! the six-field report. Pass `--json` to emit the raw match as JSON
//! instead of the labeled report.
//!
//! Usage: symptom_cli [catalog.csv] [--json]

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use symptom_matcher::{
    detect_greeting, resolve_symptoms, CatalogIndex, FuzzyMatcher, GreetingTable, MatchResult,
};

fn main() -> Result<()> {
    let mut catalog_path = "data/disease_data.csv".to_string();
    let mut json_output = false;
    for arg in std::env::args().skip(1) {
        if arg == "--json" {
            json_output = true;
        } else {
            catalog_path = arg;
        }
    }

    let index = CatalogIndex::load(&catalog_path)
        .with_context(|| format!("failed to load disease catalog from '{catalog_path}'"))?;
    let greetings = GreetingTable::load("data/greetings.csv");
    let matcher = FuzzyMatcher;

    println!(
        "Symptom matcher ready: {} diseases, {} symptom tokens.",
        index.records().len(),
        index.vocabulary().len()
    );
    println!("Enter symptoms (comma-separated), or 'exit' to quit.");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let line = line?;
        let input = line.trim();

        if input.eq_ignore_ascii_case("exit") {
            break;
        }
        if input.is_empty() {
            continue;
        }

        if let Some(reply) = detect_greeting(input, &greetings, &matcher) {
            println!("{reply}");
            continue;
        }

        let tokens: Vec<String> = input
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if tokens.is_empty() {
            // No valid symptoms provided, distinct from "no match found"
            println!("I couldn't find any symptoms in that input. Try e.g. 'fever, cough'.");
            continue;
        }

        match resolve_symptoms(&tokens, &index, &matcher) {
            Some(result) if json_output => println!("{}", serde_json::to_string_pretty(&result)?),
            Some(result) => println!("{}", format_report(&result)),
            None => println!("No matching disease found. Please try more specific symptom names."),
        }
    }

    Ok(())
}

/// Render the six labeled fields, joining list fields with ", "
fn format_report(result: &MatchResult) -> String {
    format!(
        "Possible disease: {}\n\
         Description: {}\n\
         Medications: {}\n\
         Procedures: {}\n\
         Precautions: {}\n\
         Specialist to consult: {}",
        result.disease,
        result.description,
        result.medications.join(", "),
        result.procedures.join(", "),
        result.precautions.join(", "),
        result.specialist,
    )
}
