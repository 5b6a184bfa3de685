//! Greeting Table
//!
//! Small auxiliary phrase -> canned-response table with the same lifecycle
//! as the catalog index but an independent vocabulary. Loading never fails
//! hard: when the CSV source is absent or unusable the built-in default
//! table takes over, so greeting detection is always available.

use std::path::Path;

use anyhow::{bail, Context, Result};
use polars::prelude::*;
use rustc_hash::FxHashMap;

use crate::matcher::normalize;

/// Default greeting -> response pairs used when no CSV source is available
const BUILTIN_GREETINGS: &[(&str, &str)] = &[
    ("hello", "Hello! Tell me your symptoms and I'll try to help."),
    ("hi", "Hi there! List your symptoms, comma-separated."),
    ("hey", "Hey! What symptoms are you experiencing?"),
    ("good morning", "Good morning! How are you feeling today?"),
    ("good evening", "Good evening! How are you feeling today?"),
    ("how are you", "I'm doing well, thanks! How are you feeling?"),
    ("thanks", "You're welcome. Take care!"),
    ("thank you", "You're welcome. Take care!"),
];

/// Normalized greeting phrases plus their canned responses
pub struct GreetingTable {
    /// Phrases in source order; the stable candidate order for matching
    phrases: Vec<String>,
    responses: FxHashMap<String, String>,
}

impl GreetingTable {
    /// Load the table from a `greeting,response` CSV.
    ///
    /// Falls back to the built-in table when the file is missing, the
    /// columns are absent, or no usable pair remains.
    pub fn load(path: impl AsRef<Path>) -> Self {
        Self::try_load(path.as_ref()).unwrap_or_else(|_| Self::builtin())
    }

    fn try_load(path: &Path) -> Result<Self> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .with_context(|| format!("failed to open greetings CSV: {}", path.display()))?
            .finish()
            .with_context(|| format!("failed to read greetings CSV: {}", path.display()))?;

        let greeting_col = df
            .column("greeting")
            .context("greetings CSV has no 'greeting' column")?
            .str()
            .context("'greeting' column is not string-typed")?;
        let response_col = df
            .column("response")
            .context("greetings CSV has no 'response' column")?
            .str()
            .context("'response' column is not string-typed")?;

        let mut pairs = Vec::with_capacity(df.height());
        for idx in 0..df.height() {
            if let (Some(greeting), Some(response)) = (greeting_col.get(idx), response_col.get(idx))
            {
                pairs.push((greeting.to_string(), response.to_string()));
            }
        }

        let table = Self::from_pairs(pairs);
        if table.phrases.is_empty() {
            bail!("greetings CSV contains no usable pairs");
        }
        Ok(table)
    }

    /// Build a table from phrase/response pairs.
    ///
    /// Phrases are normalized; empty phrases are dropped and the first
    /// occurrence of a duplicate phrase wins.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut phrases = Vec::new();
        let mut responses = FxHashMap::default();

        for (phrase, response) in pairs {
            let phrase = normalize(&phrase);
            if phrase.is_empty() || responses.contains_key(&phrase) {
                continue;
            }
            phrases.push(phrase.clone());
            responses.insert(phrase, response);
        }

        Self { phrases, responses }
    }

    /// The built-in default table
    pub fn builtin() -> Self {
        Self::from_pairs(
            BUILTIN_GREETINGS
                .iter()
                .map(|(phrase, response)| (phrase.to_string(), response.to_string())),
        )
    }

    /// Normalized greeting phrases in source order
    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    /// Canned response for a phrase returned by matching against `phrases()`
    pub fn response_for(&self, phrase: &str) -> Option<&str> {
        self.responses.get(phrase).map(String::as_str)
    }
}
