//! Summarize command implementation.

use keycommit_summary::{StubSummarizer, Summarizer};

use crate::input::read_text;
use crate::output::format_summary;

pub fn run(input: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_text(input.as_deref())?;
    let summary = StubSummarizer.summarize(&text)?;
    println!("{}", format_summary(&summary));
    Ok(())
}
