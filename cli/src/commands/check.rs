//! # UnitXchange Check Command
//!
//! File: cli/src/commands/check.rs
//!
//! Runs the conversion-question classifier that gates strict mode. Handy for
//! finding out why a prompt was rejected at temperature 0. Always exits 0.
//!
use crate::chatbot::classifier::{is_conversion_question, normalize};
use crate::core::error::Result;
use clap::Parser;
use tracing::debug;

#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Text to classify.
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
}

pub async fn handle_check(args: CheckArgs) -> Result<()> {
    let text = args.text.join(" ");
    debug!("Normalized input: '{}'", normalize(&text));
    if is_conversion_question(&text) {
        println!("✅ Conversion question");
    } else {
        println!("❌ Not a conversion question");
    }
    Ok(())
}
