use std::io;
use std::io::BufRead;
use std::io::Write;

use super::*;

const PROMPT: &str = "Continue? [Y]/n: ";

/// Show the Deployments about to be restarted and ask once whether to go ahead.
///
/// An empty plan returns `false` without reading `input`.
pub fn confirm(plan: &RestartPlan, input: impl BufRead, mut output: impl Write) -> io::Result<bool> {
    if plan.is_empty() {
        tracing::info!("No deployments to be restarted");
        return Ok(false);
    }

    let deployments = plan.deployments().collect::<Vec<_>>();
    let listing = serde_json::to_string_pretty(&deployments)?;
    tracing::info!(
        "Deployments to be restarted ({}):\n{listing}",
        deployments.len()
    );

    write!(output, "{PROMPT}")?;
    output.flush()?;

    let answer = read_answer(input)?;
    Ok(accepts(&answer))
}

fn read_answer(mut input: impl BufRead) -> io::Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    let answer = line.trim_end_matches(['\r', '\n']);
    Ok(answer.to_string())
}

/// Only the first character counts; a `y` is appended so an empty answer accepts.
pub fn accepts(answer: &str) -> bool {
    format!("{answer}y")
        .to_lowercase()
        .starts_with(['y', 't'])
}
