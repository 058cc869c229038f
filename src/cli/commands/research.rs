//! Research command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::pipeline::ResearchPipeline;
use anyhow::Result;

/// Run the research command.
pub async fn run_research(
    instruction: &str,
    num_queries: Option<usize>,
    json: bool,
    settings: Settings,
) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Research) {
        Output::error(&format!("{}", e));
        Output::info("Run 'granske doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let pipeline = ResearchPipeline::new(settings)?;

    let spinner = Output::spinner("Researching...");

    match pipeline.research(instruction, num_queries).await {
        Ok(report) => {
            spinner.finish_and_clear();

            if json {
                println!("{}", report.to_json_pretty()?);
            } else {
                Output::header("Queries");
                for query in &report.queries {
                    Output::list_item(query);
                }
                println!("\n{}", report.format_for_display());
            }
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Research failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
