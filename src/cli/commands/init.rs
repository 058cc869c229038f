//! Init command - interactive first-run setup.

use crate::cli::Output;
use crate::config::Settings;
use console::style;
use std::io::{self, Write};

/// Run the init command for first-time setup.
pub fn run_init(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Granske Setup");
    println!();
    println!("Welcome to Granske! Let's make sure everything is configured correctly.\n");

    // Step 1: Check API keys
    println!("{}", style("Step 1: Checking API keys").bold().cyan());
    println!();

    let missing = missing_api_keys();

    if !missing.is_empty() {
        Output::warning("Some API keys are missing:");
        println!();
        for name in &missing {
            println!(
                "  {} {} - not set",
                style("✗").red(),
                style(name).bold()
            );
            println!("    {} {}", style("→").dim(), style(key_hint(name)).dim());
        }
        println!();
        println!("  Set them in your shell configuration (~/.bashrc, ~/.zshrc, etc.),");
        println!("  or in a .env file in your working directory.");
        println!();

        if !prompt_continue("Continue anyway?")? {
            println!();
            Output::info("Setup cancelled. Set the missing keys and run 'granske init' again.");
            return Ok(());
        }
    } else {
        Output::success("Both API keys are configured!");
    }

    println!();

    // Step 2: Create config file
    println!("{}", style("Step 2: Configuration file").bold().cyan());
    println!();

    let config_path = Settings::default_config_path();
    if config_path.exists() {
        Output::info(&format!("Config file exists: {}", config_path.display()));
    } else if prompt_continue("Create default configuration file?")? {
        // Create parent directory if needed
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        settings.save_to(&config_path)?;
        Output::success(&format!("Created config file: {}", config_path.display()));
        println!();
        println!(
            "  Edit your config with: {}",
            style("granske config edit").green()
        );
    } else {
        Output::info("Skipped config file creation. Using defaults.");
    }

    println!();

    // Summary
    println!("{}", style("Setup Complete!").bold().green());
    println!();
    println!("Next steps:");
    println!("  {} Check configuration status", style("granske doctor").cyan());
    println!(
        "  {} Research your first topic",
        style("granske research \"<instruction>\"").cyan()
    );
    println!(
        "  {} Connect an AI assistant over MCP",
        style("granske mcp").cyan()
    );
    println!();
    println!("For more help: {}", style("granske --help").cyan());

    Ok(())
}

/// Return the names of required API keys that are not set.
fn missing_api_keys() -> Vec<&'static str> {
    ["OPENAI_API_KEY", "TAVILY_API_KEY"]
        .into_iter()
        .filter(|name| std::env::var(name).map(|v| v.is_empty()).unwrap_or(true))
        .collect()
}

/// Get a hint for obtaining and setting an API key.
fn key_hint(name: &str) -> &'static str {
    match name {
        "OPENAI_API_KEY" => {
            "Get a key from https://platform.openai.com/api-keys and export OPENAI_API_KEY='sk-...'"
        }
        "TAVILY_API_KEY" => {
            "Get a key from https://tavily.com and export TAVILY_API_KEY='tvly-...'"
        }
        _ => "Check the documentation for setup instructions",
    }
}

/// Prompt user for yes/no confirmation.
fn prompt_continue(message: &str) -> io::Result<bool> {
    print!("{} {} ", style("?").cyan(), message);
    print!("{} ", style("[y/N]").dim());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().to_lowercase() == "y" || input.trim().to_lowercase() == "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_hint_openai() {
        assert!(key_hint("OPENAI_API_KEY").contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_key_hint_tavily() {
        assert!(key_hint("TAVILY_API_KEY").contains("tavily.com"));
    }
}
