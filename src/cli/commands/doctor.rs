//! Doctor command - verify API keys and configuration.

use crate::cli::Output;
use crate::config::Settings;
use console::style;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Granske Doctor");
    println!();
    println!("Checking API keys and configuration...\n");

    let mut checks = Vec::new();

    // Check API keys
    println!("{}", style("API Configuration").bold());
    let openai_check = check_openai_api_key();
    openai_check.print();
    checks.push(openai_check);

    let tavily_check = check_tavily_api_key();
    tavily_check.print();
    checks.push(tavily_check);

    println!();

    // Check model settings
    println!("{}", style("Model Configuration").bold());
    let model_check = check_chat_model(settings);
    model_check.print();
    checks.push(model_check);

    println!();

    // Check configuration
    println!("{}", style("Configuration").bold());
    let config_check = check_config_file();
    config_check.print();
    checks.push(config_check);

    if let Some(prompts_check) = check_prompts_dir(settings) {
        prompts_check.print();
        checks.push(prompts_check);
    }

    println!();

    // Summary
    let errors = checks
        .iter()
        .filter(|c| c.status == CheckStatus::Error)
        .count();
    let warnings = checks
        .iter()
        .filter(|c| c.status == CheckStatus::Warning)
        .count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Granske.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Granske is ready to use.");
    }

    Ok(())
}

/// Check if OpenAI API key is configured.
fn check_openai_api_key() -> CheckResult {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if key.starts_with("sk-") && key.len() > 20 => {
            CheckResult::ok("OPENAI_API_KEY", &format!("configured ({})", mask_key(&key)))
        }
        Ok(key) if key.is_empty() => CheckResult::error(
            "OPENAI_API_KEY",
            "empty",
            "Set with: export OPENAI_API_KEY='sk-...'",
        ),
        Ok(_) => CheckResult::warning(
            "OPENAI_API_KEY",
            "set but format looks unusual",
            "Expected format: sk-... (OpenAI API key)",
        ),
        Err(_) => CheckResult::error(
            "OPENAI_API_KEY",
            "not set",
            "Set with: export OPENAI_API_KEY='sk-...'",
        ),
    }
}

/// Check if Tavily API key is configured.
fn check_tavily_api_key() -> CheckResult {
    match std::env::var("TAVILY_API_KEY") {
        Ok(key) if key.starts_with("tvly-") && key.len() > 10 => {
            CheckResult::ok("TAVILY_API_KEY", &format!("configured ({})", mask_key(&key)))
        }
        Ok(key) if key.is_empty() => CheckResult::error(
            "TAVILY_API_KEY",
            "empty",
            "Get a key at https://tavily.com and set: export TAVILY_API_KEY='tvly-...'",
        ),
        Ok(_) => CheckResult::warning(
            "TAVILY_API_KEY",
            "set but format looks unusual",
            "Expected format: tvly-... (Tavily API key)",
        ),
        Err(_) => CheckResult::error(
            "TAVILY_API_KEY",
            "not set",
            "Get a key at https://tavily.com and set: export TAVILY_API_KEY='tvly-...'",
        ),
    }
}

/// Check the configured chat model.
fn check_chat_model(settings: &Settings) -> CheckResult {
    if settings.chat.model.is_empty() {
        return CheckResult::error(
            "Chat model",
            "empty",
            "Set [chat] model in the config file, or OPENAI_MODEL in the environment",
        );
    }

    let message = match &settings.chat.base_url {
        Some(base) => format!("{} via {}", settings.chat.model, base),
        None => settings.chat.model.clone(),
    };
    CheckResult::ok("Chat model", &message)
}

/// Check if config file exists.
fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: granske init (or granske config edit)",
        )
    }
}

/// Check the custom prompts directory, if one is configured.
fn check_prompts_dir(settings: &Settings) -> Option<CheckResult> {
    let dir = settings.prompts.custom_dir.as_deref()?;
    let path = Settings::expand_path(dir);

    if !path.exists() {
        return Some(CheckResult::warning(
            "Prompts directory",
            &format!("{} (not found)", path.display()),
            "Create it or remove prompts.custom_dir from the config",
        ));
    }

    let overrides: Vec<&str> = ["query.toml", "qa.toml"]
        .into_iter()
        .filter(|f| path.join(f).exists())
        .collect();

    let message = if overrides.is_empty() {
        format!("{} (no override files)", path.display())
    } else {
        format!("{} ({})", path.display(), overrides.join(", "))
    };
    Some(CheckResult::ok("Prompts directory", &message))
}

/// Mask an API key for display.
fn mask_key(key: &str) -> String {
    if key.len() > 12 {
        format!("{}...{}", &key[..7], &key[key.len() - 4..])
    } else {
        "***".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_ok() {
        let result = CheckResult::ok("test", "passed");
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.hint.is_none());
    }

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("sk-proj-abcdefgh1234"), "sk-proj...1234");
        assert_eq!(mask_key("short"), "***");
    }

    #[test]
    fn test_check_chat_model_reports_base_url() {
        let mut settings = Settings::default();
        settings.chat.base_url = Some("http://localhost:8080/v1".to_string());

        let result = check_chat_model(&settings);
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.message.contains("localhost:8080"));
    }

    #[test]
    fn test_check_chat_model_empty_is_error() {
        let mut settings = Settings::default();
        settings.chat.model = String::new();

        let result = check_chat_model(&settings);
        assert_eq!(result.status, CheckStatus::Error);
    }
}
