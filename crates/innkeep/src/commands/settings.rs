//! Global settings handlers.

use innkeep_core::Console;
use innkeep_core::model::Settings;
use serde_json::Value;

use crate::cli::{GlobalOpts, SettingsArgs, SettingsCommand};
use crate::error::CliError;
use crate::output;

fn detail(settings: &Settings) -> String {
    if settings.is_empty() {
        return "No settings stored.".into();
    }
    let fields: Vec<(&str, String)> = settings
        .iter()
        .map(|(k, v)| (k.as_str(), display_value(v)))
        .collect();
    output::detail_block(&fields)
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".into(),
        other => other.to_string(),
    }
}

/// JSON if it parses (`true`, `30`, `{"a":1}`), else the raw text.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()))
}

pub async fn handle(
    console: &Console,
    args: SettingsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SettingsCommand::Show => {
            let settings = console.settings().await?;
            let out = output::render_single(global.output, &settings, detail, |s| {
                s.keys().cloned().collect::<Vec<_>>().join("\n")
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SettingsCommand::Set { key, value } => {
            let key = key.trim();
            if key.is_empty() {
                return Err(CliError::validation("key", "setting key cannot be empty"));
            }
            let mut settings = console.settings().await?;
            settings.insert(key.to_owned(), parse_value(&value));
            console.update_settings(&settings).await?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn values_parse_as_json_first() {
        assert_eq!(parse_value("true"), json!(true));
        assert_eq!(parse_value("30"), json!(30));
        assert_eq!(parse_value("{\"a\":1}"), json!({"a": 1}));
        assert_eq!(parse_value("Welcome!"), json!("Welcome!"));
    }

    #[test]
    fn detail_shows_strings_unquoted() {
        let mut settings = Settings::new();
        settings.insert("welcome".into(), json!("Hello"));
        settings.insert("poll".into(), json!(30));
        let text = detail(&settings);
        assert!(text.contains("welcome: Hello"));
        assert!(text.contains("poll:"));
        assert!(text.contains("30"));
    }
}
