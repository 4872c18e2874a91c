//! Config subcommand handlers.

use dialoguer::{Input, Select};
use secrecy::SecretString;
use tabled::Tabled;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Environment, KeyringSessionStore, Profile};
use crate::error::{CliError, prompt_err};
use crate::output;

const REDACTED: &str = "****";

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "")]
    active: &'static str,
    #[tabled(rename = "Profile")]
    name: String,
    #[tabled(rename = "Environment")]
    environment: String,
    #[tabled(rename = "API URL")]
    api_url: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Property")]
    property: String,
}

/// Blank answers leave the field unset.
fn optional(answer: String) -> Option<String> {
    let trimmed = answer.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Plaintext tokens never leave the process.
fn redacted(mut cfg: Config) -> Config {
    for profile in cfg.profiles.values_mut() {
        if profile.token.is_some() {
            profile.token = Some(REDACTED.into());
        }
    }
    cfg
}

fn init_wizard() -> Result<(), CliError> {
    let path = config::config_path();
    eprintln!("innkeep configuration wizard");
    eprintln!("  Config path: {}\n", path.display());

    let mut cfg = config::load_config_or_default();

    let name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    let environments = [Environment::Production, Environment::Development];
    let choice = Select::new()
        .with_prompt("Backend")
        .items(&["production", "development (localhost)"])
        .default(0)
        .interact()
        .map_err(prompt_err)?;
    let environment = environments[choice];

    let api_url: String = Input::new()
        .with_prompt("API URL")
        .allow_empty(true)
        .default(environment.api_fallback().into())
        .interact_text()
        .map_err(prompt_err)?;

    let email: String = Input::new()
        .with_prompt("Login email (optional)")
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;

    let property: String = Input::new()
        .with_prompt("Default property ID (optional)")
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;

    let profile = cfg.profiles.entry(name.clone()).or_default();
    profile.environment = environment;
    profile.api_url = optional(api_url).filter(|u| u != environment.api_fallback());
    profile.email = optional(email);
    profile.default_property = optional(property);
    cfg.default_profile = Some(name.clone());

    config::save_config(&cfg)?;

    eprintln!("\n✓ Configuration written to {}", path.display());
    eprintln!("  Active profile: {name}");
    eprintln!("\n  Next: innkeep login");
    Ok(())
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init_wizard(),

        ConfigCommand::Show => {
            let cfg = redacted(config::load_config_or_default());
            let out = output::render_single(
                global.output,
                &cfg,
                |c| toml::to_string_pretty(c).unwrap_or_default(),
                |c| c.profiles.keys().cloned().collect::<Vec<_>>().join("\n"),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::SetToken => {
            let cfg = config::load_config_or_default();
            let profile = config::active_profile_name(global, &cfg);
            let token = rpassword::prompt_password(format!("Token for '{profile}': "))
                .map_err(prompt_err)?;
            let token = token.trim();
            if token.is_empty() {
                return Err(CliError::validation("token", "token cannot be empty"));
            }
            KeyringSessionStore::new(profile.clone())
                .set_token(&SecretString::from(token.to_owned()))?;
            if !global.quiet {
                eprintln!("✓ Token stored in the system keyring for profile '{profile}'");
            }
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Default profile set to '{name}'");
            }
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let active = config::active_profile_name(global, &cfg);
            let rows: Vec<(String, Profile)> = cfg
                .profiles
                .iter()
                .map(|(name, p)| (name.clone(), p.clone()))
                .collect();
            let out = output::render_list(
                global.output,
                &rows,
                |(name, p)| ProfileRow {
                    active: if *name == active { "*" } else { "" },
                    name: name.clone(),
                    environment: p.environment.to_string(),
                    api_url: p
                        .api_url
                        .clone()
                        .unwrap_or_else(|| p.environment.api_fallback().into()),
                    email: p.email.clone().unwrap_or_default(),
                    property: p.default_property.clone().unwrap_or_default(),
                },
                |(name, _)| name.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }
    }
}
