//! Login, logout and whoami.

use std::io::BufRead;
use std::sync::Arc;

use dialoguer::Input;
use secrecy::SecretString;

use innkeep_core::{Console, CoreError, SessionStore, User};

use crate::cli::{GlobalOpts, LoginArgs};
use crate::config::{self, KeyringSessionStore};
use crate::error::{CliError, prompt_err};
use crate::output;

use super::util;

fn detail(user: &User) -> String {
    output::detail_block(&[
        ("ID", user.id.to_string()),
        ("Name", output::or_dash(user.name.as_deref())),
        ("Email", output::or_dash(user.email.as_deref())),
        ("Role", output::or_dash(user.role.as_deref())),
    ])
}

fn render(user: &User, global: &GlobalOpts) {
    let out = output::render_single(global.output, user, detail, |u| {
        u.email.clone().unwrap_or_else(|| u.id.to_string())
    });
    output::print_output(&out, global.quiet);
}

fn read_password(from_stdin: bool) -> Result<String, CliError> {
    if from_stdin {
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        return Ok(line.trim_end_matches(['\r', '\n']).to_owned());
    }
    rpassword::prompt_password("Password: ").map_err(prompt_err)
}

pub async fn login(args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let resolved = config::resolve(global)?;

    let email = match args
        .email
        .or_else(|| resolved.profile.as_ref().and_then(|p| p.email.clone()))
    {
        Some(email) => email,
        None => Input::new()
            .with_prompt("Email")
            .interact_text()
            .map_err(prompt_err)?,
    };
    let password = read_password(args.password_stdin)?;
    if email.trim().is_empty() || password.is_empty() {
        return Err(CliError::validation(
            "credentials",
            "email and password cannot be empty",
        ));
    }

    let sessions: Arc<dyn SessionStore> =
        Arc::new(KeyringSessionStore::new(resolved.profile_name.clone()));
    let console = Console::new(resolved.console, sessions)?;
    let mut notifications = console.notifications();

    let result = console
        .login(email.trim(), &SecretString::from(password))
        .await;
    util::print_notifications(&mut notifications, global);

    let user = result.map_err(|e| match e {
        // A 401 from the login endpoint means bad credentials, not an
        // expired session.
        CoreError::LoginRequired => CliError::AuthFailed {
            message: "invalid email or password".into(),
        },
        other => other.into(),
    })?;
    render(&user, global);
    Ok(())
}

pub async fn logout(global: &GlobalOpts) -> Result<(), CliError> {
    let resolved = config::resolve(global)?;
    let sessions = config::session_store(global, &resolved);
    let console = Console::new(resolved.console, sessions)?;
    let mut notifications = console.notifications();

    // Attach the stored token so the server-side logout is authenticated;
    // an unreachable backend must not keep the local session alive.
    if let Err(e) = console.authenticate().await {
        tracing::warn!(error = %e, "session check before logout failed");
    }
    let result = console.logout().await;
    util::print_notifications(&mut notifications, global);
    Ok(result?)
}

pub fn whoami(console: &Console, global: &GlobalOpts) -> Result<(), CliError> {
    let user = console.user().ok_or(CliError::LoginRequired)?;
    render(&user, global);
    Ok(())
}
