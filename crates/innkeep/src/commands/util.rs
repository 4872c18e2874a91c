//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::str::FromStr;

use tokio::sync::broadcast;

use innkeep_core::{
    Console, Direction, EntityId, ImageForm, Move, Notification, NotificationLevel,
};

use crate::cli::{GlobalOpts, ImageArgs, Position};
use crate::error::CliError;
use crate::output;

/// Print what the console reported during a command. Errors are left to
/// the process-level report, which carries the same message.
pub fn print_notifications(rx: &mut broadcast::Receiver<Notification>, global: &GlobalOpts) {
    while let Ok(n) = rx.try_recv() {
        if n.level != NotificationLevel::Error {
            output::print_notification(&n, global);
        }
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, global: &GlobalOpts) -> Result<bool, CliError> {
    if global.yes {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(crate::error::prompt_err)
}

pub fn entity_id(raw: &str) -> EntityId {
    EntityId::from(raw.trim())
}

/// The property a new record belongs to: `--property`, then the profile
/// default, else an error naming the flag.
pub fn require_property(console: &Console) -> Result<EntityId, CliError> {
    console
        .property()
        .cloned()
        .ok_or_else(|| CliError::validation("property", "select one with --property <ID>"))
}

/// Parse a case-insensitive enum flag, listing the accepted values on
/// failure.
pub fn parse_enum<T: FromStr>(field: &str, raw: &str, accepted: &str) -> Result<T, CliError> {
    raw.trim()
        .parse()
        .map_err(|_| CliError::validation(field, format!("'{raw}' is not one of: {accepted}")))
}

pub fn parse_opt_enum<T: FromStr>(
    field: &str,
    raw: Option<&str>,
    accepted: &str,
) -> Result<Option<T>, CliError> {
    raw.map(|r| parse_enum(field, r, accepted)).transpose()
}

pub fn to_move(position: Position) -> Move {
    match position {
        Position::Up => Move::Step(Direction::Up),
        Position::Down => Move::Step(Direction::Down),
        Position::Index(index) => Move::To(index),
    }
}

/// Build the image form from the mutually exclusive `--image-*` flags.
/// A search picks the first hit.
pub async fn image_form(console: &Console, args: &ImageArgs) -> Result<ImageForm, CliError> {
    let mut form = ImageForm::new();
    if let Some(path) = &args.image_file {
        form.upload(path.clone());
    } else if let Some(url) = &args.image_url {
        form.url(url.clone(), false);
    } else if let Some(query) = &args.image_search {
        let hit = console
            .search_images(query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                CliError::validation("image-search", format!("no images found for '{query}'"))
            })?;
        form.search_result(hit);
    }
    Ok(form)
}

/// `Some(vec)` only when the flag was given.
pub fn opt_vec(values: Option<&Vec<String>>) -> Option<Vec<String>> {
    values.map(|v| {
        v.iter()
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use innkeep_core::GuestStatus;

    #[test]
    fn enum_flags_parse_case_insensitively() {
        let status: GuestStatus = parse_enum("status", "Checked_In", "...").unwrap();
        assert_eq!(status, GuestStatus::CheckedIn);
        assert!(parse_enum::<GuestStatus>("status", "lost", "...").is_err());
    }

    #[test]
    fn positions_become_moves() {
        assert_eq!(to_move(Position::Up), Move::Step(Direction::Up));
        assert_eq!(to_move(Position::Index(2)), Move::To(2));
    }

    #[test]
    fn numeric_ids_normalize() {
        assert_eq!(entity_id(" 42 "), EntityId::from(42));
    }
}
