//! Streaming service command handlers.

use std::sync::Arc;

use tabled::Tabled;

use innkeep_core::model::{StreamingInput, StreamingService};
use innkeep_core::presets::{STREAMING_PRESETS, StreamingPreset};
use innkeep_core::{Console, EntityId, listing};

use crate::cli::{GlobalOpts, StreamingArgs, StreamingCommand, StreamingFields};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct StreamingRow {
    #[tabled(rename = "#")]
    order: u32,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Service")]
    name: String,
    #[tabled(rename = "Type")]
    service_type: String,
    #[tabled(rename = "Scheme")]
    scheme: String,
    #[tabled(rename = "Login")]
    requires_login: &'static str,
    #[tabled(rename = "Active")]
    active: &'static str,
}

impl From<&Arc<StreamingService>> for StreamingRow {
    fn from(s: &Arc<StreamingService>) -> Self {
        Self {
            order: s.display_order,
            id: s.id.to_string(),
            name: s.service_name.clone(),
            service_type: s.service_type.clone().unwrap_or_default(),
            scheme: s.app_url_scheme.clone().unwrap_or_default(),
            requires_login: output::yes_no(s.requires_login),
            active: output::yes_no(s.is_active),
        }
    }
}

#[derive(Tabled)]
struct PresetRow {
    #[tabled(rename = "Key")]
    key: &'static str,
    #[tabled(rename = "Name")]
    name: &'static str,
    #[tabled(rename = "Type")]
    service_type: &'static str,
    #[tabled(rename = "Scheme")]
    scheme: &'static str,
    #[tabled(rename = "Bundle ID")]
    bundle_id: &'static str,
}

impl From<&StreamingPreset> for PresetRow {
    fn from(p: &StreamingPreset) -> Self {
        Self {
            key: p.key,
            name: p.name,
            service_type: p.service_type,
            scheme: p.app_url_scheme,
            bundle_id: p.bundle_id,
        }
    }
}

fn detail(s: &Arc<StreamingService>) -> String {
    output::detail_block(&[
        ("ID", s.id.to_string()),
        ("Service", s.service_name.clone()),
        ("Type", output::or_dash(s.service_type.as_deref())),
        ("Scheme", output::or_dash(s.app_url_scheme.as_deref())),
        ("Logo", output::or_dash(s.logo_url.as_deref())),
        ("Requires login", output::yes_no(s.requires_login).into()),
        ("Order", s.display_order.to_string()),
        ("Active", output::yes_no(s.is_active).into()),
    ])
}

fn print_one(s: &Arc<StreamingService>, global: &GlobalOpts) {
    let out = output::render_single(global.output, s, detail, |s| s.id.to_string());
    output::print_output(&out, global.quiet);
}

fn print_list(items: &[Arc<StreamingService>], global: &GlobalOpts) {
    let out = output::render_list(
        global.output,
        items,
        |s| StreamingRow::from(s),
        |s| s.id.to_string(),
    );
    output::print_output(&out, global.quiet);
}

fn input(fields: StreamingFields, property_id: Option<EntityId>) -> StreamingInput {
    StreamingInput {
        property_id,
        service_name: fields.name,
        service_type: fields.service_type,
        app_url_scheme: fields.scheme,
        logo_url: fields.logo_url,
        requires_login: fields.requires_login,
        is_active: None,
    }
}

/// The built-in preset table. Needs no session.
pub fn presets(global: &GlobalOpts) {
    let out = output::render_list(
        global.output,
        STREAMING_PRESETS,
        |p| PresetRow::from(p),
        |p| p.key.to_owned(),
    );
    output::print_output(&out, global.quiet);
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: StreamingArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        StreamingCommand::List { state } => {
            let all = console.list_streaming(console.property()).await?;
            let mut shown: Vec<_> = all
                .into_iter()
                .filter(|s| state.state().is_none_or(|on| s.is_active == on))
                .collect();
            listing::by_display_order(&mut shown);
            print_list(&shown, global);
            Ok(())
        }

        StreamingCommand::Presets => {
            presets(global);
            Ok(())
        }

        StreamingCommand::Create { preset, fields } => {
            let property = util::require_property(console)?;
            let service = if let Some(preset) = preset {
                console
                    .create_streaming_from_preset(&preset, Some(property))
                    .await?
            } else {
                if fields.name.as_deref().is_none_or(|n| n.trim().is_empty()) {
                    return Err(CliError::validation(
                        "name",
                        "give --name or pick a --preset",
                    ));
                }
                console
                    .create_streaming(&input(fields, Some(property)))
                    .await?
            };
            print_one(&service, global);
            Ok(())
        }

        StreamingCommand::Update { id, fields } => {
            let service = console
                .update_streaming(&util::entity_id(&id), &input(fields, None))
                .await?;
            print_one(&service, global);
            Ok(())
        }

        StreamingCommand::Toggle { id } => {
            console.list_streaming(console.property()).await?;
            let service = console.toggle_streaming(&util::entity_id(&id)).await?;
            print_one(&service, global);
            Ok(())
        }

        StreamingCommand::Move(args) => {
            console.list_streaming(console.property()).await?;
            let ordered = console
                .move_streaming(&util::entity_id(&args.id), util::to_move(args.position))
                .await?;
            print_list(&ordered, global);
            Ok(())
        }

        StreamingCommand::Delete { id } => {
            if !util::confirm(&format!("Delete streaming service {id}?"), global)? {
                return Ok(());
            }
            console.delete_streaming(&util::entity_id(&id)).await?;
            Ok(())
        }
    }
}
