//! Property command handlers.

use std::sync::Arc;

use tabled::Tabled;

use innkeep_core::Console;
use innkeep_core::model::{Property, PropertyInput};

use crate::cli::{GlobalOpts, PropertiesArgs, PropertiesCommand, PropertyFields};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct PropertyRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Check-in")]
    check_in: String,
    #[tabled(rename = "Check-out")]
    check_out: String,
}

impl From<&Arc<Property>> for PropertyRow {
    fn from(p: &Arc<Property>) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name.clone(),
            address: p.address.clone().unwrap_or_default(),
            check_in: p.check_in_time.clone().unwrap_or_default(),
            check_out: p.check_out_time.clone().unwrap_or_default(),
        }
    }
}

fn detail(p: &Arc<Property>) -> String {
    output::detail_block(&[
        ("ID", p.id.to_string()),
        ("Name", p.name.clone()),
        ("Address", output::or_dash(p.address.as_deref())),
        ("Wi-Fi SSID", output::or_dash(p.wifi_ssid.as_deref())),
        (
            "Wi-Fi password",
            if p.wifi_password.is_some() { "****" } else { "-" }.into(),
        ),
        ("Check-in", output::or_dash(p.check_in_time.as_deref())),
        ("Check-out", output::or_dash(p.check_out_time.as_deref())),
    ])
}

fn input(fields: PropertyFields) -> PropertyInput {
    PropertyInput {
        name: fields.name,
        address: fields.address,
        wifi_ssid: fields.wifi_ssid,
        wifi_password: fields.wifi_password,
        check_in_time: fields.check_in_time,
        check_out_time: fields.check_out_time,
    }
}

fn print_one(p: &Arc<Property>, global: &GlobalOpts) {
    let out = output::render_single(global.output, p, detail, |p| p.id.to_string());
    output::print_output(&out, global.quiet);
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: PropertiesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        PropertiesCommand::List => {
            let properties = console.list_properties().await?;
            let out = output::render_list(
                global.output,
                &properties,
                |p| PropertyRow::from(p),
                |p| p.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PropertiesCommand::Get { id } => {
            let property = console.get_property(&util::entity_id(&id)).await?;
            print_one(&property, global);
            Ok(())
        }

        PropertiesCommand::Create(fields) => {
            if fields.name.as_deref().is_none_or(|n| n.trim().is_empty()) {
                return Err(CliError::validation("name", "a property needs a name"));
            }
            let property = console.create_property(&input(fields)).await?;
            print_one(&property, global);
            Ok(())
        }

        PropertiesCommand::Update { id, fields } => {
            let property = console
                .update_property(&util::entity_id(&id), &input(fields))
                .await?;
            print_one(&property, global);
            Ok(())
        }

        PropertiesCommand::Delete { id } => {
            if !util::confirm(&format!("Delete property {id}?"), global)? {
                return Ok(());
            }
            console.delete_property(&util::entity_id(&id)).await?;
            Ok(())
        }
    }
}
