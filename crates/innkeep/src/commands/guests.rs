//! Guest command handlers.

use std::sync::Arc;

use tabled::Tabled;

use innkeep_core::listing::{self, Filter, GuestFilter, GuestSort};
use innkeep_core::model::{Guest, GuestInput, GuestStatus, GuestType};
use innkeep_core::{Console, EntityId};

use crate::cli::{GlobalOpts, GuestFields, GuestListArgs, GuestsArgs, GuestsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

const STATUSES: &str = "reserved, checked_in, checkout_due, checked_out, cancelled";
const TYPES: &str = "family, couple, solo, business, group, other";

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct GuestRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Room")]
    room: String,
    #[tabled(rename = "Check-in")]
    check_in: String,
    #[tabled(rename = "Check-out")]
    check_out: String,
    #[tabled(rename = "Type")]
    guest_type: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Arc<Guest>> for GuestRow {
    fn from(g: &Arc<Guest>) -> Self {
        Self {
            id: g.id.to_string(),
            name: g.display_name(),
            room: g.room_number.clone().unwrap_or_default(),
            check_in: g.check_in().map(|d| d.to_string()).unwrap_or_default(),
            check_out: g.check_out().map(|d| d.to_string()).unwrap_or_default(),
            guest_type: g.guest_type.to_string(),
            status: g.status.to_string(),
        }
    }
}

fn detail(g: &Arc<Guest>) -> String {
    let party = match (g.party_size, g.adults, g.children) {
        (_, Some(a), Some(c)) => format!("{a} adults, {c} children"),
        (Some(n), _, _) => n.to_string(),
        _ => "-".into(),
    };
    let labels = g.guest_labels.iter().cloned().collect::<Vec<_>>().join(", ");
    output::detail_block(&[
        ("ID", g.id.to_string()),
        ("Name", g.display_name()),
        ("Email", output::or_dash(g.email.as_deref())),
        ("Phone", output::or_dash(g.phone.as_deref())),
        ("Room", output::or_dash(g.room_number.as_deref())),
        ("Check-in", output::or_dash(g.check_in_date.as_deref())),
        ("Check-out", output::or_dash(g.check_out_date.as_deref())),
        ("Party", party),
        ("Type", g.guest_type.to_string()),
        ("Status", g.status.to_string()),
        ("Labels", output::or_dash(Some(&labels))),
        ("Language", output::or_dash(g.language.as_deref())),
        ("Requests", output::or_dash(g.special_requests.as_deref())),
    ])
}

fn print_one(g: &Arc<Guest>, global: &GlobalOpts) {
    let out = output::render_single(global.output, g, detail, |g| g.id.to_string());
    output::print_output(&out, global.quiet);
}

fn input(fields: &GuestFields, property_id: Option<EntityId>) -> Result<GuestInput, CliError> {
    Ok(GuestInput {
        property_id,
        first_name: fields.first_name.clone(),
        last_name: fields.last_name.clone(),
        email: fields.email.clone(),
        phone: fields.phone.clone(),
        check_in_date: fields.check_in.clone(),
        check_out_date: fields.check_out.clone(),
        party_size: fields.party_size,
        room_number: fields.room.clone(),
        guest_type: util::parse_opt_enum::<GuestType>(
            "type",
            fields.guest_type.as_deref(),
            TYPES,
        )?,
        guest_labels: util::opt_vec(fields.labels.as_ref()),
        adults: fields.adults,
        children: fields.children,
        dietary_restrictions: None,
        preferred_activities: None,
        special_requests: fields.special_requests.clone(),
        language: fields.language.clone(),
    })
}

/// Filter, search and sort the scoped guest list.
fn view(guests: &[Arc<Guest>], args: &GuestListArgs) -> Result<Vec<Arc<Guest>>, CliError> {
    let filter = GuestFilter {
        status: util::parse_opt_enum("status", args.status.as_deref(), STATUSES)?,
        guest_type: util::parse_opt_enum("type", args.guest_type.as_deref(), TYPES)?,
        label: args.label.clone(),
        search: args.search.clone(),
    };
    let sort: GuestSort =
        util::parse_enum("sort", &args.sort, "check-in, check-out, name, status")?;
    let mut shown = filter.apply(guests);
    listing::sort_guests(&mut shown, sort, args.desc);
    Ok(shown)
}

async fn set_status(
    console: &Console,
    id: &str,
    status: GuestStatus,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    // The status change is applied to the cached row first.
    let id = util::entity_id(id);
    console.get_guest(&id).await?;
    let guest = console.set_guest_status(&id, status).await?;
    print_one(&guest, global);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: GuestsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        GuestsCommand::List(list) => {
            let guests = console.list_guests(console.property()).await?;
            let shown = view(&guests, &list)?;
            let out = output::render_list(
                global.output,
                &shown,
                |g| GuestRow::from(g),
                |g| g.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GuestsCommand::Get { id } => {
            let guest = console.get_guest(&util::entity_id(&id)).await?;
            print_one(&guest, global);
            Ok(())
        }

        GuestsCommand::Create(fields) => {
            let property = util::require_property(console)?;
            let guest = console.create_guest(&input(&fields, Some(property))?).await?;
            print_one(&guest, global);
            Ok(())
        }

        GuestsCommand::Update { id, fields } => {
            let guest = console
                .update_guest(&util::entity_id(&id), &input(&fields, None)?)
                .await?;
            print_one(&guest, global);
            Ok(())
        }

        GuestsCommand::Status { id, status } => {
            let status = util::parse_enum("status", &status, STATUSES)?;
            set_status(console, &id, status, global).await
        }

        GuestsCommand::CheckIn { id } => {
            set_status(console, &id, GuestStatus::CheckedIn, global).await
        }

        GuestsCommand::CheckOut { id } => {
            set_status(console, &id, GuestStatus::CheckedOut, global).await
        }

        GuestsCommand::Delete { id } => {
            if !util::confirm(&format!("Delete guest {id}?"), global)? {
                return Ok(());
            }
            console.delete_guest(&util::entity_id(&id)).await?;
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn guest(id: i64, name: &str, status: &str, check_in: Option<&str>) -> Arc<Guest> {
        let mut value = serde_json::json!({
            "id": id,
            "name": name,
            "status": status,
            "guest_type": "family",
        });
        if let Some(day) = check_in {
            value["check_in_date"] = day.into();
        }
        Arc::new(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn list_view_filters_then_sorts() {
        let guests = vec![
            guest(1, "Anna", "checked_in", Some("2024-06-03")),
            guest(2, "Ben", "reserved", Some("2024-06-01")),
            guest(3, "Cleo", "checked_in", Some("2024-06-02")),
        ];
        let args = GuestListArgs {
            status: Some("checked_in".into()),
            sort: "check-in".into(),
            ..GuestListArgs::default()
        };
        let shown = view(&guests, &args).unwrap();
        let ids: Vec<EntityId> = shown.iter().map(|g| g.id.clone()).collect();
        assert_eq!(ids, vec![EntityId::from(3), EntityId::from(1)]);
    }

    #[test]
    fn unknown_status_is_a_usage_error() {
        let args = GuestListArgs {
            status: Some("asleep".into()),
            sort: "name".into(),
            ..GuestListArgs::default()
        };
        let err = view(&[], &args).unwrap_err();
        assert!(matches!(err, CliError::Validation { .. }));
    }
}
