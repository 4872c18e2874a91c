//! Activity command handlers.

use std::sync::Arc;

use tabled::Tabled;

use innkeep_core::listing::{self, ActivityFilter, Filter};
use innkeep_core::model::{Activity, ActivityInput, ActivityType};
use innkeep_core::{Console, EntityId};

use crate::cli::{ActivitiesArgs, ActivitiesCommand, ActivityFields, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

const TYPES: &str =
    "outdoor, indoor, sightseeing, sport, wellness, culture, family, nightlife, shopping, other";

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ActivityRow {
    #[tabled(rename = "#")]
    order: u32,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Type")]
    activity_type: String,
    #[tabled(rename = "Labels")]
    labels: String,
    #[tabled(rename = "Active")]
    active: &'static str,
}

impl From<&Arc<Activity>> for ActivityRow {
    fn from(a: &Arc<Activity>) -> Self {
        Self {
            order: a.display_order,
            id: a.id.to_string(),
            title: a.title.clone(),
            activity_type: a.activity_type.to_string(),
            labels: a.labels.join(", "),
            active: output::yes_no(a.is_active),
        }
    }
}

fn detail(a: &Arc<Activity>) -> String {
    let season = match (a.season_start.as_deref(), a.season_end.as_deref()) {
        (Some(from), Some(to)) => format!("{from} to {to}"),
        _ => "all year".into(),
    };
    output::detail_block(&[
        ("ID", a.id.to_string()),
        ("Title", a.title.clone()),
        ("Title (de)", output::or_dash(a.title_de.as_deref())),
        ("Description", output::or_dash(a.description.as_deref())),
        ("Type", a.activity_type.to_string()),
        ("Labels", output::or_dash(Some(&a.labels.join(", ")))),
        ("Weather", output::or_dash(Some(&a.weather_suitability.join(", ")))),
        ("Season", season),
        ("Image", output::or_dash(a.image_url.as_deref())),
        ("Order", a.display_order.to_string()),
        ("Active", output::yes_no(a.is_active).into()),
    ])
}

fn print_one(a: &Arc<Activity>, global: &GlobalOpts) {
    let out = output::render_single(global.output, a, detail, |a| a.id.to_string());
    output::print_output(&out, global.quiet);
}

fn print_list(items: &[Arc<Activity>], global: &GlobalOpts) {
    let out = output::render_list(
        global.output,
        items,
        |a| ActivityRow::from(a),
        |a| a.id.to_string(),
    );
    output::print_output(&out, global.quiet);
}

fn input(fields: ActivityFields, property_id: Option<EntityId>) -> Result<ActivityInput, CliError> {
    Ok(ActivityInput {
        property_id,
        activity_type: util::parse_opt_enum::<ActivityType>(
            "type",
            fields.activity_type.as_deref(),
            TYPES,
        )?,
        labels: util::opt_vec(fields.labels.as_ref()),
        weather_suitability: util::opt_vec(fields.weather.as_ref()),
        title: fields.title,
        title_de: fields.title_de,
        description: fields.description,
        description_de: fields.description_de,
        season_start: fields.season_start,
        season_end: fields.season_end,
        image_url: None,
        is_active: None,
    })
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: ActivitiesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ActivitiesCommand::List {
            activity_type,
            state,
            label,
            search,
        } => {
            let filter = ActivityFilter {
                activity_type: util::parse_opt_enum("type", activity_type.as_deref(), TYPES)?,
                active: state.state(),
                label,
                search,
            };
            let all = console.list_activities(console.property()).await?;
            let mut shown = filter.apply(&all);
            listing::by_display_order(&mut shown);
            print_list(&shown, global);
            Ok(())
        }

        ActivitiesCommand::Create { fields, image } => {
            let property = util::require_property(console)?;
            if fields.title.as_deref().is_none_or(|t| t.trim().is_empty()) {
                return Err(CliError::validation("title", "an activity needs a title"));
            }
            let form = util::image_form(console, &image).await?;
            let activity = console
                .create_activity(input(fields, Some(property))?, &form)
                .await?;
            print_one(&activity, global);
            Ok(())
        }

        ActivitiesCommand::Update { id, fields, image } => {
            let form = util::image_form(console, &image).await?;
            let activity = console
                .update_activity(&util::entity_id(&id), input(fields, None)?, &form)
                .await?;
            print_one(&activity, global);
            Ok(())
        }

        ActivitiesCommand::Toggle { id } => {
            console.list_activities(console.property()).await?;
            let activity = console.toggle_activity(&util::entity_id(&id)).await?;
            print_one(&activity, global);
            Ok(())
        }

        ActivitiesCommand::Move(args) => {
            console.list_activities(console.property()).await?;
            let ordered = console
                .move_activity(&util::entity_id(&args.id), util::to_move(args.position))
                .await?;
            print_list(&ordered, global);
            Ok(())
        }

        ActivitiesCommand::Delete { id } => {
            if !util::confirm(&format!("Delete activity {id}?"), global)? {
                return Ok(());
            }
            console.delete_activity(&util::entity_id(&id)).await?;
            Ok(())
        }
    }
}
