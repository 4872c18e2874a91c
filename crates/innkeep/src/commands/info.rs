//! Property information command handlers.

use std::sync::Arc;

use tabled::Tabled;

use innkeep_core::listing::{self, Filter, InfoFilter};
use innkeep_core::model::{InfoCategory, PropertyInfoInput, PropertyInfoItem};
use innkeep_core::{Console, EntityId};

use crate::cli::{GlobalOpts, InfoArgs, InfoCommand, InfoFields};
use crate::error::CliError;
use crate::output;

use super::util;

const CATEGORIES: &str = "amenity, guide, service, other";

#[derive(Tabled)]
struct InfoRow {
    #[tabled(rename = "#")]
    order: u32,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Type")]
    info_type: String,
    #[tabled(rename = "Active")]
    active: &'static str,
}

impl From<&Arc<PropertyInfoItem>> for InfoRow {
    fn from(i: &Arc<PropertyInfoItem>) -> Self {
        Self {
            order: i.display_order,
            id: i.id.to_string(),
            title: i.title.clone(),
            category: i.category.to_string(),
            info_type: i.info_type.clone().unwrap_or_default(),
            active: output::yes_no(i.is_active),
        }
    }
}

fn detail(i: &Arc<PropertyInfoItem>) -> String {
    output::detail_block(&[
        ("ID", i.id.to_string()),
        ("Title", i.title.clone()),
        ("Category", i.category.to_string()),
        ("Type", output::or_dash(i.info_type.as_deref())),
        ("Description", output::or_dash(i.description.as_deref())),
        ("Instructions", output::or_dash(i.instructions.as_deref())),
        ("Icon", output::or_dash(i.icon.as_deref())),
        ("URL", output::or_dash(i.url.as_deref())),
        ("Order", i.display_order.to_string()),
        ("Active", output::yes_no(i.is_active).into()),
    ])
}

fn print_one(i: &Arc<PropertyInfoItem>, global: &GlobalOpts) {
    let out = output::render_single(global.output, i, detail, |i| i.id.to_string());
    output::print_output(&out, global.quiet);
}

fn print_list(items: &[Arc<PropertyInfoItem>], global: &GlobalOpts) {
    let out = output::render_list(
        global.output,
        items,
        |i| InfoRow::from(i),
        |i| i.id.to_string(),
    );
    output::print_output(&out, global.quiet);
}

fn input(
    fields: InfoFields,
    property_id: Option<EntityId>,
) -> Result<PropertyInfoInput, CliError> {
    Ok(PropertyInfoInput {
        property_id,
        category: util::parse_opt_enum::<InfoCategory>(
            "category",
            fields.category.as_deref(),
            CATEGORIES,
        )?,
        info_type: fields.info_type,
        title: fields.title,
        description: fields.description,
        instructions: fields.instructions,
        icon: fields.icon,
        url: fields.url,
        is_active: None,
    })
}

pub async fn handle(console: &Console, args: InfoArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        InfoCommand::List {
            category,
            state,
            search,
        } => {
            let filter = InfoFilter {
                category: util::parse_opt_enum("category", category.as_deref(), CATEGORIES)?,
                active: state.state(),
                search,
            };
            let all = console.list_property_info(console.property()).await?;
            let mut shown = filter.apply(&all);
            listing::by_display_order(&mut shown);
            print_list(&shown, global);
            Ok(())
        }

        InfoCommand::Create(fields) => {
            let property = util::require_property(console)?;
            if fields.title.as_deref().is_none_or(|t| t.trim().is_empty()) {
                return Err(CliError::validation("title", "an item needs a title"));
            }
            let item = console
                .create_property_info(&input(fields, Some(property))?)
                .await?;
            print_one(&item, global);
            Ok(())
        }

        InfoCommand::Update { id, fields } => {
            let item = console
                .update_property_info(&util::entity_id(&id), &input(fields, None)?)
                .await?;
            print_one(&item, global);
            Ok(())
        }

        InfoCommand::Toggle { id } => {
            console.list_property_info(console.property()).await?;
            let item = console.toggle_property_info(&util::entity_id(&id)).await?;
            print_one(&item, global);
            Ok(())
        }

        InfoCommand::Move(args) => {
            console.list_property_info(console.property()).await?;
            let ordered = console
                .move_property_info(&util::entity_id(&args.id), util::to_move(args.position))
                .await?;
            print_list(&ordered, global);
            Ok(())
        }

        InfoCommand::Delete { id } => {
            if !util::confirm(&format!("Delete information item {id}?"), global)? {
                return Ok(());
            }
            console.delete_property_info(&util::entity_id(&id)).await?;
            Ok(())
        }
    }
}
