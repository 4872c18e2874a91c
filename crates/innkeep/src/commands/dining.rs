//! Dining command handlers.

use std::sync::Arc;

use tabled::Tabled;

use innkeep_core::listing::{DiningFilter, Filter};
use innkeep_core::model::{DiningInput, DiningPlace};
use innkeep_core::{Console, EntityId};

use crate::cli::{DiningArgs, DiningCommand, DiningFields, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

const FEATURES: &str =
    "parking, vegetarian, vegan, outdoor_seating, wheelchair_accessible, reservations_required";

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DiningRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Cuisine")]
    cuisine: String,
    #[tabled(rename = "City")]
    city: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Active")]
    active: &'static str,
}

impl From<&Arc<DiningPlace>> for DiningRow {
    fn from(d: &Arc<DiningPlace>) -> Self {
        Self {
            id: d.id.to_string(),
            name: d.display_name().to_owned(),
            category: d.category.clone().unwrap_or_default(),
            cuisine: d.cuisine_type.clone().unwrap_or_default(),
            city: d.city.clone().unwrap_or_default(),
            price: d.price_range.clone().unwrap_or_default(),
            active: output::yes_no(d.is_active),
        }
    }
}

fn detail(d: &Arc<DiningPlace>) -> String {
    let location = match (d.latitude, d.longitude) {
        (Some(lat), Some(lon)) => format!("{lat:.5}, {lon:.5}"),
        _ => "-".into(),
    };
    output::detail_block(&[
        ("ID", d.id.to_string()),
        ("Name", d.display_name().to_owned()),
        ("Name (de)", output::or_dash(d.name_de.as_deref())),
        ("Category", output::or_dash(d.category.as_deref())),
        ("Cuisine", output::or_dash(d.cuisine_type.as_deref())),
        ("Address", output::or_dash(d.address.as_deref())),
        ("City", output::or_dash(d.city.as_deref())),
        ("Location", location),
        ("Phone", output::or_dash(d.phone.as_deref())),
        ("Website", output::or_dash(d.website.as_deref())),
        (
            "Capacity",
            d.capacity.map_or_else(|| "-".into(), |c| c.to_string()),
        ),
        ("Price", output::or_dash(d.price_range.as_deref())),
        ("Features", output::or_dash(Some(&d.features().join(", ")))),
        ("Image", output::or_dash(d.image_url.as_deref())),
        ("Active", output::yes_no(d.is_active).into()),
    ])
}

fn print_one(d: &Arc<DiningPlace>, global: &GlobalOpts) {
    let out = output::render_single(global.output, d, detail, |d| d.id.to_string());
    output::print_output(&out, global.quiet);
}

/// Feature flags named on the command line are set; the rest are left
/// untouched on update.
fn input(fields: DiningFields, property_id: Option<EntityId>) -> Result<DiningInput, CliError> {
    let mut input = DiningInput {
        property_id,
        name_en: fields.name,
        name_de: fields.name_de,
        category: fields.category,
        cuisine_type: fields.cuisine,
        address: fields.address,
        city: fields.city,
        phone: fields.phone,
        website: fields.website,
        capacity: fields.capacity,
        price_range: fields.price_range,
        ..DiningInput::default()
    };
    for feature in util::opt_vec(fields.features.as_ref()).unwrap_or_default() {
        let flag = match feature.to_ascii_lowercase().replace('-', "_").as_str() {
            "parking" => &mut input.parking,
            "vegetarian" => &mut input.vegetarian,
            "vegan" => &mut input.vegan,
            "outdoor_seating" | "outdoor" => &mut input.outdoor_seating,
            "wheelchair_accessible" | "accessible" => &mut input.wheelchair_accessible,
            "reservations_required" | "reservations" => &mut input.reservations_required,
            _ => {
                return Err(CliError::validation(
                    "features",
                    format!("'{feature}' is not one of: {FEATURES}"),
                ));
            }
        };
        *flag = Some(true);
    }
    Ok(input)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: DiningArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DiningCommand::List {
            category,
            cuisine,
            search,
        } => {
            let filter = DiningFilter {
                category,
                cuisine,
                search,
            };
            let all = console.list_dining(console.property()).await?;
            let shown = filter.apply(&all);
            let out = output::render_list(
                global.output,
                &shown,
                |d| DiningRow::from(d),
                |d| d.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DiningCommand::Create { fields, image } => {
            let property = util::require_property(console)?;
            if fields.name.is_none() && fields.name_de.is_none() {
                return Err(CliError::validation("name", "a dining place needs a name"));
            }
            let form = util::image_form(console, &image).await?;
            let place = console
                .create_dining(input(fields, Some(property))?, &form)
                .await?;
            print_one(&place, global);
            Ok(())
        }

        DiningCommand::Update { id, fields, image } => {
            let form = util::image_form(console, &image).await?;
            let place = console
                .update_dining(&util::entity_id(&id), input(fields, None)?, &form)
                .await?;
            print_one(&place, global);
            Ok(())
        }

        DiningCommand::Toggle { id } => {
            console.list_dining(console.property()).await?;
            let place = console.toggle_dining(&util::entity_id(&id)).await?;
            print_one(&place, global);
            Ok(())
        }

        DiningCommand::Delete { id } => {
            if !util::confirm(&format!("Delete dining place {id}?"), global)? {
                return Ok(());
            }
            console.delete_dining(&util::entity_id(&id)).await?;
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn named_features_are_set_and_others_left_alone() {
        let fields = DiningFields {
            name: Some("Alpenblick".into()),
            features: Some(vec!["vegan".into(), "outdoor".into()]),
            ..DiningFields::default()
        };
        let input = input(fields, None).unwrap();
        assert_eq!(input.vegan, Some(true));
        assert_eq!(input.outdoor_seating, Some(true));
        assert_eq!(input.parking, None);
    }

    #[test]
    fn unknown_feature_is_rejected() {
        let fields = DiningFields {
            features: Some(vec!["helipad".into()]),
            ..DiningFields::default()
        };
        assert!(matches!(
            input(fields, None),
            Err(CliError::Validation { .. })
        ));
    }
}
