//! Background image command handlers.

use std::sync::Arc;

use tabled::Tabled;

use innkeep_core::{BackgroundImage, Console};

use crate::cli::{BackgroundsArgs, BackgroundsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct BackgroundRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "File")]
    filename: String,
    #[tabled(rename = "Season")]
    season: String,
    #[tabled(rename = "Uploaded")]
    uploaded_at: String,
    #[tabled(rename = "URL")]
    url: String,
}

impl From<&Arc<BackgroundImage>> for BackgroundRow {
    fn from(b: &Arc<BackgroundImage>) -> Self {
        Self {
            id: b.id.to_string(),
            filename: b.filename.clone().unwrap_or_default(),
            season: b.season.clone().unwrap_or_default(),
            uploaded_at: b.uploaded_at.clone().unwrap_or_default(),
            url: b.url.clone().unwrap_or_default(),
        }
    }
}

fn detail(b: &Arc<BackgroundImage>) -> String {
    output::detail_block(&[
        ("ID", b.id.to_string()),
        ("File", output::or_dash(b.filename.as_deref())),
        ("Season", output::or_dash(b.season.as_deref())),
        ("Uploaded", output::or_dash(b.uploaded_at.as_deref())),
        ("URL", output::or_dash(b.url.as_deref())),
    ])
}

pub async fn handle(
    console: &Console,
    args: BackgroundsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        BackgroundsCommand::List => {
            let images = console.list_backgrounds(console.property()).await?;
            let out = output::render_list(
                global.output,
                &images,
                |b| BackgroundRow::from(b),
                |b| b.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BackgroundsCommand::Upload { path, season } => {
            let property = util::require_property(console)?;
            let image = console
                .upload_background(&property, season.as_deref(), &path)
                .await?;
            let out = output::render_single(global.output, &image, detail, |b| b.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BackgroundsCommand::Delete { id } => {
            if !util::confirm(&format!("Delete background image {id}?"), global)? {
                return Ok(());
            }
            console.delete_background(&util::entity_id(&id)).await?;
            Ok(())
        }
    }
}
