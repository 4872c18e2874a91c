//! Image probing, search, import and upload.

use tabled::Tabled;

use innkeep_core::model::{ImageCheck, ImageSearchResult};
use innkeep_core::{Console, ImageForm};

use crate::cli::{GlobalOpts, ImagesArgs, ImagesCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct SearchRow {
    #[tabled(rename = "URL")]
    url: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Author")]
    author: String,
}

impl From<&ImageSearchResult> for SearchRow {
    fn from(r: &ImageSearchResult) -> Self {
        Self {
            url: r.url.clone(),
            description: r.description.clone().unwrap_or_default(),
            author: r.author.clone().unwrap_or_default(),
        }
    }
}

fn check_detail(c: &ImageCheck) -> String {
    output::detail_block(&[
        ("Accessible", output::yes_no(c.accessible).into()),
        ("Content type", output::or_dash(c.content_type.as_deref())),
        (
            "Size",
            c.size.map_or_else(|| "-".into(), |b| format!("{b} bytes")),
        ),
    ])
}

/// Print the stored URL an image form resolved to.
async fn resolve_and_print(
    console: &Console,
    form: &ImageForm,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let url = console
        .resolve_image(form)
        .await?
        .ok_or_else(|| CliError::Internal("image resolved to nothing".into()))?;
    output::print_output(&url, global.quiet);
    Ok(())
}

pub async fn handle(console: &Console, args: ImagesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ImagesCommand::Check { url } => {
            let check = console.check_image(&url).await?;
            let out = output::render_single(global.output, &check, check_detail, |c| {
                output::yes_no(c.accessible).to_owned()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ImagesCommand::Search { query } => {
            let results = console.search_images(&query).await?;
            let out = output::render_list(
                global.output,
                &results,
                |r| SearchRow::from(r),
                |r| r.url.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ImagesCommand::Import { url } => {
            let mut form = ImageForm::new();
            form.url(url, true);
            resolve_and_print(console, &form, global).await
        }

        ImagesCommand::Upload { path } => {
            let mut form = ImageForm::new();
            form.upload(path);
            resolve_and_print(console, &form, global).await
        }

        ImagesCommand::Fetch { url, out } => {
            let image = console.fetch_image(&url).await?;
            tokio::fs::write(&out, &image.data).await?;
            if !global.quiet {
                eprintln!(
                    "✓ Saved {} bytes ({}) to {}",
                    image.data.len(),
                    image.content_type.as_deref().unwrap_or("unknown type"),
                    out.display()
                );
            }
            Ok(())
        }
    }
}
