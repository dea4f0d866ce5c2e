use crate::{
    drive::{DriveClient, Fields, File, ListFiles, ListQuery, UpdateFiles},
    error::Result,
    output::Printer,
    walk::{Pagination, Walker},
};
use clap::Parser;
use std::io::Write;

#[derive(Parser)]
pub struct Folder {
    /// The id of the target folder
    #[arg(long)]
    id: String,
}

/// Recursively lists every file and folder below a folder
#[derive(Parser)]
pub struct ListRecursive {
    #[clap(flatten)]
    folder: Folder,
    /// Stop descending once folders are this deep below the target
    #[arg(long)]
    max_depth: Option<usize>,
    /// Follow continuation tokens instead of only visiting the first page of
    /// each folder
    #[arg(long)]
    all_pages: bool,
}

/// Overwrites the first matching file with today's date
#[derive(Parser)]
pub struct Update {
    #[clap(flatten)]
    folder: Folder,
    /// Substring of the name of the file to update
    #[arg(long)]
    file: String,
}

#[derive(clap::Subcommand)]
pub enum Args {
    /// Lists the immediate children of a folder
    List(Folder),
    /// Lists the immediate children of a folder with all of their metadata
    ListDetails(Folder),
    ListRecursive(ListRecursive),
    Update(Update),
}

pub async fn list<L, W>(lister: &L, folder_id: &str, printer: &Printer, out: &mut W) -> Result<()>
where
    L: ListFiles,
    W: Write,
{
    let page = lister.list(&ListQuery::children(folder_id)).await?;

    printer.page_token(out, page.next_page_token.as_deref())?;
    for file in &page.files {
        printer.entry(out, file)?;
    }

    Ok(())
}

pub async fn list_details<L, W>(
    lister: &L,
    folder_id: &str,
    printer: &Printer,
    out: &mut W,
) -> Result<()>
where
    L: ListFiles,
    W: Write,
{
    let page = lister
        .list(&ListQuery::children(folder_id).with_fields(Fields::All))
        .await?;

    for file in &page.files {
        printer.entry_details(out, file)?;
    }

    Ok(())
}

/// The content written by [`update`], eg. `2026-October-7`
pub fn date_content(date: time::Date) -> String {
    format!("{}-{}-{}", date.year(), date.month(), date.day())
}

/// Overwrites the first child of `folder_id` whose name contains `pattern`
/// with [`date_content`] of `today`, keeping its mime type.
///
/// Returns `None` without touching anything if no child matches.
pub async fn update<C, W>(
    client: &C,
    folder_id: &str,
    pattern: &str,
    today: time::Date,
    printer: &Printer,
    out: &mut W,
) -> Result<Option<File>>
where
    C: ListFiles + UpdateFiles,
    W: Write,
{
    let page = client
        .list(&ListQuery::children(folder_id).with_fields(Fields::All))
        .await?;

    let Some(target) = page.files.into_iter().find(|f| f.name.contains(pattern)) else {
        tracing::info!(folder = folder_id, pattern, "no file matched, nothing to update");
        return Ok(None);
    };

    let content = date_content(today);
    tracing::info!(file = %target.id, name = %target.name, %content, "updating file");

    let updated = client
        .update_content(&target.id, content.into_bytes(), &target.mime_type)
        .await?;

    printer.updated(out, &updated)?;
    Ok(Some(updated))
}

pub async fn run<W: Write>(
    args: Args,
    client: &DriveClient,
    printer: Printer,
    out: &mut W,
) -> Result<()> {
    match args {
        Args::List(folder) => list(client, &folder.id, &printer, out).await?,
        Args::ListDetails(folder) => list_details(client, &folder.id, &printer, out).await?,
        Args::ListRecursive(args) => {
            let pagination = if args.all_pages {
                Pagination::All
            } else {
                Pagination::FirstPage
            };

            let summary = Walker::new(printer)
                .with_pagination(pagination)
                .with_max_depth(args.max_depth)
                .walk(client, &args.folder.id, out)
                .await?;

            tracing::info!(
                files = summary.files,
                folders = summary.folders,
                "walk complete"
            );
        }
        Args::Update(args) => {
            let today = time::OffsetDateTime::now_utc().date();
            update(
                client,
                &args.folder.id,
                &args.file,
                today,
                &printer,
                out,
            )
            .await?;
        }
    }

    Ok(())
}
