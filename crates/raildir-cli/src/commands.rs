//! CLI command implementations.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};
use raildir_client::hooks::Loadable;
use raildir_client::services::filter_by_title;
use raildir_client::types::{Distribution, PaginationMeta};
use raildir_client::{
    Directory, FilterMode, FilterSelection, ListingOptions, Resource, Theme, ThemeSink, ThemeToggle,
    ToggleEvent, VisitCounterOptions,
};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::render;

/// Where command results go.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    /// Prints `value` as JSON, or `text` otherwise.
    fn emit<T: Serialize + ?Sized>(self, value: &T, text: impl FnOnce() -> String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            print!("{}", text());
        }
        Ok(())
    }
}

/// Data of a settled hook, or its error message.
fn settled<T>(state: Loadable<T>) -> Result<T> {
    match (state.data, state.error) {
        (_, Some(message)) => bail!(message),
        (Some(data), None) => Ok(data),
        (None, None) => bail!("no data received"),
    }
}

fn footer(pagination: Option<&PaginationMeta>) {
    if let Some(line) = pagination.and_then(render::page_footer) {
        println!("{line}");
    }
}

/// List contacts.
pub async fn list(directory: &Directory, page: u32, limit: Option<u32>, out: Output) -> Result<()> {
    let listing = directory.contacts_listing(ListingOptions {
        page,
        limit: limit.unwrap_or(directory.config().page_size),
        auto_fetch: true,
    });
    listing.mount().await;

    let state = listing.snapshot();
    if let Some(message) = state.error {
        bail!(message);
    }
    out.emit(&state.contacts, || render::contacts(&state.contacts))?;
    if !out.json {
        footer(state.pagination.as_ref());
    }
    Ok(())
}

/// Show the contact count.
pub async fn count(directory: &Directory, out: Output) -> Result<()> {
    let resource = directory.contacts_count();
    resource.mount().await;
    let count = settled(resource.snapshot())?;
    out.emit(&count, || format!("{count}\n"))
}

/// Show one contact.
pub async fn get(directory: &Directory, id: &str, out: Output) -> Result<()> {
    let contact = directory.contacts().get_contact(id).await?;
    out.emit(&contact, || render::contact_detail(&contact))
}

/// Search by name.
pub async fn search_name(directory: &Directory, query: &str, page: u32, out: Output) -> Result<()> {
    let search = directory.contacts_search();
    search.search_by_name(query, page).await;

    let state = search.snapshot();
    if let Some(message) = state.error {
        bail!(message);
    }
    out.emit(&state.contacts, || render::contacts(&state.contacts))?;
    if !out.json {
        footer(state.pagination.as_ref());
    }
    Ok(())
}

/// Look up by phone.
pub async fn search_phone(directory: &Directory, phone: &str, out: Output) -> Result<()> {
    let search = directory.contacts_search();
    search.search_by_phone(phone).await;

    let state = search.snapshot();
    if let Some(message) = state.error {
        bail!(message);
    }
    match state.contacts.as_slice() {
        [contact] => out.emit(contact, || render::contact_detail(contact)),
        contacts => out.emit(contacts, || render::contacts(contacts)),
    }
}

/// Print one of the enumerations.
pub async fn enumeration(resource: Resource<Vec<String>>, out: Output) -> Result<()> {
    resource.mount().await;
    let items = settled(resource.snapshot())?;
    out.emit(&items, || render::list(&items))
}

/// Filter contacts through the endpoint of `mode`.
pub async fn filter(
    directory: &Directory,
    mode: FilterMode,
    selection: FilterSelection,
    page: u32,
    out: Output,
) -> Result<()> {
    if selection.is_empty_for(mode) {
        bail!(mode.requirement());
    }

    let filter = directory.contact_filter(mode);
    filter.select(selection).await;
    if page != 1 {
        filter.set_page(page).await;
    }

    let state = filter.snapshot();
    if let Some(message) = state.error {
        bail!(message);
    }
    out.emit(&state.contacts, || render::contacts(&state.contacts))?;
    if !out.json {
        footer(state.pagination.as_ref());
    }
    Ok(())
}

pub async fn overview(directory: &Directory, out: Output) -> Result<()> {
    let overview = directory.analytics().get_overview().await?;
    out.emit(&overview, || render::overview(&overview))
}

pub fn distribution(title: &str, distribution: &Distribution, out: Output) -> Result<()> {
    out.emit(distribution, || render::distribution(title, distribution))
}

pub async fn growth(directory: &Directory, days: u32, out: Output) -> Result<()> {
    let growth = directory.analytics().get_growth(days).await?;
    out.emit(&growth, || render::growth(&growth))
}

pub async fn recent(directory: &Directory, limit: u32, out: Output) -> Result<()> {
    let recent = directory.analytics().get_recent_contacts(limit).await?;
    out.emit(&recent, || render::recent(&recent))
}

/// Show the visit counter, recording a visit first when `increment` is set.
pub async fn visits(directory: &Directory, increment: bool, out: Output) -> Result<()> {
    let counter = directory.visit_counter(VisitCounterOptions {
        auto_increment: increment,
        auto_fetch: true,
    });
    counter.mount().await;
    let count = settled(counter.snapshot())?;
    out.emit(&count, || format!("{count}\n"))
}

pub async fn history(directory: &Directory, days: u32, out: Output) -> Result<()> {
    let resource = directory.visit_history(days);
    resource.mount().await;
    let history = settled(resource.snapshot())?;
    out.emit(&history, || render::history(&history))
}

/// Load every analytics view concurrently.
pub async fn dashboard(directory: &Directory, out: Output) -> Result<()> {
    let resource = directory.analytics_dashboard();
    resource.mount().await;
    let dashboard = settled(resource.snapshot())?;

    out.emit(&dashboard, || {
        [
            render::overview(&dashboard.overview),
            render::distribution("Blood group", &dashboard.blood_groups),
            render::distribution("Lobby", &dashboard.lobbies),
            render::distribution("Designation", &dashboard.designations),
            render::growth(&dashboard.growth),
            render::recent(&dashboard.recent),
            render::history(&dashboard.visits),
        ]
        .join("\n")
    })
}

/// List documents, optionally narrowed by title.
pub async fn documents(directory: &Directory, query: Option<&str>, out: Output) -> Result<()> {
    let resource = directory.document_list();
    resource.mount().await;
    let documents = settled(resource.snapshot())?;

    let matches = filter_by_title(&documents, query.unwrap_or_default());
    out.emit(&matches, || render::documents(&matches))
}

pub async fn documents_count(directory: &Directory, out: Output) -> Result<()> {
    let resource = directory.documents_count();
    resource.mount().await;
    let count = settled(resource.snapshot())?;
    out.emit(&count, || format!("{count}\n"))
}

/// Feed stdin lines into a debounced search and print each settled result.
pub async fn interactive(directory: &Directory) -> Result<()> {
    let auto = directory.auto_search();
    let mut updates = auto.search().subscribe();

    let printer = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            if state.loading {
                continue;
            }
            if let Some(message) = &state.error {
                eprintln!("{message}");
            } else if state.pagination.is_some() {
                print!("{}", render::contacts(&state.contacts));
                footer(state.pagination.as_ref());
            }
        }
    });

    eprintln!(
        "Type to search (results after {} ms of quiet). Ctrl-D to quit.",
        auto.quiet_period().as_millis()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        auto.set_value(&line);
    }

    // Let the last input settle before exiting.
    tokio::time::sleep(auto.quiet_period() + Duration::from_millis(50)).await;
    while auto.search().is_loading() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    tokio::task::yield_now().await;
    printer.abort();
    Ok(())
}

/// Reports applied themes in the log.
struct LogSink;

impl ThemeSink for LogSink {
    fn apply(&self, theme: Theme) {
        tracing::debug!(%theme, "Theme applied");
    }
}

pub fn theme_show(path: Option<PathBuf>, out: Output) -> Result<()> {
    let toggle = ThemeToggle::new(LogSink, path);
    let theme = toggle.theme();
    out.emit(&theme, || format!("{theme}\n"))
}

pub fn theme_toggle(path: Option<PathBuf>, out: Output) -> Result<()> {
    if path.is_none() {
        bail!("could not determine config directory");
    }
    let toggle = ThemeToggle::new(LogSink, path);
    let theme = toggle.toggle(ToggleEvent::user())?.unwrap_or_else(|| toggle.theme());
    out.emit(&theme, || format!("{theme}\n"))
}
