//! Command-line front-end over [`Dashboard`].
//!
//! Every invocation restores the saved session, re-fetches the entries when
//! the command needs them and prints data to the given writer. Notices are
//! left on the dashboard for the caller to report.

use std::io::Write;
use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};

use crate::dashboard::clipboard::{entry_row, format_date};
use crate::dashboard::{DateRange, SummaryCategory};
use crate::domain::types::{EntryId, EntryStatus, TypeConstraintError};
use crate::dto::dashboard::Notice;
use crate::forms::auth::LoginForm;
use crate::forms::entry::{AddEntryForm, FollowUpForm};
use crate::models::config::ClientConfig;
use crate::repository::{Authenticator, EntryReader, EntryWriter, SessionStore};
use crate::services::dashboard::Dashboard;

const SUMMARY_CARDS: [SummaryCategory; 4] = [
    SummaryCategory::Total,
    SummaryCategory::Hot,
    SummaryCategory::Warm,
    SummaryCategory::Cold,
];

/// Manage sales leads from the terminal.
#[derive(Debug, Parser)]
#[command(name = "pushkind-leads", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and remember the session
    Login {
        #[arg(long, env = "LEADS_EMAIL")]
        email: String,
        #[arg(long, env = "LEADS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the saved session
    Logout,
    /// Print one page of the filtered entry table
    List {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Print the call summary (admins only)
    Stats,
    /// Print every field of one entry
    View {
        #[arg(value_parser = entry_id)]
        id: EntryId,
    },
    /// Create a new entry
    Add {
        #[command(flatten)]
        fields: EntryArgs,
    },
    /// Change the fields of an existing entry
    Edit {
        #[arg(value_parser = entry_id)]
        id: EntryId,
        #[command(flatten)]
        fields: EntryArgs,
        #[command(flatten)]
        follow_up: FollowUpArgs,
    },
    /// Update status, dates and remarks of an entry
    FollowUp {
        #[arg(value_parser = entry_id)]
        id: EntryId,
        #[command(flatten)]
        follow_up: FollowUpArgs,
    },
    /// Delete one entry, or several (admins only)
    Delete {
        #[arg(required = true, value_parser = entry_id)]
        ids: Vec<EntryId>,
    },
    /// Print entries as tab-separated rows for pasting (admins only)
    Copy {
        /// Entries to copy; empty with `--all` copies the filtered view
        #[arg(value_parser = entry_id)]
        ids: Vec<EntryId>,
        /// Copy every entry matching the filters
        #[arg(long)]
        all: bool,
        /// Copy the labelled details of a single entry instead of a row
        #[arg(long, conflicts_with = "all")]
        details: bool,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Upload entries from a spreadsheet (.xlsx, .xls, .ods or .csv)
    Import { path: PathBuf },
    /// Download the server-side spreadsheet export
    Export {
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Default, Args)]
pub struct FilterArgs {
    /// Matches name, address or mobile number
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    /// Summary card: total, hot, warm or cold
    #[arg(long)]
    pub category: Option<SummaryCategory>,
    #[arg(long)]
    pub state: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    /// First day of the creation date range (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Last day of the creation date range (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Default, Args)]
pub struct EntryArgs {
    #[arg(long)]
    pub customer_name: Option<String>,
    #[arg(long)]
    pub mobile_number: Option<String>,
    #[arg(long)]
    pub products: Option<String>,
    /// Customer or Partner
    #[arg(long = "type")]
    pub customer_type: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub state: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub organization: Option<String>,
    /// Private or Government
    #[arg(long)]
    pub category: Option<String>,
}

#[derive(Debug, Default, Args)]
pub struct FollowUpArgs {
    /// Interested, Maybe or Not Interested
    #[arg(long)]
    pub status: Option<String>,
    /// YYYY-MM-DD; an empty value clears the date
    #[arg(long)]
    pub expected_closing_date: Option<String>,
    /// YYYY-MM-DD; an empty value clears the date
    #[arg(long)]
    pub follow_up_date: Option<String>,
    #[arg(long)]
    pub remarks: Option<String>,
}

fn entry_id(value: &str) -> Result<EntryId, TypeConstraintError> {
    EntryId::new(value)
}

fn overlay(target: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *target = value;
    }
}

impl EntryArgs {
    fn into_form(self) -> AddEntryForm {
        let mut form = AddEntryForm::default();
        self.apply(&mut form);
        form
    }

    fn apply(self, form: &mut AddEntryForm) {
        overlay(&mut form.customer_name, self.customer_name);
        overlay(&mut form.mobile_number, self.mobile_number);
        overlay(&mut form.products, self.products);
        overlay(&mut form.customer_type, self.customer_type);
        overlay(&mut form.address, self.address);
        overlay(&mut form.state, self.state);
        overlay(&mut form.city, self.city);
        overlay(&mut form.organization, self.organization);
        overlay(&mut form.category, self.category);
    }
}

impl FollowUpArgs {
    fn apply(self, form: &mut FollowUpForm) {
        overlay(&mut form.status, self.status);
        overlay(&mut form.expected_closing_date, self.expected_closing_date);
        overlay(&mut form.follow_up_date, self.follow_up_date);
        overlay(&mut form.remarks, self.remarks);
    }
}

impl Command {
    /// Whether the command works on the fetched entry list.
    fn needs_entries(&self) -> bool {
        !matches!(
            self,
            Command::Login { .. } | Command::Logout | Command::Import { .. } | Command::Export { .. }
        )
    }
}

fn apply_filters<R, S>(dashboard: &mut Dashboard<R, S>, filters: FilterArgs)
where
    R: EntryReader + EntryWriter + Authenticator,
    S: SessionStore,
{
    if let Some(search) = filters.search {
        dashboard.type_search(search, std::time::Instant::now());
        dashboard.flush_search();
    }
    if let Some(category) = filters.category {
        dashboard.select_category(category);
    }
    if let Some(status) = filters.status {
        dashboard.select_status(Some(EntryStatus::from(status)));
    }
    if let Some(state) = filters.state {
        dashboard.select_state(state);
    }
    if let Some(city) = filters.city {
        dashboard.select_city(city);
    }
    let range = match (filters.from, filters.to) {
        (Some(from), Some(to)) => Some(DateRange::new(from, to)),
        (Some(day), None) | (None, Some(day)) => Some(DateRange::new(day, day)),
        (None, None) => None,
    };
    if range.is_some() {
        dashboard.set_date_range(range);
    }
}

/// Runs `command`, writing its output to `out`.
pub async fn execute<R, S, W>(
    dashboard: &mut Dashboard<R, S>,
    command: Command,
    config: &ClientConfig,
    out: &mut W,
) -> std::io::Result<()>
where
    R: EntryReader + EntryWriter + Authenticator,
    S: SessionStore,
    W: Write,
{
    if command.needs_entries() && !dashboard.refresh().await {
        return Ok(());
    }

    match command {
        Command::Login { email, password } => {
            dashboard.login(&LoginForm { email, password }).await;
        }
        Command::Logout => dashboard.logout(),
        Command::List { filters, page } => {
            apply_filters(dashboard, filters);
            let page = dashboard.page(page);
            for entry in &page.entries.items {
                writeln!(out, "{}\t{}", entry.id, entry_row(entry))?;
            }
            writeln!(
                out,
                "Page {} of {} ({} matching)",
                page.entries.page,
                page.entries.total_pages.max(1),
                page.total_matching
            )?;
        }
        Command::Stats => match dashboard.stats() {
            Some(stats) => {
                for card in SUMMARY_CARDS {
                    writeln!(out, "{card}: {}", stats.count(card))?;
                }
            }
            None => dashboard.push_notice(Notice::info("Call summary is available to admins only.")),
        },
        Command::View { id } => {
            if let Some(details) = dashboard.details(&id) {
                writeln!(out, "{details}")?;
            }
        }
        Command::Add { fields } => {
            let form = fields.into_form();
            if let Some(id) = dashboard.add(&form, Utc::now()).await {
                writeln!(out, "{id}")?;
            }
        }
        Command::Edit {
            id,
            fields,
            follow_up,
        } => {
            let Some(mut form) = dashboard.edit_form(&id) else {
                dashboard.details(&id);
                return Ok(());
            };
            fields.apply(&mut form.details);
            follow_up.apply(&mut form.follow_up);
            dashboard.edit(&id, &form).await;
        }
        Command::FollowUp { id, follow_up } => {
            let Some(mut form) = dashboard.follow_up_form(&id) else {
                dashboard.details(&id);
                return Ok(());
            };
            follow_up.apply(&mut form);
            dashboard.follow_up(&id, &form).await;
        }
        Command::Delete { ids } => match ids.as_slice() {
            [id] => {
                dashboard.delete(id).await;
            }
            [first, rest @ ..] => {
                dashboard.double_click(first);
                for id in rest {
                    dashboard.click(id);
                }
                dashboard.delete_selected().await;
            }
            [] => {}
        },
        Command::Copy {
            ids,
            all,
            details,
            filters,
        } => {
            let copied = if details {
                match ids.as_slice() {
                    [id] => dashboard.copy_details(id),
                    _ => {
                        dashboard.push_notice(Notice::error("Pass exactly one entry id with --details."));
                        None
                    }
                }
            } else {
                apply_filters(dashboard, filters);
                select(dashboard, &ids, all);
                dashboard.copy_selected()
            };
            if let Some(text) = copied {
                writeln!(out, "{text}")?;
            }
        }
        Command::Import { path } => {
            if let Some(report) = dashboard.import(&path, Utc::now()).await {
                writeln!(
                    out,
                    "{}; {} row(s) rejected",
                    report.progress_message(),
                    report.rejected
                )?;
            }
        }
        Command::Export { output } => {
            let target = output.unwrap_or_else(|| config.export_file.clone());
            if let Some(bytes) = dashboard.export().await {
                tokio::fs::write(&target, bytes).await?;
                writeln!(
                    out,
                    "Exported entries to {} on {}",
                    target.display(),
                    format_date(&Utc::now())
                )?;
            }
        }
    }

    Ok(())
}

/// Puts the listed ids (or the whole filtered view) into the selection.
fn select<R, S>(dashboard: &mut Dashboard<R, S>, ids: &[EntryId], all: bool)
where
    R: EntryReader + EntryWriter + Authenticator,
    S: SessionStore,
{
    let anchor = match (ids.first(), all) {
        (Some(id), _) => id.clone(),
        (None, true) => match dashboard.visible().first() {
            Some(entry) => entry.id.clone(),
            None => return,
        },
        (None, false) => return,
    };
    dashboard.double_click(&anchor);
    if all {
        dashboard.select_all();
    } else {
        for id in &ids[1..] {
            dashboard.click(id);
        }
    }
}
