//! Terminal front-end commands.
//!
//! Each command runs against an [`AppContext`] and writes plain text to the
//! supplied writer. Commands other than `login`, `signup` and `sign-out`
//! restore the stored session first and refuse to run without one.

use std::io::{self, Write};

use clap::{Parser, Subcommand};

use crate::domain::ports::{ApiGateway, CredentialStore};
use crate::domain::{AppContext, ContentId, ContentItem, Error, ProfileUpdate, User};

/// `marquee` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "marquee",
    about = "Browse the streaming catalog and manage your list from the terminal",
    version
)]
pub struct Cli {
    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Sign in and remember the session.
    Login {
        /// Account email.
        #[arg(long)]
        email: String,
        /// Account password.
        #[arg(long)]
        password: String,
    },
    /// Create an account and sign in.
    Signup {
        /// Display name.
        #[arg(long)]
        name: String,
        /// Account email.
        #[arg(long)]
        email: String,
        /// Password: at least 8 characters with upper and lower case letters
        /// and a digit.
        #[arg(long)]
        password: String,
    },
    /// Show the signed-in account.
    Whoami,
    /// Forget the stored session.
    SignOut,
    /// List catalog categories.
    Browse {
        /// Only show this category.
        #[arg(long)]
        category: Option<String>,
        /// Items shown per category.
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
    /// Search films and series.
    Search {
        /// Free-text query.
        query: String,
        /// Result page, starting at 1.
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Add or remove an item from your list.
    Toggle {
        /// Catalog id.
        id: u64,
    },
    /// Show the items on your list.
    MyList,
    /// Update profile fields.
    Profile {
        /// Display name.
        #[arg(long)]
        name: Option<String>,
        /// Avatar image URL.
        #[arg(long)]
        avatar: Option<String>,
        /// Interface language code.
        #[arg(long)]
        language: Option<String>,
        /// Country code.
        #[arg(long)]
        country: Option<String>,
    },
    /// Record playback progress.
    Progress {
        /// Catalog id.
        id: u64,
        /// Percentage watched, 0 to 100.
        progress: u8,
        /// Mark playback as finished.
        #[arg(long)]
        completed: bool,
    },
    /// Show watch history.
    History,
}

/// Failures reported by [`run`].
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The client rejected the operation.
    #[error(transparent)]
    Client(#[from] Error),
    /// Output could not be written.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
    /// The command needs a stored session.
    #[error("not signed in; run `marquee login` first")]
    SignInRequired,
}

/// Execute `command`, writing its report to `out`.
///
/// # Errors
///
/// [`CliError::SignInRequired`] when the command needs a session and none
/// could be restored; otherwise the client or output error.
pub async fn run<G, S, W>(
    command: Command,
    context: &AppContext<G, S>,
    out: &mut W,
) -> Result<(), CliError>
where
    G: ApiGateway,
    S: CredentialStore,
    W: Write,
{
    match command {
        Command::Login { email, password } => {
            let user = context.login(&email, &password).await?;
            writeln!(out, "signed in as {} <{}>", user.name, user.email)?;
        }
        Command::Signup {
            name,
            email,
            password,
        } => {
            let user = context.signup(&name, &email, &password).await?;
            writeln!(out, "welcome, {}", user.name)?;
            write_subscription(out, &user)?;
        }
        Command::SignOut => {
            context.sign_out();
            writeln!(out, "signed out")?;
        }
        command => {
            if !context.bootstrap().await.is_authenticated() {
                return Err(CliError::SignInRequired);
            }
            run_signed_in(command, context, out).await?;
        }
    }
    Ok(())
}

async fn run_signed_in<G, S, W>(
    command: Command,
    context: &AppContext<G, S>,
    out: &mut W,
) -> Result<(), CliError>
where
    G: ApiGateway,
    S: CredentialStore,
    W: Write,
{
    match command {
        Command::Whoami => {
            let user = context
                .session()
                .current_user()
                .ok_or(CliError::SignInRequired)?;
            writeln!(out, "{} <{}>", user.name, user.email)?;
            write_subscription(out, &user)?;
            writeln!(
                out,
                "profile: {} / {}",
                user.profile.language, user.profile.country
            )?;
            writeln!(out, "saved items: {}", user.watchlist_ids.len())?;
        }
        Command::Browse { category, limit } => {
            let load = context.content().load_all().await;
            if let Some(error) = load.error {
                if load.categories.is_empty() {
                    return Err(error.into());
                }
                writeln!(out, "showing cached catalog: {error}")?;
            }
            for (name, items) in load.categories.iter() {
                if category.as_deref().is_some_and(|wanted| wanted != name) {
                    continue;
                }
                writeln!(out, "{name} ({})", items.len())?;
                for item in items.iter().take(limit) {
                    writeln!(out, "  {}", describe(item))?;
                }
            }
        }
        Command::Search { query, page } => {
            let results = context.content().search(&query, page).await?;
            writeln!(
                out,
                "{} results for {:?} (page {})",
                results.results.len(),
                results.query,
                results.page
            )?;
            for item in &results.results {
                writeln!(out, "  {}", describe(item))?;
            }
        }
        Command::Toggle { id } => {
            let id = ContentId::new(id);
            let saved = context.toggle_watchlist(id).await?;
            let verb = if saved { "added" } else { "removed" };
            writeln!(out, "{verb} {id}")?;
        }
        Command::MyList => {
            let items = context.watchlist().saved_items().await?;
            writeln!(out, "{} saved", items.len())?;
            for item in &items {
                writeln!(out, "  {}", describe(item))?;
            }
        }
        Command::Profile {
            name,
            avatar,
            language,
            country,
        } => {
            let update = profile_update(name, avatar, language, country);
            let user = context.update_profile(&update).await?;
            writeln!(
                out,
                "profile updated: {} ({} / {})",
                user.name, user.profile.language, user.profile.country
            )?;
        }
        Command::Progress {
            id,
            progress,
            completed,
        } => {
            let id = ContentId::new(id);
            context
                .playback()
                .record_progress(id, progress, completed)
                .await?;
            writeln!(out, "recorded {progress}% for {id}")?;
        }
        Command::History => {
            let history = context.playback().history().await?;
            for entry in &history {
                let title = entry
                    .details
                    .as_ref()
                    .map_or("(unknown title)", |item| item.title.as_str());
                let done = if entry.completed { " done" } else { "" };
                writeln!(
                    out,
                    "{:>8}  {title}  {}%{done}",
                    entry.content_id, entry.progress
                )?;
            }
        }
        Command::Login { .. } | Command::Signup { .. } | Command::SignOut => {}
    }
    Ok(())
}

fn profile_update(
    name: Option<String>,
    avatar: Option<String>,
    language: Option<String>,
    country: Option<String>,
) -> ProfileUpdate {
    let mut update = ProfileUpdate::default();
    if let Some(name) = name {
        update = update.name(name);
    }
    if let Some(avatar) = avatar {
        update = update.avatar(avatar);
    }
    if let Some(language) = language {
        update = update.language(language);
    }
    if let Some(country) = country {
        update = update.country(country);
    }
    update
}

fn write_subscription(out: &mut impl Write, user: &User) -> io::Result<()> {
    writeln!(
        out,
        "subscription: {:?}, {} days remaining",
        user.subscription.kind, user.subscription.days_remaining
    )
}

fn describe(item: &ContentItem) -> String {
    let year = item
        .release_date
        .map_or_else(|| "----".to_owned(), |date| date.format("%Y").to_string());
    format!(
        "{:>8}  {} ({year})  {:.1}",
        item.id, item.title, item.rating
    )
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
