use anyhow::{anyhow, Result};
use chrono::{Duration, Local, Utc};
use datetrack_calendar::{EventLinks, EventQuery, EventTime};
use datetrack_core::{AuthError, Config};
use tracing::info;

use super::Context;

pub async fn sync(ctx: &Context) -> Result<()> {
    let records = ctx.records()?.list_dates()?;
    if records.is_empty() {
        println!("Nothing to sync.");
        return Ok(());
    }

    let sync = ctx.orchestrator()?;
    sync.ensure_permission().await?;

    println!("Syncing {} date(s) to Google Calendar...", records.len());
    let outcome = sync.sync_all(&records).await;

    println!("Synced: {}", outcome.success);
    if !outcome.is_clean() {
        println!("Failed: {}", outcome.failed);
        if let Some(err) = &outcome.last_error {
            println!("Last error: {}", err);
        }
    }
    Ok(())
}

pub async fn events(ctx: &Context, days: Option<i64>) -> Result<()> {
    let now = Utc::now();
    let text = Some(ctx.config.calendar.event_query.trim().to_string())
        .filter(|q| !q.is_empty());
    let mut query = EventQuery::upcoming(now, text);
    if let Some(days) = days {
        let end = Duration::try_days(days)
            .filter(|d| *d > Duration::zero())
            .and_then(|d| now.checked_add_signed(d))
            .ok_or_else(|| anyhow!("--days must be a positive number of days"))?;
        query = query.until(end);
    }

    let sync = ctx.orchestrator()?;
    let events = sync.list_synced_events(&query).await?;
    info!(count = events.len(), "Listed calendar events");

    if events.is_empty() {
        println!("No upcoming dates on your calendar.");
        return Ok(());
    }
    for event in &events {
        let when = match &event.start {
            EventTime::DateTime(dt) => dt
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
            EventTime::Date(d) => d.to_string(),
        };
        println!("{}  {:<8} {}", when, event.color.as_str(), event.summary);
        if let Some(link) = &event.html_link {
            println!("    {}", link);
        }
    }
    Ok(())
}

pub fn status(ctx: &Context) -> Result<()> {
    match ctx.sessions.retrieve() {
        Ok(session) => {
            println!(
                "Signed in as {} <{}>",
                session.profile.display_name, session.profile.email
            );
            if session.is_expired() {
                println!("  Session expired; sign in again.");
            } else if !session.has_calendar_scope() {
                println!("  {}", AuthError::MissingCalendarScope.user_message());
            }
        }
        Err(_) => println!("Not signed in."),
    }
    if Config::access_token_from_env().is_some() {
        println!("Using the access token from the environment.");
    }

    let links = EventLinks::new(ctx.link_store()?);
    println!("Dates on calendar: {}", links.all_links()?.len());
    match links.last_sync()? {
        Some(at) => println!(
            "Last sync: {}",
            at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
        ),
        None => println!("Last sync: never"),
    }

    println!("Calendar: {}", ctx.config.calendar.calendar_id);
    println!("Database: {}", ctx.config.data.database_path);
    println!("Config directory: {}", ctx.config.config_dir.display());
    Ok(())
}
