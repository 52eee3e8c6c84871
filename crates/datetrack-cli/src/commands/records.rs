use anyhow::{Context as _, Result};
use datetrack_calendar::EventLinks;
use datetrack_records::{
    DateEntry, DateRecord, DateStats, MatchStats, NewDateRecord, RecordError, RecordFilter,
};
use std::fs;
use std::path::Path;
use tracing::info;

use super::Context;

pub fn add(ctx: &Context, new: NewDateRecord) -> Result<()> {
    let record = new.submit()?;
    ctx.records()?.save_date(&record)?;
    info!(id = %record.id, "Date logged");

    println!("Logged {} ({}).", describe(&record), record.id);
    println!("Run `datetrack sync` to add it to your calendar.");
    Ok(())
}

pub fn list(ctx: &Context, filter: &RecordFilter) -> Result<()> {
    let records = filter.apply(ctx.records()?.list_dates()?);

    if records.is_empty() {
        if filter.is_empty() {
            println!("No dates logged yet.");
        } else {
            println!("No dates match the filter.");
        }
        return Ok(());
    }

    for record in &records {
        println!(
            "{}  {} {}  {:<8} {:<10} {}/5  {}",
            record.id,
            record.date,
            record.time.format("%H:%M"),
            record.date_type,
            record.outcome,
            record.rating,
            record.location,
        );
        if let Some(notes) = &record.notes {
            println!("    {}", notes);
        }
    }
    println!("{} date(s)", records.len());
    Ok(())
}

pub fn stats(ctx: &Context) -> Result<()> {
    let store = ctx.records()?;
    let dates = DateStats::from_records(&store.list_dates()?);
    let matches = MatchStats::from_records(&store.list_matches()?);

    println!("Dates: {}", dates.total);
    if let Some(avg) = dates.average_rating {
        println!("  Average rating: {:.1}/5", avg);
    }
    if let Some(rate) = dates.positive_rate {
        println!("  Went well: {:.0}%", rate);
    }
    if let Some(top) = dates.top_type() {
        println!("  Favourite kind of date: {}", top);
    }
    for (label, count) in &dates.by_outcome {
        println!("  {:<10} {}", label, count);
    }

    println!("Matches: {}", matches.total);
    if let Some(rate) = matches.reply_rate {
        println!("  Reply rate: {:.0}%", rate);
    }
    println!("  Turned into dates: {}", matches.dates);
    for (label, count) in &matches.by_style {
        println!("  {:<10} {}", label, count);
    }
    Ok(())
}

/// Delete a record, removing its calendar event first unless `local_only`.
pub async fn delete(ctx: &Context, id: &str, local_only: bool) -> Result<()> {
    let store = ctx.records()?;
    let record = store
        .get_date(id)?
        .ok_or_else(|| RecordError::NotFound(id.to_string()))?;

    let links = EventLinks::new(ctx.link_store()?);
    if links.remote_id(id)?.is_some() {
        if local_only {
            links.unlink(id)?;
            println!("Left the calendar event in place.");
        } else {
            // A failure here keeps both the record and its link so the delete can be retried
            ctx.orchestrator()?.forget(id).await?;
            println!("Removed the calendar event.");
        }
    }

    store.delete_date(id)?;
    info!(id, "Date deleted");
    println!("Deleted {}.", describe(&record));
    Ok(())
}

pub fn export(ctx: &Context, output: Option<&Path>) -> Result<()> {
    let entries: Vec<DateEntry> = ctx
        .records()?
        .list_dates()?
        .iter()
        .map(DateEntry::from)
        .collect();
    let json = serde_json::to_string_pretty(&entries)?;

    match output {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Exported {} date(s) to {}.", entries.len(), path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

/// Import an export file. Invalid entries are reported and skipped.
pub fn import(ctx: &Context, file: &Path) -> Result<()> {
    let json = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let entries: Vec<DateEntry> =
        serde_json::from_str(&json).context("File is not a DateTrack export")?;

    let store = ctx.records()?;
    let mut imported = 0;
    for entry in &entries {
        let record = NewDateRecord::try_from(entry).and_then(NewDateRecord::submit);
        match record {
            Ok(record) => {
                store.save_date(&record)?;
                imported += 1;
            }
            Err(e) => println!("Skipped {}: {}", entry.id, e),
        }
    }

    println!("Imported {} of {} date(s).", imported, entries.len());
    Ok(())
}

fn describe(record: &DateRecord) -> String {
    format!("{} at {} on {}", record.date_type, record.location, record.date)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use chrono::{Duration, Local, NaiveTime};
    use datetrack_core::Config;
    use datetrack_records::{DateType, Outcome};
    use tempfile::tempdir;

    fn context(dir: &Path, name: &str) -> Context {
        let mut config = Config::default();
        config.config_dir = dir.to_path_buf();
        config.data.database_path = dir.join(name).to_string_lossy().into_owned();
        Context::new(config)
    }

    fn yesterday(location: &str) -> NewDateRecord {
        NewDateRecord {
            id: None,
            location: location.to_string(),
            date: Local::now().date_naive() - Duration::days(1),
            time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            date_type: DateType::Dinner,
            outcome: Outcome::Good,
            rating: 4,
            notes: None,
        }
    }

    #[test]
    fn test_export_then_import_into_fresh_database() {
        let dir = tempdir().unwrap();
        let source = context(dir.path(), "a.db");
        add(&source, yesterday("Nopa")).unwrap();
        add(&source, yesterday("Zuni")).unwrap();

        let file = dir.path().join("export.json");
        export(&source, Some(&file)).unwrap();

        let target = context(dir.path(), "b.db");
        import(&target, &file).unwrap();

        let ids = |ctx: &Context| {
            let mut ids: Vec<String> = ctx
                .records()
                .unwrap()
                .list_dates()
                .unwrap()
                .into_iter()
                .map(|r| r.id)
                .collect();
            ids.sort();
            ids
        };
        assert_eq!(ids(&target).len(), 2);
        assert_eq!(ids(&source), ids(&target));
    }

    #[test]
    fn test_future_dated_add_is_rejected() {
        let dir = tempdir().unwrap();
        let ctx = context(dir.path(), "dt.db");
        let mut new = yesterday("Rooftop");
        new.date = Local::now().date_naive() + Duration::days(2);

        let err = add(&ctx, new).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RecordError>(),
            Some(RecordError::FutureDate { .. })
        ));
        assert_eq!(ctx.records().unwrap().date_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_local_delete_of_unsynced_date() {
        let dir = tempdir().unwrap();
        let ctx = context(dir.path(), "dt.db");
        add(&ctx, yesterday("Tartine")).unwrap();
        let id = ctx.records().unwrap().list_dates().unwrap()[0].id.clone();

        delete(&ctx, &id, false).await.unwrap();
        assert_eq!(ctx.records().unwrap().date_count().unwrap(), 0);
        assert!(delete(&ctx, &id, false).await.is_err());
    }
}
