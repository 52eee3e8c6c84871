//! `datetrack` command-line entry point.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use datetrack_calendar::{CalendarError, SyncError};
use datetrack_core::{AuthError, Config};
use datetrack_records::{parse_date, parse_time, NewDateRecord, RecordError, RecordFilter};

use cli::{Cli, Commands, MatchCommand};
use commands::{account, calendar, matches, records, Context};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = datetrack_core::init() {
        eprintln!("Warning: {:#}", e);
    }

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", describe(&e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let (mut config, _) = Config::load_validated(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.data.database_path = db;
    }
    let ctx = Context::new(config);

    match cli.command {
        Commands::Add {
            location,
            date,
            time,
            date_type,
            outcome,
            rating,
            notes,
        } => {
            let new = NewDateRecord {
                id: None,
                location,
                date: parse_date(&date)?,
                time: parse_time(&time)?,
                date_type: date_type.as_str().into(),
                outcome: outcome.as_str().into(),
                rating,
                notes,
            };
            records::add(&ctx, new)
        }
        Commands::List {
            date_type,
            outcome,
            search,
            min_rating,
        } => {
            let filter = RecordFilter {
                date_type: date_type.as_deref().map(Into::into),
                outcome: outcome.as_deref().map(Into::into),
                text: search,
                min_rating,
            };
            records::list(&ctx, &filter)
        }
        Commands::Stats => records::stats(&ctx),
        Commands::Delete { id, local_only } => records::delete(&ctx, &id, local_only).await,
        Commands::Match { action } => match action {
            MatchCommand::Add {
                app,
                message,
                style,
                replied,
                reply_time,
                outcome,
            } => matches::add(
                &ctx,
                matches::MatchArgs {
                    app: &app,
                    message: &message,
                    style: &style,
                    replied,
                    reply_time: reply_time.as_deref(),
                    outcome: &outcome,
                },
            ),
            MatchCommand::List => matches::list(&ctx),
        },
        Commands::Export { output } => records::export(&ctx, output.as_deref()),
        Commands::Import { file } => records::import(&ctx, &file),
        Commands::Login {
            token,
            name,
            email,
            avatar,
            expires_in,
            scopes,
        } => account::login(
            &ctx,
            account::LoginArgs {
                token,
                name,
                email,
                avatar,
                expires_in,
                scopes,
            },
        ),
        Commands::Logout => account::logout(&ctx),
        Commands::Sync => calendar::sync(&ctx).await,
        Commands::Events { days } => calendar::events(&ctx, days).await,
        Commands::Status => calendar::status(&ctx),
    }
}

/// Message shown to the user for a failed command.
fn describe(e: &anyhow::Error) -> String {
    if let Some(err) = e.downcast_ref::<AuthError>() {
        return err.user_message().to_string();
    }
    if let Some(err) = e.downcast_ref::<SyncError>() {
        return err.user_message();
    }
    if let Some(err) = e.downcast_ref::<CalendarError>() {
        return err.user_message();
    }
    if let Some(err) = e.downcast_ref::<RecordError>() {
        if err.is_validation() {
            return err.to_string();
        }
    }
    format!("{:#}", e)
}
