use anyhow::{anyhow, Result};
use datetrack_records::{MatchOutcome, MessageStyle, NewMatchRecord};

use super::Context;

/// Raw `match add` arguments.
pub struct MatchArgs<'a> {
    pub app: &'a str,
    pub message: &'a str,
    pub style: &'a str,
    pub replied: bool,
    pub reply_time: Option<&'a str>,
    pub outcome: &'a str,
}

pub fn add(ctx: &Context, args: MatchArgs<'_>) -> Result<()> {
    let style = MessageStyle::parse(args.style).ok_or_else(|| {
        anyhow!(
            "Unknown message style '{}' (Flirty, Funny, Compliment, Question)",
            args.style
        )
    })?;
    let outcome = MatchOutcome::parse(args.outcome).ok_or_else(|| {
        anyhow!(
            "Unknown outcome '{}' (Ghosted, Number Exchanged, Unmatched, Date)",
            args.outcome
        )
    })?;

    let record = NewMatchRecord {
        app: args.app.to_string(),
        first_message: args.message.to_string(),
        style,
        replied: args.replied,
        reply_time: args.reply_time.map(str::to_string),
        outcome,
    }
    .validate()?;

    ctx.records()?.save_match(&record)?;
    println!("Logged {} message on {} ({}).", record.style, record.app, record.id);
    Ok(())
}

pub fn list(ctx: &Context) -> Result<()> {
    let matches = ctx.records()?.list_matches()?;
    if matches.is_empty() {
        println!("No matches logged yet.");
        return Ok(());
    }

    for m in &matches {
        let reply = match (m.replied, &m.reply_time) {
            (true, Some(t)) => format!("replied ({})", t),
            (true, None) => "replied".to_string(),
            (false, _) => "no reply".to_string(),
        };
        println!(
            "{}  {:<10} {:<10} {:<16} {:<16} \"{}\"",
            m.created_at.format("%Y-%m-%d"),
            m.app,
            m.style,
            m.outcome,
            reply,
            m.first_message,
        );
    }
    Ok(())
}
