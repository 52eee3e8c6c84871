use anyhow::{anyhow, bail, Result};
use chrono::Utc;
use datetrack_auth::{Profile, Session};

use super::Context;

/// Raw `login` arguments.
pub struct LoginArgs {
    pub token: String,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub expires_in: Option<i64>,
    pub scopes: Vec<String>,
}

pub fn login(ctx: &Context, args: LoginArgs) -> Result<()> {
    let mut session = Session::new(
        args.token,
        Profile {
            display_name: args.name,
            email: args.email,
            avatar_url: args.avatar,
        },
    );
    session.expires_at = args.expires_in.map(expiry_from_now).transpose()?;
    session.scopes = args.scopes;

    ctx.sessions.store(&session)?;
    println!(
        "Signed in as {} <{}>.",
        session.profile.display_name, session.profile.email
    );
    if !session.has_calendar_scope() {
        println!("This token does not grant calendar access; sync will be refused.");
    }
    Ok(())
}

/// Unix timestamp `secs` seconds from now.
fn expiry_from_now(secs: i64) -> Result<i64> {
    if secs <= 0 {
        bail!("--expires-in must be a positive number of seconds");
    }
    Utc::now()
        .timestamp()
        .checked_add(secs)
        .ok_or_else(|| anyhow!("--expires-in {} is out of range", secs))
}

pub fn logout(ctx: &Context) -> Result<()> {
    if !ctx.sessions.has_session() {
        println!("Not signed in.");
        return Ok(());
    }
    ctx.sessions.delete()?;
    println!("Signed out.");
    Ok(())
}
