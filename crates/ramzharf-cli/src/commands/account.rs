//! Account and session commands.

use zeroize::Zeroizing;

use crate::app::{
    delete_session, load_session, require_session, save_session, AppContext, StoredSession,
};
use crate::cli::{CredentialsArgs, JsonArgs};
use crate::helpers::{prompt_account_password, prompt_new_account_password};
use crate::output::{print_user, user_json};
use crate::ui::{badge, Badge};

use super::{session_error, with_session};

pub fn handle_register(ctx: &AppContext, args: &CredentialsArgs) -> anyhow::Result<()> {
    let auth = ctx.auth_service()?;
    let (password, confirm) = prompt_new_account_password(args.no_input)?;
    let password = Zeroizing::new(password);
    let confirm = Zeroizing::new(confirm);

    let (user, tokens) = auth.register(&args.username, &password, &confirm)?;
    save_session(
        &ctx.session_path()?,
        &StoredSession::new(user.username.clone(), tokens),
    )?;

    if !ctx.quiet() {
        println!(
            "{}",
            badge(
                &ctx.ui(),
                Badge::Ok,
                &format!("Registered and logged in as {}", user.username)
            )
        );
    }
    Ok(())
}

pub fn handle_login(ctx: &AppContext, args: &CredentialsArgs) -> anyhow::Result<()> {
    let auth = ctx.auth_service()?;
    let password = Zeroizing::new(prompt_account_password(args.no_input)?);

    let (user, tokens) = auth.login(&args.username, &password)?;
    save_session(
        &ctx.session_path()?,
        &StoredSession::new(user.username.clone(), tokens),
    )?;

    if !ctx.quiet() {
        println!(
            "{}",
            badge(
                &ctx.ui(),
                Badge::Ok,
                &format!("Logged in as {}", user.username)
            )
        );
    }
    Ok(())
}

pub fn handle_refresh(ctx: &AppContext) -> anyhow::Result<()> {
    let path = ctx.session_path()?;
    let stored = require_session(&path)?;
    let auth = ctx.auth_service()?;

    let tokens = auth
        .rotate_refresh(&stored.tokens.refresh_token)
        .map_err(session_error)?;
    save_session(&path, &StoredSession::new(stored.username, tokens))?;

    if !ctx.quiet() {
        println!("{}", badge(&ctx.ui(), Badge::Ok, "Session refreshed"));
    }
    Ok(())
}

pub fn handle_logout(ctx: &AppContext) -> anyhow::Result<()> {
    let path = ctx.session_path()?;
    let Some(stored) = load_session(&path)? else {
        if !ctx.quiet() {
            println!("{}", badge(&ctx.ui(), Badge::Warn, "Not logged in"));
        }
        return Ok(());
    };

    ctx.auth_service()?.logout(&stored.tokens.refresh_token)?;
    delete_session(&path)?;

    if !ctx.quiet() {
        println!("{}", badge(&ctx.ui(), Badge::Ok, "Logged out"));
    }
    Ok(())
}

pub fn handle_whoami(ctx: &AppContext, args: &JsonArgs) -> anyhow::Result<()> {
    let auth = ctx.auth_service()?;
    let user = with_session(ctx, &auth, |access| auth.verify(access))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&user_json(&user))?);
    } else {
        print_user(&user);
    }
    Ok(())
}
