//! Note commands.

use chrono::Utc;
use zeroize::Zeroizing;

use ramzharf_core::crypto::{decrypt_with_password, encrypt_with_password};

use crate::app::AppContext;
use crate::cli::{JsonArgs, NoteCommands, NoteCreateArgs, NoteDeleteArgs, NoteShowArgs};
use crate::helpers::{parse_expires_in, parse_note_id, prompt_note_password, read_note_body};
use crate::output::{note_json, notes_json, opened_note_json, print_opened_note};
use crate::ui::{badge, notes_table, with_spinner, Badge};

use super::with_session;

pub fn handle_note(ctx: &AppContext, command: &NoteCommands) -> anyhow::Result<()> {
    match command {
        NoteCommands::Create(args) => handle_create(ctx, args),
        NoteCommands::Show(args) => handle_show(ctx, args),
        NoteCommands::List(args) => handle_list(ctx, args),
        NoteCommands::Delete(args) => handle_delete(ctx, args),
    }
}

fn handle_create(ctx: &AppContext, args: &NoteCreateArgs) -> anyhow::Result<()> {
    let expires_in = parse_expires_in(&args.expires_in)?;
    let body = Zeroizing::new(read_note_body(args.body.clone())?);
    let password = Zeroizing::new(prompt_note_password(args.no_input, true)?);

    let sealed = with_spinner(&ctx.ui(), ctx.quiet(), "Sealing note...", || {
        encrypt_with_password(&body, &password)
    })?;

    let auth = ctx.auth_service()?;
    let notes = ctx.note_service()?;
    let note = with_session(ctx, &auth, |access| {
        let user = auth.verify(access)?;
        notes.create(&user.id, &sealed, expires_in)
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&note_json(&note, Utc::now()))?);
    } else if ctx.quiet() {
        println!("{}", note.id);
    } else {
        println!(
            "{}",
            badge(&ctx.ui(), Badge::Ok, &format!("Created note {}", note.id))
        );
    }
    Ok(())
}

/// Reading a note needs only its id and password, not a session.
fn handle_show(ctx: &AppContext, args: &NoteShowArgs) -> anyhow::Result<()> {
    let id = parse_note_id(&args.id)?;
    let note = ctx.note_service()?.fetch(&id)?;
    let password = Zeroizing::new(prompt_note_password(args.no_input, false)?);

    let content = Zeroizing::new(with_spinner(
        &ctx.ui(),
        ctx.quiet(),
        "Opening note...",
        || decrypt_with_password(&note.ciphertext, &password, &note.salt),
    )?);

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&opened_note_json(&note, &content))?
        );
    } else {
        print_opened_note(&note, &content, ctx.quiet());
    }
    Ok(())
}

fn handle_list(ctx: &AppContext, args: &JsonArgs) -> anyhow::Result<()> {
    let auth = ctx.auth_service()?;
    let notes = ctx.note_service()?;
    let listed = with_session(ctx, &auth, |access| {
        let user = auth.verify(access)?;
        notes.list(&user.id)
    })?;

    let now = Utc::now();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&notes_json(&listed, now))?);
        return Ok(());
    }

    if listed.is_empty() {
        if !ctx.quiet() {
            println!("No notes yet.");
        }
        return Ok(());
    }
    println!("{}", notes_table(&ctx.ui(), &listed, now));
    Ok(())
}

fn handle_delete(ctx: &AppContext, args: &NoteDeleteArgs) -> anyhow::Result<()> {
    let id = parse_note_id(&args.id)?;
    let auth = ctx.auth_service()?;
    let notes = ctx.note_service()?;
    with_session(ctx, &auth, |access| {
        let user = auth.verify(access)?;
        notes.delete(&id, &user.id)
    })?;

    if !ctx.quiet() {
        println!(
            "{}",
            badge(&ctx.ui(), Badge::Ok, &format!("Deleted note {}", id))
        );
    }
    Ok(())
}
