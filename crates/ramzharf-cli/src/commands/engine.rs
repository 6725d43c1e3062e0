//! Standalone encrypt and decrypt, with no account or store involved.

use zeroize::Zeroizing;

use ramzharf_core::crypto::{decrypt_with_password, encrypt_with_password};

use crate::app::AppContext;
use crate::cli::{DecryptArgs, EncryptArgs};
use crate::helpers::{prompt_note_password, read_note_body};
use crate::ui::with_spinner;

pub fn handle_encrypt(ctx: &AppContext, args: &EncryptArgs) -> anyhow::Result<()> {
    let body = Zeroizing::new(read_note_body(args.body.clone())?);
    let password = Zeroizing::new(prompt_note_password(args.no_input, true)?);

    let sealed = with_spinner(&ctx.ui(), ctx.quiet(), "Encrypting...", || {
        encrypt_with_password(&body, &password)
    })?;
    println!("{}", serde_json::to_string_pretty(&sealed)?);
    Ok(())
}

pub fn handle_decrypt(ctx: &AppContext, args: &DecryptArgs) -> anyhow::Result<()> {
    let password = Zeroizing::new(prompt_note_password(args.no_input, false)?);

    let plaintext = Zeroizing::new(with_spinner(
        &ctx.ui(),
        ctx.quiet(),
        "Decrypting...",
        || decrypt_with_password(args.ciphertext.trim(), &password, args.salt.trim()),
    )?);
    println!("{}", plaintext.as_str());
    Ok(())
}
