//! Human-readable output.

use ramzharf_core::storage::{Note, User};

pub fn print_opened_note(note: &Note, content: &str, quiet: bool) {
    if !quiet {
        println!("ID: {}", note.id);
        println!("Created: {}", note.created_at);
        if let Some(at) = note.expires_at {
            println!("Expires: {}", at);
        }
        println!();
    }
    println!("{}", content);
}

pub fn print_user(user: &User) {
    println!("ID: {}", user.id);
    println!("Username: {}", user.username);
    println!("Created: {}", user.created_at);
}
