//! `joinboard contacts ...` commands.

use std::fmt::Write as _;

use crate::cli::{ContactArgs, ContactsCommand};
use crate::contacts::{ContactDirectory, ContactGroup};
use crate::context::ServiceContext;
use crate::model::{Contact, ContactFields};

/// Execute a `contacts` subcommand.
///
/// # Errors
///
/// Returns an error string without a session, for invalid input or a failed
/// backend call.
pub async fn run(ctx: &ServiceContext, command: &ContactsCommand) -> Result<(), String> {
    super::require_login(ctx).await?;
    let mut directory = ContactDirectory::new(ctx.api());

    match command {
        ContactsCommand::List => {
            let groups = directory.fetch_and_display_contacts().await.map_err(|e| e.to_string())?;
            print!("{}", format_groups(groups));
        }
        ContactsCommand::Show { id } => {
            let contact = directory.show(id).await.map_err(|e| e.to_string())?;
            print!("{}", format_contact(&contact));
        }
        ContactsCommand::Add(args) => {
            let fields = merge(ContactFields::default(), args);
            directory.add(&fields).await.map_err(|e| e.to_string())?;
            println!("Contact successfully created.");
            print!("{}", format_groups(directory.groups()));
        }
        ContactsCommand::Edit { id, fields, image } => {
            let current = directory.show(id).await.map_err(|e| e.to_string())?;
            let fields = merge(ContactFields::from(&current), fields);
            directory.update(id, &fields, image.as_deref()).await.map_err(|e| e.to_string())?;
            println!("Contact {id} saved.");
        }
        ContactsCommand::Delete { id, yes } => {
            if !yes {
                println!("Delete contact {id}? Re-run with --yes to confirm.");
                return Ok(());
            }
            directory.delete(id).await.map_err(|e| e.to_string())?;
            println!("Contact {id} deleted.");
        }
    }
    Ok(())
}

/// Overlays the fields given on the command line.
fn merge(mut fields: ContactFields, args: &ContactArgs) -> ContactFields {
    let overrides = [
        (&mut fields.first_name, &args.first_name),
        (&mut fields.last_name, &args.last_name),
        (&mut fields.email, &args.email),
        (&mut fields.phone, &args.phone),
        (&mut fields.color, &args.color),
    ];
    for (field, value) in overrides {
        if let Some(value) = value {
            *field = value.trim().to_string();
        }
    }
    fields
}

/// The grouped list: a letter heading, then one line per contact.
#[must_use]
pub fn format_groups(groups: &[ContactGroup]) -> String {
    if groups.is_empty() {
        return "No contacts yet.\n".to_string();
    }
    let mut out = String::new();
    for group in groups {
        let _ = writeln!(out, "{}", group.letter);
        for contact in &group.contacts {
            let _ = writeln!(
                out,
                "  {:<3} {}  {}  ({})",
                contact.initials,
                contact.full_name(),
                contact.email,
                contact.id
            );
        }
    }
    out
}

/// One contact in full.
#[must_use]
pub fn format_contact(contact: &Contact) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", contact.initials, contact.full_name());
    let _ = writeln!(out, "Email: {}", contact.email);
    let _ = writeln!(out, "Phone: {}", contact.phone);
    let _ = writeln!(out, "Color: {}", contact.color);
    if let Some(image) = &contact.image_url {
        let _ = writeln!(out, "Image: {image}");
    }
    out
}
