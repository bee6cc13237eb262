//! `joinboard accounts` command.

use crate::board::{AccountDirectory, AssigneeSelection};
use crate::context::ServiceContext;

/// Execute the `accounts` command.
///
/// Lists everyone a task can be assigned to, with badge initials and color.
///
/// # Errors
///
/// Returns an error string without a session or if the accounts cannot be loaded.
pub async fn run(ctx: &ServiceContext) -> Result<(), String> {
    super::require_login(ctx).await?;
    let mut directory = AccountDirectory::new(ctx.api());
    let options = directory.options(&AssigneeSelection::new()).await.map_err(|e| e.to_string())?;
    if options.is_empty() {
        println!("No accounts found.");
        return Ok(());
    }

    let id_width = options.iter().map(|o| o.account_id.len()).max().unwrap_or(2).max(2);
    let name_width = options.iter().map(|o| o.full_name.len()).max().unwrap_or(4).max(4);
    println!("{:<id_width$}  {:<3}  {:<name_width$}  COLOR", "ID", "", "NAME");
    println!("{:-<id_width$}  {:-<3}  {:-<name_width$}  -----", "", "", "");
    for option in &options {
        println!(
            "{:<id_width$}  {:<3}  {:<name_width$}  {}",
            option.account_id, option.initials, option.full_name, option.color
        );
    }
    Ok(())
}
