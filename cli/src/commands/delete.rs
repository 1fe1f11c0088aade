//! Delete command

use super::{Context, StdinConfirm};
use crate::output;
use campus_admin_core::{AdminError, AdminResult, EntityKind};

pub async fn handle(ctx: &Context<'_>, kind: EntityKind, id: &str, yes: bool) -> AdminResult<()> {
    let mut page = ctx.page(kind);
    page.select(id).await?;

    let result = if yes {
        if let Some(dialog) = page.request_delete() {
            println!("{}", dialog.body);
        }
        page.confirm_delete().await
    } else {
        page.delete_with(&StdinConfirm).await
    };

    match result {
        Ok(true) => {
            output::print_notices(&page.list_mut().take_notices());
            Ok(())
        }
        Ok(false) => {
            println!("Abgebrochen.");
            Ok(())
        }
        // the list already chose the copy (e.g. enrolled students on an activity)
        Err(err) => match page.list().error() {
            Some(message) => Err(AdminError::Validation(message.to_string())),
            None => Err(err.into()),
        },
    }
}
