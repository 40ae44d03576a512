use rentdesk_core::admin::{ActionBinding, AdminAction};
use rentdesk_core::config::LoadOptions;
use rentdesk_core::domain::reservation::ReservationId;
use rentdesk_db::ReservationDesk;

use crate::commands::{desk_failure, open_pool, CommandContext, CommandResult};

/// Dispatches an approve/deny action against one reservation.
pub fn run(options: &LoadOptions, action: AdminAction, reservation_id: &str) -> CommandResult {
    let command = command_name(action);
    let context = match CommandContext::prepare(command, options) {
        Ok(context) => context,
        Err(result) => return result,
    };

    let binding =
        ActionBinding { reservation_id: ReservationId(reservation_id.trim().to_string()), action };

    context.finish(command, async {
        let pool = open_pool(&context.config).await?;
        let desk = ReservationDesk::sqlite(pool.clone(), &context.config.booking);
        let outcome = desk.dispatch(&binding).await;
        pool.close().await;

        let reservation = outcome.map_err(desk_failure)?;
        Ok(CommandResult::success(
            command,
            format!("reservation {} is now {}", reservation.id, reservation.status),
        ))
    })
}

fn command_name(action: AdminAction) -> &'static str {
    match action {
        AdminAction::Approve => "approve",
        AdminAction::Deny => "deny",
    }
}
