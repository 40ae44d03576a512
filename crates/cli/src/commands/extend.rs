use rentdesk_core::config::LoadOptions;
use rentdesk_core::domain::reservation::{ReservationId, DISPLAY_FORMAT};
use rentdesk_db::ReservationDesk;

use crate::commands::{desk_failure, open_pool, CommandContext, CommandResult};

pub fn run(
    options: &LoadOptions,
    reservation_id: &str,
    return_date: &str,
    return_time: Option<&str>,
) -> CommandResult {
    let context = match CommandContext::prepare("extend", options) {
        Ok(context) => context,
        Err(result) => return result,
    };

    let id = ReservationId(reservation_id.trim().to_string());

    context.finish("extend", async {
        let pool = open_pool(&context.config).await?;
        let desk = ReservationDesk::sqlite(pool.clone(), &context.config.booking);
        let outcome = desk.extend_return(&id, return_date, return_time).await;
        pool.close().await;

        let reservation = outcome.map_err(desk_failure)?;
        Ok(CommandResult::success(
            "extend",
            format!(
                "reservation {} now returns {}",
                reservation.id,
                reservation.return_at.format(DISPLAY_FORMAT)
            ),
        ))
    })
}
