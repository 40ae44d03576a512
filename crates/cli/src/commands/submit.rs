use chrono::{Local, NaiveDateTime};
use serde_json::json;

use rentdesk_core::config::LoadOptions;
use rentdesk_core::rental::request::ReservationRequest;
use rentdesk_db::ReservationDesk;

use crate::commands::{desk_failure, open_pool, CommandContext, CommandResult};

pub fn run(options: &LoadOptions, request: ReservationRequest) -> CommandResult {
    run_at(options, request, Local::now().naive_local())
}

/// Submits against an explicit wall-clock reading, which is what the lead-time rule compares to.
pub fn run_at(
    options: &LoadOptions,
    request: ReservationRequest,
    now: NaiveDateTime,
) -> CommandResult {
    let context = match CommandContext::prepare("submit", options) {
        Ok(context) => context,
        Err(result) => return result,
    };

    context.finish("submit", async {
        let pool = open_pool(&context.config).await?;
        let desk = ReservationDesk::sqlite(pool.clone(), &context.config.booking);
        let outcome = desk.submit(&request, now).await;
        pool.close().await;

        let receipt = outcome.map_err(desk_failure)?;
        let data = json!({
            "reservation_id": receipt.reservation_id,
            "total_charge": receipt.total_charge,
            "rental_days": receipt.pricing.rental_days,
            "pricing_trace": receipt.pricing.steps,
        });
        Ok(CommandResult::success_with_data("submit", receipt.message(), Some(data)))
    })
}
