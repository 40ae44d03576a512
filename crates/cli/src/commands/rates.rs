use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::json;

use rentdesk_core::config::LoadOptions;
use rentdesk_core::domain::category::CarCategory;
use rentdesk_core::domain::rate::{RateEntry, RateTable};
use rentdesk_db::ReservationDesk;

use crate::commands::{desk_failure, open_pool, CommandContext, CommandResult};

pub fn list(options: &LoadOptions) -> CommandResult {
    let context = match CommandContext::prepare("rates", options) {
        Ok(context) => context,
        Err(result) => return result,
    };

    context.finish("rates", async {
        let pool = open_pool(&context.config).await?;
        let desk = ReservationDesk::sqlite(pool.clone(), &context.config.booking);
        let outcome = desk.list_rates().await;
        pool.close().await;

        let rates = outcome.map_err(desk_failure)?;

        let data = rates
            .entries()
            .map(|entry| {
                json!({ "category": entry.category, "charge_per_day": entry.charge_per_day })
            })
            .collect::<Vec<_>>();
        Ok(CommandResult::success_with_data("rates", render_rates(&rates), Some(data.into())))
    })
}

pub fn set(options: &LoadOptions, category: &str, amount: &str) -> CommandResult {
    let entry = match parse_entry(category, amount) {
        Ok(entry) => entry,
        Err(message) => return CommandResult::failure("rate-set", "invalid_argument", message, 9),
    };

    let context = match CommandContext::prepare("rate-set", options) {
        Ok(context) => context,
        Err(result) => return result,
    };

    context.finish("rate-set", async {
        let pool = open_pool(&context.config).await?;
        let desk = ReservationDesk::sqlite(pool.clone(), &context.config.booking);
        let message = format!("{} now costs {}/day", entry.category, entry.charge_per_day);
        let outcome = desk.save_rate(entry).await;
        pool.close().await;

        outcome.map_err(desk_failure)?;
        Ok(CommandResult::success("rate-set", message))
    })
}

fn parse_entry(category: &str, amount: &str) -> Result<RateEntry, String> {
    let category = CarCategory::from_str(category).map_err(|error| error.to_string())?;
    let charge_per_day = Decimal::from_str(amount.trim())
        .map_err(|error| format!("invalid daily charge `{amount}`: {error}"))?;
    if charge_per_day.is_sign_negative() {
        return Err(format!("daily charge must not be negative, got {charge_per_day}"));
    }
    Ok(RateEntry { category, charge_per_day: charge_per_day.round_dp(2) })
}

fn render_rates(rates: &RateTable) -> String {
    if rates.is_empty() {
        return "no rates configured".to_string();
    }
    rates
        .entries()
        .map(|entry| format!("{}: {}/day", entry.category, entry.charge_per_day))
        .collect::<Vec<_>>()
        .join("\n")
}
