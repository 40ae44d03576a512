use rust_decimal::Decimal;

use rentdesk_core::admin::ReservationCard;
use rentdesk_core::config::LoadOptions;
use rentdesk_db::ReservationDesk;

use crate::commands::{desk_failure, open_pool, CommandContext, CommandResult};

/// Admin review listing. `json` attaches the cards, with their action bindings, as `data`.
pub fn run(options: &LoadOptions, json: bool) -> CommandResult {
    let context = match CommandContext::prepare("list", options) {
        Ok(context) => context,
        Err(result) => return result,
    };

    context.finish("list", async {
        let pool = open_pool(&context.config).await?;
        let desk = ReservationDesk::sqlite(pool.clone(), &context.config.booking);
        let outcome = desk.review_cards().await;
        pool.close().await;

        let cards = outcome.map_err(desk_failure)?;
        let data = if json {
            let value = serde_json::to_value(&cards)
                .map_err(|error| ("serialization", error.to_string(), 3u8))?;
            Some(value)
        } else {
            None
        };

        Ok(CommandResult::success_with_data("list", render_cards(&cards), data))
    })
}

fn render_cards(cards: &[ReservationCard]) -> String {
    if cards.is_empty() {
        return "no reservations".to_string();
    }

    cards.iter().map(render_card).collect::<Vec<_>>().join("\n\n")
}

fn render_card(card: &ReservationCard) -> String {
    let total = card.total_charge.map(format_charge).unwrap_or_else(|| "-".to_string());
    let actions = card
        .actions
        .iter()
        .map(|binding| {
            format!("{} {}", binding.action.label().to_lowercase(), binding.reservation_id)
        })
        .collect::<Vec<_>>()
        .join(" | ");

    format!("{}\nTotal Charge: {total}\nActions: {actions}", card.details)
}

fn format_charge(amount: Decimal) -> String {
    format!("${:.2}", amount)
}
