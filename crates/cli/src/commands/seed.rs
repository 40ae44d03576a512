use rentdesk_core::config::LoadOptions;
use rentdesk_db::{DefaultRateSeed, RateSeedInfo, VerificationResult};

use crate::commands::{open_pool, CommandContext, CommandResult};

pub fn run(options: &LoadOptions) -> CommandResult {
    let context = match CommandContext::prepare("seed", options) {
        Ok(context) => context,
        Err(result) => return result,
    };

    context.finish("seed", async {
        let pool = open_pool(&context.config).await?;

        let seeded = DefaultRateSeed::load(&pool)
            .await
            .map_err(|error| ("seed_execution", error.to_string(), 5u8))?;
        let verification = DefaultRateSeed::verify(&pool)
            .await
            .map_err(|error| ("seed_verification", error.to_string(), 6u8))?;
        pool.close().await;

        if !verification.all_present {
            return Err(("seed_verification", verification_failure_message(&verification), 6u8));
        }

        Ok(CommandResult::success("seed", render_seed_summary(&seeded.rates_seeded)))
    })
}

fn render_seed_summary(rates: &[RateSeedInfo]) -> String {
    let inserted = rates.iter().filter(|info| info.inserted).count();
    let lines: Vec<String> = rates
        .iter()
        .map(|info| {
            let state = if info.inserted { "seeded" } else { "kept existing" };
            format!("  - {}: {}/day ({state})", info.category, info.charge_per_day)
        })
        .collect();
    format!("default rate table applied ({inserted} new):\n{}", lines.join("\n"))
}

fn verification_failure_message(verification: &VerificationResult) -> String {
    let failed_checks = verification
        .checks
        .iter()
        .filter_map(|(check, passed)| (!passed).then_some(*check))
        .collect::<Vec<_>>();

    if failed_checks.is_empty() {
        "Some seed data failed to load".to_string()
    } else {
        format!("Seed verification failed for categories: {}", failed_checks.join(", "))
    }
}
