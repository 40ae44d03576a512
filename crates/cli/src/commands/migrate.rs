use rentdesk_core::config::LoadOptions;

use crate::commands::{open_pool, CommandContext, CommandResult};

pub fn run(options: &LoadOptions) -> CommandResult {
    let context = match CommandContext::prepare("migrate", options) {
        Ok(context) => context,
        Err(result) => return result,
    };

    context.finish("migrate", async {
        let pool = open_pool(&context.config).await?;
        pool.close().await;
        Ok(CommandResult::success(
            "migrate",
            format!("applied pending migrations to `{}`", context.config.database.url),
        ))
    })
}
