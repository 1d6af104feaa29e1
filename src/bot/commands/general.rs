//! General Discord commands - ping, help, and other utility commands.
//! This module contains simple commands that don't require database operations
//! and provide basic bot functionality and user assistance.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::Context,
        errors::Result,
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: Context<'_>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: Context<'_>) -> Result<()> {
        let help_text = "**PriceBuddy Help**\n\
        Compare supermarket prices, build a cart from the cheapest options and track what you save.\n\n\
        **Catalog**\n\
        • `/products [category] [min_price] [max_price]` - Browses the catalog.\n\
        • `/search <term>` - Searches by name, store, category or price.\n\
        • `/compare <term>` - Lists every store's price for a product, cheapest first.\n\
        • `/best_prices [term]` - Shows the cheapest store for each product.\n\
        • `/upload <name> <price> <store> <category>` - Adds a price to the catalog.\n\
        • `/remove_product <name> <store>` - Removes a price from the catalog.\n\n\
        **Cart**\n\
        • `/add_to_cart <name> [store]` - Adds a product (cheapest store if none given).\n\
        • `/cart` - Shows your cart with savings per line.\n\
        • `/remove_from_cart <id>` - Removes a cart line.\n\
        • `/checkout` - Records the purchase and empties the cart.\n\n\
        **Profile**\n\
        • `/profile [filter] [date]` - Shows your spending, savings and history.\n\
        • `/reset_history` - Deletes your purchase history.\n\
        • `/signup [email]` - Creates your account.\n\n\
        **Utility**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
