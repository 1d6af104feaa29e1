//! Cart Discord commands - `add_to_cart`, `cart`, `remove_from_cart` and `checkout`.
//!
//! Every command here needs a signed-up user; anonymous users get a `/signup` hint.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, handlers::autocomplete, signed_in_user},
        core::{cart, catalog, feed::ChangeEvent, purchase},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    /// Adds one unit of a product to your cart. Without a store the cheapest one is used.
    #[poise::command(slash_command, prefix_command)]
    pub async fn add_to_cart(
        ctx: Context<'_>,
        #[description = "Product name"]
        #[autocomplete = "autocomplete::autocomplete_product_name"]
        name: String,
        #[description = "Store to buy at (defaults to the cheapest)"]
        #[autocomplete = "autocomplete::autocomplete_store"]
        store: Option<String>,
    ) -> Result<()> {
        let Some(user) = signed_in_user(ctx).await? else {
            return Ok(());
        };
        let db = ctx.data().db();

        let added = match store {
            Some(store) => match catalog::find_product(db, &name, &store).await? {
                Some(product) => cart::add_to_cart(db, user.id, product.id).await,
                None => Err(Error::ProductNotFound {
                    name: format!("{name} at {store}"),
                }),
            },
            None => cart::add_best_price_to_cart(db, user.id, &name)
                .await
                .map(|(_, line)| line),
        };

        match added {
            Ok(line) => {
                ctx.data().notify(ChangeEvent::CartChanged { user_id: user.id });
                let mut message = format!(
                    "🛒 Added '{}' from {} for **${:.2}** (x{} in cart).",
                    line.name, line.store, line.price, line.quantity
                );
                if line.savings > 0.0 {
                    message.push_str(&format!(
                        "\n💰 You save **${:.2}** per unit against the priciest store.",
                        line.savings
                    ));
                }
                ctx.say(message).await?;
            }
            Err(Error::ProductNotFound { name }) => {
                ctx.say(format!("❌ Could not find '{name}' in the catalog."))
                    .await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Shows your cart, with the savings of each line against the priciest store.
    #[poise::command(slash_command, prefix_command)]
    pub async fn cart(ctx: Context<'_>) -> Result<()> {
        let Some(user) = signed_in_user(ctx).await? else {
            return Ok(());
        };

        let summary = cart::summarize_cart(ctx.data().db(), user.id).await?;
        if summary.is_empty() {
            ctx.say("Your cart is empty. Add something with `/add_to_cart`.")
                .await?;
            return Ok(());
        }

        let fields = summary.lines.iter().take(25).map(|line| {
            (
                format!(
                    "#{} {} x{} ({})",
                    line.item.id, line.item.name, line.item.quantity, line.item.store
                ),
                format!(
                    "${:.2} each · subtotal ${:.2} · saves ${:.2} (best ${:.2}, worst ${:.2})",
                    line.item.price,
                    line.subtotal,
                    line.total_savings,
                    line.lowest_price,
                    line.highest_price
                ),
                false,
            )
        });

        let embed = serenity::CreateEmbed::default()
            .title("**Your cart**")
            .color(0x0058_65F2)
            .fields(fields)
            .footer(serenity::CreateEmbedFooter::new(format!(
                "{} items · total ${:.2} · saving ${:.2}",
                summary.item_count, summary.total_spent, summary.total_savings
            )));

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Removes a line from your cart by its number (shown in `/cart`).
    #[poise::command(slash_command, prefix_command)]
    pub async fn remove_from_cart(
        ctx: Context<'_>,
        #[description = "Cart line number"] id: i64,
    ) -> Result<()> {
        let Some(user) = signed_in_user(ctx).await? else {
            return Ok(());
        };

        match cart::remove_from_cart(ctx.data().db(), user.id, id).await {
            Ok(line) => {
                ctx.data().notify(ChangeEvent::CartChanged { user_id: user.id });
                ctx.say(format!("🗑️ Removed '{}' from your cart.", line.name))
                    .await?;
            }
            Err(Error::CartItemNotFound { id }) => {
                ctx.say(format!("❌ There is no line #{id} in your cart."))
                    .await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Records your cart as a purchase and empties it.
    #[poise::command(slash_command, prefix_command)]
    pub async fn checkout(ctx: Context<'_>) -> Result<()> {
        let Some(user) = signed_in_user(ctx).await? else {
            return Ok(());
        };

        match purchase::close_purchase(ctx.data().db(), user.id).await {
            Ok(record) => {
                ctx.data().notify(ChangeEvent::CartChanged { user_id: user.id });
                ctx.data()
                    .notify(ChangeEvent::PurchasesChanged { user_id: user.id });
                ctx.say(format!(
                    "✅ Purchase recorded: {} items for **${:.2}**, saving **${:.2}**.",
                    record.item_count(),
                    record.purchase.total_spent,
                    record.purchase.total_savings
                ))
                .await?;
            }
            Err(Error::EmptyCart) => {
                ctx.say("❌ Your cart is empty, there is nothing to check out.")
                    .await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }
}

pub use inner::*;
