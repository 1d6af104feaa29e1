//! Catalog Discord commands - browsing, searching, comparing and uploading prices.
//!
//! Reads go straight to [`crate::core::catalog`]; writes publish a catalog change so
//! the autocomplete cache reloads.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, handlers::autocomplete, signed_in_user},
        core::{
            catalog::{self, ProductFilter},
            feed::ChangeEvent,
        },
        entities::product,
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    /// Discord allows at most 25 fields per embed.
    const MAX_FIELDS: usize = 25;

    fn product_embed(title: &str, products: &[product::Model]) -> serenity::CreateEmbed {
        let fields = products.iter().take(MAX_FIELDS).map(|p| {
            (
                format!("{} (${:.2})", p.name, p.price),
                format!("{} · {}", p.store, p.category),
                false,
            )
        });
        let mut embed = serenity::CreateEmbed::default()
            .title(title)
            .color(0x0058_65F2)
            .fields(fields);
        if products.len() > MAX_FIELDS {
            embed = embed.footer(serenity::CreateEmbedFooter::new(format!(
                "Showing {MAX_FIELDS} of {} products. Narrow it down with filters.",
                products.len()
            )));
        }
        embed
    }

    /// Lists the catalog, optionally filtered by category and price range.
    #[poise::command(slash_command, prefix_command)]
    pub async fn products(
        ctx: Context<'_>,
        #[description = "Only show this category"]
        #[autocomplete = "autocomplete::autocomplete_category"]
        category: Option<String>,
        #[description = "Minimum price"] min_price: Option<f64>,
        #[description = "Maximum price"] max_price: Option<f64>,
    ) -> Result<()> {
        if matches!((min_price, max_price), (Some(min), Some(max)) if min > max) {
            ctx.say("❌ The minimum price cannot be above the maximum price.")
                .await?;
            return Ok(());
        }

        let all = catalog::get_all_active_products(ctx.data().db()).await?;
        let filter = ProductFilter {
            category,
            min_price,
            max_price,
        };
        let matching = catalog::filter_products(&all, &filter);

        if matching.is_empty() {
            ctx.say("No products match. Use `/upload` to add some!")
                .await?;
            return Ok(());
        }

        ctx.send(poise::CreateReply::default().embed(product_embed("**Products**", &matching)))
            .await?;
        Ok(())
    }

    /// Searches the catalog by name, store, category or price.
    #[poise::command(slash_command, prefix_command)]
    pub async fn search(
        ctx: Context<'_>,
        #[description = "What to look for"] term: String,
    ) -> Result<()> {
        let found = catalog::search_products(ctx.data().db(), &term).await?;
        if found.is_empty() {
            ctx.say(format!("No products found for '{term}'.")).await?;
            return Ok(());
        }

        let title = format!("**Results for '{term}'**");
        ctx.send(poise::CreateReply::default().embed(product_embed(&title, &found)))
            .await?;
        Ok(())
    }

    /// Uploads a product price seen at a store.
    #[poise::command(slash_command, prefix_command)]
    pub async fn upload(
        ctx: Context<'_>,
        #[description = "Product name (e.g., 'Leche Entera 1L')"]
        #[autocomplete = "autocomplete::autocomplete_product_name"]
        name: String,
        #[description = "Price at this store"] price: f64,
        #[description = "Store where you saw the price"]
        #[autocomplete = "autocomplete::autocomplete_store"]
        store: String,
        #[description = "Product category"]
        #[autocomplete = "autocomplete::autocomplete_category"]
        category: String,
    ) -> Result<()> {
        if signed_in_user(ctx).await?.is_none() {
            return Ok(());
        }

        let db = ctx.data().db();
        if catalog::find_product(db, &name, &store).await?.is_some() {
            ctx.say(format!(
                "⚠️ '{name}' is already listed at {store}. Remove it first to change its price."
            ))
            .await?;
            return Ok(());
        }

        match catalog::create_product(db, &name, price, &store, &category).await {
            Ok(created) => {
                ctx.data().notify(ChangeEvent::CatalogChanged);
                ctx.say(format!(
                    "✅ Uploaded '{}' at {} for **${:.2}**.",
                    created.name, created.store, created.price
                ))
                .await?;
            }
            Err(Error::InvalidAmount { amount }) => {
                ctx.say(format!(
                    "❌ Invalid price {amount}: must be a number of zero or more."
                ))
                .await?;
            }
            Err(Error::InvalidInput { message }) => {
                ctx.say(format!("❌ {message}")).await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Compares every store's price for products matching a term, cheapest first.
    #[poise::command(slash_command, prefix_command)]
    pub async fn compare(
        ctx: Context<'_>,
        #[description = "Product to compare"]
        #[autocomplete = "autocomplete::autocomplete_product_name"]
        term: String,
    ) -> Result<()> {
        let comparison = catalog::compare_prices(ctx.data().db(), &term).await?;
        let Some(best) = comparison.best() else {
            ctx.say(format!("No products found for '{term}'.")).await?;
            return Ok(());
        };

        let mut embed = product_embed(&format!("**Price comparison: {term}**"), &comparison.products)
            .description(format!(
                "🏆 Best price: **${:.2}** at {}",
                best.price, best.store
            ));
        if comparison.products.len() > 1 {
            embed = embed.field(
                "Price difference",
                format!("${:.2}", comparison.price_difference),
                false,
            );
        }

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Shows the cheapest store for every product, optionally narrowed by a search term.
    #[poise::command(slash_command, prefix_command)]
    pub async fn best_prices(
        ctx: Context<'_>,
        #[description = "Only products matching this term"] term: Option<String>,
    ) -> Result<()> {
        let db = ctx.data().db();
        let products = match term.as_deref() {
            Some(t) if !t.trim().is_empty() => catalog::search_products(db, t).await?,
            _ => catalog::get_all_active_products(db).await?,
        };
        let best = catalog::best_prices(&products);

        if best.is_empty() {
            ctx.say("No products to compare yet.").await?;
            return Ok(());
        }

        ctx.send(poise::CreateReply::default().embed(product_embed("**Best prices**", &best)))
            .await?;
        Ok(())
    }

    /// Removes a product price from the catalog.
    #[poise::command(slash_command, prefix_command)]
    pub async fn remove_product(
        ctx: Context<'_>,
        #[description = "Product name"]
        #[autocomplete = "autocomplete::autocomplete_product_name"]
        name: String,
        #[description = "Store the price belongs to"]
        #[autocomplete = "autocomplete::autocomplete_store"]
        store: String,
    ) -> Result<()> {
        let db = ctx.data().db();
        let Some(product) = catalog::find_product(db, &name, &store).await? else {
            ctx.say(format!("❌ No product named '{name}' at {store}."))
                .await?;
            return Ok(());
        };

        catalog::delete_product(db, product.id).await?;
        ctx.data().notify(ChangeEvent::CatalogChanged);
        ctx.say(format!(
            "🗑️ Removed '{}' at {} from the catalog.",
            product.name, product.store
        ))
        .await?;
        Ok(())
    }
}

pub use inner::*;
