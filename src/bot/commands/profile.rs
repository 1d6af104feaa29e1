//! Profile Discord commands - `profile` and `reset_history`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, signed_in_user},
        core::{
            feed::ChangeEvent,
            profile::{self, HistoryFilter, Period},
            purchase,
        },
        errors::Result,
    };
    use chrono::{Local, NaiveDate};
    use poise::serenity_prelude as serenity;

    /// How many past purchases the profile lists.
    const HISTORY_LIMIT: usize = 10;

    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum HistoryChoice {
        #[name = "Today"]
        Day,
        #[name = "Last 7 days"]
        Week,
        #[name = "This month"]
        Month,
        #[name = "All"]
        All,
    }

    impl From<HistoryChoice> for HistoryFilter {
        fn from(choice: HistoryChoice) -> Self {
            match choice {
                HistoryChoice::Day => Self::Day,
                HistoryChoice::Week => Self::Week,
                HistoryChoice::Month => Self::Month,
                HistoryChoice::All => Self::All,
            }
        }
    }

    /// Shows your lifetime stats, spending this day/week/month and purchase history.
    #[poise::command(slash_command, prefix_command)]
    pub async fn profile(
        ctx: Context<'_>,
        #[description = "Which purchases to list (defaults to all)"] filter: Option<HistoryChoice>,
        #[description = "Date for the spending windows, YYYY-MM-DD (defaults to today)"]
        date: Option<String>,
    ) -> Result<()> {
        let Some(user) = signed_in_user(ctx).await? else {
            return Ok(());
        };

        let now = Local::now();
        let reference = match date.as_deref().map(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d")) {
            None => now.date_naive(),
            Some(Ok(parsed)) => parsed,
            Some(Err(_)) => {
                ctx.say("❌ Invalid date: use the YYYY-MM-DD format.")
                    .await?;
                return Ok(());
            }
        };
        let filter = filter.map_or(HistoryFilter::All, HistoryFilter::from);

        let view =
            profile::build_profile(ctx.data().db(), user.id, reference, filter, &now).await?;

        let history = if view.history.is_empty() {
            "No purchases in this range.".to_string()
        } else {
            view.history
                .iter()
                .take(HISTORY_LIMIT)
                .map(|record| {
                    format!(
                        "`{}` {} items · ${:.2} (saved ${:.2})",
                        record.purchase.date.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
                        record.item_count(),
                        record.purchase.total_spent,
                        record.purchase.total_savings
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        };

        let week = Period::Week.bounds(view.spending.reference).map_or_else(
            || "Week".to_string(),
            |(start, end)| format!("Week {} to {}", start.format("%m-%d"), end.format("%m-%d")),
        );

        let embed = serenity::CreateEmbed::default()
            .title(format!("**{}'s profile**", ctx.author().name))
            .color(0x0058_65F2)
            .field("Total spent", format!("${:.2}", view.user.total_spent), true)
            .field("Purchases", view.user.total_purchases.to_string(), true)
            .field("Total saved", format!("${:.2}", view.lifetime_savings), true)
            .field(
                "Favorite category",
                view.user.favorite_category.as_deref().unwrap_or("-"),
                true,
            )
            .field(
                format!("Spending around {}", view.spending.reference),
                format!(
                    "Day ${:.2} · {week} ${:.2} · Month ${:.2}",
                    view.spending.daily, view.spending.weekly, view.spending.monthly
                ),
                false,
            )
            .field("History", history, false);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Deletes your purchase history. Lifetime totals are kept.
    #[poise::command(slash_command, prefix_command)]
    pub async fn reset_history(ctx: Context<'_>) -> Result<()> {
        let Some(user) = signed_in_user(ctx).await? else {
            return Ok(());
        };

        let removed = purchase::reset_purchase_history(ctx.data().db(), user.id).await?;
        ctx.data()
            .notify(ChangeEvent::PurchasesChanged { user_id: user.id });
        ctx.say(format!("🧹 Deleted {removed} purchases from your history."))
            .await?;
        Ok(())
    }
}

pub use inner::*;
