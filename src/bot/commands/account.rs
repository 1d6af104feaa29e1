//! Account Discord commands - `signup`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::Context,
        core::account,
        errors::{Error, Result},
    };

    /// Creates your PriceBuddy account so you can keep a cart and a purchase history.
    #[poise::command(slash_command, prefix_command)]
    pub async fn signup(
        ctx: Context<'_>,
        #[description = "Optional email address for your account"] email: Option<String>,
    ) -> Result<()> {
        let discord_id = ctx.author().id.to_string();
        match account::sign_up(ctx.data().db(), &discord_id, email).await {
            Ok(_) => {
                ctx.say("✅ Account created! Start with `/products` or `/add_to_cart`.")
                    .await?;
            }
            Err(Error::AlreadyRegistered) => {
                ctx.say("ℹ️ You already have an account. Try `/profile`.")
                    .await?;
            }
            Err(Error::InvalidInput { message }) => {
                ctx.say(format!("❌ {message}")).await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }
}

pub use inner::*;
