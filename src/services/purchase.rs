use serde::Serialize;

use crate::models::Title;

use super::Profile;

/// Outcome of starting a purchase
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PurchaseIntent {
    pub title: Title,
    pub price: f64,
    /// The user already owns this title; nothing was charged or recorded
    pub already_owned: bool,
    /// Whether the title was added to the purchased list
    pub recorded: bool,
    /// Explanation shown to the user
    pub message: String,
}

/// Starts a (simulated) purchase of `title`.
///
/// No payment is processed. Anyone, signed in or not, gets the checkout
/// explanation. The title is appended to the signed-in user's purchased list
/// only when `record` is set and they do not own it yet.
pub async fn purchase(profile: &mut Profile, title: &Title, record: bool) -> PurchaseIntent {
    let Some(user_id) = profile.current_user().map(|user| user.id.clone()) else {
        tracing::debug!(title_id = %title.id, "Purchase started without a session");
        return checkout_intent(title, false);
    };

    if profile.library.is_purchased(&title.id) {
        return PurchaseIntent {
            title: title.clone(),
            price: title.price,
            already_owned: true,
            recorded: false,
            message: format!("You already own \"{}\".", title.title),
        };
    }

    tracing::info!(
        user_id = %user_id,
        title_id = %title.id,
        price = title.price,
        record,
        "Purchase started"
    );

    if record {
        profile.library.add_to_purchased(title.clone()).await;
    }

    checkout_intent(title, record)
}

fn checkout_intent(title: &Title, recorded: bool) -> PurchaseIntent {
    PurchaseIntent {
        title: title.clone(),
        price: title.price,
        already_owned: false,
        recorded,
        message: checkout_message(title),
    }
}

/// Describes the payment integration a real checkout would go through
pub fn checkout_message(title: &Title) -> String {
    format!(
        "Ready to purchase \"{}\" for ${:.2}?\n\n\
         To complete this purchase, a payment provider has to be integrated:\n\n\
         1. Set up an account with a payment provider such as Stripe\n\
         2. Get API keys from the provider dashboard\n\
         3. Implement a hosted checkout or payment form\n\
         4. Set up webhooks to handle successful payments\n\
         5. Update the user's purchased titles list\n\n\
         This is a demo - no actual payment will be processed.",
        title.title, title.price
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::MemoryStorage,
        services::{session, Catalog},
    };
    use std::{sync::Arc, time::Duration};

    fn signed_out() -> Profile {
        Profile::new(Arc::new(MemoryStorage::new()), "cinehub", Duration::ZERO)
    }

    async fn signed_in() -> Profile {
        let mut profile = signed_out();
        let user = session::authenticate("jane@example.com", "secret1", Duration::ZERO)
            .await
            .unwrap();
        profile.activate(user).await;
        profile
    }

    #[tokio::test]
    async fn test_purchase_without_session_explains_checkout() {
        let mut profile = signed_out();
        let catalog = Catalog::builtin().unwrap();
        let title = catalog.get("1").unwrap();

        for record in [false, true] {
            let intent = purchase(&mut profile, title, record).await;
            assert!(!intent.recorded);
            assert!(!intent.already_owned);
            assert_eq!(intent.message, checkout_message(title));
        }
        assert!(profile.library.purchased().is_empty());
    }

    #[tokio::test]
    async fn test_purchase_is_inert_by_default() {
        let mut profile = signed_in().await;
        let catalog = Catalog::builtin().unwrap();
        let title = catalog.get("1").unwrap();

        let intent = purchase(&mut profile, title, false).await;
        assert!(!intent.recorded);
        assert!(!intent.already_owned);
        assert_eq!(intent.price, 14.99);
        assert!(intent.message.contains("\"The Last Horizon\" for $14.99"));
        assert!(intent.message.contains("no actual payment"));
        assert!(!profile.library.is_purchased("1"));
    }

    #[tokio::test]
    async fn test_recorded_purchase_is_not_repeated() {
        let mut profile = signed_in().await;
        let catalog = Catalog::builtin().unwrap();
        let title = catalog.get("5").unwrap();

        let first = purchase(&mut profile, title, true).await;
        assert!(first.recorded);
        assert!(profile.library.is_purchased("5"));

        let second = purchase(&mut profile, title, true).await;
        assert!(second.already_owned);
        assert!(!second.recorded);
        assert_eq!(profile.library.purchased().len(), 1);
        assert!((profile.library.total_spent() - 19.99).abs() < 1e-9);
    }
}
