//! Checkout session creation
//!
//! The only write the storefront performs. The payload is forwarded to the
//! backend and its answer handed back untouched for the payment redirect.

use crate::error::Result;
use crate::http::Transport;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error};

/// Path of the checkout endpoint, relative to the api base path
pub const CHECKOUT_PATH: &str = "create-checkout-session";

/// One cart line sent to checkout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutItem {
    #[serde(rename = "productId")]
    pub product_id: i64,
    pub quantity: u32,
    pub unit_price: f64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub currency: String,
}

/// POST the cart and return the server's session payload.
///
/// Never retried. A failure is logged here once and returned as-is.
pub async fn create_checkout_session(
    transport: &dyn Transport,
    base_path: &str,
    items: &[CheckoutItem],
) -> Result<Value> {
    let path = format!("{base_path}{CHECKOUT_PATH}");
    debug!(lines = items.len(), "POST {path}");

    match transport.post(&path, json!({ "products": items })).await {
        Ok(body) => Ok(body.unwrap_or_default()),
        Err(e) => {
            error!(error = %e, "Error creating checkout session");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::test_support::{MockTransport, Reply};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    struct CountErrors(Arc<AtomicUsize>);

    impl<S: Subscriber> Layer<S> for CountErrors {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == Level::ERROR {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn item() -> CheckoutItem {
        CheckoutItem {
            product_id: 1,
            quantity: 2,
            unit_price: 9.99,
            name: "X".to_string(),
            image: None,
            currency: "usd".to_string(),
        }
    }

    #[test]
    fn test_item_wire_shape() {
        let value = serde_json::to_value(item()).unwrap();
        assert_eq!(
            value,
            json!({
                "productId": 1,
                "quantity": 2,
                "unit_price": 9.99,
                "name": "X",
                "currency": "usd"
            })
        );

        let with_image = CheckoutItem {
            image: Some("https://cdn/x.png".into()),
            ..item()
        };
        assert_eq!(
            serde_json::to_value(with_image).unwrap()["image"],
            "https://cdn/x.png"
        );
    }

    #[tokio::test]
    async fn test_posts_items_under_products() {
        let mock = MockTransport::new().body(
            "user/create-checkout-session",
            json!({"id": "cs_1", "url": "https://pay"}),
        );

        let session = create_checkout_session(&mock, "user/", &[item()])
            .await
            .unwrap();

        assert_eq!(session["id"], "cs_1");
        assert_eq!(mock.paths(), vec!["user/create-checkout-session"]);
        assert_eq!(
            mock.posted(),
            vec![json!({"products": [serde_json::to_value(item()).unwrap()]})]
        );
    }

    #[tokio::test]
    async fn test_empty_session_body_is_null() {
        let mock = MockTransport::new().reply("user/create-checkout-session", Reply::Empty);
        let session = create_checkout_session(&mock, "user/", &[item()])
            .await
            .unwrap();
        assert!(session.is_null());
    }

    #[tokio::test]
    async fn test_failure_is_logged_once_and_returned() {
        let count = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(CountErrors(Arc::clone(&count)));
        let _guard = tracing::subscriber::set_default(subscriber);

        let mock = MockTransport::new().reply("user/create-checkout-session", Reply::Status(502));
        let err = create_checkout_session(&mock, "user/", &[item()])
            .await
            .unwrap_err();

        assert!(matches!(err, Error::HttpStatus { status: 502, .. }));
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(mock.call_count(), 1);
    }
}
