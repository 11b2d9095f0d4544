use pearlshop_core::config::LoadOptions;
use pearlshop_core::ProductId;
use pearlshop_web::{DocumentPage, PageEvent};

use crate::commands::{cart_event_result, open_session, CommandResult};

/// Sets a cart quantity, as editing the cart page input does. `0` removes the product.
pub fn run(options: LoadOptions, product_id: ProductId, value: &str) -> CommandResult {
    let mut session = match open_session("set", options) {
        Ok(session) => session,
        Err(result) => return result,
    };

    let mut page = DocumentPage::cart();
    session.storefront.boot(&mut page);

    let outcome = session
        .storefront
        .dispatch(&mut page, PageEvent::QuantityEdited { product_id, raw: value.to_string() });
    cart_event_result("set", outcome)
}
