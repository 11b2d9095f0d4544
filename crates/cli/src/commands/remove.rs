use pearlshop_core::config::LoadOptions;
use pearlshop_core::ProductId;
use pearlshop_web::{DocumentPage, PageEvent};

use crate::commands::{cart_event_result, open_session, CommandResult};

pub fn run(options: LoadOptions, product_id: ProductId) -> CommandResult {
    let mut session = match open_session("remove", options) {
        Ok(session) => session,
        Err(result) => return result,
    };

    let mut page = DocumentPage::cart();
    session.storefront.boot(&mut page);

    let outcome =
        session.storefront.dispatch(&mut page, PageEvent::RemoveFromCart { product_id });
    cart_event_result("remove", outcome)
}
