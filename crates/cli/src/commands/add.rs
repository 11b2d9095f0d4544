use pearlshop_core::config::LoadOptions;
use pearlshop_core::ProductId;
use pearlshop_web::{DocumentPage, PageEvent};

use crate::commands::{cart_event_result, open_session, CommandResult};

/// Adds `selected` units of a product, as the catalog "Add" button does.
pub fn run(options: LoadOptions, product_id: ProductId, selected: &str) -> CommandResult {
    let mut session = match open_session("add", options) {
        Ok(session) => session,
        Err(result) => return result,
    };

    let mut page = DocumentPage::shop(session.config.storefront.default_section.as_str());
    session.storefront.boot(&mut page);

    let outcome = session.storefront.dispatch(
        &mut page,
        PageEvent::AddToCart { product_id, selected: selected.to_string() },
    );
    cart_event_result("add", outcome)
}
