use pearlshop_core::config::LoadOptions;
use pearlshop_web::DocumentPage;

use crate::commands::{open_session, CommandResult};

pub fn run(options: LoadOptions) -> CommandResult {
    let mut session = match open_session("cart", options) {
        Ok(session) => session,
        Err(result) => return result,
    };

    let mut page = DocumentPage::cart();
    session.storefront.boot(&mut page);

    match session.storefront.cart_document(&page) {
        Ok(html) => CommandResult::text(html),
        Err(error) => CommandResult::failure("cart", "templates", error.to_string(), 4),
    }
}
