use pearlshop_core::config::LoadOptions;
use pearlshop_web::DocumentPage;

use crate::commands::{open_session, CommandResult};

/// Prints the number shown in the cart count badges.
pub fn run(options: LoadOptions) -> CommandResult {
    let mut session = match open_session("count", options) {
        Ok(session) => session,
        Err(result) => return result,
    };

    session.storefront.boot(&mut DocumentPage::new());
    CommandResult::text(session.storefront.cart().count().to_string())
}
