use pearlshop_core::config::LoadOptions;
use pearlshop_web::DocumentPage;

use crate::commands::{open_session, CommandResult};

/// Renders the shop page for `section`, or the configured default section.
pub fn run(options: LoadOptions, section: Option<String>) -> CommandResult {
    let mut session = match open_session("catalog", options) {
        Ok(session) => session,
        Err(result) => return result,
    };

    let section = section
        .unwrap_or_else(|| session.config.storefront.default_section.as_str().to_string());
    let mut page = DocumentPage::shop(&section);
    session.storefront.boot(&mut page);

    match session.storefront.shop_document(&page) {
        Ok(html) => CommandResult::text(html),
        Err(error) => CommandResult::failure("catalog", "templates", error.to_string(), 4),
    }
}
