//! Embedded storefront templates and the filters they use.

use std::collections::HashMap;
use std::str::FromStr;

use pearlshop_core::pricing::format_money;
use rust_decimal::Decimal;
use tera::Tera;

pub const PRODUCT_LIST: &str = "product_list.html";
pub const CART_CONTENTS: &str = "cart_contents.html";
pub const SUBTOTAL: &str = "subtotal.html";
pub const SHOP_PAGE: &str = "shop_page.html";
pub const CART_PAGE: &str = "cart_page.html";

const EMBEDDED: [(&str, &str); 5] = [
    (PRODUCT_LIST, include_str!("../../../templates/storefront/product_list.html")),
    (CART_CONTENTS, include_str!("../../../templates/storefront/cart_contents.html")),
    (SUBTOTAL, include_str!("../../../templates/storefront/subtotal.html")),
    (SHOP_PAGE, include_str!("../../../templates/storefront/shop_page.html")),
    (CART_PAGE, include_str!("../../../templates/storefront/cart_page.html")),
];

/// Builds a Tera instance holding every storefront template. Names end in `.html`, so
/// product text is autoescaped.
pub fn load_templates() -> tera::Result<Tera> {
    let mut tera = Tera::default();
    register_template_filters(&mut tera);
    tera.add_raw_templates(EMBEDDED)?;
    Ok(tera)
}

/// - `money`: `amount | money(currency="SAR")` renders `SAR 485.00`
pub fn register_template_filters(tera: &mut Tera) {
    tera.register_filter("money", tera_money_filter);
}

fn tera_money_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let amount = match value {
        tera::Value::String(text) => Decimal::from_str(text)
            .map_err(|error| tera::Error::msg(format!("money filter got `{text}`: {error}")))?,
        tera::Value::Number(number) => match number.as_i64() {
            Some(whole) => Decimal::from(whole),
            None => number
                .as_f64()
                .and_then(|float| Decimal::try_from(float).ok())
                .ok_or_else(|| tera::Error::msg("money filter got a non-finite number"))?,
        },
        tera::Value::Null => Decimal::ZERO,
        other => return Err(tera::Error::msg(format!("money filter cannot format {other}"))),
    };

    let currency = args
        .get("currency")
        .and_then(tera::Value::as_str)
        .ok_or_else(|| tera::Error::msg("money filter requires a 'currency' argument"))?;

    Ok(tera::Value::String(format_money(currency, amount)))
}
