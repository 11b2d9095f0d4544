//! Element ids shared by the page markup and the storefront.

use pearlshop_core::ProductId;

pub const PRODUCTS_ROW: &str = "productsRow";
pub const CART_CONTENTS: &str = "cartContents";
pub const CART_SUBTOTAL: &str = "cartSubtotalPlaceholder";
pub const SECTION_SELECT: &str = "sectionSelect";
pub const VIEW_CART_BUTTON: &str = "viewCartBtn";
pub const PRINT_BUTTON: &str = "printBtn";
pub const CART_COUNT_BADGES: [&str; 2] = ["cartCount", "cartCountTop"];

pub const ADD_LABEL: &str = "Add";
pub const ADDED_LABEL: &str = "Added ✓";

pub fn quantity_select_id(product_id: ProductId) -> String {
    format!("qty-select-{product_id}")
}

pub fn add_button_id(product_id: ProductId) -> String {
    format!("add-btn-{product_id}")
}

pub fn cart_quantity_input_id(product_id: ProductId) -> String {
    format!("cart-qty-{product_id}")
}

pub fn remove_button_id(product_id: ProductId) -> String {
    format!("remove-btn-{product_id}")
}
