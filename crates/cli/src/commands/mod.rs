pub mod add;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod count;
pub mod remove;
pub mod set;

use pearlshop_core::config::LoadOptions;
use pearlshop_core::{CartUpdate, DomainError};
use pearlshop_web::EventOutcome;
use serde::Serialize;

use crate::bootstrap::{bootstrap, Session};

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    /// Raw output for commands that print a page or a plain value.
    pub fn text(output: impl Into<String>) -> Self {
        Self { exit_code: 0, output: output.into() }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

/// Boots a session or reports why it could not be booted.
fn open_session(command: &str, options: LoadOptions) -> Result<Session, CommandResult> {
    bootstrap(options).map_err(|error| {
        CommandResult::failure(command, error.error_class(), error.to_string(), error.exit_code())
    })
}

/// Maps the outcome of a cart event to a command result.
fn cart_event_result(command: &str, outcome: EventOutcome) -> CommandResult {
    match outcome {
        EventOutcome::CartChanged(update) => {
            CommandResult::success(command, describe_update(&update))
        }
        EventOutcome::Rejected(rejection) => {
            let error_class = match rejection {
                DomainError::QuantityNotPositive { .. }
                | DomainError::InvalidQuantity { .. }
                | DomainError::QuantityOutOfRange { .. } => "invalid_quantity",
                DomainError::UnknownProduct(_) | DomainError::InvalidProductId(_) => {
                    "unknown_product"
                }
                DomainError::UnknownSection(_) => "unknown_section",
            };
            CommandResult::failure(
                command,
                error_class,
                format!("{} ({rejection})", rejection.user_message()),
                1,
            )
        }
        other => CommandResult::failure(
            command,
            "unexpected_outcome",
            format!("cart event produced {other:?}"),
            5,
        ),
    }
}

fn describe_update(update: &CartUpdate) -> String {
    let line = match update.quantity {
        Some(quantity) => format!("product {} quantity is now {quantity}", update.product_id),
        None => format!("product {} is no longer in the cart", update.product_id),
    };
    let persisted = if update.persisted { "" } else { " (not persisted)" };
    format!("{line}; cart holds {} item(s){persisted}", update.item_count)
}
