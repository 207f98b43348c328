use std::fmt::{Display, Formatter};

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Topping id reserved for "no topping". Never linked to a pizza.
pub const NO_TOPPING_ID: i32 = 1;

/// How many topping selects the order form offers.
pub const MAX_TOPPINGS: usize = 4;

#[derive(Debug, Error)]
#[error("{0}")]
pub struct PoolInitializationError(pub String);

/// Reference to a crust or sauce row, either by its stable id or by its display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogRef {
    Id(i32),
    Name(String),
}

impl Display for CatalogRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogRef::Id(id) => write!(f, "id {id}"),
            CatalogRef::Name(name) => write!(f, "name '{name}'"),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Crust with {0} not found")]
    UnknownCrust(CatalogRef),

    #[error("Sauce with {0} not found")]
    UnknownSauce(CatalogRef),

    #[error("Failed to establish connection: {0}")]
    Connection(String),

    #[error(transparent)]
    Database(#[from] diesel::result::Error),
}

/// Everything a request handler can fail with.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid value for field '{field}': {reason}")]
    InvalidForm { field: String, reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Database actor unavailable: {0}")]
    Mailbox(#[from] actix::MailboxError),

    #[error("Unable to render page: {0}")]
    Template(#[from] tera::Error),
}

impl AppError {
    pub fn invalid_form(field: impl Into<String>, reason: impl Display) -> Self {
        AppError::InvalidForm {
            field: field.into(),
            reason: reason.to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidForm { .. } => StatusCode::BAD_REQUEST,
            AppError::Store(StoreError::UnknownCrust(_) | StoreError::UnknownSauce(_)) => {
                StatusCode::NOT_FOUND
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .body(self.to_string())
    }
}
