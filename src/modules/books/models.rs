use std::borrow::Cow;

use bookstore_catalog::{BookPatch, NewBook};
use bookstore_http::error::AppError;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};
use validator::{Validate, ValidationError, ValidationErrors};

pub use bookstore_catalog::Book;

/// Request body for creating a book.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBook {
    #[validate(length(min = 2, max = 120, message = "2 to 120 characters"))]
    pub title: String,
    #[validate(length(min = 2, max = 120, message = "2 to 120 characters"))]
    pub author: String,
    #[validate(length(min = 1, message = "genre is required"))]
    pub genre: String,
    pub price: Decimal,
    #[validate(range(min = 0, max = 2147483647, message = "out of range"))]
    pub stock: i64,
}

impl CreateBook {
    /// Check the request shape and hand the values to the store.
    pub fn into_new_book(self) -> Result<NewBook, AppError> {
        let mut errors = rule_errors(&self);
        check_price(Some(self.price), &mut errors);
        let stock = stock_value(self.stock, &mut errors);
        reject_if_any(errors)?;

        Ok(NewBook::new(
            self.title,
            self.author,
            self.genre,
            self.price,
            stock,
        ))
    }
}

/// Request body for a partial update. Absent and `null` fields are left alone.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateBook {
    #[validate(length(min = 2, max = 120, message = "2 to 120 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 2, max = 120, message = "2 to 120 characters"))]
    pub author: Option<String>,
    pub genre: Option<String>,
    pub price: Option<Decimal>,
    #[validate(range(min = 0, max = 2147483647, message = "out of range"))]
    pub stock: Option<i64>,
}

impl UpdateBook {
    pub fn into_patch(self) -> Result<BookPatch, AppError> {
        let mut errors = rule_errors(&self);
        check_price(self.price, &mut errors);
        let stock = self.stock.map(|stock| stock_value(stock, &mut errors));
        reject_if_any(errors)?;

        Ok(BookPatch {
            title: self.title,
            author: self.author,
            genre: self.genre,
            price: self.price,
            stock,
        })
    }
}

fn rule_errors(request: &impl Validate) -> ValidationErrors {
    match request.validate() {
        Ok(()) => ValidationErrors::new(),
        Err(errors) => errors,
    }
}

fn check_price(price: Option<Decimal>, errors: &mut ValidationErrors) {
    if let Some(price) = price {
        if price.is_sign_negative() && !price.is_zero() {
            let mut error = ValidationError::new("range");
            error.message = Some(Cow::from("price must not be negative"));
            errors.add("price", error);
        }
    }
}

/// Narrow an already range-checked stock value.
fn stock_value(stock: i64, errors: &mut ValidationErrors) -> u32 {
    match u32::try_from(stock) {
        Ok(stock) => stock,
        Err(_) => {
            // The derive has already recorded this field.
            if !errors.field_errors().contains_key("stock") {
                errors.add("stock", ValidationError::new("range"));
            }
            0
        }
    }
}

fn reject_if_any(errors: ValidationErrors) -> Result<(), AppError> {
    if errors.errors().is_empty() {
        return Ok(());
    }
    Err(AppError::validation(
        validation_details(&errors),
        "request validation failed",
    ))
}

/// One `{field, error, message}` entry per failed rule, sorted by field.
fn validation_details(errors: &ValidationErrors) -> Vec<Value> {
    let mut details: Vec<Value> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |error| {
                json!({
                    "field": field.to_string(),
                    "error": error.code.to_string(),
                    "message": error.message.as_ref().map(|message| message.to_string()),
                })
            })
        })
        .collect();

    details.sort_by(|a, b| a["field"].as_str().cmp(&b["field"].as_str()));
    details
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(title: &str, price: Decimal, stock: i64) -> CreateBook {
        CreateBook {
            title: title.to_string(),
            author: "Frank Herbert".to_string(),
            genre: "fiction".to_string(),
            price,
            stock,
        }
    }

    fn detail_fields(error: AppError) -> Vec<String> {
        match error {
            AppError::Validation { details, .. } => details
                .iter()
                .map(|detail| detail["field"].as_str().unwrap().to_string())
                .collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn valid_create_request_becomes_new_book() {
        let request = create("Dune", Decimal::new(3990, 2), 5);
        let new_book = request.into_new_book().unwrap();
        assert_eq!(new_book.title, "Dune");
        assert_eq!(new_book.stock, 5);
    }

    #[test]
    fn create_request_reports_every_bad_field() {
        let err = create("D", Decimal::new(-1, 0), -3)
            .into_new_book()
            .unwrap_err();

        assert_eq!(detail_fields(err), ["price", "stock", "title"]);
    }

    #[test]
    fn create_request_deserializes_numeric_price() {
        let request: CreateBook = serde_json::from_value(json!({
            "title": "Dune",
            "author": "Frank Herbert",
            "genre": "fiction",
            "price": 39.9,
            "stock": 5
        }))
        .unwrap();

        assert_eq!(request.price, Decimal::new(399, 1));
    }

    #[test]
    fn update_request_keeps_absent_and_zero_apart() {
        let request: UpdateBook = serde_json::from_value(json!({
            "title": null,
            "price": 0,
            "stock": 0
        }))
        .unwrap();

        let patch = request.into_patch().unwrap();
        assert_eq!(patch.title, None);
        assert_eq!(patch.author, None);
        assert_eq!(patch.price, Some(Decimal::ZERO));
        assert_eq!(patch.stock, Some(0));
    }

    #[test]
    fn update_request_validates_only_present_fields() {
        assert!(UpdateBook::default().into_patch().is_ok());

        let request = UpdateBook {
            author: Some("X".to_string()),
            stock: Some(-1),
            ..UpdateBook::default()
        };
        let err = request.into_patch().unwrap_err();

        assert_eq!(detail_fields(err), ["author", "stock"]);
    }
}
