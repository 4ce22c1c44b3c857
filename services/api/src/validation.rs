//! Input validation
//!
//! Validators collect field-keyed messages into [`ValidationErrors`], which
//! serializes directly into the `errors` object of a 422 response. No
//! partial writes happen while any field is invalid.

use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::models::{LoginRequest, RegisterRequest};
use crate::storage::{UploadedFile, file_extension};

/// Extensions accepted for uploaded product images
pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 5] = ["jpeg", "jpg", "png", "gif", "svg"];

/// Maximum size of a single uploaded image (2048 kilobytes)
pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

/// Field-keyed validation error collection
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against a field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Whether any message has been recorded for the field
    pub fn has(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.len() > 255 {
        return Err("Email must be at most 255 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate a registration payload
pub fn validate_register(req: &RegisterRequest) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    match req.name.as_deref().map(str::trim) {
        None | Some("") => errors.add("name", "Name is required"),
        Some(name) if name.chars().count() > 255 => {
            errors.add("name", "Name must be at most 255 characters long");
        }
        Some(_) => {}
    }

    match req.email.as_deref().map(str::trim) {
        None | Some("") => errors.add("email", "Email is required"),
        Some(email) => {
            if let Err(message) = validate_email(email) {
                errors.add("email", message);
            }
        }
    }

    match req.password.as_deref() {
        None | Some("") => errors.add("password", "Password is required"),
        Some(password) => {
            if password.chars().count() < 8 {
                errors.add("password", "Password must be at least 8 characters long");
            }
            if req.password_confirmation.as_deref() != Some(password) {
                errors.add("password", "Password confirmation does not match");
            }
        }
    }

    errors
}

/// Validate a login payload. Only presence and shape are checked here;
/// credential mismatches are reported through a single generic 401.
pub fn validate_login(req: &LoginRequest) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    match req.email.as_deref().map(str::trim) {
        None | Some("") => errors.add("email", "Email is required"),
        Some(email) => {
            if let Err(message) = validate_email(email) {
                errors.add("email", message);
            }
        }
    }

    if req.password.as_deref().is_none_or(str::is_empty) {
        errors.add("password", "Password is required");
    }

    errors
}

/// Product form as assembled from a multipart request
#[derive(Debug, Default)]
pub struct ProductForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub cost: Option<String>,
    pub images: Vec<UploadedFile>,
}

/// Validated scalar product fields
#[derive(Debug, Clone)]
pub struct ProductFields {
    pub title: String,
    pub description: String,
    pub cost: f64,
}

/// Validate a product form. Images are mandatory on create and optional
/// on update; any files that are present are always checked.
pub fn validate_product_form(
    form: &ProductForm,
    images_required: bool,
) -> Result<ProductFields, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let title = match form.title.as_deref().map(str::trim) {
        None | Some("") => {
            errors.add("title", "Title is required");
            String::new()
        }
        Some(title) if title.chars().count() > 255 => {
            errors.add("title", "Title must be at most 255 characters long");
            String::new()
        }
        Some(title) => title.to_string(),
    };

    let description = match form.description.as_deref().map(str::trim) {
        None | Some("") => {
            errors.add("description", "Description is required");
            String::new()
        }
        Some(description) => description.to_string(),
    };

    let cost = match form.cost.as_deref().map(str::trim) {
        None | Some("") => {
            errors.add("cost", "Cost is required");
            0.0
        }
        Some(raw) => match raw.parse::<f64>() {
            Ok(cost) if cost.is_finite() => {
                if cost < 0.0 {
                    errors.add("cost", "Cost must be at least 0");
                }
                cost
            }
            _ => {
                errors.add("cost", "Cost must be a number");
                0.0
            }
        },
    };

    if images_required && form.images.is_empty() {
        errors.add("images", "Images are required");
    }

    for (index, file) in form.images.iter().enumerate() {
        let field = format!("images.{index}");

        let allowed = file_extension(&file.original_name)
            .map(|ext| ALLOWED_IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            .unwrap_or(false);
        if !allowed {
            errors.add(
                &field,
                "Image must be a file of type: jpeg, jpg, png, gif, svg",
            );
        }

        if file.bytes.len() > MAX_IMAGE_BYTES {
            errors.add(&field, "Image must not exceed 2048 kilobytes");
        }
    }

    if errors.is_empty() {
        Ok(ProductFields {
            title,
            description,
            cost,
        })
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            name: Some("Jane Doe".to_string()),
            email: Some("jane@example.com".to_string()),
            password: Some("correct horse".to_string()),
            password_confirmation: Some("correct horse".to_string()),
        }
    }

    fn form_with(images: Vec<UploadedFile>) -> ProductForm {
        ProductForm {
            title: Some("Widget".to_string()),
            description: Some("A useful widget".to_string()),
            cost: Some("9.99".to_string()),
            images,
        }
    }

    fn image(name: &str) -> UploadedFile {
        UploadedFile {
            original_name: name.to_string(),
            bytes: vec![0xFF, 0xD8, 0xFF],
        }
    }

    #[test]
    fn valid_registration_passes() {
        assert!(validate_register(&register_request()).is_empty());
    }

    #[test]
    fn registration_requires_all_fields() {
        let req = RegisterRequest {
            name: None,
            email: None,
            password: None,
            password_confirmation: None,
        };
        let errors = validate_register(&req);
        assert!(errors.has("name"));
        assert!(errors.has("email"));
        assert!(errors.has("password"));
    }

    #[test]
    fn registration_rejects_malformed_email() {
        let mut req = register_request();
        req.email = Some("not-an-email".to_string());
        assert!(validate_register(&req).has("email"));
    }

    #[test]
    fn registration_rejects_short_password() {
        let mut req = register_request();
        req.password = Some("short".to_string());
        req.password_confirmation = Some("short".to_string());
        assert!(validate_register(&req).has("password"));
    }

    #[test]
    fn registration_rejects_mismatched_confirmation() {
        let mut req = register_request();
        req.password_confirmation = Some("something else".to_string());
        assert!(validate_register(&req).has("password"));
    }

    #[test]
    fn registration_rejects_overlong_name() {
        let mut req = register_request();
        req.name = Some("x".repeat(256));
        assert!(validate_register(&req).has("name"));
    }

    #[test]
    fn login_requires_email_and_password() {
        let req = LoginRequest {
            email: None,
            password: None,
        };
        let errors = validate_login(&req);
        assert!(errors.has("email"));
        assert!(errors.has("password"));
    }

    #[test]
    fn product_form_accepts_valid_input() {
        let fields = validate_product_form(&form_with(vec![image("photo.jpg")]), true).unwrap();
        assert_eq!(fields.title, "Widget");
        assert_eq!(fields.cost, 9.99);
    }

    #[test]
    fn product_form_requires_images_on_create() {
        let errors = validate_product_form(&form_with(vec![]), true).unwrap_err();
        assert!(errors.has("images"));
    }

    #[test]
    fn product_form_allows_missing_images_on_update() {
        assert!(validate_product_form(&form_with(vec![]), false).is_ok());
    }

    #[test]
    fn product_form_rejects_negative_cost() {
        let mut form = form_with(vec![image("photo.png")]);
        form.cost = Some("-1".to_string());
        let errors = validate_product_form(&form, true).unwrap_err();
        assert!(errors.has("cost"));
    }

    #[test]
    fn product_form_rejects_non_numeric_cost() {
        let mut form = form_with(vec![image("photo.png")]);
        form.cost = Some("free".to_string());
        let errors = validate_product_form(&form, true).unwrap_err();
        assert!(errors.has("cost"));
    }

    #[test]
    fn product_form_rejects_disallowed_extension() {
        let errors = validate_product_form(&form_with(vec![image("malware.exe")]), true)
            .unwrap_err();
        assert!(errors.has("images.0"));
    }

    #[test]
    fn product_form_rejects_oversized_image() {
        let mut file = image("huge.jpg");
        file.bytes = vec![0u8; MAX_IMAGE_BYTES + 1];
        let errors = validate_product_form(&form_with(vec![file]), true).unwrap_err();
        assert!(errors.has("images.0"));
    }

    #[test]
    fn product_form_keys_errors_by_file_index() {
        let errors =
            validate_product_form(&form_with(vec![image("ok.jpg"), image("bad.pdf")]), true)
                .unwrap_err();
        assert!(!errors.has("images.0"));
        assert!(errors.has("images.1"));
    }
}
