//! Shipping and billing addresses.

use serde::{Deserialize, Serialize};

use crate::error::RequestError;

/// Placeholder sent when an address has no state or province.
pub const MISSING_STATE: &str = "N/A";

/// Maximum length of the recipient name once the company is folded in.
pub const MAX_NAME_LENGTH: usize = 50;

/// A postal address as handed to a fulfillment provider.
///
/// `name`, `address1`, `city`, `country` and `zip` are required; everything
/// else is optional and blank values are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Recipient name.
    pub name: String,
    /// Company name, folded into the recipient name by some providers.
    pub company: Option<String>,
    /// First address line.
    pub address1: String,
    /// Second address line.
    pub address2: Option<String>,
    /// Third address line.
    pub address3: Option<String>,
    /// City or locality.
    pub city: String,
    /// State, province or county code.
    pub state: Option<String>,
    /// ISO country code (e.g., "US").
    pub country: String,
    /// Postal code.
    pub zip: String,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Contact email address.
    pub email: Option<String>,
}

impl Address {
    /// Create an address with the required fields set.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        address1: impl Into<String>,
        city: impl Into<String>,
        country: impl Into<String>,
        zip: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            address1: address1.into(),
            city: city.into(),
            country: country.into(),
            zip: zip.into(),
            ..Self::default()
        }
    }

    /// Set the company name.
    #[must_use]
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    /// Set the second address line.
    #[must_use]
    pub fn with_address2(mut self, address2: impl Into<String>) -> Self {
        self.address2 = Some(address2.into());
        self
    }

    /// Set the state or province.
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Set the contact phone number.
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Set the contact email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Check that every required field is present.
    ///
    /// # Errors
    ///
    /// Returns `RequestError::MissingField` naming the first blank required field.
    pub fn validate(&self) -> Result<(), RequestError> {
        let required = [
            ("name", &self.name),
            ("address1", &self.address1),
            ("city", &self.city),
            ("country", &self.country),
            ("zip", &self.zip),
        ];

        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(RequestError::MissingField(field));
            }
        }

        Ok(())
    }

    /// The state, or [`MISSING_STATE`] when none was given.
    #[must_use]
    pub fn state_or_placeholder(&self) -> &str {
        non_blank(self.state.as_deref()).unwrap_or(MISSING_STATE)
    }

    /// The postal code in upper case.
    #[must_use]
    pub fn normalized_zip(&self) -> String {
        self.zip.trim().to_uppercase()
    }

    /// Recipient name with the company prefixed, cut to [`MAX_NAME_LENGTH`] characters.
    #[must_use]
    pub fn recipient_name(&self) -> String {
        let full = match non_blank(self.company.as_deref()) {
            Some(company) => format!("{company} - {}", self.name),
            None => self.name.clone(),
        };

        full.chars().take(MAX_NAME_LENGTH).collect()
    }
}

/// Treat empty and whitespace-only strings as absent.
#[must_use]
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
