//! Addresses

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::TypedUuid;

/// Address id
pub type AddressId = TypedUuid<Address>;

/// Errors raised while editing an address book.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    /// A required field was left blank.
    #[error("missing required address field: {0}")]
    MissingField(&'static str),

    /// No address with the given id.
    #[error("address not found: {0}")]
    NotFound(AddressId),
}

/// A saved shipping address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Address id
    pub id: AddressId,

    /// Recipient name
    pub name: String,

    /// First address line
    pub line1: String,

    /// Optional second address line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,

    /// City
    pub city: String,

    /// State or region
    pub state: String,

    /// Postal code
    pub zip: String,

    /// Country
    pub country: String,

    /// Whether this is the preferred shipping address
    #[serde(default)]
    pub is_default: bool,
}

impl Address {
    /// Single-line rendering used in address pickers.
    pub fn summary(&self) -> String {
        let mut parts = vec![self.line1.as_str()];

        if let Some(line2) = self.line2.as_deref().filter(|line| !line.trim().is_empty()) {
            parts.push(line2);
        }

        parts.extend([
            self.city.as_str(),
            self.state.as_str(),
            self.zip.as_str(),
            self.country.as_str(),
        ]);

        parts.join(", ")
    }
}

/// Address form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAddress {
    /// Recipient name
    pub name: String,

    /// First address line
    pub line1: String,

    /// Optional second address line
    pub line2: Option<String>,

    /// City
    pub city: String,

    /// State or region
    pub state: String,

    /// Postal code
    pub zip: String,

    /// Country
    pub country: String,

    /// Make this the default address
    pub is_default: bool,
}

impl NewAddress {
    /// Check every required field is filled in.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::MissingField`] naming the first blank field.
    pub fn validate(&self) -> Result<(), AddressError> {
        [
            ("name", &self.name),
            ("line1", &self.line1),
            ("city", &self.city),
            ("state", &self.state),
            ("zip", &self.zip),
            ("country", &self.country),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map_or(Ok(()), |(field, _)| Err(AddressError::MissingField(field)))
    }

    fn into_address(self, id: AddressId, is_default: bool) -> Address {
        Address {
            id,
            name: self.name,
            line1: self.line1,
            line2: self.line2.filter(|line| !line.trim().is_empty()),
            city: self.city,
            state: self.state,
            zip: self.zip,
            country: self.country,
            is_default,
        }
    }
}

/// A user's saved addresses. At most one address is the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressBook {
    addresses: Vec<Address>,
}

impl AddressBook {
    /// Wrap addresses loaded from a profile.
    pub fn new(addresses: Vec<Address>) -> Self {
        Self { addresses }
    }

    /// Save a new address and return its id.
    ///
    /// The first saved address, or one flagged as default, becomes the only default.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::MissingField`] when a required field is blank.
    pub fn add(&mut self, address: NewAddress) -> Result<AddressId, AddressError> {
        address.validate()?;

        let id = AddressId::new();
        let is_default = address.is_default || self.addresses.is_empty();

        self.addresses.push(address.into_address(id, false));

        if is_default {
            self.make_sole_default(id);
        }

        Ok(id)
    }

    /// Replace the contents of an existing address, keeping its id.
    ///
    /// # Errors
    ///
    /// Returns an error when a required field is blank or the id is unknown.
    pub fn update(&mut self, id: AddressId, address: NewAddress) -> Result<(), AddressError> {
        address.validate()?;

        let slot = self
            .addresses
            .iter_mut()
            .find(|existing| existing.id == id)
            .ok_or(AddressError::NotFound(id))?;

        let make_default = address.is_default;
        let was_default = slot.is_default;

        *slot = address.into_address(id, was_default);

        if make_default {
            self.make_sole_default(id);
        }

        Ok(())
    }

    /// Delete an address. The default is not reassigned.
    pub fn remove(&mut self, id: AddressId) -> Option<Address> {
        let idx = self.addresses.iter().position(|address| address.id == id)?;

        Some(self.addresses.remove(idx))
    }

    /// Make `id` the only default address.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::NotFound`] when the id is unknown.
    pub fn set_default(&mut self, id: AddressId) -> Result<(), AddressError> {
        if self.get(id).is_none() {
            return Err(AddressError::NotFound(id));
        }

        self.make_sole_default(id);

        Ok(())
    }

    /// Look up an address.
    pub fn get(&self, id: AddressId) -> Option<&Address> {
        self.addresses.iter().find(|address| address.id == id)
    }

    /// The default address, falling back to the first saved one.
    pub fn preferred(&self) -> Option<&Address> {
        self.addresses
            .iter()
            .find(|address| address.is_default)
            .or_else(|| self.addresses.first())
    }

    /// Addresses in the order they were saved.
    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    /// Unwrap into the stored list.
    pub fn into_vec(self) -> Vec<Address> {
        self.addresses
    }

    /// Number of saved addresses.
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    /// Whether no address is saved.
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    fn make_sole_default(&mut self, id: AddressId) {
        for address in &mut self.addresses {
            address.is_default = address.id == id;
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn form(name: &str) -> NewAddress {
        NewAddress {
            name: name.to_string(),
            line1: "12 MG Road".to_string(),
            line2: None,
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            zip: "560001".to_string(),
            country: "India".to_string(),
            is_default: false,
        }
    }

    fn defaults(book: &AddressBook) -> Vec<&str> {
        book.addresses()
            .iter()
            .filter(|address| address.is_default)
            .map(|address| address.name.as_str())
            .collect()
    }

    #[test]
    fn first_address_becomes_default() -> TestResult {
        let mut book = AddressBook::default();

        book.add(form("Home"))?;
        book.add(form("Work"))?;

        assert_eq!(defaults(&book), ["Home"]);

        Ok(())
    }

    #[test]
    fn flagged_address_takes_over_default() -> TestResult {
        let mut book = AddressBook::default();

        book.add(form("Home"))?;
        let work = book.add(NewAddress {
            is_default: true,
            ..form("Work")
        })?;

        assert_eq!(defaults(&book), ["Work"]);
        assert_eq!(book.preferred().map(|address| address.id), Some(work));

        Ok(())
    }

    #[test]
    fn blank_required_fields_are_rejected() {
        let mut book = AddressBook::default();

        let result = book.add(NewAddress {
            city: "  ".to_string(),
            ..form("Home")
        });

        assert_eq!(result, Err(AddressError::MissingField("city")));
        assert!(book.is_empty());
    }

    #[test]
    fn set_default_leaves_exactly_one_default() -> TestResult {
        let mut book = AddressBook::default();

        book.add(form("Home"))?;
        let work = book.add(form("Work"))?;
        book.add(form("Parents"))?;

        book.set_default(work)?;

        assert_eq!(defaults(&book), ["Work"]);

        let missing = AddressId::new();

        assert_eq!(book.set_default(missing), Err(AddressError::NotFound(missing)));
        assert_eq!(defaults(&book), ["Work"]);

        Ok(())
    }

    #[test]
    fn removing_default_falls_back_to_first_address() -> TestResult {
        let mut book = AddressBook::default();

        let home = book.add(form("Home"))?;
        book.add(form("Work"))?;

        book.remove(home);

        assert!(defaults(&book).is_empty());
        assert_eq!(book.preferred().map(|address| address.name.as_str()), Some("Work"));

        Ok(())
    }

    #[test]
    fn update_keeps_id_and_default_flag() -> TestResult {
        let mut book = AddressBook::default();

        let home = book.add(form("Home"))?;

        book.update(home, NewAddress {
            line2: Some("Flat 4".to_string()),
            ..form("Home (new)")
        })?;

        let updated = book.get(home);

        assert_eq!(updated.map(|address| address.name.as_str()), Some("Home (new)"));
        assert_eq!(updated.map(|address| address.is_default), Some(true));
        assert_eq!(
            updated.map(Address::summary).as_deref(),
            Some("12 MG Road, Flat 4, Bengaluru, Karnataka, 560001, India")
        );

        Ok(())
    }
}
