//! Cart storage
//!
//! The storefront keeps the cart alive between the cart and order pages. This module defines
//! the persistence seam plus two simple stores: an in-memory one and a JSON file on disk.
//! Collaborators that do real I/O own their retry and timeout policy.

use std::{fs, io, path::PathBuf};

use mockall::automock;
use rusty_money::{Money, iso};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{
    cart::{Cart, CartError},
    items::{LineItem, LineItemError},
};

/// Errors surfaced by cart stores and snapshot restoration.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing medium failed.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// JSON (de)serialization error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The snapshot names a currency this build does not know.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),

    /// The snapshot contains an invalid line.
    #[error(transparent)]
    Item(#[from] LineItemError),

    /// Rebuilding the cart failed.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// One line of a serialized cart.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct SnapshotItem {
    /// Line item id.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Unit price in minor units.
    pub unit_price: i64,

    /// Unit count.
    pub quantity: u32,
}

/// A serializable snapshot of a cart, suitable for handing between pages or sessions.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct CartSnapshot {
    /// ISO alpha code of the cart currency.
    pub currency: String,

    /// Cart lines in display order.
    pub items: Vec<SnapshotItem>,
}

impl CartSnapshot {
    /// Capture a snapshot of the given cart.
    #[must_use]
    pub fn capture(cart: &Cart<'_>) -> Self {
        Self {
            currency: cart.currency().iso_alpha_code.to_string(),
            items: cart
                .iter()
                .map(|item| SnapshotItem {
                    id: item.id().to_string(),
                    name: item.name().to_string(),
                    unit_price: item.unit_price().to_minor_units(),
                    quantity: item.quantity(),
                })
                .collect(),
        }
    }

    /// Rebuild a cart from this snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the currency code is unknown or a stored line is invalid.
    pub fn restore(&self) -> Result<Cart<'static>, StoreError> {
        let currency = iso::find(&self.currency)
            .ok_or_else(|| StoreError::UnknownCurrency(self.currency.clone()))?;

        let mut cart = Cart::new(currency);

        for item in &self.items {
            let line = LineItem::with_quantity(
                item.id.clone(),
                item.name.clone(),
                Money::from_minor(item.unit_price, currency),
                item.quantity,
            )?;

            cart.add_item(line)?;
        }

        Ok(cart)
    }
}

/// The persistence seam for carts.
#[automock]
pub trait CartStore {
    /// Load the stored snapshot, if one exists.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backing medium cannot be read or parsed.
    fn load(&self) -> Result<Option<CartSnapshot>, StoreError>;

    /// Persist a snapshot, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the snapshot cannot be written.
    fn save(&mut self, snapshot: &CartSnapshot) -> Result<(), StoreError>;

    /// Remove the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backing medium cannot be cleared.
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// An in-memory store mirroring browser local storage: values cross the boundary as JSON.
#[derive(Debug, Default)]
pub struct MemoryCartStore {
    stored: Option<String>,
}

impl MemoryCartStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CartStore for MemoryCartStore {
    fn load(&self) -> Result<Option<CartSnapshot>, StoreError> {
        self.stored
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(StoreError::from)
    }

    fn save(&mut self, snapshot: &CartSnapshot) -> Result<(), StoreError> {
        self.stored = Some(serde_json::to_string(snapshot)?);

        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.stored = None;

        Ok(())
    }
}

/// A JSON-file-backed store for cart durability across processes.
#[derive(Debug)]
pub struct JsonFileCartStore {
    path: PathBuf,
}

impl JsonFileCartStore {
    /// Create a store backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CartStore for JsonFileCartStore {
    fn load(&self) -> Result<Option<CartSnapshot>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&mut self, snapshot: &CartSnapshot) -> Result<(), StoreError> {
        let contents = serde_json::to_string_pretty(snapshot)?;

        fs::write(&self.path, contents)?;

        debug!(path = %self.path.display(), items = snapshot.items.len(), "saved cart snapshot");

        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
