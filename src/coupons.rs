//! Coupons
//!
//! Coupons are immutable discount rules looked up from a fixed registry by a normalized,
//! case-insensitive code. A failed lookup is an error for the caller to surface; it never
//! affects pricing.

use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;

/// Errors related to coupon lookup or registry construction.
#[derive(Debug, Error)]
pub enum CouponError {
    /// No coupon with the given code exists in the registry.
    #[error("unknown coupon code: {0}")]
    NotFound(String),

    /// A percent-off coupon was declared with a percentage above 100.
    #[error("invalid discount percentage: {0}")]
    InvalidPercent(u8),

    /// YAML parsing error.
    #[error(transparent)]
    Yaml(#[from] serde_norway::Error),
}

/// A named discount rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CouponKind {
    /// Take a percentage off the cart subtotal.
    PercentOff {
        /// Whole percentage points to deduct, 0 to 100.
        percent: u8,
    },

    /// Waive the shipping fee regardless of the free-shipping threshold.
    FreeShipping,
}

/// An immutable coupon, looked up from a registry by normalized code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Coupon {
    code: String,
    kind: CouponKind,
}

impl Coupon {
    /// Creates a new coupon, normalizing its code.
    ///
    /// # Errors
    ///
    /// Returns [`CouponError::InvalidPercent`] if a percent-off value exceeds 100.
    pub fn new(code: &str, kind: CouponKind) -> Result<Self, CouponError> {
        if let CouponKind::PercentOff { percent } = kind
            && percent > 100
        {
            return Err(CouponError::InvalidPercent(percent));
        }

        Ok(Self {
            code: normalize_code(code),
            kind,
        })
    }

    /// Returns the normalized code of the coupon.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the discount rule of the coupon.
    pub fn kind(&self) -> &CouponKind {
        &self.kind
    }

    /// Returns true if this coupon waives the shipping fee.
    pub fn is_free_shipping(&self) -> bool {
        matches!(self.kind, CouponKind::FreeShipping)
    }
}

/// Normalizes a coupon code for case-insensitive lookup.
fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// A fixed registry of coupons keyed by normalized code.
#[derive(Clone, Debug, Default)]
pub struct CouponRegistry {
    coupons: FxHashMap<String, Coupon>,
}

impl CouponRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard storefront registry: a 10%-off code and a free-delivery code.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::new();

        registry.insert(Coupon {
            code: "DISCOUNT10".to_string(),
            kind: CouponKind::PercentOff { percent: 10 },
        });

        registry.insert(Coupon {
            code: "FREEDELIVERY".to_string(),
            kind: CouponKind::FreeShipping,
        });

        registry
    }

    /// Load a registry from YAML.
    ///
    /// # Errors
    ///
    /// Returns a [`CouponError`] if the document cannot be parsed or declares an invalid
    /// percentage.
    pub fn from_yaml_str(contents: &str) -> Result<Self, CouponError> {
        let config: CouponsConfig = serde_norway::from_str(contents)?;
        let mut registry = Self::new();

        for (code, entry) in config.coupons {
            registry.insert(Coupon::new(&code, entry.into_kind())?);
        }

        Ok(registry)
    }

    /// Add a coupon to the registry, replacing any existing entry with the same code.
    pub fn insert(&mut self, coupon: Coupon) {
        self.coupons.insert(coupon.code.clone(), coupon);
    }

    /// Look up a coupon, normalizing the code first.
    ///
    /// # Errors
    ///
    /// Returns [`CouponError::NotFound`] for an unknown code. The caller decides the user
    /// messaging; pricing is left unaffected, as if no coupon were applied.
    pub fn lookup(&self, code: &str) -> Result<&Coupon, CouponError> {
        let normalized = normalize_code(code);

        self.coupons
            .get(&normalized)
            .ok_or(CouponError::NotFound(normalized))
    }

    /// Get the number of coupons in the registry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.coupons.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coupons.is_empty()
    }
}

/// Wrapper for coupons in YAML.
#[derive(Debug, Deserialize)]
struct CouponsConfig {
    /// Map of coupon code -> coupon entry.
    coupons: FxHashMap<String, CouponEntry>,
}

/// Coupon entry from YAML.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum CouponEntry {
    /// Percentage off the subtotal.
    PercentOff {
        /// Whole percentage points.
        percent: u8,
    },

    /// Waive the shipping fee.
    FreeShipping,
}

impl CouponEntry {
    fn into_kind(self) -> CouponKind {
        match self {
            CouponEntry::PercentOff { percent } => CouponKind::PercentOff { percent },
            CouponEntry::FreeShipping => CouponKind::FreeShipping,
        }
    }
}
