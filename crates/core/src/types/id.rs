//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. Stored documents use
//! plain strings for every identifier, so the wrappers are string-backed and
//! serialize transparently.

use rand::Rng;
use rand::distr::Alphanumeric;

/// Macro to define a type-safe, string-backed ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Into<String>` implementations
///
/// # Example
///
/// ```rust
/// # use storage_hub_core::define_id;
/// define_id!(PalletId);
/// define_id!(DockId);
///
/// let pallet = PalletId::new("p-1");
/// let dock = DockId::new("p-1");
///
/// // These are different types, so this won't compile:
/// // let _: PalletId = dock;
/// # let _ = (pallet, dock);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(JobId);
define_id!(BoxId);
define_id!(CustomerId);

impl JobId {
    /// Generate a fresh random job ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }
}

impl BoxId {
    /// Generate a fresh random box ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }
}

impl CustomerId {
    /// Prefix shared by every customer ID.
    pub const PREFIX: &'static str = "CUST-";

    /// Generate a fresh customer ID of the form `CUST-XXXXX`.
    #[must_use]
    pub fn generate() -> Self {
        let suffix: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(5)
            .map(|b| char::from(b).to_ascii_uppercase())
            .collect();
        Self(format!("{}{suffix}", Self::PREFIX))
    }
}

// Human-readable job number shown to operators (`JOB-123456`). Derived from
// the creation clock, so it is a display and search label, not a key.
define_id!(JobNumber);

impl JobNumber {
    /// Build a job number from the last six digits of a millisecond timestamp.
    #[must_use]
    pub fn from_millis(millis: i64) -> Self {
        Self(format!("JOB-{:06}", millis.rem_euclid(1_000_000)))
    }
}

/// Generate a display label for a new box (`BX-1000` to `BX-9999`).
#[must_use]
pub fn generate_box_number() -> String {
    format!("BX-{}", rand::rng().random_range(1000..=9999))
}
