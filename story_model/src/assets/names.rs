//! Serde helpers for optional asset names.
//!
//! Older books wrote "no asset" either as `null` or as an empty string. Both
//! load as `None`.

use serde::{Deserialize, Deserializer};

/// Deserialize an optional asset name, folding `""` into `None`.
pub fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let name = Option::<String>::deserialize(deserializer)?;
    Ok(name.filter(|n| !n.is_empty()))
}
