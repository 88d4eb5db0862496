pub mod options;
pub mod profile;
pub mod resume;

use serde::{Deserialize, Deserializer};

/// Reads an explicit JSON `null` as the type's default. Paired with
/// `#[serde(default)]` so absent and null fields land in the same place.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
