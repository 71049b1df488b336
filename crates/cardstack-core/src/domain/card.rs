//! Card entity.

use crate::Entity;
use serde::{Deserialize, Serialize};

/// A stored card.
///
/// Equality compares content only and ignores the identity, so a card read
/// back from the store equals the one that was created.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Store-generated identity; `None` until the card is created.
    pub id: Option<i64>,

    /// Display name.
    pub card_name: String,

    /// Card number.
    pub card_number: String,

    /// Raw image bytes, carried as standard base64 on the wire.
    #[serde(with = "base64_bytes")]
    pub card_image: Vec<u8>,

    /// MIME type of `card_image`.
    pub card_image_mime_type: String,

    /// Card type.
    pub card_type: String,

    /// Free-form description.
    #[serde(default)]
    pub card_description: Option<String>,
}

impl Card {
    /// Creates a new, not yet persisted card.
    #[must_use]
    pub fn new(
        card_name: impl Into<String>,
        card_number: impl Into<String>,
        card_image: Vec<u8>,
        card_image_mime_type: impl Into<String>,
        card_type: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            card_name: card_name.into(),
            card_number: card_number.into(),
            card_image,
            card_image_mime_type: card_image_mime_type.into(),
            card_type: card_type.into(),
            card_description: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.card_description = Some(description.into());
        self
    }

    /// Sets the identity.
    #[must_use]
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.card_name == other.card_name
            && self.card_number == other.card_number
            && self.card_image == other.card_image
            && self.card_image_mime_type == other.card_image_mime_type
            && self.card_type == other.card_type
            && self.card_description == other.card_description
    }
}

impl Eq for Card {}

impl Entity for Card {
    const ENTITY_NAME: &'static str = "Card";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = Option::<String>::deserialize(deserializer)?;
        match encoded {
            Some(s) => STANDARD.decode(s.as_bytes()).map_err(serde::de::Error::custom),
            None => Ok(Vec::new()),
        }
    }
}
