//! Card row mapper.

use super::RowMapper;
use crate::sql::{BindParameters, Row};
use cardstack_core::{Card, CardstackResult};

const ID: &str = "id";
const CARD_NAME: &str = "card_name";
const CARD_NUMBER: &str = "card_number";
const CARD_IMAGE: &str = "card_image";
const CARD_IMAGE_MIME_TYPE: &str = "card_image_mime_type";
const CARD_TYPE: &str = "card_type";
const CARD_DESCRIPTION: &str = "card_description";

/// Maps [`Card`] to the `card` table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CardRowMapper {
    require_id: bool,
}

impl CardRowMapper {
    /// Mapper for full rows; a missing or null `id` is a mapping error.
    #[must_use]
    pub const fn new() -> Self {
        Self { require_id: true }
    }

    /// Mapper for projections that may omit `id`.
    #[must_use]
    pub const fn for_projection() -> Self {
        Self { require_id: false }
    }
}

impl Default for CardRowMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl RowMapper<Card> for CardRowMapper {
    fn to_parameters(&self, card: &Card) -> BindParameters {
        BindParameters::new()
            .with(ID, card.id)
            .with(CARD_NAME, card.card_name.as_str())
            .with(CARD_NUMBER, card.card_number.as_str())
            .with(CARD_IMAGE, card.card_image.clone())
            .with(CARD_IMAGE_MIME_TYPE, card.card_image_mime_type.as_str())
            .with(CARD_TYPE, card.card_type.as_str())
            .with(CARD_DESCRIPTION, card.card_description.clone())
    }

    fn from_row(&self, row: &Row) -> CardstackResult<Card> {
        let id = if self.require_id {
            Some(row.get_i64(ID)?)
        } else if row.contains(ID) {
            row.get_opt_i64(ID)?
        } else {
            None
        };

        Ok(Card {
            id,
            card_name: row.get_string(CARD_NAME)?,
            card_number: row.get_string(CARD_NUMBER)?,
            card_image: row.get_bytes(CARD_IMAGE)?,
            card_image_mime_type: row.get_string(CARD_IMAGE_MIME_TYPE)?,
            card_type: row.get_string(CARD_TYPE)?,
            card_description: row.get_opt_string(CARD_DESCRIPTION)?,
        })
    }
}
