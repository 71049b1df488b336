//! Random test data for cards.

use crate::Card;
use rand::distributions::Alphanumeric;
use rand::seq::SliceRandom;
use rand::Rng;

/// Image MIME types used for generated cards.
pub const IMAGE_MIME_TYPES: &[&str] = &["image/gif", "image/png", "image/jpeg"];

/// Builds an unsaved card filled with random values.
#[must_use]
pub fn card_with_test_values() -> Card {
    let mut rng = rand::thread_rng();
    let name_len = rng.gen_range(1..=75);
    Card::new(
        random_alphanumeric(name_len),
        random_numeric(25),
        random_bytes(),
        random_image_mime_type(),
        random_alphanumeric(20),
    )
}

/// Returns between 20 and 100 random bytes.
#[must_use]
pub fn random_bytes() -> Vec<u8> {
    let mut rng = rand::thread_rng();
    let len = rng.gen_range(20..=100);
    let mut bytes = vec![0u8; len];
    rng.fill(bytes.as_mut_slice());
    bytes
}

/// Picks one of [`IMAGE_MIME_TYPES`].
#[must_use]
pub fn random_image_mime_type() -> String {
    IMAGE_MIME_TYPES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or("image/png")
        .to_string()
}

/// Returns a random alphanumeric string of `len` characters.
#[must_use]
pub fn random_alphanumeric(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Returns a random string of `len` decimal digits.
#[must_use]
pub fn random_numeric(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// Returns a random identity well above anything a fresh table hands out.
#[must_use]
pub fn random_unused_id() -> i64 {
    rand::thread_rng().gen_range(10_000..i64::MAX)
}
