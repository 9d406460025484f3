use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use fake::Fake;
use fake::faker::lorem::en::Word;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::GenerationError;

/// Alphabet for random strings and medium-ridiculousness names.
pub const DEFAULT_ALPHABET: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*()[]";
pub const MIN_STRING_LENGTH: usize = 5;
pub const MAX_STRING_LENGTH: usize = 20;

const MAX_WORDS: usize = 3;
const ATTEMPTS_PER_NAME: usize = 100;

/// How adversarial generated names are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ridiculousness {
    /// Dictionary words in PascalCase or camelCase.
    #[default]
    Low,
    /// Printable symbol noise.
    Medium,
    /// Arbitrary bytes decoded as UTF-8.
    High,
}

impl Ridiculousness {
    pub fn as_str(self) -> &'static str {
        match self {
            Ridiculousness::Low => "low",
            Ridiculousness::Medium => "medium",
            Ridiculousness::High => "high",
        }
    }
}

impl fmt::Display for Ridiculousness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ridiculousness {
    type Err = random_realms_core::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "low" => Ok(Ridiculousness::Low),
            "medium" => Ok(Ridiculousness::Medium),
            "high" => Ok(Ridiculousness::High),
            other => Err(random_realms_core::Error::Unsupported(format!(
                "name ridiculousness {other:?} (expected low, medium or high)"
            ))),
        }
    }
}

/// Produces object schema and property names.
#[derive(Debug, Clone, Copy)]
pub struct NameGenerator {
    ridiculousness: Ridiculousness,
    max_unicode_string: usize,
}

impl NameGenerator {
    pub fn new(ridiculousness: Ridiculousness, max_unicode_string: usize) -> Self {
        Self {
            ridiculousness,
            max_unicode_string,
        }
    }

    pub fn ridiculousness(&self) -> Ridiculousness {
        self.ridiculousness
    }

    pub fn object_schema_name<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        self.make_name(rng, true)
    }

    pub fn property_name<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        self.make_name(rng, false)
    }

    /// Draw `count` distinct object schema names.
    pub fn object_schema_names<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        count: usize,
    ) -> Result<Vec<String>, GenerationError> {
        make_unique(rng, count, |rng| self.object_schema_name(rng))
    }

    /// Draw `count` distinct property names.
    pub fn property_names<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        count: usize,
    ) -> Result<Vec<String>, GenerationError> {
        make_unique(rng, count, |rng| self.property_name(rng))
    }

    fn make_name<R: Rng + ?Sized>(&self, rng: &mut R, capitalize_first: bool) -> String {
        match self.ridiculousness {
            Ridiculousness::Low => {
                let words = unique_words(rng);
                words
                    .iter()
                    .enumerate()
                    .map(|(index, word)| {
                        if index == 0 && !capitalize_first {
                            word.to_lowercase()
                        } else {
                            capitalize(word)
                        }
                    })
                    .collect()
            }
            Ridiculousness::Medium => random_string(rng),
            Ridiculousness::High => unicode_string(rng, self.max_unicode_string, false, false),
        }
    }
}

/// Call `make` until it has produced `count` distinct values, in draw order.
pub fn make_unique<R, F>(
    rng: &mut R,
    count: usize,
    mut make: F,
) -> Result<Vec<String>, GenerationError>
where
    R: Rng + ?Sized,
    F: FnMut(&mut R) -> String,
{
    let attempts = count.saturating_mul(ATTEMPTS_PER_NAME);
    let mut seen = BTreeSet::new();
    let mut names = Vec::with_capacity(count);
    let mut tried = 0;
    while names.len() < count {
        if tried >= attempts {
            return Err(GenerationError::UniqueNamesExhausted {
                requested: count,
                attempts,
            });
        }
        tried += 1;
        let name = make(rng);
        if seen.insert(name.clone()) {
            names.push(name);
        }
    }
    Ok(names)
}

/// A string of 5..=20 characters from [`DEFAULT_ALPHABET`].
pub fn random_string<R: Rng + ?Sized>(rng: &mut R) -> String {
    let alphabet = DEFAULT_ALPHABET.as_bytes();
    let len = rng.random_range(MIN_STRING_LENGTH..=MAX_STRING_LENGTH);
    (0..len)
        .map(|_| char::from(alphabet[rng.random_range(0..alphabet.len())]))
        .collect()
}

/// Sample up to `max_len` raw bytes and decode them as UTF-8, replacing
/// invalid sequences.
pub fn unicode_string<R: Rng + ?Sized>(
    rng: &mut R,
    max_len: usize,
    allow_empty: bool,
    allow_nul: bool,
) -> String {
    let min_len = usize::from(!allow_empty).min(max_len);
    let lowest_byte = if allow_nul { 0x00 } else { 0x01 };
    let len = rng.random_range(min_len..=max_len);
    let bytes: Vec<u8> = (0..len)
        .map(|_| rng.random_range(lowest_byte..=0xff_u8))
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

fn unique_words<R: Rng + ?Sized>(rng: &mut R) -> Vec<String> {
    let count = rng.random_range(1..=MAX_WORDS);
    let mut words: Vec<String> = Vec::with_capacity(count);
    while words.len() < count {
        let word: String = Word().fake_with_rng(rng);
        if !words.contains(&word) {
            words.push(word);
        }
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
