//! Line format shared by snapshots and deltas: space separated `key:value`
//! tokens with integer values, e.g. `bx:490 by:390 p1:350`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::court::Side;

/// Declaration order is the order `encode` writes tokens in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKey {
    BallX,
    BallY,
    Paddle1,
    Paddle2,
    Score1,
    Score2,
    BallVelocityX,
    BallVelocityY,
    EndScore,
}

impl FieldKey {
    pub const ALL: [FieldKey; 9] = [
        Self::BallX,
        Self::BallY,
        Self::Paddle1,
        Self::Paddle2,
        Self::Score1,
        Self::Score2,
        Self::BallVelocityX,
        Self::BallVelocityY,
        Self::EndScore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BallX => "bx",
            Self::BallY => "by",
            Self::Paddle1 => "p1",
            Self::Paddle2 => "p2",
            Self::Score1 => "p1s",
            Self::Score2 => "p2s",
            Self::BallVelocityX => "bvx",
            Self::BallVelocityY => "bvy",
            Self::EndScore => "endsc",
        }
    }

    pub fn paddle(side: Side) -> Self {
        match side {
            Side::Left => Self::Paddle1,
            Side::Right => Self::Paddle2,
        }
    }

    pub fn score(side: Side) -> Self {
        match side {
            Side::Left => Self::Score1,
            Side::Right => Self::Score2,
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownField;

impl FromStr for FieldKey {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or(UnknownField)
    }
}

/// A sparse set of replicated fields. Presence of any field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    values: BTreeMap<FieldKey, i32>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(key: FieldKey, value: i32) -> Self {
        let mut fields = Self::new();
        fields.insert(key, value);
        fields
    }

    pub fn insert(&mut self, key: FieldKey, value: i32) -> Option<i32> {
        self.values.insert(key, value)
    }

    pub fn get(&self, key: FieldKey) -> Option<i32> {
        self.values.get(&key).copied()
    }

    pub fn contains(&self, key: FieldKey) -> bool {
        self.values.contains_key(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, i32)> + '_ {
        self.values.iter().map(|(&key, &value)| (key, value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(FieldKey, i32)> for Fields {
    fn from_iter<T: IntoIterator<Item = (FieldKey, i32)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

pub fn encode(fields: &Fields) -> String {
    fields
        .iter()
        .map(|(key, value)| format!("{}:{}", key, value))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Never fails: tokens without exactly one colon, with an unknown key or
/// with a non-integer value are dropped and the rest is kept.
pub fn decode(text: &str) -> Fields {
    let mut fields = Fields::new();

    for token in text.split(' ') {
        match parse_token(token) {
            Some((key, value)) => {
                fields.insert(key, value);
            }
            None => {
                if !token.is_empty() {
                    log::trace!("Dropping malformed field {:?}", token);
                }
            }
        }
    }

    fields
}

fn parse_token(token: &str) -> Option<(FieldKey, i32)> {
    let (key, value) = token.split_once(':')?;
    if value.contains(':') {
        return None;
    }

    let key = key.parse::<FieldKey>().ok()?;
    let value = value.parse::<i32>().ok()?;
    Some((key, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_writes_keys_in_declaration_order() {
        let fields: Fields = [
            (FieldKey::EndScore, 10),
            (FieldKey::BallX, 490),
            (FieldKey::Score1, 2),
            (FieldKey::BallVelocityY, -6),
        ]
        .into_iter()
        .collect();

        assert_eq!(encode(&fields), "bx:490 p1s:2 bvy:-6 endsc:10");
    }

    #[test]
    fn full_snapshot_round_trips() {
        let fields: Fields = FieldKey::ALL
            .into_iter()
            .zip([490, 390, 350, 355, 3, 1, -7, 7, 10])
            .collect();

        assert_eq!(decode(&encode(&fields)), fields);
    }

    #[test]
    fn empty_fields_encode_to_empty_line() {
        assert_eq!(encode(&Fields::new()), "");
        assert!(decode("").is_empty());
    }

    #[test]
    fn decode_skips_token_without_colon() {
        let fields = decode("bx:10 garbage by:20");

        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get(FieldKey::BallX), Some(10));
        assert_eq!(fields.get(FieldKey::BallY), Some(20));
    }

    #[test]
    fn decode_skips_token_with_two_colons() {
        let fields = decode("p1:5:6 p2:300");

        assert!(!fields.contains(FieldKey::Paddle1));
        assert_eq!(fields.get(FieldKey::Paddle2), Some(300));
    }

    #[test]
    fn decode_skips_non_integer_values() {
        let fields = decode("bvx:fast bvy:-5 p1s:1.5 endsc:99999999999");

        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get(FieldKey::BallVelocityY), Some(-5));
    }

    #[test]
    fn decode_ignores_unknown_keys() {
        let fields = decode("ok bz:4 p2:120");

        assert_eq!(fields, Fields::single(FieldKey::Paddle2, 120));
    }

    #[test]
    fn decode_tolerates_repeated_spaces() {
        let fields = decode("  bx:1   by:2 ");

        assert_eq!(fields.get(FieldKey::BallX), Some(1));
        assert_eq!(fields.get(FieldKey::BallY), Some(2));
    }

    #[test]
    fn later_duplicate_key_wins() {
        assert_eq!(decode("p1:1 p1:2").get(FieldKey::Paddle1), Some(2));
    }

    #[test]
    fn key_names_parse_back() {
        for key in FieldKey::ALL {
            assert_eq!(key.as_str().parse::<FieldKey>(), Ok(key));
        }
        assert_eq!("p3".parse::<FieldKey>(), Err(UnknownField));
    }
}
