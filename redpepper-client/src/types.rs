//! Pair records used as batch arguments and as paired-reply elements.
//!
//! Both records live only for the duration of a call: they are flattened
//! into request tokens on the way out and rebuilt from paired reply
//! elements on the way in. Nothing here is persisted.

use std::fmt;

/// One key/value (or field/value) pair in a batch command or paired reply.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyValuePair {
    /// Key or hash field.
    pub key: Vec<u8>,
    /// Associated value.
    pub value: Vec<u8>,
}

impl KeyValuePair {
    /// Builds a pair from anything byte-like.
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        KeyValuePair {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl<K: Into<Vec<u8>>, V: Into<Vec<u8>>> From<(K, V)> for KeyValuePair {
    fn from((key, value): (K, V)) -> Self {
        KeyValuePair::new(key, value)
    }
}

impl fmt::Debug for KeyValuePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "KeyValuePair({:?} => {:?})",
            String::from_utf8_lossy(&self.key),
            String::from_utf8_lossy(&self.value)
        )
    }
}

/// One member of a sorted-set batch command, with its score.
#[derive(Clone, PartialEq, Eq)]
pub struct ScoredMember {
    /// Ranking score; encoded as a decimal token on the wire.
    pub score: i64,
    /// Member payload.
    pub member: Vec<u8>,
}

impl ScoredMember {
    /// Builds a scored member from anything byte-like.
    pub fn new(score: i64, member: impl Into<Vec<u8>>) -> Self {
        ScoredMember {
            score,
            member: member.into(),
        }
    }
}

impl<M: Into<Vec<u8>>> From<(i64, M)> for ScoredMember {
    fn from((score, member): (i64, M)) -> Self {
        ScoredMember::new(score, member)
    }
}

impl fmt::Debug for ScoredMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ScoredMember({} => {:?})",
            self.score,
            String::from_utf8_lossy(&self.member)
        )
    }
}
