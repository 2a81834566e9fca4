//! One filter field: a set of accepted values.
//!
//! Membership inside a field is OR. An empty criterion imposes no constraint.
//! Tokens that fail to parse for the field's type are kept as *unrecognized*:
//! they keep the field active but never match an entity.

use std::collections::BTreeSet;
use std::fmt;

use crate::core::model::{ActionStatus, AmbitionCategory, Priority, Quarter, Status};

/// A value a criterion can hold, parsed from a raw UI/config token.
pub trait FilterToken: Ord + Clone + fmt::Display {
    fn parse_token(raw: &str) -> Option<Self>;
}

/// Ids and labels are matched verbatim, surrounding whitespace included.
impl FilterToken for String {
    fn parse_token(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }
}

macro_rules! trimmed_token {
    ($($t:ty),+ $(,)?) => {
        $(
            impl FilterToken for $t {
                fn parse_token(raw: &str) -> Option<Self> {
                    raw.trim().parse().ok()
                }
            }
        )+
    };
}

trimmed_token!(i32, Quarter, Priority, ActionStatus, Status, AmbitionCategory);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Criterion<T: Ord> {
    values: BTreeSet<T>,
    unrecognized: BTreeSet<String>,
}

impl<T: Ord> Default for Criterion<T> {
    fn default() -> Self {
        Self {
            values: BTreeSet::new(),
            unrecognized: BTreeSet::new(),
        }
    }
}

impl<T: FilterToken> Criterion<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw tokens; duplicates collapse.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = Self::default();
        for token in tokens {
            let raw = token.as_ref();
            match T::parse_token(raw) {
                Some(value) => {
                    out.values.insert(value);
                }
                None => {
                    out.unrecognized.insert(raw.to_string());
                }
            }
        }
        out
    }

    pub fn is_active(&self) -> bool {
        !self.values.is_empty() || !self.unrecognized.is_empty()
    }

    pub fn contains(&self, value: &T) -> bool {
        self.values.contains(value)
    }

    /// True when the field is inactive or holds `value`.
    pub fn accepts(&self, value: &T) -> bool {
        !self.is_active() || self.contains(value)
    }

    /// True when the field is inactive or shares at least one value with `candidates`.
    pub fn accepts_any<'a, I>(&self, candidates: I) -> bool
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        if !self.is_active() {
            return true;
        }
        candidates.into_iter().any(|c| self.contains(c))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.values.iter()
    }

    pub fn unrecognized(&self) -> impl Iterator<Item = &str> {
        self.unrecognized.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len() + self.unrecognized.len()
    }

    pub fn is_empty(&self) -> bool {
        !self.is_active()
    }

    pub fn with(&self, value: T) -> Self {
        let mut next = self.clone();
        next.values.insert(value);
        next
    }

    pub fn without(&self, value: &T) -> Self {
        let mut next = self.clone();
        next.values.remove(value);
        next
    }

    pub fn toggled(&self, value: T) -> Self {
        if self.contains(&value) {
            self.without(&value)
        } else {
            self.with(value)
        }
    }

    /// Toggle a raw token, routing parse failures to the unrecognized set.
    pub fn toggled_token(&self, raw: &str) -> Self {
        match T::parse_token(raw) {
            Some(value) => self.toggled(value),
            None => {
                let mut next = self.clone();
                if !next.unrecognized.remove(raw) {
                    next.unrecognized.insert(raw.to_string());
                }
                next
            }
        }
    }

    /// Set union of both criteria.
    pub fn union(&self, other: &Self) -> Self {
        let mut next = self.clone();
        next.values.extend(other.values.iter().cloned());
        next.unrecognized.extend(other.unrecognized.iter().cloned());
        next
    }

    /// Typed values first (in order), then unrecognized tokens verbatim.
    pub fn to_tokens(&self) -> Vec<String> {
        self.values
            .iter()
            .map(ToString::to_string)
            .chain(self.unrecognized.iter().cloned())
            .collect()
    }
}

impl<T: FilterToken> FromIterator<T> for Criterion<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
            unrecognized: BTreeSet::new(),
        }
    }
}
