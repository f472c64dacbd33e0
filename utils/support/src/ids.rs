//! Identifier newtypes shared by the tracker and its hosts.
//!
//! Browsers hand out non-negative integers for windows and tabs and use `-1`
//! as a "none" sentinel, so negative values never name a real object.

use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidIdError(i64);

impl std::fmt::Display for InvalidIdError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "identifier must be non-negative, got {}", self.0)
    }
}

impl std::error::Error for InvalidIdError {}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Display, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "i64")]
pub struct WindowId(i64);

impl WindowId {
    pub const fn try_from_i64(raw: i64) -> Option<Self> {
        if raw < 0 { None } else { Some(Self(raw)) }
    }

    pub const fn raw(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for WindowId {
    type Error = InvalidIdError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        Self::try_from_i64(raw).ok_or(InvalidIdError(raw))
    }
}

impl From<WindowId> for i64 {
    fn from(id: WindowId) -> Self {
        id.0
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Display, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "i64")]
pub struct TabId(i64);

impl TabId {
    pub const fn try_from_i64(raw: i64) -> Option<Self> {
        if raw < 0 { None } else { Some(Self(raw)) }
    }

    pub const fn raw(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for TabId {
    type Error = InvalidIdError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        Self::try_from_i64(raw).ok_or(InvalidIdError(raw))
    }
}

impl From<TabId> for i64 {
    fn from(id: TabId) -> Self {
        id.0
    }
}

/// Zero-based position of a tab within its window's tab strip.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Display, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TabIndex(usize);

impl TabIndex {
    pub const fn new(raw: usize) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> usize {
        self.0
    }

    /// Clamp to the last valid position of a strip with `len` tabs.
    ///
    /// Returns `None` for an empty strip.
    pub const fn clamp_to_len(self, len: usize) -> Option<Self> {
        if len == 0 {
            return None;
        }
        let last = len - 1;
        Some(Self(if self.0 < last { self.0 } else { last }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn ids_reject_negative() {
        assert!(WindowId::try_from_i64(-1).is_none());
        assert!(TabId::try_from_i64(-1).is_none());
        assert!(TabId::try_from_i64(i64::MIN).is_none());
        assert_eq!(TabId::try_from(-7), Err(InvalidIdError(-7)));
    }

    #[test]
    fn ids_accept_zero() -> Result<(), &'static str> {
        let win = WindowId::try_from_i64(0).ok_or("expected window id")?;
        let tab = TabId::try_from_i64(0).ok_or("expected tab id")?;
        assert_eq!(win.raw(), 0);
        assert_eq!(tab.raw(), 0);
        Ok(())
    }

    #[test]
    fn ids_deserialize_as_map_keys() -> Result<(), &'static str> {
        let value: std::collections::BTreeMap<WindowId, Vec<TabId>> =
            serde_json::from_str(r#"{"3":[7,1]}"#).map_err(|_| "expected valid table")?;
        let win = WindowId::try_from_i64(3).ok_or("expected window id")?;
        let tabs: Vec<i64> = value
            .get(&win)
            .ok_or("expected window entry")?
            .iter()
            .copied()
            .map(TabId::raw)
            .collect();
        assert_eq!(tabs, vec![7, 1]);
        Ok(())
    }

    #[test]
    fn ids_reject_negative_on_deserialize() {
        let parsed: Result<Vec<TabId>, _> = serde_json::from_str("[1,-1]");
        assert!(parsed.is_err());
    }

    #[rstest]
    #[case(0, 3, Some(0))]
    #[case(2, 3, Some(2))]
    #[case(3, 3, Some(2))]
    #[case(9, 1, Some(0))]
    #[case(0, 0, None)]
    fn clamp_to_len_cases(#[case] raw: usize, #[case] len: usize, #[case] expected: Option<usize>) {
        assert_eq!(
            TabIndex::new(raw).clamp_to_len(len).map(TabIndex::raw),
            expected
        );
    }
}
