//! Claims and their identifiers

use std::fmt;

/// Unique identifier for a claim
///
/// Backed by a UUIDv7, so ids minted across concurrently running
/// verification tasks need no coordination yet still sort in generation
/// order. Claims travel between the generation, verification, and
/// aggregation stages, and a time-ordered id keeps verdicts and logs
/// readable without a separate sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClaimId(u128);

impl ClaimId {
    /// Mint a fresh id
    ///
    /// # Examples
    ///
    /// ```
    /// use genecheck_domain::ClaimId;
    ///
    /// let id = ClaimId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Rebuild an id from its raw value; mainly for tests
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse an id from its hyphenated string form
    ///
    /// # Examples
    ///
    /// ```
    /// use genecheck_domain::ClaimId;
    ///
    /// let id = ClaimId::new();
    /// let parsed = ClaimId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("invalid claim id '{}': {}", s, e))
    }

    /// Raw 128-bit value
    pub fn value(&self) -> u128 {
        self.0
    }

    /// Milliseconds since the Unix epoch at which the id was minted
    pub fn timestamp(&self) -> u64 {
        // Top 48 bits of a UUIDv7 carry the millisecond timestamp
        (self.0 >> 80) as u64
    }
}

impl Default for ClaimId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// An atomic biological assertion about a gene set awaiting verification
///
/// Claims are produced upstream (claim generation over a gene-set annotation)
/// and consumed by the verification orchestrator. They are immutable once
/// created; a re-verification is a new attempt over the same claim, never a
/// mutation of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    /// Unique identifier
    pub id: ClaimId,

    /// The assertion text to verify, e.g.
    /// `"ERBB2 activates MAPK signaling"`
    pub text: String,

    /// Gene identifiers the claim is about, in the order they appear in the
    /// source gene set
    pub genes: Vec<String>,
}

impl Claim {
    /// Create a new claim with a fresh id
    pub fn new(text: impl Into<String>, genes: Vec<String>) -> Self {
        Self {
            id: ClaimId::new(),
            text: text.into(),
            genes,
        }
    }
}
