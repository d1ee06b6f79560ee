//! Verdict filter and row limit selected by the page controls

use crate::model::Verdict;

/// Row limit used until the limit control says otherwise
pub const DEFAULT_LIMIT: usize = 50;

/// Verdict filter control value
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum VerdictFilter {
    #[default]
    All,
    Only(Verdict),
}

impl VerdictFilter {
    /// `"all"` (or nothing) means no filter; anything else is a verdict.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "" | "all" => VerdictFilter::All,
            verdict => VerdictFilter::Only(Verdict::parse(verdict)),
        }
    }

    pub fn as_query_value(&self) -> &str {
        match self {
            VerdictFilter::All => "all",
            VerdictFilter::Only(verdict) => verdict.as_str(),
        }
    }

    pub fn matches(&self, verdict: &Verdict) -> bool {
        match self {
            VerdictFilter::All => true,
            VerdictFilter::Only(wanted) => wanted == verdict,
        }
    }
}

/// Parse the limit control; garbage keeps `previous`, zero becomes one.
pub fn parse_limit(raw: &str, previous: usize) -> usize {
    match raw.trim().parse::<usize>() {
        Ok(0) => 1,
        Ok(limit) => limit,
        Err(_) => previous,
    }
}

/// What to ask the endpoint for
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LeaderboardQuery {
    pub filter: VerdictFilter,
    pub limit: usize,
}

/// Responses are cached per query
pub type CacheKey = LeaderboardQuery;

impl LeaderboardQuery {
    pub fn new(filter: VerdictFilter, limit: usize) -> Self {
        Self {
            filter,
            limit: limit.max(1),
        }
    }

    /// `(name, value)` pairs for the request URL, unencoded
    pub fn params(&self) -> [(&'static str, String); 2] {
        [
            ("verdict", self.filter.as_query_value().to_string()),
            ("limit", self.limit.to_string()),
        ]
    }
}

impl Default for LeaderboardQuery {
    fn default() -> Self {
        Self::new(VerdictFilter::All, DEFAULT_LIMIT)
    }
}
