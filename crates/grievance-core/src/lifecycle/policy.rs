//! Lifecycle policy values - which transitions are allowed and how
//! remarks-only confirmations are treated

use std::collections::HashSet;
use std::fmt;

use crate::entities::GrievanceStatus;

/// Set of allowed `(from, to)` status pairs
///
/// Same-status pairs are never part of the table; they are governed by
/// [`SameStatusPolicy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPolicy {
    allowed: HashSet<(GrievanceStatus, GrievanceStatus)>,
}

impl TransitionPolicy {
    /// Every status may move to every other status
    pub fn permissive() -> Self {
        let allowed = GrievanceStatus::ALL
            .into_iter()
            .flat_map(|from| GrievanceStatus::ALL.into_iter().map(move |to| (from, to)))
            .filter(|(from, to)| from != to)
            .collect();
        Self { allowed }
    }

    /// No transitions at all; build up with [`allow`](Self::allow)
    pub fn empty() -> Self {
        Self {
            allowed: HashSet::new(),
        }
    }

    pub fn allow(mut self, from: GrievanceStatus, to: GrievanceStatus) -> Self {
        if from != to {
            self.allowed.insert((from, to));
        }
        self
    }

    pub fn deny(mut self, from: GrievanceStatus, to: GrievanceStatus) -> Self {
        self.allowed.remove(&(from, to));
        self
    }

    /// Permissive table minus every pair in a `from:to,from:to` list
    pub fn permissive_except(deny_list: &str) -> Result<Self, TransitionListError> {
        let policy = parse_pairs(deny_list)?
            .into_iter()
            .fold(Self::permissive(), |policy, (from, to)| policy.deny(from, to));
        Ok(policy)
    }

    #[inline]
    pub fn allows(&self, from: GrievanceStatus, to: GrievanceStatus) -> bool {
        self.allowed.contains(&(from, to))
    }

    /// Statuses reachable from `from`, in declaration order
    pub fn targets(&self, from: GrievanceStatus) -> Vec<GrievanceStatus> {
        GrievanceStatus::ALL
            .into_iter()
            .filter(|to| self.allows(from, *to))
            .collect()
    }
}

impl Default for TransitionPolicy {
    fn default() -> Self {
        Self::permissive()
    }
}

/// Malformed `from:to` list entry
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid transition pair '{0}', expected 'from:to' with known statuses")]
pub struct TransitionListError(pub String);

fn parse_pairs(list: &str) -> Result<Vec<(GrievanceStatus, GrievanceStatus)>, TransitionListError> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (from, to) = entry
                .split_once(':')
                .ok_or_else(|| TransitionListError(entry.to_string()))?;
            match (
                GrievanceStatus::parse(from.trim()),
                GrievanceStatus::parse(to.trim()),
            ) {
                (Some(from), Some(to)) => Ok((from, to)),
                _ => Err(TransitionListError(entry.to_string())),
            }
        })
        .collect()
}

/// Treatment of an update whose status equals the current status but
/// which carries remarks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameStatusPolicy {
    /// Record a confirmation entry in history
    #[default]
    Accept,
    /// Fail with "no change requested"
    Reject,
}

impl SameStatusPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "accept" => Some(Self::Accept),
            "reject" => Some(Self::Reject),
            _ => None,
        }
    }
}

impl fmt::Display for SameStatusPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Accept => "accept",
            Self::Reject => "reject",
        })
    }
}

/// Combined lifecycle rules handed to the transition logic
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LifecyclePolicy {
    pub transitions: TransitionPolicy,
    pub same_status: SameStatusPolicy,
}

impl LifecyclePolicy {
    pub fn new(transitions: TransitionPolicy, same_status: SameStatusPolicy) -> Self {
        Self {
            transitions,
            same_status,
        }
    }
}
