//! Anti-entropy status comparison.

use std::collections::BTreeSet;

use shared_types::{Address, StatusVector};

/// What the local node should do after comparing status vectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusComparison {
    /// We know more rumors of `origin`; push those after `remote_count`.
    Ahead { origin: Address, remote_count: u64 },
    /// The remote knows more rumors of `origin`; send our status so it
    /// pushes them.
    Behind { origin: Address },
    /// Both vectors agree on every origin.
    InSync,
}

/// Compare `local` with `remote`.
///
/// Origins known to either side are scanned in ascending order and the first
/// origin whose counts differ decides the outcome; later differences are
/// picked up by the next exchange. Both peers scan the same order, so they
/// agree on which origin is repaired first.
pub fn compare_status(local: &StatusVector, remote: &StatusVector) -> StatusComparison {
    let origins: BTreeSet<&Address> = local.keys().chain(remote.keys()).collect();

    for origin in origins {
        let mine = local.get(origin).copied().unwrap_or(0);
        let theirs = remote.get(origin).copied().unwrap_or(0);

        if mine > theirs {
            return StatusComparison::Ahead {
                origin: origin.clone(),
                remote_count: theirs,
            };
        }
        if mine < theirs {
            return StatusComparison::Behind {
                origin: origin.clone(),
            };
        }
    }

    StatusComparison::InSync
}
