//! Per-origin rumor log.

use std::collections::HashMap;

use shared_types::{Address, Rumor, StatusVector};

use super::OutOfOrderRumor;

/// Unsynchronized rumor log. Sequences per origin are `1..=len` with no gaps.
#[derive(Debug, Default, Clone)]
pub struct RumorLog {
    logs: HashMap<Address, Vec<Rumor>>,
}

impl RumorLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `rumor` if its sequence is exactly `len(log[origin]) + 1`.
    pub fn store(&mut self, rumor: Rumor) -> Result<(), OutOfOrderRumor> {
        let log = self.logs.entry(rumor.origin.clone()).or_default();
        let expected = log.len() as u64 + 1;
        if rumor.sequence != expected {
            return Err(OutOfOrderRumor {
                origin: rumor.origin,
                expected,
                actual: rumor.sequence,
            });
        }
        log.push(rumor);
        Ok(())
    }

    /// Rumors of `origin` starting at zero-based offset `from`.
    ///
    /// `from` is a position in the log, not a sequence number: `from == n`
    /// yields the rumors with sequences `n+1..`.
    pub fn get_from(&self, origin: &str, from: usize) -> Vec<Rumor> {
        self.logs
            .get(origin)
            .and_then(|log| log.get(from..))
            .map(<[Rumor]>::to_vec)
            .unwrap_or_default()
    }

    pub fn sequence_of(&self, origin: &str) -> u64 {
        self.logs.get(origin).map_or(0, |log| log.len() as u64)
    }

    /// Number of stored rumors per origin. Origins with an empty log are
    /// omitted.
    pub fn status_vector(&self) -> StatusVector {
        self.logs
            .iter()
            .filter(|(_, log)| !log.is_empty())
            .map(|(origin, log)| (origin.clone(), log.len() as u64))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::Message;

    fn rumor(origin: &str, sequence: u64) -> Rumor {
        Rumor {
            origin: origin.into(),
            sequence,
            msg: Message::chat(format!("{}-{}", origin, sequence)),
        }
    }

    #[test]
    fn test_first_rumor_must_have_sequence_one() {
        let mut log = RumorLog::new();
        let err = log.store(rumor("a", 2)).unwrap_err();
        assert_eq!(err.expected, 1);
        assert_eq!(err.actual, 2);
        assert!(log.store(rumor("a", 1)).is_ok());
    }

    #[test]
    fn test_gap_rejected_until_filled() {
        let mut log = RumorLog::new();
        for seq in 1..=3 {
            log.store(rumor("a", seq)).unwrap();
        }

        assert!(log.store(rumor("a", 5)).is_err());
        assert!(log.store(rumor("a", 5)).is_err());
        log.store(rumor("a", 4)).unwrap();
        log.store(rumor("a", 5)).unwrap();
        assert_eq!(log.sequence_of("a"), 5);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut log = RumorLog::new();
        log.store(rumor("a", 1)).unwrap();
        assert!(log.store(rumor("a", 1)).is_err());
        assert_eq!(log.sequence_of("a"), 1);
    }

    #[test]
    fn test_get_from_uses_zero_based_offset() {
        let mut log = RumorLog::new();
        for seq in 1..=4 {
            log.store(rumor("a", seq)).unwrap();
        }

        // Offset 0 is sequence 1; a peer that knows 2 rumors needs offset 2.
        let all = log.get_from("a", 0);
        assert_eq!(all.first().map(|r| r.sequence), Some(1));

        let missing = log.get_from("a", 2);
        let sequences: Vec<u64> = missing.iter().map(|r| r.sequence).collect();
        assert_eq!(sequences, vec![3, 4]);

        assert!(log.get_from("a", 4).is_empty());
        assert!(log.get_from("a", 9).is_empty());
        assert!(log.get_from("unknown", 0).is_empty());
    }

    #[test]
    fn test_status_vector_counts_per_origin() {
        let mut log = RumorLog::new();
        log.store(rumor("a", 1)).unwrap();
        log.store(rumor("a", 2)).unwrap();
        log.store(rumor("b", 1)).unwrap();
        let _ = log.store(rumor("c", 3));

        let status = log.status_vector();
        assert_eq!(status.get("a"), Some(&2));
        assert_eq!(status.get("b"), Some(&1));
        assert_eq!(status.get("c"), None);
    }

    #[test]
    fn test_status_never_decreases() {
        let mut log = RumorLog::new();
        let mut last = 0;
        for seq in [1, 3, 2, 2, 3, 7, 4] {
            let _ = log.store(rumor("a", seq));
            let now = log.sequence_of("a");
            assert!(now >= last);
            last = now;
        }
        assert_eq!(last, 4);
    }
}
