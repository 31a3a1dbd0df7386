use parking_lot::RwLock;
use shared_types::{Rumor, StatusVector};

use crate::domain::{OutOfOrderRumor, RumorLog};
use crate::ports::inbound::RumorStore;

/// [`RumorLog`] behind its own reader/writer lock.
#[derive(Debug, Default)]
pub struct SharedRumorStore {
    log: RwLock<RumorLog>,
}

impl SharedRumorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RumorStore for SharedRumorStore {
    fn store(&self, rumor: Rumor) -> Result<(), OutOfOrderRumor> {
        self.log.write().store(rumor)
    }

    fn get_from(&self, origin: &str, from: usize) -> Vec<Rumor> {
        self.log.read().get_from(origin, from)
    }

    fn sequence_of(&self, origin: &str) -> u64 {
        self.log.read().sequence_of(origin)
    }

    fn status_vector(&self) -> StatusVector {
        self.log.read().status_vector()
    }
}
