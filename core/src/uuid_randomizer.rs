//! Version-4 UUIDs drawn from the shared source, so they replay with the seed.

use crate::{randomizer::Randomizer, rng::SharedSource};
use uuid::{Builder, Uuid};

pub struct UuidRandomizer {
    source: SharedSource,
}

impl UuidRandomizer {
    pub fn new(source: &SharedSource) -> Self {
        Self { source: source.clone() }
    }
}

impl Randomizer<Uuid> for UuidRandomizer {
    fn random_value(&self) -> Uuid {
        let mut bytes = [0u8; 16];
        self.source.fill_bytes(&mut bytes);
        Builder::from_random_bytes(bytes).into_uuid()
    }
}
