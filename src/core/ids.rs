//! Identifier generation strategies injected into the journal.

use ulid::{Generator, Ulid};

pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// Monotonic ULIDs: ids minted within the same millisecond still sort and differ.
pub struct UlidIds {
    generator: Generator,
}

impl UlidIds {
    pub fn new() -> Self {
        Self {
            generator: Generator::new(),
        }
    }
}

impl Default for UlidIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for UlidIds {
    fn next_id(&mut self) -> String {
        match self.generator.generate() {
            Ok(id) => id.to_string(),
            // Random component overflowed inside one millisecond.
            Err(_) => Ulid::new().to_string(),
        }
    }
}

/// `<prefix>-1`, `<prefix>-2`, ...
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}
