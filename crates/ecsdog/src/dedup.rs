// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashSet;

/// Remembers which service events have already been reported.
///
/// Ids are kept for the lifetime of the process and never evicted, so memory
/// grows with the number of distinct events seen. ECS only returns the most
/// recent events per service, which keeps this small for services with modest
/// churn. Nothing is persisted: after a restart every event returned by ECS is
/// reported again.
///
/// Not synchronized; the scraper holds it behind its state lock.
#[derive(Debug, Default)]
pub struct EventDeduplicator {
    seen: HashSet<String>,
}

impl EventDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_seen(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    pub fn mark_seen(&mut self, id: &str) {
        if !self.seen.contains(id) {
            self.seen.insert(id.to_string());
        }
    }

    /// Number of distinct event ids recorded so far.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
