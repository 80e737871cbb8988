// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use tracing::debug;

use crate::cluster::ClusterClient;
use crate::error::QueryError;

/// The service identifiers known for a cluster, in the order ECS listed them.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ServiceInventory {
    services: Vec<String>,
}

impl ServiceInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &[String] {
        &self.services
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Re-lists every service in `cluster` and replaces the inventory.
    ///
    /// On error the previous inventory is kept as is.
    pub async fn refresh<C>(&mut self, client: &C, cluster: &str) -> Result<usize, QueryError>
    where
        C: ClusterClient + ?Sized,
    {
        self.services = list_all_services(client, cluster).await?;
        Ok(self.services.len())
    }
}

/// Drains every `ListServices` page for `cluster`.
pub async fn list_all_services<C>(client: &C, cluster: &str) -> Result<Vec<String>, QueryError>
where
    C: ClusterClient + ?Sized,
{
    let mut services = Vec::new();
    let mut next_token = None;
    let mut pages = 0usize;

    loop {
        let page = client.list_services_page(cluster, next_token).await?;
        pages += 1;
        services.extend(page.identifiers);
        match page.next_token.filter(|token| !token.is_empty()) {
            Some(token) => next_token = Some(token),
            None => break,
        }
    }

    debug!(
        "Listed {} services for cluster {cluster} in {pages} page(s)",
        services.len()
    );
    Ok(services)
}
