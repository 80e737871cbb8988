// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! One scrape pass over a cluster: describe every known service in batches and
//! report its counts, deployments and new events.

use std::collections::BTreeMap;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::batch::batches;
use crate::cluster::ClusterClient;
use crate::dedup::EventDeduplicator;
use crate::emitter::MetricEmitter;
use crate::error::{ScrapeError, SinkError};
use crate::inventory::ServiceInventory;
use crate::model::ServiceSnapshot;
use crate::statsd::{Event, MetricsSink};

/// Tag added to every event reported by the scraper.
pub const EVENT_SOURCE_TAG: &str = "ecs";

/// State shared by inventory refreshes and scrape passes.
#[derive(Debug, Default)]
pub struct ScraperState {
    pub inventory: ServiceInventory,
    pub events: EventDeduplicator,
}

/// Scrapes one ECS cluster and reports to a metrics sink.
///
/// Refreshes and scrape passes hold the state lock for their whole duration, so
/// they never interleave even when triggered from outside the scheduler.
pub struct Scraper<C, S> {
    cluster: String,
    client: C,
    emitter: MetricEmitter<S>,
    state: Mutex<ScraperState>,
}

impl<C, S> Scraper<C, S>
where
    C: ClusterClient,
    S: MetricsSink,
{
    pub fn new(cluster: impl Into<String>, client: C, emitter: MetricEmitter<S>) -> Self {
        Self {
            cluster: cluster.into(),
            client,
            emitter,
            state: Mutex::new(ScraperState::default()),
        }
    }

    pub fn cluster(&self) -> &str {
        &self.cluster
    }

    pub fn into_sink(self) -> S {
        self.emitter.into_sink()
    }

    /// Snapshot of the current inventory.
    pub async fn services(&self) -> Vec<String> {
        self.state.lock().await.inventory.current().to_vec()
    }

    /// Number of distinct events reported so far.
    pub async fn reported_events(&self) -> usize {
        self.state.lock().await.events.len()
    }

    /// Replaces the inventory with a fresh listing of the cluster's services.
    pub async fn refresh_services(&self) -> Result<usize, ScrapeError> {
        let mut state = self.state.lock().await;
        let count = state.inventory.refresh(&self.client, &self.cluster).await?;
        info!("Found {count} services in cluster {}", self.cluster);
        Ok(count)
    }

    /// Runs one scrape pass over the current inventory.
    ///
    /// The first query or sink error ends the pass; whatever was emitted before
    /// it stays emitted.
    pub async fn scrape(&self) -> Result<(), ScrapeError> {
        let mut state = self.state.lock().await;
        let ScraperState { inventory, events } = &mut *state;

        self.emitter
            .cluster_gauge("services", inventory.len() as f64, 1.0)
            .await?;

        for batch in batches(inventory.current()) {
            let output = self.client.describe_services(&self.cluster, batch).await?;

            for failure in &output.failures {
                warn!(
                    "Failed to describe {}: {}",
                    failure.identifier, failure.reason
                );
            }

            for service in &output.services {
                self.scrape_service(service, events).await?;
            }
        }

        Ok(())
    }

    async fn scrape_service(
        &self,
        service: &ServiceSnapshot,
        seen: &mut EventDeduplicator,
    ) -> Result<(), SinkError> {
        debug!("Scraping metrics from {}", service.name);

        let tags = vec![
            format!("service_name:{}", service.name),
            format!("service_status:{}", service.status),
        ];

        self.emitter
            .gauge("service.desired", service.desired_count as f64, &tags, 1.0)
            .await?;
        self.emitter
            .gauge("service.pending", service.pending_count as f64, &tags, 1.0)
            .await?;
        self.emitter
            .gauge("service.running", service.running_count as f64, &tags, 1.0)
            .await?;

        let mut status_counts: BTreeMap<&str, usize> = BTreeMap::new();
        for deployment in &service.deployments {
            if !deployment.status.is_empty() {
                *status_counts.entry(deployment.status.as_str()).or_default() += 1;
            }

            let mut deployment_tags = tags.clone();
            deployment_tags.push(format!("deployment:{}", deployment.id));
            deployment_tags.push(format!("deployment_status:{}", deployment.status));

            self.emitter
                .gauge(
                    "service.deployment.desired",
                    deployment.desired_count as f64,
                    &deployment_tags,
                    1.0,
                )
                .await?;
            self.emitter
                .gauge(
                    "service.deployment.pending",
                    deployment.pending_count as f64,
                    &deployment_tags,
                    1.0,
                )
                .await?;
            self.emitter
                .gauge(
                    "service.deployment.running",
                    deployment.running_count as f64,
                    &deployment_tags,
                    1.0,
                )
                .await?;
        }

        self.emitter
            .gauge(
                "service.deployments",
                service.deployments.len() as f64,
                &tags,
                1.0,
            )
            .await?;
        for (status, count) in status_counts {
            let name = format!("service.deployments.{}", status.to_lowercase());
            self.emitter.gauge(&name, count as f64, &tags, 1.0).await?;
        }

        for event in &service.events {
            if seen.has_seen(&event.id) {
                continue;
            }

            let mut event_tags = tags.clone();
            event_tags.push(EVENT_SOURCE_TAG.to_string());

            debug!("Reporting event {} for {}", event.id, service.name);
            self.emitter
                .event(Event {
                    title: event.message.clone(),
                    text: event.message.clone(),
                    timestamp: event.created_at,
                    aggregation_key: service.name.clone(),
                    tags: event_tags,
                })
                .await?;
            seen.mark_seen(&event.id);
        }

        Ok(())
    }
}
