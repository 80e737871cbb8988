// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Periodically scrapes the services of one ECS cluster and reports them to
//! DogStatsD.
//!
//! A [`Scheduler`] lists the cluster's services once at startup, then runs a
//! [`Scraper`] pass on a fixed interval. Each pass describes the known services
//! in batches of ten and emits, under the `aws.ecs` namespace:
//!
//! - `services`: size of the inventory
//! - `service.{desired,pending,running}`: task counts per service
//! - `service.deployment.{desired,pending,running}`: task counts per deployment
//! - `service.deployments` and `service.deployments.<status>`: deployment counts
//!
//! New service events are forwarded as DogStatsD events, each reported once per
//! process lifetime.

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod batch;
pub mod cluster;
pub mod config;
pub mod dedup;
pub mod ecs;
pub mod emitter;
pub mod error;
pub mod inventory;
pub mod model;
pub mod scheduler;
pub mod scraper;
pub mod statsd;

#[cfg(test)]
mod test_support;

pub use cluster::ClusterClient;
pub use config::ScraperConfig;
pub use ecs::EcsClusterClient;
pub use emitter::MetricEmitter;
pub use error::{ConfigError, QueryError, ScrapeError, SinkError};
pub use scheduler::Scheduler;
pub use scraper::Scraper;
pub use statsd::{DogStatsDClient, Event, MetricsSink};
