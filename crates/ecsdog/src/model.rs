// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Snapshot types returned by the cluster query service.
//!
//! These only live for the duration of one scrape pass.

/// State of one service as returned by `DescribeServices`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceSnapshot {
    pub name: String,
    pub status: String,
    pub desired_count: i64,
    pub pending_count: i64,
    pub running_count: i64,
    pub deployments: Vec<Deployment>,
    pub events: Vec<ServiceEvent>,
}

/// A rollout of a service, with its own task counts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Deployment {
    pub id: String,
    pub status: String,
    pub desired_count: i64,
    pub pending_count: i64,
    pub running_count: i64,
}

/// An entry from a service's recent event log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceEvent {
    pub id: String,
    pub message: String,
    /// Seconds since the Unix epoch.
    pub created_at: Option<i64>,
}

/// An identifier the query service could not resolve, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct DescribeFailure {
    pub identifier: String,
    pub reason: String,
}

/// Result of describing one batch of services.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescribeOutput {
    pub services: Vec<ServiceSnapshot>,
    pub failures: Vec<DescribeFailure>,
}

/// One page of service identifiers from `ListServices`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServicePage {
    pub identifiers: Vec<String>,
    /// Token for the following page, `None` on the last page.
    pub next_token: Option<String>,
}
