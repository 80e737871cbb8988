// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! In-memory cluster and sink doubles shared by the unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::cluster::ClusterClient;
use crate::error::{QueryError, SinkError};
use crate::model::{
    Deployment, DescribeFailure, DescribeOutput, ServiceEvent, ServicePage, ServiceSnapshot,
};
use crate::statsd::{Event, MetricsSink};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Emission {
    Gauge {
        name: String,
        value: f64,
        tags: Vec<String>,
        rate: f64,
    },
    Event(Event),
}

/// Records every emission. When built with [`RecordingSink::failing_after`],
/// sends fail once the given number of emissions has been recorded.
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    emissions: Mutex<Vec<Emission>>,
    fail_after: Option<usize>,
}

impl RecordingSink {
    pub(crate) fn failing() -> Self {
        Self::failing_after(0)
    }

    pub(crate) fn failing_after(n: usize) -> Self {
        Self {
            emissions: Mutex::new(Vec::new()),
            fail_after: Some(n),
        }
    }

    pub(crate) fn emissions(&self) -> Vec<Emission> {
        self.emissions.lock().unwrap().clone()
    }

    pub(crate) fn gauges(&self) -> Vec<(String, f64, Vec<String>)> {
        self.emissions()
            .into_iter()
            .filter_map(|e| match e {
                Emission::Gauge {
                    name, value, tags, ..
                } => Some((name, value, tags)),
                Emission::Event(_) => None,
            })
            .collect()
    }

    pub(crate) fn events(&self) -> Vec<Event> {
        self.emissions()
            .into_iter()
            .filter_map(|e| match e {
                Emission::Event(event) => Some(event),
                Emission::Gauge { .. } => None,
            })
            .collect()
    }

    pub(crate) fn gauge_value(&self, name: &str) -> Option<f64> {
        self.gauges()
            .into_iter()
            .find(|(n, _, _)| n == name)
            .map(|(_, v, _)| v)
    }

    fn record(&self, emission: Emission) -> Result<(), SinkError> {
        let mut emissions = self.emissions.lock().unwrap();
        if self.fail_after.is_some_and(|n| emissions.len() >= n) {
            return Err(SinkError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "sink unavailable",
            )));
        }
        emissions.push(emission);
        Ok(())
    }
}

#[async_trait]
impl MetricsSink for RecordingSink {
    async fn gauge(
        &self,
        name: &str,
        value: f64,
        tags: &[String],
        rate: f64,
    ) -> Result<(), SinkError> {
        self.record(Emission::Gauge {
            name: name.to_string(),
            value,
            tags: tags.to_vec(),
            rate,
        })
    }

    async fn event(&self, event: &Event) -> Result<(), SinkError> {
        self.record(Emission::Event(event.clone()))
    }
}

/// A cluster whose services and pages are fixed up front.
#[derive(Debug, Default)]
pub(crate) struct StaticCluster {
    pub(crate) pages: Vec<Vec<String>>,
    pub(crate) services: HashMap<String, ServiceSnapshot>,
    /// `list_services_page` calls with this index (0-based) or later fail.
    pub(crate) fail_list_from: Option<usize>,
    /// `describe_services` calls with this index (0-based) or later fail.
    pub(crate) fail_describe_from: Option<usize>,
    /// How long each `describe_services` call takes.
    pub(crate) describe_delay: Duration,
    pub(crate) list_calls: AtomicUsize,
    pub(crate) describe_calls: Mutex<Vec<Vec<String>>>,
    pub(crate) describe_started: Mutex<Vec<Instant>>,
}

impl StaticCluster {
    pub(crate) fn with_services(services: Vec<ServiceSnapshot>) -> Self {
        let pages = vec![services.iter().map(|s| s.name.clone()).collect()];
        Self {
            pages,
            services: services.into_iter().map(|s| (s.name.clone(), s)).collect(),
            ..Default::default()
        }
    }

    pub(crate) fn describe_batches(&self) -> Vec<Vec<String>> {
        self.describe_calls.lock().unwrap().clone()
    }

    pub(crate) fn describe_start_times(&self) -> Vec<Instant> {
        self.describe_started.lock().unwrap().clone()
    }
}

#[async_trait]
impl ClusterClient for StaticCluster {
    async fn list_services_page(
        &self,
        cluster: &str,
        next_token: Option<String>,
    ) -> Result<ServicePage, QueryError> {
        let call = self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list_from.is_some_and(|n| call >= n) {
            return Err(QueryError::new("ListServices", cluster, "access denied"));
        }

        let index = next_token
            .map(|t| t.parse::<usize>().unwrap())
            .unwrap_or_default();
        let identifiers = self.pages.get(index).cloned().unwrap_or_default();
        let next_token = (index + 1 < self.pages.len()).then(|| (index + 1).to_string());
        Ok(ServicePage {
            identifiers,
            next_token,
        })
    }

    async fn describe_services(
        &self,
        cluster: &str,
        identifiers: &[String],
    ) -> Result<DescribeOutput, QueryError> {
        let call = {
            let mut calls = self.describe_calls.lock().unwrap();
            calls.push(identifiers.to_vec());
            calls.len() - 1
        };
        self.describe_started.lock().unwrap().push(Instant::now());

        // always suspend once so concurrent callers get a chance to run
        tokio::task::yield_now().await;
        if !self.describe_delay.is_zero() {
            tokio::time::sleep(self.describe_delay).await;
        }

        if self.fail_describe_from.is_some_and(|n| call >= n) {
            return Err(QueryError::new("DescribeServices", cluster, "throttled"));
        }

        let mut output = DescribeOutput::default();
        for id in identifiers {
            match self.services.get(id) {
                Some(service) => output.services.push(service.clone()),
                None => output.failures.push(DescribeFailure {
                    identifier: id.clone(),
                    reason: "MISSING".to_string(),
                }),
            }
        }
        Ok(output)
    }
}

pub(crate) fn service(name: &str, deployment_statuses: &[&str]) -> ServiceSnapshot {
    ServiceSnapshot {
        name: name.to_string(),
        status: "ACTIVE".to_string(),
        desired_count: 2,
        pending_count: 0,
        running_count: 2,
        deployments: deployment_statuses
            .iter()
            .enumerate()
            .map(|(i, status)| Deployment {
                id: format!("ecs-svc/{name}-{i}"),
                status: (*status).to_string(),
                desired_count: 2,
                pending_count: 0,
                running_count: 2,
            })
            .collect(),
        events: Vec::new(),
    }
}

pub(crate) fn event(id: &str, message: &str) -> ServiceEvent {
    ServiceEvent {
        id: id.to_string(),
        message: message.to_string(),
        created_at: Some(1_656_581_409),
    }
}
