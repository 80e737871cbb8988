// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Mock cluster and sink used by the integration tests

use std::sync::Mutex;

use async_trait::async_trait;
use ecsdog::model::{
    Deployment, DescribeFailure, DescribeOutput, ServiceEvent, ServicePage, ServiceSnapshot,
};
use ecsdog::{ClusterClient, Event, MetricsSink, QueryError, SinkError};

/// Serves a fixed set of services, one page of up to `page_size` identifiers at a time.
pub struct MockCluster {
    pub services: Vec<ServiceSnapshot>,
    pub page_size: usize,
    /// Index of the `describe_services` call that fails, if any.
    pub fail_describe_call: Option<usize>,
    describe_calls: Mutex<Vec<Vec<String>>>,
}

impl MockCluster {
    pub fn new(services: Vec<ServiceSnapshot>) -> Self {
        Self {
            services,
            page_size: 100,
            fail_describe_call: None,
            describe_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn describe_calls(&self) -> Vec<Vec<String>> {
        self.describe_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ClusterClient for MockCluster {
    async fn list_services_page(
        &self,
        _cluster: &str,
        next_token: Option<String>,
    ) -> Result<ServicePage, QueryError> {
        let start: usize = next_token.map(|t| t.parse().unwrap()).unwrap_or(0);
        let end = (start + self.page_size).min(self.services.len());
        Ok(ServicePage {
            identifiers: self.services[start..end]
                .iter()
                .map(|s| s.name.clone())
                .collect(),
            next_token: (end < self.services.len()).then(|| end.to_string()),
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
        if self.fail_describe_call == Some(call) {
            return Err(QueryError::new(
                "DescribeServices",
                cluster,
                "service unavailable",
            ));
        }

        let mut output = DescribeOutput::default();
        for id in identifiers {
            match self.services.iter().find(|s| &s.name == id) {
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

#[derive(Debug, Clone, PartialEq)]
pub struct Gauge {
    pub name: String,
    pub value: f64,
    pub tags: Vec<String>,
}

/// Captures gauges and events in the order they were sent.
#[derive(Default)]
pub struct CapturingSink {
    gauges: Mutex<Vec<Gauge>>,
    events: Mutex<Vec<Event>>,
}

impl CapturingSink {
    pub fn gauges(&self) -> Vec<Gauge> {
        self.gauges.lock().unwrap().clone()
    }

    pub fn gauges_named(&self, name: &str) -> Vec<Gauge> {
        self.gauges()
            .into_iter()
            .filter(|g| g.name == name)
            .collect()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl MetricsSink for CapturingSink {
    async fn gauge(
        &self,
        name: &str,
        value: f64,
        tags: &[String],
        _rate: f64,
    ) -> Result<(), SinkError> {
        self.gauges.lock().unwrap().push(Gauge {
            name: name.to_string(),
            value,
            tags: tags.to_vec(),
        });
        Ok(())
    }

    async fn event(&self, event: &Event) -> Result<(), SinkError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

pub fn service(name: &str, deployment_statuses: &[&str], event_ids: &[&str]) -> ServiceSnapshot {
    ServiceSnapshot {
        name: name.to_string(),
        status: "ACTIVE".to_string(),
        desired_count: 3,
        pending_count: 1,
        running_count: 2,
        deployments: deployment_statuses
            .iter()
            .enumerate()
            .map(|(i, status)| Deployment {
                id: format!("ecs-svc/{i}"),
                status: (*status).to_string(),
                desired_count: 1,
                pending_count: 0,
                running_count: 1,
            })
            .collect(),
        events: event_ids
            .iter()
            .map(|id| ServiceEvent {
                id: (*id).to_string(),
                message: format!("({name}) event {id}"),
                created_at: Some(1_700_000_000),
            })
            .collect(),
    }
}
