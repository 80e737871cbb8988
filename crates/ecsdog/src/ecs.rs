// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! [`ClusterClient`] backed by the AWS ECS API.

use async_trait::async_trait;
use aws_sdk_ecs::error::DisplayErrorContext;
use aws_sdk_ecs::types;
use tracing::debug;

use crate::cluster::ClusterClient;
use crate::error::QueryError;
use crate::model::{
    Deployment, DescribeFailure, DescribeOutput, ServiceEvent, ServicePage, ServiceSnapshot,
};

pub struct EcsClusterClient {
    client: aws_sdk_ecs::Client,
}

impl EcsClusterClient {
    pub fn new(client: aws_sdk_ecs::Client) -> Self {
        Self { client }
    }

    /// Builds a client from the default AWS credential and region chain.
    pub async fn from_env() -> Self {
        let config = aws_config::load_from_env().await;
        Self::new(aws_sdk_ecs::Client::new(&config))
    }
}

#[async_trait]
impl ClusterClient for EcsClusterClient {
    async fn list_services_page(
        &self,
        cluster: &str,
        next_token: Option<String>,
    ) -> Result<ServicePage, QueryError> {
        let output = self
            .client
            .list_services()
            .cluster(cluster)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| {
                QueryError::new("ListServices", cluster, DisplayErrorContext(&e).to_string())
            })?;

        Ok(ServicePage {
            identifiers: output.service_arns().to_vec(),
            next_token: output.next_token().map(str::to_string),
        })
    }

    async fn describe_services(
        &self,
        cluster: &str,
        identifiers: &[String],
    ) -> Result<DescribeOutput, QueryError> {
        let output = self
            .client
            .describe_services()
            .cluster(cluster)
            .set_services(Some(identifiers.to_vec()))
            .send()
            .await
            .map_err(|e| {
                QueryError::new(
                    "DescribeServices",
                    cluster,
                    DisplayErrorContext(&e).to_string(),
                )
            })?;

        Ok(DescribeOutput {
            services: output.services().iter().map(service_snapshot).collect(),
            failures: output.failures().iter().map(describe_failure).collect(),
        })
    }
}

fn service_snapshot(service: &types::Service) -> ServiceSnapshot {
    let name = service.service_name().unwrap_or_default().to_string();
    let events = service
        .events()
        .iter()
        .filter_map(|event| {
            let Some(id) = event.id() else {
                debug!("Dropping event without id for service {name}");
                return None;
            };
            Some(ServiceEvent {
                id: id.to_string(),
                message: event.message().unwrap_or_default().to_string(),
                created_at: event.created_at().map(|ts| ts.secs()),
            })
        })
        .collect();

    ServiceSnapshot {
        status: service.status().unwrap_or_default().to_string(),
        desired_count: i64::from(service.desired_count()),
        pending_count: i64::from(service.pending_count()),
        running_count: i64::from(service.running_count()),
        deployments: service.deployments().iter().map(deployment).collect(),
        events,
        name,
    }
}

fn deployment(deployment: &types::Deployment) -> Deployment {
    Deployment {
        id: deployment.id().unwrap_or_default().to_string(),
        status: deployment.status().unwrap_or_default().to_string(),
        desired_count: i64::from(deployment.desired_count()),
        pending_count: i64::from(deployment.pending_count()),
        running_count: i64::from(deployment.running_count()),
    }
}

fn describe_failure(failure: &types::Failure) -> DescribeFailure {
    DescribeFailure {
        identifier: failure.arn().unwrap_or_default().to_string(),
        reason: failure.reason().unwrap_or_default().to_string(),
    }
}
