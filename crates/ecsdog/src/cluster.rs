// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::QueryError;
use crate::model::{DescribeOutput, ServicePage};

/// Read-only view of the orchestration control plane for one cluster.
///
/// Timeouts and retries are the implementation's concern; callers treat any
/// error as final.
#[async_trait]
pub trait ClusterClient: Send + Sync {
    /// Fetches one page of service identifiers. Pass `None` for the first page
    /// and the previous page's `next_token` afterwards.
    async fn list_services_page(
        &self,
        cluster: &str,
        next_token: Option<String>,
    ) -> Result<ServicePage, QueryError>;

    /// Describes at most [`crate::batch::BATCH_SIZE`] services.
    async fn describe_services(
        &self,
        cluster: &str,
        identifiers: &[String],
    ) -> Result<DescribeOutput, QueryError>;
}

#[async_trait]
impl<T> ClusterClient for Arc<T>
where
    T: ClusterClient + ?Sized,
{
    async fn list_services_page(
        &self,
        cluster: &str,
        next_token: Option<String>,
    ) -> Result<ServicePage, QueryError> {
        (**self).list_services_page(cluster, next_token).await
    }

    async fn describe_services(
        &self,
        cluster: &str,
        identifiers: &[String],
    ) -> Result<DescribeOutput, QueryError> {
        (**self).describe_services(cluster, identifiers).await
    }
}
