// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::error::SinkError;
use crate::statsd::{Event, MetricsSink};

/// Applies the namespace and cluster-wide tags before handing metrics to the sink.
///
/// Every call builds its own tag list, so callers can reuse a base slice across
/// gauges that add different tags without the lists affecting each other.
pub struct MetricEmitter<S> {
    sink: S,
    namespace: String,
    cluster_tag: String,
    extra_tags: Vec<String>,
}

impl<S: MetricsSink> MetricEmitter<S> {
    /// `extra_tags` are appended after the `cluster_name` tag.
    pub fn new(sink: S, cluster: &str, namespace: &str, extra_tags: &[String]) -> Self {
        Self {
            sink,
            namespace: namespace.to_string(),
            cluster_tag: format!("cluster_name:{cluster}"),
            extra_tags: extra_tags.to_vec(),
        }
    }

    /// Sends `<namespace>.<name>` with `tags` plus the cluster tags.
    pub async fn gauge(
        &self,
        name: &str,
        value: f64,
        tags: &[String],
        rate: f64,
    ) -> Result<(), SinkError> {
        let name = format!("{}.{}", self.namespace, name);
        self.sink
            .gauge(&name, value, &self.tagged(tags), rate)
            .await
    }

    /// Sends `<namespace>.<name>` tagged with `cluster_name` only, leaving out
    /// the extra tags.
    pub async fn cluster_gauge(&self, name: &str, value: f64, rate: f64) -> Result<(), SinkError> {
        let name = format!("{}.{}", self.namespace, name);
        self.sink
            .gauge(&name, value, std::slice::from_ref(&self.cluster_tag), rate)
            .await
    }

    pub async fn event(&self, mut event: Event) -> Result<(), SinkError> {
        event.tags = self.tagged(&event.tags);
        self.sink.event(&event).await
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn tagged(&self, tags: &[String]) -> Vec<String> {
        let mut out = Vec::with_capacity(tags.len() + self.extra_tags.len() + 1);
        out.extend_from_slice(tags);
        out.push(self.cluster_tag.clone());
        out.extend_from_slice(&self.extra_tags);
        out
    }
}
