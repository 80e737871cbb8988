// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

/// A call to the cluster query service failed.
#[derive(Debug, thiserror::Error)]
#[error("{operation} failed for cluster {cluster}: {message}")]
pub struct QueryError {
    pub operation: &'static str,
    pub cluster: String,
    pub message: String,
}

impl QueryError {
    pub fn new(operation: &'static str, cluster: &str, message: impl Into<String>) -> Self {
        Self {
            operation,
            cluster: cluster.to_string(),
            message: message.into(),
        }
    }
}

/// A metric or event could not be handed to the metrics sink.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("Failed to send datagram: {0}")]
    Io(#[from] std::io::Error),

    #[error("Datagram of {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },
}

/// Errors surfaced by an inventory refresh, a scrape pass or the scheduler loop.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Errors produced while building or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
