// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use ecsdog::config::{
    parse_metric_namespace, parse_tags, DEFAULT_NAMESPACE, DEFAULT_REFRESH_INTERVAL,
    DEFAULT_SCRAPE_INTERVAL, DEFAULT_STATSD_ADDR,
};
use ecsdog::{DogStatsDClient, EcsClusterClient, MetricEmitter, Scheduler, Scraper, ScraperConfig};

/// Scrapes ECS service metrics for one cluster and sends them to DogStatsD.
#[derive(Debug, Parser)]
#[command(name = "ecsdog-agent", version)]
struct Args {
    /// Cluster to scrape metrics from
    #[arg(long, env = "ECS_CLUSTER")]
    cluster: String,

    /// DogStatsD address
    #[arg(long = "statsd", env = "DD_DOGSTATSD_ADDR", default_value = DEFAULT_STATSD_ADDR)]
    statsd_addr: String,

    /// Namespace prepended to every metric name
    #[arg(long, env = "DD_STATSD_METRIC_NAMESPACE", default_value = DEFAULT_NAMESPACE)]
    namespace: String,

    /// Extra key:value tags added to every metric and event
    #[arg(long, env = "DD_TAGS", default_value = "")]
    tags: String,

    /// Seconds between scrape passes
    #[arg(
        long,
        env = "ECSDOG_SCRAPE_INTERVAL_SECS",
        default_value_t = DEFAULT_SCRAPE_INTERVAL.as_secs()
    )]
    scrape_interval: u64,

    /// Seconds between service list refreshes, 0 to list only at startup
    #[arg(
        long,
        env = "ECSDOG_REFRESH_INTERVAL_SECS",
        default_value_t = DEFAULT_REFRESH_INTERVAL.as_secs()
    )]
    refresh_interval: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "DD_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Args {
    fn into_config(self) -> ScraperConfig {
        ScraperConfig {
            cluster: self.cluster,
            statsd_addr: self.statsd_addr,
            metric_namespace: parse_metric_namespace(&self.namespace)
                .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()),
            tags: parse_tags(&self.tags),
            scrape_interval: Duration::from_secs(self.scrape_interval),
            refresh_interval: Duration::from_secs(self.refresh_interval),
            log_level: self.log_level.to_lowercase(),
        }
    }
}

#[tokio::main]
pub async fn main() {
    let config = Args::parse().into_config();

    let env_filter = format!(
        "h2=off,hyper=off,rustls=off,aws_smithy_runtime=off,aws_config=off,{}",
        config.log_level
    );

    #[allow(clippy::expect_used)]
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_new(env_filter).expect("could not parse log level in configuration"),
        )
        .with_level(true)
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(true)
        .finish();

    #[allow(clippy::expect_used)]
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    debug!("Logging subsystem enabled");

    if let Err(e) = run(config).await {
        error!("ecsdog-agent stopped: {e:#}");
        std::process::exit(1);
    }
}

async fn run(config: ScraperConfig) -> anyhow::Result<()> {
    config.validate()?;

    let sink = DogStatsDClient::connect(&config.statsd_addr)
        .await
        .with_context(|| format!("connecting to DogStatsD at {}", config.statsd_addr))?;
    let client = EcsClusterClient::from_env().await;

    info!(
        "Starting ecsdog-agent for cluster {}, sending to {}",
        config.cluster,
        sink.peer()
    );

    let emitter = MetricEmitter::new(
        sink,
        &config.cluster,
        &config.metric_namespace,
        &config.tags,
    );
    let scraper = Scraper::new(config.cluster.clone(), client, emitter);

    let result = Scheduler::from_config(&config).run(&scraper).await;
    scraper.into_sink().close();
    result.with_context(|| format!("scraping cluster {}", config.cluster))
}
