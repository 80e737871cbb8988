// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Drives scrape passes on a fixed interval until one fails.

use std::time::Duration;

use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::cluster::ClusterClient;
use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::scraper::Scraper;
use crate::statsd::MetricsSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduler {
    scrape_interval: Duration,
    /// `None` when the inventory is only listed once at startup.
    refresh_interval: Option<Duration>,
}

impl Scheduler {
    /// A zero `refresh_interval` disables periodic inventory refreshes.
    pub fn new(scrape_interval: Duration, refresh_interval: Duration) -> Self {
        Self {
            scrape_interval,
            refresh_interval: (!refresh_interval.is_zero()).then_some(refresh_interval),
        }
    }

    pub fn from_config(config: &ScraperConfig) -> Self {
        Self::new(config.scrape_interval, config.refresh_interval)
    }

    /// Lists the cluster's services, then scrapes every `scrape_interval`.
    ///
    /// Only returns on error: a failed startup listing or any failed scrape pass
    /// is fatal. Periodic refreshes that fail are logged and the previous
    /// inventory is kept. Passes never overlap; a slow pass delays the next one.
    pub async fn run<C, S>(&self, scraper: &Scraper<C, S>) -> Result<(), ScrapeError>
    where
        C: ClusterClient,
        S: MetricsSink,
    {
        if let Err(e) = scraper.refresh_services().await {
            error!(
                "Failed to list services for cluster {}: {e}",
                scraper.cluster()
            );
            return Err(e);
        }

        let mut scrape_ticker = ticker(self.scrape_interval);
        // discard first tick, which is instantaneous
        scrape_ticker.tick().await;

        let mut refresh_ticker = self.refresh_interval.map(ticker);
        if let Some(refresh_ticker) = refresh_ticker.as_mut() {
            refresh_ticker.tick().await;
        }

        info!(
            "Scraping cluster {} every {:?}",
            scraper.cluster(),
            self.scrape_interval
        );

        loop {
            tokio::select! {
                _ = scrape_ticker.tick() => {
                    debug!("Scraping cluster {}", scraper.cluster());
                    if let Err(e) = scraper.scrape().await {
                        error!("Scrape of cluster {} failed: {e}", scraper.cluster());
                        return Err(e);
                    }
                }
                _ = next_tick(refresh_ticker.as_mut()) => {
                    debug!("Refreshing services for cluster {}", scraper.cluster());
                    if let Err(e) = scraper.refresh_services().await {
                        error!("Failed to refresh services, keeping previous inventory: {e}");
                    }
                }
            }
        }
    }
}

fn ticker(period: Duration) -> Interval {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

async fn next_tick(ticker: Option<&mut Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}
