// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Metrics sink abstraction and a DogStatsD client that writes datagrams over UDP.
//!
//! The client does no buffering or aggregation: every gauge and event becomes one
//! datagram sent immediately. Sample rates are written through as `@rate` and left
//! to the receiving agent to interpret.

use std::fmt::Write as _;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::net::UdpSocket;
use tracing::{debug, trace};

use crate::error::SinkError;

/// Largest payload a single UDP datagram can carry over IPv4.
pub const MAX_DATAGRAM_SIZE: usize = 65_507;

/// A discrete event, as understood by the DogStatsD `_e` message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    pub title: String,
    pub text: String,
    /// Seconds since the Unix epoch. The agent stamps the event when absent.
    pub timestamp: Option<i64>,
    pub aggregation_key: String,
    pub tags: Vec<String>,
}

/// Destination for gauges and events.
#[async_trait]
pub trait MetricsSink: Send + Sync {
    async fn gauge(
        &self,
        name: &str,
        value: f64,
        tags: &[String],
        rate: f64,
    ) -> Result<(), SinkError>;

    async fn event(&self, event: &Event) -> Result<(), SinkError>;
}

#[async_trait]
impl<T> MetricsSink for Arc<T>
where
    T: MetricsSink + ?Sized,
{
    async fn gauge(
        &self,
        name: &str,
        value: f64,
        tags: &[String],
        rate: f64,
    ) -> Result<(), SinkError> {
        (**self).gauge(name, value, tags, rate).await
    }

    async fn event(&self, event: &Event) -> Result<(), SinkError> {
        (**self).event(event).await
    }
}

/// Sends DogStatsD datagrams to a single agent address.
pub struct DogStatsDClient {
    socket: UdpSocket,
    peer: SocketAddr,
}

impl DogStatsDClient {
    /// Resolves `addr` (e.g. `127.0.0.1:8125`) and connects a UDP socket to it.
    pub async fn connect(addr: &str) -> Result<Self, SinkError> {
        let peer = tokio::net::lookup_host(addr).await?.next().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{addr} did not resolve to any address"),
            )
        })?;
        let local: SocketAddr = if peer.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(local).await?;
        socket.connect(peer).await?;
        debug!("DogStatsD client sending to {peer}");
        Ok(Self { socket, peer })
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Releases the socket.
    pub fn close(self) {
        debug!("Closing DogStatsD client for {}", self.peer);
    }

    async fn send(&self, datagram: String) -> Result<(), SinkError> {
        if datagram.len() > MAX_DATAGRAM_SIZE {
            return Err(SinkError::TooLarge {
                size: datagram.len(),
                limit: MAX_DATAGRAM_SIZE,
            });
        }
        trace!("Sending datagram: {datagram}");
        self.socket.send(datagram.as_bytes()).await?;
        Ok(())
    }
}

#[async_trait]
impl MetricsSink for DogStatsDClient {
    async fn gauge(
        &self,
        name: &str,
        value: f64,
        tags: &[String],
        rate: f64,
    ) -> Result<(), SinkError> {
        self.send(format_gauge(name, value, tags, rate)).await
    }

    async fn event(&self, event: &Event) -> Result<(), SinkError> {
        self.send(format_event(event)).await
    }
}

/// Renders `name:value|g[|@rate][|#tags]`.
pub fn format_gauge(name: &str, value: f64, tags: &[String], rate: f64) -> String {
    let mut out = format!("{name}:{value}|g");
    if rate != 1.0 {
        let _ = write!(out, "|@{rate}");
    }
    push_tags(&mut out, tags);
    out
}

/// Renders `_e{title_len,text_len}:title|text[|d:ts][|k:key][|#tags]`.
pub fn format_event(event: &Event) -> String {
    let title = escape_newlines(&event.title);
    let text = escape_newlines(&event.text);
    let mut out = format!("_e{{{},{}}}:{title}|{text}", title.len(), text.len());
    if let Some(ts) = event.timestamp {
        let _ = write!(out, "|d:{ts}");
    }
    if !event.aggregation_key.is_empty() {
        let _ = write!(out, "|k:{}", event.aggregation_key);
    }
    push_tags(&mut out, &event.tags);
    out
}

fn push_tags(out: &mut String, tags: &[String]) {
    if !tags.is_empty() {
        out.push_str("|#");
        out.push_str(&tags.join(","));
    }
}

fn escape_newlines(s: &str) -> String {
    s.replace('\n', "\\n")
}
