// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Splits service identifiers into groups small enough for a single
//! `DescribeServices` call.

/// Maximum number of services `DescribeServices` accepts per request.
pub const BATCH_SIZE: usize = 10;

/// Splits `ids` into consecutive batches of at most [`BATCH_SIZE`] entries.
///
/// Order is preserved and only the last batch may be shorter. An empty input
/// produces no batches.
pub fn batches<T>(ids: &[T]) -> Vec<&[T]> {
    ids.chunks(BATCH_SIZE).collect()
}
