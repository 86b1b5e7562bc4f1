//! Shared helpers for the engine suite

#![allow(dead_code)]

pub use patent_client::engine::testing::{corpus, Gate, Item, RecordingTransport, ScriptedProvider};
use patent_client::{Manager, QuerySet, Session};
use std::sync::Arc;

/// Route `patent_client::*` events to the test harness output
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .try_init();
}

/// Unfiltered QuerySet over `provider` plus the transport recording it
pub fn queryset(provider: ScriptedProvider) -> (QuerySet<Item>, RecordingTransport) {
    init_tracing();
    let transport = provider.transport();
    let qs = QuerySet::new(Arc::new(provider), Session::new(transport.clone()));
    (qs, transport)
}

/// Same as [`queryset`], with async requests held at `gate`
pub fn gated(provider: ScriptedProvider, gate: Gate) -> (QuerySet<Item>, RecordingTransport) {
    let transport = provider.transport().with_gate(gate);
    let qs = QuerySet::new(Arc::new(provider), Session::new(transport.clone()));
    (qs, transport)
}

pub fn manager(provider: ScriptedProvider) -> (Manager<Item>, RecordingTransport) {
    let transport = provider.transport();
    let manager = Manager::new(Arc::new(provider), Session::new(transport.clone()));
    (manager, transport)
}

/// `offset` parameter of every recorded request
pub fn requested_offsets(transport: &RecordingTransport) -> Vec<usize> {
    transport
        .requests()
        .iter()
        .filter_map(|r| r.param_value("offset").and_then(|v| v.parse().ok()))
        .collect()
}

pub fn ids(items: &[Item]) -> Vec<String> {
    items.iter().map(|i| i.id.clone()).collect()
}

/// `item-a .. item-(b-1)`
pub fn id_range(a: usize, b: usize) -> Vec<String> {
    (a..b).map(|i| format!("item-{}", i)).collect()
}
