//! Utilities for spinning up a prometheus metrics server.

use crate::PrometheusError;
use metrics_exporter_prometheus::PrometheusBuilder;
use metrics_process::Collector;
use std::{
    net::{IpAddr, SocketAddr, TcpListener},
    thread::{self, sleep},
    time::Duration,
};

/// How often process metrics are refreshed.
const PROCESS_COLLECTION_INTERVAL: Duration = Duration::from_secs(60);

/// Starts a Prometheus metrics server on `addr:port`, returning the bound address.
///
/// A `port` of `0` binds an OS-assigned port.
pub fn init_prometheus_server(addr: IpAddr, port: u16) -> Result<SocketAddr, PrometheusError> {
    let bound = if port == 0 {
        let listener = TcpListener::bind((addr, 0))?;
        listener.local_addr()?
    } else {
        SocketAddr::from((addr, port))
    };

    PrometheusBuilder::new().with_http_listener(bound).install()?;

    // Process metrics such as CPU and memory.
    let collector = Collector::default();
    collector.describe();
    thread::spawn(move || {
        loop {
            collector.collect();
            sleep(PROCESS_COLLECTION_INTERVAL);
        }
    });

    info!(target: "prometheus", "Serving metrics at: http://{bound}");
    Ok(bound)
}
