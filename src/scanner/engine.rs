//! Scan engine: runs the sources, merges their results and writes records

use crate::config::ScanConfig;
use crate::discovery::{
    parse_neighbor_line, DnsResolver, FpingSweep, HostProbe, HostnameResolver, IpNeighborTable,
    LivenessMap, LivenessSource, NeighborSource, PingProbe, UNRESOLVED_HOSTNAME,
};
use crate::inventory::{HostEntry, ScanContext};
use crate::scanner::ScanSummary;
use crate::storage::InventorySink;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Main scan engine
///
/// One call to [`ScanEngine::scan`] is one complete scan: the liveness sweep
/// runs in a background task while the neighbor table is read, and the merge
/// only starts once the sweep's map has been handed back.
pub struct ScanEngine {
    config: ScanConfig,
    neighbors: Arc<dyn NeighborSource>,
    liveness: Arc<dyn LivenessSource>,
    resolver: Arc<dyn HostnameResolver>,
    probe: Option<Arc<dyn HostProbe>>,
    sink: Arc<dyn InventorySink>,
}

impl ScanEngine {
    /// Create an engine using the system tools named in the configuration
    pub fn new(config: ScanConfig, sink: Arc<dyn InventorySink>) -> crate::Result<Self> {
        let neighbors = Arc::new(IpNeighborTable::new(config.ip_command.clone()));
        let liveness = Arc::new(FpingSweep::new(config.fping_command.clone(), config.fping_retries));
        let probe: Option<Arc<dyn HostProbe>> = if config.ping_hosts {
            Some(Arc::new(PingProbe::new(config.ping_command.clone())))
        } else {
            None
        };

        let engine = Self::with_sources(config, neighbors, liveness, Arc::new(DnsResolver::new()), sink)?;
        Ok(Self { probe, ..engine })
    }

    /// Create an engine from explicit sources
    pub fn with_sources(
        config: ScanConfig,
        neighbors: Arc<dyn NeighborSource>,
        liveness: Arc<dyn LivenessSource>,
        resolver: Arc<dyn HostnameResolver>,
        sink: Arc<dyn InventorySink>,
    ) -> crate::Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            neighbors,
            liveness,
            resolver,
            probe: None,
            sink,
        })
    }

    /// Probe hosts the sweep did not report
    pub fn with_probe(mut self, probe: Arc<dyn HostProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Run one scan stamped with the current time and local hostname
    pub async fn scan(&self) -> crate::Result<ScanSummary> {
        self.scan_with_context(ScanContext::capture()).await
    }

    /// Run one scan with a caller-provided context
    pub async fn scan_with_context(&self, context: ScanContext) -> crate::Result<ScanSummary> {
        let subnet = self.config.network()?;
        log::info!(
            "Starting scan of {} into {} at {}",
            subnet,
            self.sink.table_name(),
            context.scan_time
        );

        let liveness = Arc::clone(&self.liveness);
        let sweep = tokio::spawn(async move { liveness.sweep(&subnet).await });

        let dump = match self.neighbors.dump().await {
            Ok(dump) => dump,
            Err(e) => {
                log::error!("{} dump failed: {}", self.neighbors.source_name(), e);
                sweep.abort();
                return Err(e);
            }
        };

        if self.config.create_table {
            if let Err(e) = self.sink.create_table().await {
                sweep.abort();
                return Err(e);
            }
        }

        let liveness = self.join_sweep(sweep).await;

        let mut summary = ScanSummary::new(context.scan_time);
        summary.swept = liveness.len();

        for line in String::from_utf8_lossy(&dump).lines() {
            summary.lines_seen += 1;

            let neighbor = match parse_neighbor_line(line) {
                Ok(neighbor) => neighbor,
                Err(e) => {
                    log::warn!("Error parsing: {}", e);
                    summary.skipped += 1;
                    continue;
                }
            };

            let hostname = self.resolve(&neighbor.ip).await;
            let alive = self.liveness_flag(&neighbor.ip, &liveness).await;
            log::debug!(
                "{} {} {} alive={} {}",
                neighbor.ip,
                hostname,
                neighbor.state,
                alive,
                context.scan_time
            );

            let entry = HostEntry::merge(neighbor, hostname, alive, &context);
            if let Err(e) = self.sink.insert(&entry).await {
                log::error!("Record insert error after {} rows: {}", summary.inserted, e);
                return Err(e);
            }

            summary.inserted += 1;
            if !entry.is_resolved() {
                summary.unresolved += 1;
            }
            if entry.ping {
                summary.alive += 1;
            }
        }

        log::info!(
            "Scan finished: {} lines, {} inserted, {} skipped",
            summary.lines_seen,
            summary.inserted,
            summary.skipped
        );
        Ok(summary)
    }

    /// Wait for the sweep; a failed sweep leaves every host flagged down
    async fn join_sweep(&self, sweep: JoinHandle<crate::Result<LivenessMap>>) -> LivenessMap {
        match sweep.await {
            Ok(Ok(map)) => map,
            Ok(Err(e)) => {
                log::warn!(
                    "Liveness sweep via {} failed, no host will be flagged alive: {}",
                    self.liveness.source_name(),
                    e
                );
                LivenessMap::new()
            }
            Err(e) => {
                log::warn!("Liveness sweep task did not complete: {}", e);
                LivenessMap::new()
            }
        }
    }

    async fn resolve(&self, ip: &str) -> String {
        match self.resolver.resolve(ip).await {
            Ok(hostname) => hostname,
            Err(e) => {
                log::warn!("Cannot resolve {}: {}", ip, e);
                UNRESOLVED_HOSTNAME.to_string()
            }
        }
    }

    async fn liveness_flag(&self, ip: &str, liveness: &LivenessMap) -> bool {
        if liveness.contains(ip) {
            return liveness.is_alive(ip);
        }

        let Some(probe) = &self.probe else {
            return false;
        };

        match probe.probe(ip).await {
            Ok(alive) => {
                log::info!("Probe of {}: {}", ip, if alive { "alive" } else { "down" });
                alive
            }
            Err(e) => {
                log::warn!("Cannot ping {}: {}", ip, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{ConsoleSink, TableLayout};
    use crate::ScanError;
    use ipnetwork::IpNetwork;

    struct StaticNeighbors(&'static str);

    #[async_trait::async_trait]
    impl NeighborSource for StaticNeighbors {
        async fn dump(&self) -> crate::Result<Vec<u8>> {
            Ok(self.0.as_bytes().to_vec())
        }

        fn source_name(&self) -> &str {
            "static"
        }
    }

    struct FailingSweep;

    #[async_trait::async_trait]
    impl LivenessSource for FailingSweep {
        async fn sweep(&self, _subnet: &IpNetwork) -> crate::Result<LivenessMap> {
            Err(ScanError::CommandError("fping not installed".to_string()))
        }

        fn source_name(&self) -> &str {
            "failing"
        }
    }

    struct NoDns;

    #[async_trait::async_trait]
    impl HostnameResolver for NoDns {
        async fn resolve(&self, ip: &str) -> crate::Result<String> {
            Err(ScanError::ResolveError(ip.to_string()))
        }
    }

    struct AlwaysUp;

    #[async_trait::async_trait]
    impl HostProbe for AlwaysUp {
        async fn probe(&self, _ip: &str) -> crate::Result<bool> {
            Ok(true)
        }
    }

    fn engine(dump: &'static str) -> ScanEngine {
        ScanEngine::with_sources(
            ScanConfig::default(),
            Arc::new(StaticNeighbors(dump)),
            Arc::new(FailingSweep),
            Arc::new(NoDns),
            Arc::new(ConsoleSink::new(Vec::new(), "ScanIntranet", TableLayout::Extended)),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_failed_sweep_flags_everything_down() {
        let summary = engine("10.0.0.5 dev eth0 lladdr aa:bb:cc:dd:ee:ff REACHABLE\n")
            .scan()
            .await
            .unwrap();

        assert_eq!(summary.inserted, 1);
        assert_eq!(summary.alive, 0);
        assert_eq!(summary.swept, 0);
        assert_eq!(summary.unresolved, 1);
    }

    #[tokio::test]
    async fn test_probe_fills_unswept_hosts() {
        let summary = engine("10.0.0.5 dev eth0 lladdr aa:bb:cc:dd:ee:ff REACHABLE\n")
            .with_probe(Arc::new(AlwaysUp))
            .scan()
            .await
            .unwrap();

        assert_eq!(summary.alive, 1);
    }

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        let config = ScanConfig::default().with_subnet("bogus".to_string());
        let result = ScanEngine::with_sources(
            config,
            Arc::new(StaticNeighbors("")),
            Arc::new(FailingSweep),
            Arc::new(NoDns),
            Arc::new(ConsoleSink::new(Vec::new(), "ScanIntranet", TableLayout::Basic)),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_new_installs_probe_only_when_enabled() {
        let sink: Arc<dyn InventorySink> =
            Arc::new(ConsoleSink::new(Vec::new(), "ScanIntranet", TableLayout::Extended));

        let engine = ScanEngine::new(ScanConfig::default(), Arc::clone(&sink)).unwrap();
        assert!(engine.probe.is_none());

        let engine = ScanEngine::new(ScanConfig::default().with_ping_hosts(true), sink).unwrap();
        assert!(engine.probe.is_some());
    }
}
