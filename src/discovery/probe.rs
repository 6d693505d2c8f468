//! Single-host reachability probe via the system `ping`

use super::{run_tool, HostProbe};
use crate::{Result, ScanError};

/// Marker `ping` prints when the gateway reports the host as gone
const UNREACHABLE_MARKER: &str = "Destination Host Unreachable";

/// Host probe running `ping <host> -c 2 -i 3 -w 10`
#[derive(Debug, Clone)]
pub struct PingProbe {
    command: String,
}

impl PingProbe {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    fn args(host: &str) -> Vec<String> {
        let mut args = vec![host.to_string()];
        args.extend(["-c", "2", "-i", "3", "-w", "10"].iter().map(|a| a.to_string()));
        args
    }

    /// Interpret `ping` output; only the unreachable marker means down
    pub fn interpret(output: &str) -> bool {
        !output.contains(UNREACHABLE_MARKER)
    }
}

impl Default for PingProbe {
    fn default() -> Self {
        Self::new("ping")
    }
}

#[async_trait::async_trait]
impl HostProbe for PingProbe {
    async fn probe(&self, ip: &str) -> Result<bool> {
        let output = run_tool(&self.command, &Self::args(ip))
            .await
            .map_err(|e| ScanError::ProbeError(e.to_string()))?;

        let alive = Self::interpret(&String::from_utf8_lossy(&output.stdout));
        log::debug!("{} probe of {}: alive={}", self.command, ip, alive);
        Ok(alive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_arguments() {
        assert_eq!(
            PingProbe::args("10.0.0.5"),
            vec!["10.0.0.5", "-c", "2", "-i", "3", "-w", "10"]
        );
    }

    #[test]
    fn test_interpret_output() {
        let down = "PING 10.0.0.9 56(84) bytes of data.\n\
                    From 10.0.0.1 icmp_seq=1 Destination Host Unreachable\n";
        assert!(!PingProbe::interpret(down));

        let up = "PING 10.0.0.5 56(84) bytes of data.\n\
                  64 bytes from 10.0.0.5: icmp_seq=1 ttl=64 time=0.412 ms\n";
        assert!(PingProbe::interpret(up));
    }

    #[tokio::test]
    async fn test_missing_tool_is_probe_error() {
        let probe = PingProbe::new("/nonexistent/ping-binary");
        let err = probe.probe("10.0.0.5").await.unwrap_err();
        assert!(matches!(err, ScanError::ProbeError(_)));
        assert!(err.is_recoverable());
    }
}
