//! Container runtime usage via `docker system df`.

use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant, SystemTime};

use super::size::{parse_docker_reclaimable, parse_docker_size};
use super::DockerProbe;
use crate::catalog::Category;
use crate::error::ProbeError;
use crate::scanner::ScanHit;

/// One row of `docker system df` (images, containers, volumes, build cache).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DockerUsageEntry {
    pub kind: String,
    pub size_kb: u64,
    pub reclaimable_kb: u64,
}

/// Usage as reported by the container runtime itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DockerUsage {
    pub entries: Vec<DockerUsageEntry>,
    pub total_kb: u64,
    pub reclaimable_kb: u64,
}

impl DockerUsage {
    /// One hit per reported row under the `docker` category.
    ///
    /// Rows are sized by their reclaimable space when the runtime reports any,
    /// otherwise by their total size.
    pub fn to_hits(&self, discovered_at: SystemTime) -> Vec<ScanHit> {
        let use_reclaimable = self.reclaimable_kb > 0;
        self.entries
            .iter()
            .map(|entry| ScanHit {
                category: Category::Docker,
                path: PathBuf::from(format!(
                    "docker://{}",
                    entry.kind.to_lowercase().replace(' ', "-")
                )),
                size_kb: if use_reclaimable {
                    entry.reclaimable_kb
                } else {
                    entry.size_kb
                },
                approximate: false,
                discovered_at,
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct DfLine {
    #[serde(rename = "Type", default)]
    kind: String,
    #[serde(rename = "Size", default)]
    size: String,
    #[serde(rename = "Reclaimable", default)]
    reclaimable: String,
}

/// Parse `docker system df --format '{{json .}}'` output: one JSON object
/// per line. Lines that are not valid rows are skipped.
pub fn parse_docker_df(output: &str) -> DockerUsage {
    let mut usage = DockerUsage::default();

    for line in output.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let row: DfLine = match serde_json::from_str(line) {
            Ok(row) => row,
            Err(e) => {
                tracing::debug!(error = %e, line, "Skipping unparsable docker df line");
                continue;
            }
        };
        let size_kb = parse_docker_size(&row.size).unwrap_or(0);
        let reclaimable_kb = parse_docker_reclaimable(&row.reclaimable).unwrap_or(0);
        usage.total_kb += size_kb;
        usage.reclaimable_kb += reclaimable_kb;
        usage.entries.push(DockerUsageEntry {
            kind: row.kind,
            size_kb,
            reclaimable_kb,
        });
    }

    usage
}

/// Queries the `docker` command line client.
#[derive(Debug, Clone)]
pub struct DockerCli {
    binary: String,
    timeout: Duration,
}

impl DockerCli {
    pub fn new() -> Self {
        Self {
            binary: "docker".to_string(),
            timeout: Duration::from_secs(15),
        }
    }

    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new()
    }
}

impl DockerProbe for DockerCli {
    fn usage(&self) -> Result<DockerUsage, ProbeError> {
        let out = run_with_timeout(
            &self.binary,
            &["system", "df", "--format", "{{json .}}"],
            self.timeout,
        )?;
        Ok(parse_docker_df(&out))
    }
}

/// Run a command and return its stdout, killing it once `timeout` passes.
fn run_with_timeout(program: &str, args: &[&str], timeout: Duration) -> Result<String, ProbeError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| ProbeError::Unavailable(format!("{}: {}", program, e)))?;

    let mut stdout = child
        .stdout
        .take()
        .ok_or_else(|| ProbeError::Unavailable(format!("{}: no stdout", program)))?;
    let reader = std::thread::spawn(move || {
        let mut out = String::new();
        stdout.read_to_string(&mut out).map(|_| out)
    });

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(ProbeError::Timeout(timeout));
            }
            Ok(None) => std::thread::sleep(Duration::from_millis(20)),
            Err(e) => return Err(ProbeError::Unavailable(format!("{}: {}", program, e))),
        }
    };

    let out = reader
        .join()
        .map_err(|_| ProbeError::Parse(format!("{}: output reader panicked", program)))?
        .map_err(|e| ProbeError::Parse(format!("{}: {}", program, e)))?;

    if !status.success() {
        return Err(ProbeError::Unavailable(format!(
            "{} exited with {}",
            program, status
        )));
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DF_OUTPUT: &str = r#"{"Active":"2","Reclaimable":"5.5GB (61%)","Size":"9GB","TotalCount":"14","Type":"Images"}
{"Active":"1","Reclaimable":"0B (0%)","Size":"12MB","TotalCount":"3","Type":"Containers"}
not json at all
{"Active":"0","Reclaimable":"512MB (100%)","Size":"512MB","TotalCount":"2","Type":"Local Volumes"}

{"Active":"0","Reclaimable":"1GB","Size":"1GB","TotalCount":"40","Type":"Build Cache"}
"#;

    #[test]
    fn test_parse_docker_df() {
        let usage = parse_docker_df(DF_OUTPUT);
        assert_eq!(usage.entries.len(), 4);
        assert_eq!(usage.entries[0].kind, "Images");
        assert_eq!(usage.entries[1].size_kb, 12 * 1024);
        assert_eq!(usage.entries[2].reclaimable_kb, 512 * 1024);
        assert_eq!(
            usage.total_kb,
            usage.entries.iter().map(|e| e.size_kb).sum::<u64>()
        );
        assert_eq!(
            usage.reclaimable_kb,
            usage.entries.iter().map(|e| e.reclaimable_kb).sum::<u64>()
        );
    }

    #[test]
    fn test_parse_empty_output() {
        assert_eq!(parse_docker_df(""), DockerUsage::default());
    }

    #[test]
    fn test_hits_prefer_reclaimable() {
        let usage = parse_docker_df(DF_OUTPUT);
        let hits = usage.to_hits(SystemTime::UNIX_EPOCH);
        assert_eq!(hits.len(), 4);
        assert!(hits.iter().all(|h| h.category == Category::Docker));
        assert_eq!(hits[1].size_kb, 0);
        assert_eq!(hits[2].path, PathBuf::from("docker://local-volumes"));
        assert_eq!(
            hits.iter().map(|h| h.size_kb).sum::<u64>(),
            usage.reclaimable_kb
        );
    }

    #[test]
    fn test_hits_fall_back_to_size() {
        let usage = parse_docker_df(
            r#"{"Reclaimable":"0B (0%)","Size":"2GB","Type":"Images"}"#,
        );
        let hits = usage.to_hits(SystemTime::UNIX_EPOCH);
        assert_eq!(hits[0].size_kb, 2 * 1024 * 1024);
    }

    #[test]
    fn test_missing_binary_is_unavailable() {
        let probe = DockerCli::new().with_binary("rusty-reclaim-no-such-binary-xyz");
        let err = probe.usage().unwrap_err();
        assert!(matches!(err, ProbeError::Unavailable(_)));
    }

    #[test]
    fn test_failing_command_is_unavailable() {
        let err = run_with_timeout("false", &[], Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, ProbeError::Unavailable(_)));
    }

    #[test]
    fn test_run_with_timeout_success() {
        let out = run_with_timeout("echo", &["hello"], Duration::from_secs(5)).unwrap();
        assert_eq!(out.trim(), "hello");
    }

    #[test]
    fn test_run_with_timeout_kills_slow_command() {
        let err = run_with_timeout("sleep", &["5"], Duration::from_millis(100)).unwrap_err();
        assert!(matches!(err, ProbeError::Timeout(_)));
    }
}
