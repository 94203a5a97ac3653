//! XTTS bridge: talks to a persistent Python daemon that hosts the Coqui
//! XTTS model, over a Unix socket with length-prefixed JSON frames.
//!
//! The model takes tens of seconds to load, so the daemon loads it once and
//! stays up across requests.

use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::engine::SynthesisEngine;
use crate::error::{Error, Result};

const DEFAULT_SOCKET_PATH: &str = "/tmp/sauti_xtts_daemon.sock";
const DAEMON_START_TIMEOUT_SECS: u64 = 60;

/// Request to the XTTS daemon
#[derive(Debug, Serialize)]
struct BridgeRequest {
    command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    model_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    speaker_wav: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    speed: Option<f32>,
}

impl BridgeRequest {
    fn command(name: &str) -> Self {
        Self {
            command: name.to_string(),
            model_dir: None,
            text: None,
            speaker_wav: None,
            speed: None,
        }
    }
}

/// Response from the XTTS daemon
#[derive(Debug, Deserialize)]
struct BridgeResponse {
    /// Base64-encoded little-endian f32 samples
    samples_b64: Option<String>,
    sample_rate: Option<u32>,
    error: Option<String>,
    status: Option<String>,
}

/// [`SynthesisEngine`] backed by the Python XTTS daemon.
pub struct XttsBridge {
    socket_path: PathBuf,
    daemon_script_path: PathBuf,
    python_cmd: String,
    daemon_process: Mutex<Option<Child>>,
    sample_rate: Option<u32>,
}

impl XttsBridge {
    fn with_defaults() -> Self {
        let base_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

        let socket_path = std::env::var("SAUTI_XTTS_SOCKET")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SOCKET_PATH));
        let daemon_script_path = std::env::var("SAUTI_XTTS_SCRIPT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| base_dir.join("scripts/xtts_daemon.py"));
        let python_cmd = std::env::var("SAUTI_PYTHON").unwrap_or_else(|_| "python3".to_string());

        Self {
            socket_path,
            daemon_script_path,
            python_cmd,
            daemon_process: Mutex::new(None),
            sample_rate: None,
        }
    }

    fn is_daemon_running(&self) -> bool {
        self.socket_path.exists() && self.connect().is_ok()
    }

    fn ensure_daemon_running(&self) -> std::result::Result<(), String> {
        if self.is_daemon_running() {
            debug!("XTTS daemon already running");
            return Ok(());
        }

        info!("Starting XTTS daemon ({:?})", self.daemon_script_path);

        let child = Command::new(&self.python_cmd)
            .arg(&self.daemon_script_path)
            .arg("--socket")
            .arg(&self.socket_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| format!("failed to start XTTS daemon: {}", e))?;

        {
            let mut guard = self.daemon_process.lock().unwrap();
            *guard = Some(child);
        }

        for _ in 0..DAEMON_START_TIMEOUT_SECS * 10 {
            std::thread::sleep(Duration::from_millis(100));
            if self.socket_path.exists() {
                let check = BridgeRequest::command("check");
                if self.call(&check).is_ok() {
                    info!("XTTS daemon up");
                    return Ok(());
                }
            }
        }

        Err(format!(
            "XTTS daemon did not come up within {}s",
            DAEMON_START_TIMEOUT_SECS
        ))
    }

    /// Ask the daemon to drop the socket and exit.
    pub fn shutdown(&self) {
        if let Ok(()) = self.ensure_connected() {
            let _ = self.call(&BridgeRequest::command("shutdown"));
        }
        let mut guard = self.daemon_process.lock().unwrap();
        if let Some(mut child) = guard.take() {
            let _ = child.wait();
        }
    }

    fn ensure_connected(&self) -> std::result::Result<(), String> {
        if self.is_daemon_running() {
            Ok(())
        } else {
            Err("XTTS daemon not running".to_string())
        }
    }

    fn connect(&self) -> std::result::Result<std::os::unix::net::UnixStream, String> {
        std::os::unix::net::UnixStream::connect(&self.socket_path)
            .map_err(|e| format!("failed to connect to XTTS daemon: {}", e))
    }

    /// One length-prefixed JSON round trip with the daemon.
    fn call(&self, request: &BridgeRequest) -> std::result::Result<BridgeResponse, String> {
        let mut stream = self.connect()?;
        stream
            .set_read_timeout(Some(Duration::from_secs(600)))
            .ok();
        stream.set_write_timeout(Some(Duration::from_secs(30))).ok();

        let payload =
            serde_json::to_vec(request).map_err(|e| format!("request serialization: {}", e))?;
        stream
            .write_all(&(payload.len() as u32).to_be_bytes())
            .and_then(|_| stream.write_all(&payload))
            .map_err(|e| format!("write to daemon: {}", e))?;

        let mut length_buf = [0u8; 4];
        stream
            .read_exact(&mut length_buf)
            .map_err(|e| format!("read response length: {}", e))?;
        let mut response_buf = vec![0u8; u32::from_be_bytes(length_buf) as usize];
        stream
            .read_exact(&mut response_buf)
            .map_err(|e| format!("read response: {}", e))?;

        let response: BridgeResponse = serde_json::from_slice(&response_buf)
            .map_err(|e| format!("parse response: {}", e))?;

        if let Some(err) = &response.error {
            return Err(err.clone());
        }
        Ok(response)
    }
}

impl SynthesisEngine for XttsBridge {
    fn load(snapshot_dir: &Path) -> Result<Self> {
        let mut bridge = Self::with_defaults();

        bridge
            .ensure_daemon_running()
            .map_err(Error::ModelLoadError)?;

        let mut request = BridgeRequest::command("load");
        request.model_dir = Some(snapshot_dir.to_string_lossy().to_string());

        let response = bridge.call(&request).map_err(Error::ModelLoadError)?;
        if response.status.as_deref() != Some("ok") {
            return Err(Error::ModelLoadError(
                "daemon did not acknowledge model load".to_string(),
            ));
        }
        bridge.sample_rate = response.sample_rate;

        Ok(bridge)
    }

    fn synthesize(
        &self,
        text: &str,
        speaker_wav: Option<&Path>,
        speed: Option<f32>,
    ) -> Result<Vec<f32>> {
        let mut request = BridgeRequest::command("synthesize");
        request.text = Some(text.to_string());
        request.speaker_wav = speaker_wav.map(|p| p.to_string_lossy().to_string());
        request.speed = speed;

        let response = self.call(&request).map_err(Error::SynthesisError)?;

        let samples_b64 = response
            .samples_b64
            .ok_or_else(|| Error::SynthesisError("no samples in daemon response".to_string()))?;
        let raw = BASE64
            .decode(samples_b64.as_bytes())
            .map_err(|e| Error::SynthesisError(format!("bad sample payload: {}", e)))?;
        if raw.len() % 4 != 0 {
            return Err(Error::SynthesisError(format!(
                "sample payload length {} not a multiple of 4",
                raw.len()
            )));
        }

        let samples = raw
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect::<Vec<f32>>();
        debug!("Daemon returned {} samples", samples.len());

        Ok(samples)
    }

    fn output_sample_rate(&self) -> Option<u32> {
        self.sample_rate
    }
}
