//! Timer-driven encoder.
//!
//! Emits one cluster per timeslice from a dedicated worker thread. A cluster
//! is a 12-byte header (elapsed ms as u64 LE, payload length as u32 LE)
//! followed by a zeroed payload sized from the target bitrate. The first
//! cluster is preceded by a container header carrying the MIME type.
//! No pixels or samples are encoded.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use lens_capture_core::models::error::RecorderError;
use lens_capture_core::models::media::MediaStream;
use lens_capture_core::traits::media_encoder::{
    EncoderEvent, EncoderOptions, MediaEncoder, MediaEncoderFactory,
};

pub const CONTAINER_MAGIC: &[u8; 4] = b"LCK1";

pub const CLUSTER_HEADER_LEN: usize = 12;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Builds [`TimedEncoder`]s for a fixed set of MIME types.
#[derive(Debug, Clone)]
pub struct TimedEncoderFactory {
    supported: Vec<String>,
}

impl TimedEncoderFactory {
    pub fn new(supported: Vec<String>) -> Self {
        Self { supported }
    }
}

impl Default for TimedEncoderFactory {
    /// VP8 and plain WebM, no VP9 or H.264.
    fn default() -> Self {
        Self::new(vec!["video/webm;codecs=vp8".into(), "video/webm".into()])
    }
}

impl MediaEncoderFactory for TimedEncoderFactory {
    fn is_supported(&self) -> bool {
        true
    }

    fn is_type_supported(&self, mime_type: &str) -> bool {
        self.supported
            .iter()
            .any(|t| t.eq_ignore_ascii_case(mime_type))
    }

    fn create(
        &self,
        stream: &MediaStream,
        options: EncoderOptions,
    ) -> Result<Box<dyn MediaEncoder>, RecorderError> {
        if !self.is_type_supported(&options.mime_type) {
            return Err(RecorderError::RecorderInitFailure(format!(
                "unsupported mime type {}",
                options.mime_type
            )));
        }
        if stream.video_tracks().count() != 1 {
            return Err(RecorderError::RecorderInitFailure(
                "stream must carry exactly one video track".into(),
            ));
        }
        Ok(Box::new(TimedEncoder::new(options)))
    }
}

/// Encoder that emits a bitrate-sized cluster every timeslice.
pub struct TimedEncoder {
    options: EncoderOptions,
    running: Arc<AtomicBool>,
    worker: Option<thread::JoinHandle<()>>,
}

impl TimedEncoder {
    pub fn new(options: EncoderOptions) -> Self {
        Self {
            options,
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl MediaEncoder for TimedEncoder {
    fn start(
        &mut self,
        timeslice: Duration,
        events: Sender<EncoderEvent>,
    ) -> Result<(), RecorderError> {
        if self.worker.is_some() {
            return Err(RecorderError::RecorderStartFailure(
                "encoder already started".into(),
            ));
        }
        if timeslice.is_zero() {
            return Err(RecorderError::RecorderStartFailure(
                "timeslice must be positive".into(),
            ));
        }

        self.running.store(true, Ordering::SeqCst);
        let running = Arc::clone(&self.running);
        let header = container_header(&self.options.mime_type);
        let bits_per_second = self.options.video_bits_per_second;

        let handle = thread::Builder::new()
            .name("timed-encoder".into())
            .spawn(move || {
                encode_loop(running, timeslice, header, bits_per_second, events);
            })
            .map_err(|e| {
                self.running.store(false, Ordering::SeqCst);
                RecorderError::RecorderStartFailure(format!("failed to spawn encoder thread: {}", e))
            })?;

        self.worker = Some(handle);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), RecorderError> {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                return Err(RecorderError::Encoder("encoder thread panicked".into()));
            }
        }
        Ok(())
    }
}

impl Drop for TimedEncoder {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

/// Worker loop. Flushes the partial cluster and sends `Stopped` once
/// `running` is cleared.
fn encode_loop(
    running: Arc<AtomicBool>,
    timeslice: Duration,
    header: Vec<u8>,
    bits_per_second: u32,
    events: Sender<EncoderEvent>,
) {
    let started = Instant::now();
    let mut last_emit = started;
    let mut header = Some(header);

    while running.load(Ordering::SeqCst) {
        thread::sleep(POLL_INTERVAL.min(timeslice));

        let span = last_emit.elapsed();
        if span < timeslice {
            continue;
        }
        last_emit = Instant::now();
        let chunk = build_cluster(header.take(), started.elapsed(), span, bits_per_second);
        if events.send(EncoderEvent::DataAvailable(chunk)).is_err() {
            log::debug!("Encoder event receiver dropped, exiting");
            return;
        }
    }

    let span = last_emit.elapsed();
    if !span.is_zero() || header.is_some() {
        let chunk = build_cluster(header.take(), started.elapsed(), span, bits_per_second);
        let _ = events.send(EncoderEvent::DataAvailable(chunk));
    }
    let _ = events.send(EncoderEvent::Stopped);
}

fn container_header(mime_type: &str) -> Vec<u8> {
    let mime = mime_type.as_bytes();
    let mut header = Vec::with_capacity(CONTAINER_MAGIC.len() + 2 + mime.len());
    header.extend_from_slice(CONTAINER_MAGIC);
    header.extend_from_slice(&(mime.len() as u16).to_le_bytes());
    header.extend_from_slice(mime);
    header
}

/// Cluster covering `span` of wall time, optionally prefixed by the container header.
fn build_cluster(
    header: Option<Vec<u8>>,
    timestamp: Duration,
    span: Duration,
    bits_per_second: u32,
) -> Vec<u8> {
    let payload_len = (bits_per_second as u64 * span.as_millis() as u64 / 8000) as usize;
    let mut chunk = header.unwrap_or_default();
    chunk.reserve(CLUSTER_HEADER_LEN + payload_len);
    chunk.extend_from_slice(&(timestamp.as_millis() as u64).to_le_bytes());
    chunk.extend_from_slice(&(payload_len as u32).to_le_bytes());
    chunk.resize(chunk.len() + payload_len, 0);
    chunk
}
