//! Background sample reader.
//!
//! Owns the serial connection, reads it line by line, and records every line that
//! parses into the shared [`HistoryStore`]. The loop has no stop condition of its
//! own. When the port cannot be opened the thread logs the failure and returns, and
//! the display keeps running on an empty history.
//!
//! The loop itself is generic over [`BufRead`], so it runs the same against a
//! serial port or an in-memory buffer.

use crate::config::SerialConfig;
use crate::error::{RadarError, RadarResult};
use crate::history::{HistoryStore, Sample};
use crate::parser::parse_line;
use serialport::SerialPort;
use std::io::{self, BufRead, BufReader};
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::{debug, error, info, trace, warn};

/// Name of the background thread, visible in log output.
pub const READER_THREAD_NAME: &str = "sample-reader";

/// Counters reported when the read loop ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderStats {
    /// Lines (including empty timeout reads) handed to the parser.
    pub lines: u64,
    /// Lines that became samples.
    pub recorded: u64,
    /// Lines the parser rejected.
    pub rejected: u64,
}

/// Reads lines from a source and publishes parsed samples.
pub struct SampleReader {
    store: HistoryStore,
}

impl SampleReader {
    /// Creates a reader publishing into `store`.
    pub fn new(store: HistoryStore) -> Self {
        Self { store }
    }

    /// Handle a single decoded line. Returns the recorded sample, if any.
    pub fn ingest_line(&self, line: &str) -> Option<Sample> {
        let (angle, distance) = parse_line(line)?;
        let sample = Sample {
            angle,
            distance,
            timestamp: Instant::now(),
        };
        self.store.record(sample);
        trace!(angle, distance, "Recorded sample");
        Some(sample)
    }

    /// Run the read loop until the source reports end of stream or a hard I/O error.
    ///
    /// Read timeouts are not errors: whatever arrived before the timeout (usually
    /// nothing) is treated as a line and goes through the parser like any other.
    pub fn run_on<R: BufRead>(&self, mut source: R) -> RadarResult<ReaderStats> {
        let mut stats = ReaderStats::default();
        let mut buf = Vec::with_capacity(64);

        loop {
            buf.clear();
            match source.read_until(b'\n', &mut buf) {
                Ok(0) => {
                    debug!("End of stream");
                    return Ok(stats);
                }
                Ok(_) => {}
                Err(e) if is_timeout(&e) => {}
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    warn!(error = %e, "Read failed");
                    return Err(e.into());
                }
            }

            let line = decode_permissive(&buf);
            stats.lines += 1;
            if self.ingest_line(&line).is_some() {
                stats.recorded += 1;
            } else {
                stats.rejected += 1;
            }
        }
    }
}

fn is_timeout(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
    )
}

/// Decode bytes as UTF-8, dropping invalid sequences instead of replacing them.
pub fn decode_permissive(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

/// Open the configured serial port with its read timeout.
pub fn open_port(config: &SerialConfig) -> RadarResult<Box<dyn SerialPort>> {
    serialport::new(&config.port, config.baud_rate)
        .timeout(config.timeout())
        .open()
        .map_err(|source| RadarError::SerialOpen {
            port: config.port.clone(),
            source,
        })
}

/// Spawn the background reader on the configured serial port.
///
/// The returned handle may be dropped; the thread is then simply abandoned at exit.
pub fn spawn_serial_reader(
    config: SerialConfig,
    store: HistoryStore,
) -> RadarResult<JoinHandle<()>> {
    let handle = thread::Builder::new()
        .name(READER_THREAD_NAME.to_string())
        .spawn(move || {
            let port = match open_port(&config) {
                Ok(port) => port,
                Err(e) => {
                    error!(port = %config.port, error = %e, "Could not open serial port");
                    return;
                }
            };
            info!(
                port = %config.port,
                baud_rate = config.baud_rate,
                "Connected to serial port"
            );

            match SampleReader::new(store).run_on(BufReader::new(port)) {
                Ok(stats) => info!(?stats, "Serial stream ended"),
                Err(e) => error!(port = %config.port, error = %e, "Sample reader stopped"),
            }
        })?;
    Ok(handle)
}
