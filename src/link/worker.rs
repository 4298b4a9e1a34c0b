//! Serial link worker - owns the connection and its read loop
//!
//! Exactly one component reads the connection: the worker's dedicated
//! thread. Writes may come from any logical caller and serialize
//! through the `LinkWriter` mutex so two senders never interleave
//! partial lines.

use super::line::LineAssembler;
use super::LinkError;
use crate::core::config::SerialConfig;
use crate::core::events::LinkEvent;
use parking_lot::Mutex;
use serialport::SerialPort;
use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Read chunk size; lines are far shorter than this
const READ_CHUNK: usize = 64;

/// Read half of the connection. `read_chunk` blocks for at most the
/// configured timeout; an expired timeout is reported as `Ok(0)`.
pub trait LinkReader: Send {
    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// Write half of the connection.
pub trait PortWriter: Send {
    fn write_all(&mut self, data: &[u8]) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
}

struct SerialReader(Box<dyn SerialPort>);

impl LinkReader for SerialReader {
    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.0.read(buf) {
            Ok(n) => Ok(n),
            // An expired read timeout is not an error, just an empty read
            Err(e) if e.kind() == io::ErrorKind::TimedOut => Ok(0),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(0),
            Err(e) => Err(e),
        }
    }
}

struct SerialWriter(Box<dyn SerialPort>);

impl PortWriter for SerialWriter {
    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.0.write_all(data)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

/// Open the serial port and split it into read and write halves.
///
/// After opening, waits out the settle delay and flushes the input
/// buffer so stale bytes from before the handshake are not parsed.
fn open_port(
    config: &SerialConfig,
    port_name: &str,
) -> Result<(Box<dyn LinkReader>, Box<dyn PortWriter>), LinkError> {
    let port = serialport::new(port_name, config.baud_rate)
        .timeout(Duration::from_millis(config.read_timeout_ms))
        .open()?;

    thread::sleep(Duration::from_millis(config.settle_delay_ms));
    port.clear(serialport::ClearBuffer::Input)?;

    let writer = port.try_clone()?;
    Ok((Box::new(SerialReader(port)), Box::new(SerialWriter(writer))))
}

/// Thread-safe write handle to the connection.
///
/// All writers share one mutex; each `write_line` emits one complete
/// newline-terminated line under the lock.
#[derive(Clone)]
pub struct LinkWriter {
    inner: Arc<Mutex<Option<Box<dyn PortWriter>>>>,
}

impl LinkWriter {
    fn empty() -> Self {
        Self {
            inner: Arc::new(Mutex::new(None)),
        }
    }

    fn install(&self, writer: Box<dyn PortWriter>) {
        *self.inner.lock() = Some(writer);
    }

    fn clear(&self) {
        self.inner.lock().take();
    }

    /// Write one protocol line, appending the delimiter.
    pub fn write_line(&self, line: &str) -> Result<(), LinkError> {
        let mut guard = self.inner.lock();
        let writer = guard.as_mut().ok_or(LinkError::NotConnected)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

/// Owns one serial connection and translates it into a line-oriented
/// event stream without blocking the rest of the host.
///
/// Lifecycle: constructed → read loop running (emits `Connected` once
/// the port opens) → cooperative stop or fatal I/O error → loop exits,
/// connection closed, `Disconnected` emitted. A broken connection is
/// terminal for this worker instance; there is no automatic retry.
pub struct LinkWorker {
    stop: Arc<AtomicBool>,
    writer: LinkWriter,
    thread: Option<JoinHandle<()>>,
}

impl LinkWorker {
    /// Start the worker against a serial port.
    ///
    /// The port is opened on the worker thread; an open failure is
    /// surfaced as a `Disconnected` event, not an error here.
    pub fn start(
        config: SerialConfig,
        port_name: String,
        event_tx: mpsc::UnboundedSender<LinkEvent>,
    ) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let writer = LinkWriter::empty();

        let thread_stop = Arc::clone(&stop);
        let thread_writer = writer.clone();
        let max_line_len = config.max_line_len;
        let thread = thread::spawn(move || {
            let (reader, port_writer) = match open_port(&config, &port_name) {
                Ok(halves) => halves,
                Err(e) => {
                    warn!("Failed to open {}: {}", port_name, e);
                    let _ = event_tx.send(LinkEvent::Disconnected);
                    return;
                }
            };

            thread_writer.install(port_writer);
            info!("Serial link connected: {}", port_name);
            let _ = event_tx.send(LinkEvent::Connected {
                port: port_name.clone(),
            });

            run_read_loop(reader, max_line_len, &thread_stop, &event_tx);

            // Drop both halves before announcing the close
            thread_writer.clear();
            info!("Serial link closed: {}", port_name);
            let _ = event_tx.send(LinkEvent::Disconnected);
        });

        Self {
            stop,
            writer,
            thread: Some(thread),
        }
    }

    /// Start the worker over pre-opened transport halves.
    ///
    /// Used by tests and by callers that manage port opening
    /// themselves; emits `Connected` immediately.
    pub fn start_with_transport(
        reader: Box<dyn LinkReader>,
        port_writer: Box<dyn PortWriter>,
        label: String,
        max_line_len: usize,
        event_tx: mpsc::UnboundedSender<LinkEvent>,
    ) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let writer = LinkWriter::empty();
        writer.install(port_writer);

        let thread_stop = Arc::clone(&stop);
        let thread_writer = writer.clone();
        let thread = thread::spawn(move || {
            let _ = event_tx.send(LinkEvent::Connected { port: label });
            run_read_loop(reader, max_line_len, &thread_stop, &event_tx);
            thread_writer.clear();
            let _ = event_tx.send(LinkEvent::Disconnected);
        });

        Self {
            stop,
            writer,
            thread: Some(thread),
        }
    }

    /// Get a write handle. Valid before connect (writes fail with
    /// `NotConnected`) and after close.
    pub fn writer(&self) -> LinkWriter {
        self.writer.clone()
    }

    /// Request a cooperative stop and wait up to `wait` for the loop
    /// to exit.
    ///
    /// The flag is observed at the top of each loop iteration, so a
    /// pending blocked read may delay the exit by up to one read
    /// timeout. If the loop still has not exited after `wait`, the
    /// thread is detached and the OS reclaims the port on process exit.
    pub fn stop(mut self, wait: Duration) {
        self.stop.store(true, Ordering::Relaxed);

        if let Some(handle) = self.thread.take() {
            let deadline = Instant::now() + wait;
            while !handle.is_finished() && Instant::now() < deadline {
                thread::sleep(Duration::from_millis(10));
            }
            if handle.is_finished() {
                let _ = handle.join();
            } else {
                warn!("Link worker did not stop within {:?}; detaching", wait);
            }
        }
    }
}

impl Drop for LinkWorker {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

/// The read loop: bounded-timeout reads, line assembly, event emission.
///
/// Empty reads are transient and ignored; any other I/O error is fatal
/// for this connection and ends the loop.
fn run_read_loop(
    mut reader: Box<dyn LinkReader>,
    max_line_len: usize,
    stop: &AtomicBool,
    event_tx: &mpsc::UnboundedSender<LinkEvent>,
) {
    let mut assembler = LineAssembler::new(max_line_len);
    let mut buf = [0u8; READ_CHUNK];

    while !stop.load(Ordering::Relaxed) {
        match reader.read_chunk(&mut buf) {
            Ok(0) => continue,
            Ok(n) => {
                for line in assembler.push(&buf[..n]) {
                    debug!("<< {}", line);
                    if event_tx.send(LinkEvent::Line(line)).is_err() {
                        // Receiver gone; nothing left to deliver to
                        return;
                    }
                }
            }
            Err(e) => {
                warn!("Serial read failed: {}", e);
                break;
            }
        }
    }
}
