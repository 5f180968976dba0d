//! Stream Consumer Actor: Dedicated thread for reading the reply stream.
//!
//! This actor reads raw bytes from any [`Read`] source (an HTTP body, a
//! pipe, stdin), decodes them incrementally and forwards the text to the
//! driver loop. It never touches the source text itself; the driver applies
//! the events on its own thread.

use super::messages::StreamEvent;
use crate::text::Utf8Decoder;
use crossbeam_channel::Sender;
use std::io::{self, ErrorKind, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Read buffer size per chunk.
pub const READ_CHUNK_SIZE: usize = 4096;

/// Stream consumer actor.
pub struct StreamConsumer {
    /// Handle to the reader thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
}

impl StreamConsumer {
    /// Spawn the consumer thread.
    ///
    /// # Arguments
    ///
    /// * `reader` - Byte stream to consume.
    /// * `sender` - Channel to send decoded chunks to the driver.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS fails to spawn the thread.
    pub fn spawn<R>(reader: R, sender: Sender<StreamEvent>) -> io::Result<Self>
    where
        R: Read + Send + 'static,
    {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let handle = thread::Builder::new()
            .name("typewriter-stream".to_string())
            .spawn(move || {
                Self::run_loop(reader, &sender, &shutdown_clone);
            })?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    /// Signal the consumer thread to stop after the current read.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the consumer thread to finish.
    ///
    /// This blocks until the in-flight read returns.
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Main read loop.
    fn run_loop<R: Read>(mut reader: R, sender: &Sender<StreamEvent>, shutdown: &AtomicBool) {
        let mut decoder = Utf8Decoder::new();
        let mut buf = [0u8; READ_CHUNK_SIZE];
        let mut total = 0usize;

        loop {
            if shutdown.load(Ordering::Relaxed) {
                tracing::debug!(total, "stream consumer shut down");
                return;
            }

            match reader.read(&mut buf) {
                Ok(0) => {
                    let tail = decoder.finish();
                    if !tail.is_empty() {
                        let _ = sender.send(StreamEvent::Chunk(tail));
                    }
                    tracing::debug!(total, "stream ended");
                    let _ = sender.send(StreamEvent::Ended);
                    return;
                }
                Ok(n) => {
                    total += n;
                    let text = decoder.push(&buf[..n]);
                    if text.is_empty() {
                        continue;
                    }
                    if sender.send(StreamEvent::Chunk(text)).is_err() {
                        // Driver dropped, exit
                        return;
                    }
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    tracing::warn!(error = %e, total, "stream read failed");
                    let _ = sender.send(StreamEvent::Failed(e.to_string()));
                    return;
                }
            }
        }
    }
}

impl Drop for StreamConsumer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;
    use std::time::Duration;

    /// Yields the given pieces one read at a time, then optionally fails.
    struct Scripted {
        pieces: Vec<Vec<u8>>,
        fail_at_end: bool,
    }

    impl Read for Scripted {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.pieces.is_empty() {
                if self.fail_at_end {
                    return Err(io::Error::new(ErrorKind::ConnectionReset, "connection reset"));
                }
                return Ok(0);
            }
            let piece = self.pieces.remove(0);
            buf[..piece.len()].copy_from_slice(&piece);
            Ok(piece.len())
        }
    }

    fn collect(rx: &crossbeam_channel::Receiver<StreamEvent>) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.recv_timeout(Duration::from_secs(5)) {
            let terminal = event.is_terminal();
            events.push(event);
            if terminal {
                break;
            }
        }
        events
    }

    #[test]
    fn test_reads_until_eof() {
        let (tx, rx) = unbounded();
        let consumer = StreamConsumer::spawn(Cursor::new(b"Hello there".to_vec()), tx).unwrap();

        let events = collect(&rx);
        assert_eq!(
            events,
            vec![StreamEvent::Chunk("Hello there".to_string()), StreamEvent::Ended]
        );
        consumer.join();
    }

    #[test]
    fn test_split_code_point_across_reads() {
        let bytes = "naïve".as_bytes();
        let reader = Scripted {
            pieces: vec![bytes[..3].to_vec(), bytes[3..].to_vec()],
            fail_at_end: false,
        };
        let (tx, rx) = unbounded();
        let consumer = StreamConsumer::spawn(reader, tx).unwrap();

        let text: String = collect(&rx)
            .into_iter()
            .filter_map(|e| match e {
                StreamEvent::Chunk(text) => Some(text),
                _ => None,
            })
            .collect();
        assert_eq!(text, "naïve");
        consumer.join();
    }

    #[test]
    fn test_transport_failure() {
        let reader = Scripted {
            pieces: vec![b"partial ".to_vec()],
            fail_at_end: true,
        };
        let (tx, rx) = unbounded();
        let consumer = StreamConsumer::spawn(reader, tx).unwrap();

        let events = collect(&rx);
        assert_eq!(events[0], StreamEvent::Chunk("partial ".to_string()));
        assert!(matches!(events.last(), Some(StreamEvent::Failed(_))));
        consumer.join();
        assert!(rx.try_recv().is_err());
    }
}
