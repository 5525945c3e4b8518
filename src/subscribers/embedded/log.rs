//! # LogWriter: simple event logger
//!
//! A minimal subscriber that writes incoming [`Event`]s through `tracing`.
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! INFO taskqueue: [start] seq=0 task=Job { id: 1 } can_admit=true
//! INFO taskqueue: [done] seq=3 task=Job { id: 1 } can_admit=true
//! INFO taskqueue: [complete] seq=4 task=Job { id: 1 } elapsed=102ms
//! INFO taskqueue: [fail] seq=7 task=Job { id: 2 } err="execution failed: boom" elapsed=40ms
//! ```

use std::fmt::Debug;

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl<T, R> Subscribe<T, R> for LogWriter
where
    T: Debug + Send + Sync + 'static,
    R: Send + Sync + 'static,
{
    async fn on_event(&self, e: &Event<T, R>) {
        let can_admit = e.can_admit.unwrap_or(false);
        let elapsed = e.result.as_ref().map(|r| r.elapsed()).unwrap_or_default();

        match e.kind {
            EventKind::TaskStart => {
                tracing::info!(target: "taskqueue", "[start] seq={} task={:?} can_admit={}", e.seq, e.task, can_admit);
            }
            EventKind::TaskDone => {
                tracing::info!(target: "taskqueue", "[done] seq={} task={:?} can_admit={}", e.seq, e.task, can_admit);
            }
            EventKind::TaskComplete => {
                tracing::info!(target: "taskqueue", "[complete] seq={} task={:?} elapsed={:?}", e.seq, e.task, elapsed);
            }
            EventKind::TaskFail => {
                let err = e
                    .result
                    .as_ref()
                    .and_then(|r| r.error())
                    .map(ToString::to_string)
                    .unwrap_or_default();
                tracing::info!(
                    target: "taskqueue",
                    "[fail] seq={} task={:?} err={:?} elapsed={:?}",
                    e.seq,
                    e.task,
                    err,
                    elapsed
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io;
    use std::sync::{Arc, Mutex};
    use std::time::SystemTime;

    use crate::error::TaskError;
    use crate::tasks::TaskResult;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[derive(Debug)]
    struct Job {
        id: u32,
    }

    #[tokio::test]
    async fn writes_one_line_per_event_kind() {
        let out = Captured::default();
        let writer = out.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let task = Arc::new(Job { id: 7 });
        let started = SystemTime::now();
        let events: Vec<Event<Job, u32>> = vec![
            Event::new(EventKind::TaskStart, Arc::clone(&task)).with_can_admit(true),
            Event::new(EventKind::TaskDone, Arc::clone(&task)).with_can_admit(false),
            Event::outcome(TaskResult::settle(Arc::clone(&task), Ok(70), started)),
            Event::outcome(TaskResult::settle(
                Arc::clone(&task),
                Err(TaskError::fail("boom")),
                started,
            )),
        ];

        let log = LogWriter::new();
        for ev in &events {
            log.on_event(ev).await;
        }

        let text = out.text();
        assert!(text.contains("[start] seq=0 task=Job { id: 7 } can_admit=true"), "{text}");
        assert!(text.contains("[done] seq=0 task=Job { id: 7 } can_admit=false"), "{text}");
        assert!(text.contains("[complete] seq=0 task=Job { id: 7 }"), "{text}");
        assert!(text.contains("[fail] seq=0 task=Job { id: 7 }"), "{text}");
        assert!(text.contains("boom"), "{text}");
        assert_eq!(Subscribe::<Job, u32>::name(&log), "LogWriter");
    }
}
