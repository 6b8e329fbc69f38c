//! Worker threads push finished tasks; the main thread drains them, writes
//! each result as a JSON line and acknowledges it to a tracker.
//!
//! `DONELIST_DEBUG_MODE=1 cargo run --example coordinator` skips the
//! acknowledgments.

use std::collections::HashSet;
use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use donelist::{CompletionList, CompletionTracker, DrainOptions, Exporter, TaskGuid, WorkItem};
use serde::Serialize;

const WORKERS: u32 = 4;
const TASKS_PER_WORKER: u32 = 16;

#[derive(Debug, Serialize)]
struct TaskResult {
    task: TaskGuid,
    worker: u32,
    samples: u64,
}

struct JsonLines<W> {
    out: W,
}

impl<W: Write> Exporter<TaskResult> for JsonLines<W> {
    type Error = serde_json::Error;

    fn export(&mut self, payload: &TaskResult) -> Result<(), Self::Error> {
        serde_json::to_writer(&mut self.out, payload)?;
        self.out.write_all(b"\n").map_err(serde_json::Error::io)
    }
}

#[derive(Debug)]
struct DuplicateAck(TaskGuid);

impl fmt::Display for DuplicateAck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task {} acknowledged twice", self.0)
    }
}

impl std::error::Error for DuplicateAck {}

#[derive(Default)]
struct Tracker {
    done: HashSet<TaskGuid>,
}

impl CompletionTracker<TaskGuid> for Tracker {
    type Error = DuplicateAck;

    fn task_completed(&mut self, id: &TaskGuid) -> Result<(), DuplicateAck> {
        if self.done.insert(*id) {
            Ok(())
        } else {
            Err(DuplicateAck(*id))
        }
    }
}

fn main() -> Result<()> {
    let options = DrainOptions::from_env().context("reading drain options")?;
    let list = CompletionList::new();
    let running = AtomicUsize::new(WORKERS as usize);

    let mut exporter = JsonLines {
        out: io::stdout().lock(),
    };
    let mut tracker = Tracker::default();
    let mut batches = 0;

    thread::scope(|s| -> Result<()> {
        for worker in 0..WORKERS {
            let (list, running) = (&list, &running);
            s.spawn(move || {
                for n in 0..TASKS_PER_WORKER {
                    let task = TaskGuid::new(n, worker, 0, 1);
                    let samples = u64::from(n * 31 + worker * 7) % 97;
                    thread::sleep(Duration::from_micros(samples * 10));
                    list.push(WorkItem::new(task, TaskResult { task, worker, samples }));
                }
                running.fetch_sub(1, Ordering::Release);
            });
        }

        loop {
            let finished = running.load(Ordering::Acquire) == 0;
            let report = list
                .drain(&mut exporter, &mut tracker, &options)
                .context("draining completion list")?;
            batches += report.batches;
            if finished {
                return Ok(());
            }
            thread::sleep(Duration::from_millis(1));
        }
    })?;

    eprintln!(
        "exported {} tasks in {batches} batches, {} acknowledged",
        list.stats().drained,
        tracker.done.len()
    );
    Ok(())
}
