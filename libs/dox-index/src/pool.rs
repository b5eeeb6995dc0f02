//! Fixed-size worker pool for refid resolution.
//!
//! Workers pull refids from a bounded queue and push results onto a second
//! bounded queue drained by one collector, the only writer of the result map.
//! Shutdown is ordered: input closed, workers joined, result queue closed,
//! collector joined.

use crate::error::{IndexError, IndexResult};
use crossbeam_channel::bounded;
use std::collections::HashMap;
use std::thread;

/// Queue slots per worker.
const QUEUE_DEPTH: usize = 64;

/// Run `work` over every refid on `workers` threads and key the results by refid.
///
/// Refids for which `work` returns `None` are absent from the map.
pub(crate) fn resolve_all<O, F>(
    refids: &[String],
    workers: usize,
    work: F,
) -> IndexResult<HashMap<String, O>>
where
    O: Send,
    F: Fn(&str) -> Option<O> + Sync,
{
    let workers = workers.max(1);
    let (task_tx, task_rx) = bounded::<&str>(workers * QUEUE_DEPTH);
    let (result_tx, result_rx) = bounded::<(String, O)>(workers * QUEUE_DEPTH);
    let work = &work;

    thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                let task_rx = task_rx.clone();
                let result_tx = result_tx.clone();
                scope.spawn(move || {
                    for refid in task_rx {
                        if let Some(out) = work(refid) {
                            if result_tx.send((refid.to_string(), out)).is_err() {
                                break;
                            }
                        }
                    }
                })
            })
            .collect();
        drop(task_rx);
        drop(result_tx);

        let collector = scope.spawn(move || {
            let mut all = HashMap::new();
            for (refid, out) in result_rx {
                all.insert(refid, out);
            }
            all
        });

        for refid in refids {
            // Fails only once every worker is gone.
            if task_tx.send(refid.as_str()).is_err() {
                break;
            }
        }
        drop(task_tx);

        let mut panicked = 0usize;
        for handle in handles {
            if handle.join().is_err() {
                panicked += 1;
            }
        }
        let all = collector.join().map_err(|_| IndexError::WorkerPanicked)?;
        if panicked > 0 {
            tracing::error!(panicked, "Resolver workers panicked");
            return Err(IndexError::WorkerPanicked);
        }
        Ok(all)
    })
}
