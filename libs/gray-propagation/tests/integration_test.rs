//! Integration tests for gray context propagation across real worker
//! hand-offs: a dedicated worker thread for closure decoration and a
//! multi-threaded tokio runtime for future decoration.

use std::panic::AssertUnwindSafe;
use std::sync::{mpsc, Arc};
use std::thread;

use gray_core::{
    GrayTrackInfo, RequestLocalStorage, ThreadLocalLifeCycle, ThreadLocalRequestStorage,
};
use gray_propagation::GrayTaskDecorator;

/// The smallest possible pool: one worker thread draining boxed tasks.
struct Worker {
    tx: mpsc::Sender<Box<dyn FnOnce() + Send>>,
    handle: thread::JoinHandle<()>,
}

impl Worker {
    fn spawn() -> Self {
        let (tx, rx) = mpsc::channel::<Box<dyn FnOnce() + Send>>();
        let handle = thread::spawn(move || {
            for task in rx {
                task();
            }
        });
        Self { tx, handle }
    }

    fn submit(&self, task: Box<dyn FnOnce() + Send>) {
        self.tx.send(task).expect("worker accepts tasks");
    }

    fn shutdown(self) {
        drop(self.tx);
        self.handle.join().expect("worker exits cleanly");
    }
}

fn decorator() -> (Arc<ThreadLocalRequestStorage>, GrayTaskDecorator) {
    let storage = Arc::new(ThreadLocalRequestStorage::new());
    let decorator = GrayTaskDecorator::new(storage.clone(), Arc::new(ThreadLocalLifeCycle::new()));
    (storage, decorator)
}

#[test]
fn test_context_installed_for_task_and_absent_for_next() {
    let (storage, decorator) = decorator();
    storage
        .set_track_info(GrayTrackInfo::new("trace-pool"))
        .unwrap();

    let worker = Worker::spawn();
    let (tx, rx) = mpsc::channel();

    let probe = storage.clone();
    let report = tx.clone();
    worker.submit(decorator.wrap(move || {
        let seen = probe.get_track_info().unwrap().map(|info| info.trace_id);
        report.send(("wrapped", seen)).unwrap();
    }));

    // An undecorated task on the same worker must observe a clean slate.
    let probe = storage.clone();
    worker.submit(Box::new(move || {
        let seen = probe.get_track_info().unwrap().map(|info| info.trace_id);
        tx.send(("probe", seen)).unwrap();
    }));

    assert_eq!(
        rx.recv().unwrap(),
        ("wrapped", Some("trace-pool".to_string()))
    );
    assert_eq!(rx.recv().unwrap(), ("probe", None));

    worker.shutdown();
    storage.remove_track_info().unwrap();
}

#[test]
fn test_tasks_observe_only_their_own_context() {
    let (storage, decorator) = decorator();
    let worker = Worker::spawn();
    let (tx, rx) = mpsc::channel();

    for trace_id in ["trace-a", "trace-b", "trace-c"] {
        storage
            .set_track_info(GrayTrackInfo::new(trace_id))
            .unwrap();
        let probe = storage.clone();
        let report = tx.clone();
        worker.submit(decorator.wrap(move || {
            let seen = probe.get_track_info().unwrap().map(|info| info.trace_id);
            report.send(seen).unwrap();
        }));
    }
    drop(tx);

    let seen: Vec<_> = rx.iter().collect();
    assert_eq!(
        seen,
        vec![
            Some("trace-a".to_string()),
            Some("trace-b".to_string()),
            Some("trace-c".to_string()),
        ]
    );

    worker.shutdown();
    storage.remove_track_info().unwrap();
}

#[test]
fn test_undecorated_task_when_no_context_in_flight() {
    let (storage, decorator) = decorator();
    let worker = Worker::spawn();
    let (tx, rx) = mpsc::channel();

    let probe = storage.clone();
    worker.submit(decorator.wrap(move || {
        tx.send(probe.get_track_info().unwrap()).unwrap();
    }));

    assert!(rx.recv().unwrap().is_none());
    worker.shutdown();
}

#[test]
fn test_cleanup_runs_when_task_panics() {
    let (storage, decorator) = decorator();
    storage
        .set_track_info(GrayTrackInfo::new("trace-panic"))
        .unwrap();

    let task = decorator.wrap_call(|| -> u32 { panic!("boom") });
    let outcome = std::panic::catch_unwind(AssertUnwindSafe(task));
    assert!(outcome.is_err());

    // The panic propagated, and the executing thread's slots are clean.
    assert!(storage.get_track_info().unwrap().is_none());
    assert!(storage.get_request().unwrap().is_none());
}

#[test]
fn test_wrap_call_result_passes_through_decorated() {
    let (storage, decorator) = decorator();
    storage
        .set_track_info(GrayTrackInfo::new("trace-call"))
        .unwrap();

    let task = decorator.wrap_call(|| "done");
    assert_eq!(task(), "done");

    storage.remove_track_info().unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_future_observes_context_across_awaits() {
    let (storage, decorator) = decorator();
    storage
        .set_track_info(GrayTrackInfo::new("async-trace"))
        .unwrap();

    let probe = storage.clone();
    let future = decorator.wrap_future(async move {
        let first = probe.get_track_info().unwrap().map(|info| info.trace_id);
        tokio::task::yield_now().await;
        let second = probe.get_track_info().unwrap().map(|info| info.trace_id);
        (first, second)
    });
    assert!(future.is_tracked());

    let (first, second) = tokio::spawn(future).await.unwrap();
    assert_eq!(first.as_deref(), Some("async-trace"));
    assert_eq!(second.as_deref(), Some("async-trace"));

    // Outside a poll of the wrapped future every worker slot is clean.
    let probe = storage.clone();
    let leaked = tokio::spawn(async move { probe.get_track_info().unwrap() })
        .await
        .unwrap();
    assert!(leaked.is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_future_without_context_is_untracked() {
    let (storage, decorator) = decorator();

    let probe = storage.clone();
    let future = decorator.wrap_future(async move { probe.get_track_info().unwrap() });
    assert!(!future.is_tracked());

    let seen = tokio::spawn(future).await.unwrap();
    assert!(seen.is_none());
}
