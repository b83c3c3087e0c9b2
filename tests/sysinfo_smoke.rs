use std::hint::black_box;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use loadspy::report::PROMPT;
use loadspy::sampler::SamplerOptions;
use loadspy::session::Controller;
use loadspy::system::SysinfoSource;
use loadspy::task::{TaskNames, TaskSource};
use tokio::io::AsyncWriteExt;

fn burn_cpu(duration: Duration) -> u64 {
    let deadline = Instant::now() + duration;
    let mut acc = 0u64;
    while Instant::now() < deadline {
        for i in 0..10_000u64 {
            acc = black_box(acc.wrapping_mul(31).wrapping_add(i));
        }
    }
    acc
}

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn own_process_is_traced_with_cpu_delta() {
    if !sysinfo::IS_SUPPORTED_SYSTEM {
        return;
    }
    let pid = std::process::id();
    let mut source = SysinfoSource::new();
    source.enable_tracing().expect("failed to enable tracing");

    let first = source.snapshot();
    let me = first
        .iter()
        .find(|t| t.id == pid)
        .expect("current process missing from first snapshot");
    assert!(me.valid);
    assert!(source.name_of(pid).is_some_and(|n| !n.is_empty()));

    burn_cpu(Duration::from_millis(400));

    let second = source.snapshot();
    let me = second
        .iter()
        .find(|t| t.id == pid)
        .expect("current process missing from second snapshot");
    assert!(me.delta_time > 0, "no CPU time recorded after busy loop");

    source.disable_tracing().unwrap();
    assert!(source.snapshot().is_empty());
}

#[test]
fn snapshot_is_in_pid_order() {
    if !sysinfo::IS_SUPPORTED_SYSTEM {
        return;
    }
    let mut source = SysinfoSource::new();
    source.enable_tracing().unwrap();
    let ids: Vec<u32> = source.snapshot().iter().map(|t| t.id).collect();
    assert!(!ids.is_empty());
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn host_session_prints_reports_until_newline() {
    if !sysinfo::IS_SUPPORTED_SYSTEM {
        return;
    }
    let out = SharedBuf::default();
    let mut controller = Controller::new(
        SysinfoSource::new(),
        out.clone(),
        SamplerOptions::default(),
    );

    let (mut tx, rx) = tokio::io::duplex(16);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(1300)).await;
        let _ = tx.write_all(b"\n").await;
        std::future::pending::<()>().await;
    });

    controller.start(1, rx).await.unwrap();

    let text = String::from_utf8(out.0.lock().unwrap().clone()).unwrap();
    assert!(text.matches(PROMPT).count() >= 2, "unexpected output: {text}");
}
