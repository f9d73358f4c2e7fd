use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use log::{error, info, warn};

use super::client::{refresh_once, DataFetcher};
use crate::types::{RefreshReason, RefreshResult};

/// 后台刷新线程：按请求取数并分析，把结果送回 UI 线程
pub fn run_refresh_worker(
    fetcher: DataFetcher,
    request_receiver: Receiver<RefreshReason>,
    result_sender: Sender<RefreshResult>,
    shutdown_signal: Arc<AtomicBool>,
) -> Result<(), Box<dyn std::error::Error>> {
    // 取数只在这个线程里发生，单线程运行时足够
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    info!("Refresh worker started, source: {}", fetcher.source());

    while !shutdown_signal.load(Ordering::Relaxed) {
        let reason = match request_receiver.recv_timeout(Duration::from_millis(100)) {
            Ok(reason) => reason,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                info!("Refresh request channel disconnected, worker exiting");
                break;
            }
        };

        let result = runtime.block_on(run_cycle(&fetcher, reason));

        if let Err(e) = result_sender.send(result) {
            // 通道断开表示GUI已关闭
            warn!("Refresh result channel disconnected, worker exiting: {}", e);
            break;
        }
    }

    info!("Refresh worker stopped");
    Ok(())
}

/// Runs one fetch-and-analyze cycle and logs its outcome.
pub async fn run_cycle(fetcher: &DataFetcher, reason: RefreshReason) -> RefreshResult {
    let started = Instant::now();
    let outcome = refresh_once(fetcher).await;
    let elapsed = started.elapsed();

    match &outcome {
        Ok(analysis) => info!(
            "Refresh ({}) complete: {} measurements, {} anomalies in {:.1?}",
            reason,
            analysis.record_count(),
            analysis.total_anomalies(),
            elapsed
        ),
        Err(e) => error!("Refresh ({}) failed after {:.1?}: {}", reason, elapsed, e),
    }

    RefreshResult::new(reason, outcome, elapsed)
}
