use std::io;

/// 创建后台运行时：两个 worker 线程，失败时退回 current-thread
pub fn build_runtime() -> io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .or_else(|e| {
            tracing::error!(
                error = %e,
                "Failed to create multi-thread tokio runtime, falling back to current-thread"
            );
            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
        })
}
