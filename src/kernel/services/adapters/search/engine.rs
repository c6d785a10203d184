//! 增量搜索引擎
//!
//! - 一个专用 worker（tokio blocking 线程）负责遍历，会话期间一直存在
//! - 每次换查询都会递增 generation，旧遍历在下一个行边界发现后立即放弃
//! - 所有 ResultSink 回调都由 worker 发出，因此 clear 之后不会再出现旧查询的 add
//! - 单个资源读取失败只跳过该资源

use super::query::QueryModel;
use crate::core::Service;
use crate::kernel::services::ports::{
    MatchRecord, Resource, ResourceError, ResourceResult, ResourceTree, ResultSink,
    SearchConfig, VisitFlow, WalkStats,
};
use std::io::BufRead;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// 只检查文件开头这么多字节来判断是否是二进制
const BINARY_PROBE_LEN: usize = 8192;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Walking,
}

struct Target {
    tree: Arc<dyn ResourceTree>,
    sink: Arc<dyn ResultSink>,
}

struct EngineStatus {
    state: EngineState,
    query: Option<Arc<QueryModel>>,
    target: Option<Target>,
}

struct EngineShared {
    generation: AtomicU64,
    status: Mutex<EngineStatus>,
}

impl EngineShared {
    fn lock_status(&self) -> MutexGuard<'_, EngineStatus> {
        self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::Acquire) == generation
    }

    fn bump(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// 遍历结束：只有仍是最新一次遍历时才回到 Idle
    fn finish(&self, generation: u64) {
        let mut status = self.lock_status();
        if self.is_current(generation) {
            status.state = EngineState::Idle;
        }
    }
}

struct WalkRequest {
    generation: u64,
    query: Arc<QueryModel>,
    tree: Arc<dyn ResourceTree>,
    sink: Arc<dyn ResultSink>,
    clear_first: bool,
}

enum EngineCommand {
    Walk(WalkRequest),
    Shutdown,
}

pub struct SearchEngine {
    shared: Arc<EngineShared>,
    tx: Sender<EngineCommand>,
}

impl SearchEngine {
    pub fn new(runtime: tokio::runtime::Handle, config: &SearchConfig) -> Self {
        let (tx, rx) = mpsc::channel();
        let shared = Arc::new(EngineShared {
            generation: AtomicU64::new(0),
            status: Mutex::new(EngineStatus {
                state: EngineState::Idle,
                query: None,
                target: None,
            }),
        });

        let worker = SearchWorker {
            shared: shared.clone(),
            config: config.clone(),
        };
        runtime.spawn_blocking(move || worker.run(rx));

        Self { shared, tx }
    }

    /// 开始一次搜索会话
    ///
    /// trivial 查询只会 clear 结果并保持 Idle。再次调用 start 会换掉资源树和 sink，
    /// 新 sink 会先收到一次 clear。
    pub fn start(
        &self,
        query: Arc<QueryModel>,
        tree: Arc<dyn ResourceTree>,
        sink: Arc<dyn ResultSink>,
    ) {
        let mut status = self.shared.lock_status();
        let restarted = status.target.is_some();
        status.target = Some(Target { tree, sink });
        self.schedule(&mut status, query, restarted);
    }

    /// 替换查询：旧遍历放弃，clear 一次，从根重新遍历
    pub fn set_query(&self, query: Arc<QueryModel>) {
        let mut status = self.shared.lock_status();
        if status.target.is_none() {
            tracing::debug!(pattern = query.pattern(), "set_query before start");
            status.query = Some(query);
            return;
        }
        self.schedule(&mut status, query, true);
    }

    /// 强制回到 Idle，不会再 clear
    pub fn cancel(&self) {
        let mut status = self.shared.lock_status();
        self.shared.bump();
        status.state = EngineState::Idle;
    }

    pub fn state(&self) -> EngineState {
        self.shared.lock_status().state
    }

    pub fn is_busy(&self) -> bool {
        self.state() == EngineState::Walking
    }

    /// 当前生效的查询（渲染高亮时用）
    pub fn query(&self) -> Option<Arc<QueryModel>> {
        self.shared.lock_status().query.clone()
    }

    fn schedule(&self, status: &mut EngineStatus, query: Arc<QueryModel>, clear_first: bool) {
        let generation = self.shared.bump();
        status.query = Some(query.clone());

        let Some(target) = status.target.as_ref() else {
            return;
        };

        let trivial = query.is_trivial();
        let request = WalkRequest {
            generation,
            query,
            tree: target.tree.clone(),
            sink: target.sink.clone(),
            clear_first: clear_first || trivial,
        };

        if self.tx.send(EngineCommand::Walk(request)).is_err() {
            tracing::warn!("search worker is gone");
            status.state = EngineState::Idle;
            return;
        }

        status.state = if trivial {
            EngineState::Idle
        } else {
            EngineState::Walking
        };
    }
}

impl Drop for SearchEngine {
    fn drop(&mut self) {
        self.shared.bump();
        let _ = self.tx.send(EngineCommand::Shutdown);
    }
}

impl Service for SearchEngine {
    fn name(&self) -> &'static str {
        "SearchEngine"
    }
}

struct SearchWorker {
    shared: Arc<EngineShared>,
    config: SearchConfig,
}

impl SearchWorker {
    fn run(self, rx: Receiver<EngineCommand>) {
        while let Ok(command) = rx.recv() {
            let mut request = match command {
                EngineCommand::Walk(request) => request,
                EngineCommand::Shutdown => break,
            };

            // 积压的请求只保留最新一个
            loop {
                match rx.try_recv() {
                    Ok(EngineCommand::Walk(next)) => {
                        let clear_first = request.clear_first || next.clear_first;
                        request = next;
                        request.clear_first = clear_first;
                    }
                    Ok(EngineCommand::Shutdown) => return,
                    Err(_) => break,
                }
            }

            if !self.shared.is_current(request.generation) {
                continue;
            }

            let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.execute(&request)));
            if outcome.is_err() {
                tracing::error!(
                    pattern = request.query.pattern(),
                    "search walk panicked, worker continues"
                );
            }
            self.shared.finish(request.generation);
        }

        tracing::debug!("search worker stopped");
    }

    fn execute(&self, request: &WalkRequest) {
        if request.clear_first {
            request.sink.clear();
        }
        if request.query.is_trivial() {
            return;
        }

        tracing::debug!(
            pattern = request.query.pattern(),
            generation = request.generation,
            "walk started"
        );

        let is_current = || self.shared.is_current(request.generation);
        let sink = request.sink.as_ref();
        let mut stats = WalkStats::default();
        let mut aborted = false;

        let visited = request.tree.visit(&mut |resource: Resource| {
            if !is_current() {
                aborted = true;
                return VisitFlow::Stop;
            }

            match search_resource(
                request.tree.as_ref(),
                &resource,
                &request.query,
                &self.config,
                &is_current,
                sink,
            ) {
                Ok(ResourceOutcome::Searched { matches }) => {
                    stats.resources_searched += 1;
                    stats.matches += matches;
                }
                Ok(ResourceOutcome::Skipped) => {}
                Ok(ResourceOutcome::Aborted) => {
                    aborted = true;
                    return VisitFlow::Stop;
                }
                Err(err) => {
                    tracing::warn!(resource = %resource.id(), error = %err, "resource skipped");
                    stats.resources_failed += 1;
                    sink.failed(&resource, &err);
                }
            }
            VisitFlow::Continue
        });

        if let Err(err) = visited {
            let root = request.tree.root();
            tracing::warn!(root = %root.display(), error = %err, "resource tree walk failed");
            stats.resources_failed += 1;
            sink.failed(
                &Resource::new(root.to_string_lossy().to_string(), root.to_path_buf()),
                &err,
            );
        }

        if aborted || !is_current() {
            tracing::debug!(generation = request.generation, "walk superseded");
            return;
        }

        tracing::debug!(
            generation = request.generation,
            searched = stats.resources_searched,
            failed = stats.resources_failed,
            matches = stats.matches,
            "walk completed"
        );
        sink.finished(stats);
    }
}

enum ResourceOutcome {
    Searched { matches: usize },
    Skipped,
    Aborted,
}

fn is_likely_binary(content: &[u8]) -> bool {
    let probe = &content[..content.len().min(BINARY_PROBE_LEN)];
    memchr::memchr(0, probe).is_some()
}

/// 逐行搜索单个资源，匹配行一经发现立即交给 sink
fn search_resource(
    tree: &dyn ResourceTree,
    resource: &Resource,
    query: &QueryModel,
    config: &SearchConfig,
    is_current: &dyn Fn() -> bool,
    sink: &dyn ResultSink,
) -> ResourceResult<ResourceOutcome> {
    let mut reader = tree.open(resource)?;
    let io_err = |e| ResourceError::from_io(resource.path(), e);

    if is_likely_binary(reader.fill_buf().map_err(io_err)?) {
        tracing::debug!(resource = %resource.id(), "skip binary resource");
        return Ok(ResourceOutcome::Skipped);
    }

    let mut buf = Vec::new();
    let mut line_number = 0usize;
    let mut matches = 0usize;

    loop {
        if !is_current() {
            return Ok(ResourceOutcome::Aborted);
        }

        buf.clear();
        let n = reader.read_until(b'\n', &mut buf).map_err(io_err)?;
        if n == 0 {
            break;
        }
        line_number += 1;

        let trimmed = buf.strip_suffix(b"\n").unwrap_or(&buf);
        let trimmed = trimmed.strip_suffix(b"\r").unwrap_or(trimmed);

        let line = std::str::from_utf8(trimmed).map_err(|_| ResourceError::InvalidUtf8 {
            path: resource.path().to_path_buf(),
            line: line_number,
        })?;

        if line.len() > config.max_line_length {
            continue;
        }

        let ranges = query.find_matches(line);
        if ranges.is_empty() {
            continue;
        }

        matches += 1;
        sink.add(MatchRecord::new(
            resource.clone(),
            line_number,
            line.to_string(),
            ranges,
        ));
    }

    Ok(ResourceOutcome::Searched { matches })
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/search/engine.rs"]
mod tests;
