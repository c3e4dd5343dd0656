use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// 时间来源，测试中可替换为手动推进的时钟
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    hits: u32,
}

#[derive(Debug)]
struct Buckets {
    windows: HashMap<String, Window>,
    /// 上次全量清理的时间，每个窗口最多清理一次
    last_sweep: Instant,
}

/// 单次计数的结果，用于生成 RateLimit 响应头
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// 距离当前窗口结束的时间
    pub reset_after: Duration,
}

/// 固定窗口限流器（基于内存，按 key 计数）。
///
/// 每个 key 的第一次请求开启一个窗口，窗口内最多允许 `limit` 次，
/// 窗口到期后计数清零。
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    clock: Arc<dyn Clock>,
    buckets: Mutex<Buckets>,
    sweep_threshold: usize,
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("limit", &self.limit)
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self::with_clock(limit, window, Arc::new(SystemClock))
    }

    pub fn with_clock(limit: u32, window: Duration, clock: Arc<dyn Clock>) -> Self {
        let last_sweep = clock.now();
        Self {
            limit,
            window,
            clock,
            buckets: Mutex::new(Buckets {
                windows: HashMap::new(),
                last_sweep,
            }),
            sweep_threshold: 1024,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// 记录一次请求并返回是否放行；超限的请求同样计数。
    pub async fn hit(&self, key: &str) -> RateLimitDecision {
        let now = self.clock.now();
        let mut buckets = self.buckets.lock().await;

        let entry = buckets.windows.entry(key.to_string()).or_insert(Window {
            started: now,
            hits: 0,
        });
        if now.duration_since(entry.started) >= self.window {
            *entry = Window {
                started: now,
                hits: 0,
            };
        }
        entry.hits = entry.hits.saturating_add(1);

        let decision = RateLimitDecision {
            allowed: entry.hits <= self.limit,
            limit: self.limit,
            remaining: self.limit.saturating_sub(entry.hits),
            reset_after: self.window.saturating_sub(now.duration_since(entry.started)),
        };

        // 当 bucket 过多时清理已过期的窗口
        if buckets.windows.len() > self.sweep_threshold
            && now.duration_since(buckets.last_sweep) >= self.window
        {
            let window = self.window;
            buckets
                .windows
                .retain(|_, w| now.duration_since(w.started) < window);
            buckets.last_sweep = now;
        }
        decision
    }
}
