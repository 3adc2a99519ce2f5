#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use planlog_core::api::{LogSource, Plan, PlanError, PlanSource, PlanStatus, Plans, PollBackoff};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

pub const LOG_URL: &str = "https://archivist.example.com/v1/object/dmF1bHQ6djE6";

/// One scripted answer of the status endpoint.
#[derive(Debug, Clone, Copy)]
pub enum StatusStep {
    Status(PlanStatus),
    Fail,
}

/// Plan records served from a script. The last step repeats forever.
pub struct FakePlans {
    log_read_url: String,
    steps: Mutex<VecDeque<StatusStep>>,
    pub reads: AtomicUsize,
}

impl FakePlans {
    pub fn new(log_read_url: &str, steps: Vec<StatusStep>) -> Arc<Self> {
        assert!(!steps.is_empty(), "need at least one status step");
        Arc::new(Self {
            log_read_url: log_read_url.to_string(),
            steps: Mutex::new(steps.into()),
            reads: AtomicUsize::new(0),
        })
    }

    pub fn statuses(statuses: &[PlanStatus]) -> Arc<Self> {
        Self::new(
            LOG_URL,
            statuses.iter().copied().map(StatusStep::Status).collect(),
        )
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn next_step(&self) -> StatusStep {
        let mut steps = self.steps.lock().unwrap();
        if steps.len() > 1 {
            steps.pop_front().unwrap()
        } else {
            steps[0]
        }
    }
}

#[async_trait]
impl PlanSource for FakePlans {
    fn name(&self) -> &str {
        "fake"
    }

    async fn read_plan(&self, plan_id: &str) -> Result<Plan, PlanError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if plan_id == "plan-missing" {
            return Err(PlanError::NotFound {
                plan_id: plan_id.to_string(),
            });
        }
        match self.next_step() {
            StatusStep::Status(status) => Ok(Plan {
                id: plan_id.to_string(),
                log_read_url: self.log_read_url.clone(),
                status,
                ..Plan::default()
            }),
            StatusStep::Fail => Err(PlanError::transport(anyhow::anyhow!(
                "status endpoint unreachable"
            ))),
        }
    }

    async fn read_raw(&self, path: &str) -> Result<Bytes, PlanError> {
        Ok(Bytes::from(format!("{{\"path\":\"{}\"}}", path)))
    }
}

/// An append-only remote log. Scheduled appends become visible when the
/// fetch with the given 1-based number arrives.
pub struct FakeLog {
    inner: Mutex<FakeLogInner>,
    pub fetches: AtomicUsize,
    hang: bool,
    fail: bool,
}

struct FakeLogInner {
    content: Vec<u8>,
    schedule: VecDeque<(usize, Vec<u8>)>,
}

impl FakeLog {
    pub fn new(initial: &[u8]) -> Arc<Self> {
        Self::scheduled(initial, Vec::new())
    }

    pub fn scheduled(initial: &[u8], schedule: Vec<(usize, &[u8])>) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(FakeLogInner {
                content: initial.to_vec(),
                schedule: schedule
                    .into_iter()
                    .map(|(at, bytes)| (at, bytes.to_vec()))
                    .collect(),
            }),
            fetches: AtomicUsize::new(0),
            hang: false,
            fail: false,
        })
    }

    /// Every fetch blocks forever.
    pub fn hanging() -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(FakeLogInner {
                content: Vec::new(),
                schedule: VecDeque::new(),
            }),
            fetches: AtomicUsize::new(0),
            hang: true,
            fail: false,
        })
    }

    /// Every fetch fails with a transport error.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(FakeLogInner {
                content: Vec::new(),
                schedule: VecDeque::new(),
            }),
            fetches: AtomicUsize::new(0),
            hang: false,
            fail: true,
        })
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LogSource for FakeLog {
    async fn fetch_chunk(
        &self,
        _log_url: &Url,
        offset: u64,
        limit: usize,
    ) -> Result<Bytes, PlanError> {
        let n = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
        if self.hang {
            futures::future::pending::<()>().await;
        }
        if self.fail {
            return Err(PlanError::transport(anyhow::anyhow!("502 bad gateway")));
        }

        let mut inner = self.inner.lock().unwrap();
        while inner.schedule.front().is_some_and(|(at, _)| *at <= n) {
            let (_, bytes) = inner.schedule.pop_front().unwrap();
            inner.content.extend_from_slice(&bytes);
        }
        let start = (offset as usize).min(inner.content.len());
        let end = (start + limit).min(inner.content.len());
        Ok(Bytes::copy_from_slice(&inner.content[start..end]))
    }
}

pub fn fast_backoff() -> PollBackoff {
    PollBackoff::new(Duration::from_millis(1), Duration::from_millis(4))
}

pub fn plans(source: Arc<FakePlans>, log: Arc<FakeLog>) -> Plans {
    Plans::new(source, log).with_backoff(fast_backoff())
}
