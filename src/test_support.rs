//! Scripted capability fakes shared by the unit tests.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, Once};
use std::thread::{self, ThreadId};

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::core::download::{DownloadFile, FileSaver};
use crate::core::http::{HttpClient, HttpResponse};
use crate::core::page::Page;
use crate::core::speech::{SpeechInput, SpeechOutput, Utterance};
use crate::shared::emit::Subscription;
use crate::shared::error::{AppError, AppResult};
use crate::shared::events::AppEvent;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub path: String,
    pub body: serde_json::Value,
    pub headers: Vec<(String, String)>,
}

struct Scripted {
    reply: AppResult<HttpResponse>,
    gate: Option<oneshot::Receiver<()>>,
}

/// Replies with queued responses in order and records every request.
#[derive(Default)]
pub struct FakeHttpClient {
    replies: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeHttpClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, status: u16, body: &str) {
        self.push(Ok(HttpResponse::new(status, body)), None);
    }

    pub fn fail(&self, message: &str) {
        self.push(Err(AppError::Network(message.to_string())), None);
    }

    /// Queue a reply that is held back until the returned sender fires.
    pub fn reply_gated(&self, status: u16, body: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.push(Ok(HttpResponse::new(status, body)), Some(rx));
        tx
    }

    fn push(&self, reply: AppResult<HttpResponse>, gate: Option<oneshot::Receiver<()>>) {
        self.replies.lock().unwrap().push_back(Scripted { reply, gate });
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClient for FakeHttpClient {
    async fn post_json(
        &self,
        path: &str,
        body: serde_json::Value,
        headers: Vec<(String, String)>,
    ) -> AppResult<HttpResponse> {
        self.requests.lock().unwrap().push(RecordedRequest {
            path: path.to_string(),
            body,
            headers,
        });
        let scripted = self.replies.lock().unwrap().pop_front();
        let Some(scripted) = scripted else {
            return Err(AppError::Network("no scripted reply".to_string()));
        };
        if let Some(gate) = scripted.gate {
            let _ = gate.await;
        }
        scripted.reply
    }
}

pub struct FakeSpeechInput {
    available: bool,
    /// Starts from this index on are refused.
    refuse_from: usize,
    started: Mutex<Vec<String>>,
}

impl FakeSpeechInput {
    fn build(available: bool, refuse_from: usize) -> Arc<Self> {
        Arc::new(Self { available, refuse_from, started: Mutex::new(Vec::new()) })
    }

    pub fn available() -> Arc<Self> {
        Self::build(true, usize::MAX)
    }

    pub fn unavailable() -> Arc<Self> {
        Self::build(false, usize::MAX)
    }

    pub fn failing() -> Arc<Self> {
        Self::build(true, 0)
    }

    /// Accepts the first session and refuses every later start, like an
    /// engine that is still busy.
    pub fn busy_after_first() -> Arc<Self> {
        Self::build(true, 1)
    }

    pub fn started(&self) -> Vec<String> {
        self.started.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechInput for FakeSpeechInput {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn start(&self, lang: &str) -> AppResult<()> {
        let mut started = self.started.lock().unwrap();
        let attempt = started.len();
        started.push(lang.to_string());
        if attempt >= self.refuse_from {
            return Err(AppError::Speech("InvalidStateError: recognition has already started".to_string()));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingSpeechOutput {
    spoken: Mutex<Vec<Utterance>>,
}

impl RecordingSpeechOutput {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn spoken(&self) -> Vec<Utterance> {
        self.spoken.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechOutput for RecordingSpeechOutput {
    async fn speak(&self, utterance: Utterance) -> AppResult<()> {
        self.spoken.lock().unwrap().push(utterance);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingSaver {
    saved: Mutex<Vec<DownloadFile>>,
}

impl RecordingSaver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn saved(&self) -> Vec<DownloadFile> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl FileSaver for RecordingSaver {
    async fn save(&self, file: DownloadFile) -> AppResult<PathBuf> {
        let path = PathBuf::from(&file.file_name);
        self.saved.lock().unwrap().push(file);
        Ok(path)
    }
}

/// Collects everything a page emits.
pub struct EventLog {
    events: Arc<Mutex<Vec<AppEvent>>>,
    _subscription: Subscription,
}

impl EventLog {
    pub fn attach(page: &Page) -> Self {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let subscription = page.listen(move |event| sink.lock().unwrap().push(event.clone()));
        Self { events, _subscription: subscription }
    }

    pub fn events(&self) -> Vec<AppEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                AppEvent::Alert(msg) => Some(msg),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct CapturedRecord {
    thread: ThreadId,
    pub level: log::Level,
    pub message: String,
}

static CAPTURED: Mutex<Vec<CapturedRecord>> = Mutex::new(Vec::new());
static INSTALL_LOGGER: Once = Once::new();

struct CapturingLogger;

impl log::Log for CapturingLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        let captured = CapturedRecord {
            thread: thread::current().id(),
            level: record.level(),
            message: record.args().to_string(),
        };
        match CAPTURED.lock() {
            Ok(mut records) => records.push(captured),
            Err(poisoned) => poisoned.into_inner().push(captured),
        }
    }

    fn flush(&self) {}
}

static LOGGER: CapturingLogger = CapturingLogger;

/// Log records written on the current test thread. `#[tokio::test]` runs on
/// a current-thread runtime, so records from parallel tests never mix.
pub struct LogCapture {
    thread: ThreadId,
}

impl LogCapture {
    pub fn start() -> Self {
        INSTALL_LOGGER.call_once(|| {
            let _ = log::set_logger(&LOGGER);
            log::set_max_level(log::LevelFilter::Trace);
        });
        Self { thread: thread::current().id() }
    }

    pub fn records(&self) -> Vec<CapturedRecord> {
        let records = match CAPTURED.lock() {
            Ok(records) => records,
            Err(poisoned) => poisoned.into_inner(),
        };
        records.iter().filter(|r| r.thread == self.thread).cloned().collect()
    }

    /// True when a record at `level` contains every one of `fragments`.
    pub fn contains(&self, level: log::Level, fragments: &[&str]) -> bool {
        self.records()
            .iter()
            .any(|r| r.level == level && fragments.iter().all(|f| r.message.contains(f)))
    }
}
