//! Scripted in-process backend for session tests

use bluetrack_client::{Backend, ClientError};
use bluetrack_core::{ActionKind, Device, Mac};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use tokio::sync::oneshot;

type DevicesReply = Result<Vec<Device>, ClientError>;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Fetch,
    Scan(u64),
    Action(ActionKind, Mac),
}

/// Backend whose replies are either immediate or released through gates
///
/// Calls are recorded when issued. A gated call waits until the test sends
/// its reply, which makes completion order deterministic.
pub(crate) struct ScriptedBackend {
    calls: Mutex<Vec<Call>>,
    devices: Mutex<DevicesReply>,
    scan_reply: Mutex<DevicesReply>,
    fetch_gates: Mutex<VecDeque<oneshot::Receiver<DevicesReply>>>,
    scan_gates: Mutex<VecDeque<oneshot::Receiver<DevicesReply>>>,
    action_failures: Mutex<HashMap<ActionKind, ClientError>>,
}

impl ScriptedBackend {
    pub(crate) fn new(devices: Vec<Device>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            devices: Mutex::new(Ok(devices.clone())),
            scan_reply: Mutex::new(Ok(devices)),
            fetch_gates: Mutex::new(VecDeque::new()),
            scan_gates: Mutex::new(VecDeque::new()),
            action_failures: Mutex::new(HashMap::new()),
        }
    }

    /// Reply for ungated fetches
    pub(crate) fn set_devices(&self, reply: DevicesReply) {
        *self.devices.lock().unwrap() = reply;
    }

    /// Reply for ungated scans
    pub(crate) fn set_scan_reply(&self, reply: DevicesReply) {
        *self.scan_reply.lock().unwrap() = reply;
    }

    /// Hold the next fetch until a reply is sent
    pub(crate) fn gate_fetch(&self) -> oneshot::Sender<DevicesReply> {
        let (tx, rx) = oneshot::channel();
        self.fetch_gates.lock().unwrap().push_back(rx);
        tx
    }

    /// Hold the next scan until a reply is sent
    pub(crate) fn gate_scan(&self) -> oneshot::Sender<DevicesReply> {
        let (tx, rx) = oneshot::channel();
        self.scan_gates.lock().unwrap().push_back(rx);
        tx
    }

    pub(crate) fn fail_action(&self, action: ActionKind, error: ClientError) {
        self.action_failures.lock().unwrap().insert(action, error);
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

async fn await_gate(gate: Option<oneshot::Receiver<DevicesReply>>, fallback: DevicesReply) -> DevicesReply {
    match gate {
        Some(rx) => rx
            .await
            .unwrap_or_else(|_| Err(ClientError::Unreachable("gate dropped".into()))),
        None => fallback,
    }
}

impl Backend for ScriptedBackend {
    async fn fetch_devices(&self) -> Result<Vec<Device>, ClientError> {
        self.record(Call::Fetch);
        let gate = self.fetch_gates.lock().unwrap().pop_front();
        let fallback = self.devices.lock().unwrap().clone();
        await_gate(gate, fallback).await
    }

    async fn scan(&self, duration_secs: u64) -> Result<Vec<Device>, ClientError> {
        self.record(Call::Scan(duration_secs));
        let gate = self.scan_gates.lock().unwrap().pop_front();
        let fallback = self.scan_reply.lock().unwrap().clone();
        await_gate(gate, fallback).await
    }

    async fn action(&self, action: ActionKind, mac: &Mac) -> Result<(), ClientError> {
        self.record(Call::Action(action, mac.clone()));
        match self.action_failures.lock().unwrap().get(&action) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

/// Yield until the backend has seen at least `count` calls
pub(crate) async fn wait_for_calls(backend: &ScriptedBackend, count: usize) {
    for _ in 0..1000 {
        if backend.calls().len() >= count {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!(
        "expected {} backend calls, saw {:?}",
        count,
        backend.calls()
    );
}
