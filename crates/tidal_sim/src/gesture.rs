//! Boundary to the hand-gesture sensor.
//!
//! The sensor itself lives outside this crate. All we see is a stream of
//! `{openness, handDetected}` messages arriving at a low rate on another
//! thread. They are handed to the render loop through a channel and drained
//! once per frame; a dead or missing sensor only means openness stops moving.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::{self, BufRead};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use thiserror::Error;
use tidal_core::GestureSource;
use tidal_core::config::SWEEP_RATE_RANGE;

/// Name of the tool call the sensor uses to report hand state
pub const HAND_STATE_TOOL: &str = "updateHandState";
/// Openness reported when the sensor sends something that is not a number
pub const FALLBACK_OPENNESS: f32 = 0.5;

/// One reading from the sensor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GestureUpdate {
    /// 0.0 = closed fist, 1.0 = open hand with fingers spread
    pub openness: f32,
    pub hand_detected: bool,
}

#[derive(Debug, Error)]
pub enum GestureError {
    #[error("malformed gesture message: {0}")]
    Malformed(&'static str),

    #[error("gesture message is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("gesture sweep rate {0} Hz is outside 0.1..=60")]
    SweepRate(f32),

    #[error("failed to start gesture source: {0}")]
    SourceSpawn(#[from] io::Error),
}

/// Parse one sensor message.
///
/// Accepts a flat `{"openness": .., "handDetected": ..}` object or a tool call
/// envelope `{"name": "updateHandState", "args": {..}}`. Calls to other tools
/// are ignored.
pub fn parse_gesture_message(text: &str) -> Result<Option<GestureUpdate>, GestureError> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Object(map) = value else {
        return Err(GestureError::Malformed("expected a JSON object"));
    };

    let args = match map.get("name") {
        Some(Value::String(name)) if name == HAND_STATE_TOOL => match map.get("args") {
            Some(Value::Object(args)) => args,
            _ => return Err(GestureError::Malformed("tool call without an args object")),
        },
        Some(_) => return Ok(None),
        None => &map,
    };

    Ok(Some(update_from_args(args)))
}

fn update_from_args(args: &Map<String, Value>) -> GestureUpdate {
    let openness = args
        .get("openness")
        .and_then(Value::as_f64)
        .map(|v| v as f32)
        .unwrap_or(FALLBACK_OPENNESS);
    let hand_detected = args.get("handDetected").is_some_and(truthy);
    GestureUpdate {
        openness,
        hand_detected,
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0 && !v.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Connection state shown on the HUD
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LinkStatus {
    #[default]
    Offline,
    Active,
    Failed(String),
}

impl LinkStatus {
    pub fn label(&self) -> &str {
        match self {
            Self::Offline => "Camera Offline",
            Self::Active => "Gesture Active",
            Self::Failed(reason) => reason,
        }
    }
}

/// Shared slot the stdin reader forwards into. Empty while disconnected.
type RelayTarget = Arc<Mutex<Option<Sender<GestureUpdate>>>>;

/// Receiving end of the sensor stream
#[derive(Resource, Default)]
pub struct GestureLink {
    status: LinkStatus,
    // Mutex only to make the resource Sync; never contended
    rx: Option<Mutex<Receiver<GestureUpdate>>>,
    updates_received: u64,
    stdin: StdinRelay,
}

/// The process has one stdin, so its reader thread is started once and
/// outlives connect/disconnect cycles; only the forwarding target changes.
#[derive(Default)]
struct StdinRelay {
    target: RelayTarget,
    reader: Option<JoinHandle<()>>,
}

impl StdinRelay {
    fn route_to(&mut self, tx: Sender<GestureUpdate>) -> Result<(), GestureError> {
        set_target(&self.target, Some(tx));
        if self.reader.as_ref().is_some_and(|h| !h.is_finished()) {
            return Ok(());
        }
        let target = Arc::clone(&self.target);
        let spawned = thread::Builder::new()
            .name("gesture-stdin".into())
            .spawn(move || {
                relay_lines(io::stdin().lock(), &target);
            });
        match spawned {
            Ok(handle) => {
                self.reader = Some(handle);
                Ok(())
            }
            Err(e) => {
                set_target(&self.target, None);
                Err(e.into())
            }
        }
    }

    fn unroute(&self) {
        set_target(&self.target, None);
    }
}

fn set_target(target: &Mutex<Option<Sender<GestureUpdate>>>, tx: Option<Sender<GestureUpdate>>) {
    match target.lock() {
        Ok(mut slot) => *slot = tx,
        Err(poisoned) => *poisoned.into_inner() = tx,
    }
}

impl GestureLink {
    pub fn status(&self) -> &LinkStatus {
        &self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == LinkStatus::Active
    }

    pub fn updates_received(&self) -> u64 {
        self.updates_received
    }

    /// Start listening on an existing channel
    pub fn attach(&mut self, rx: Receiver<GestureUpdate>) {
        self.rx = Some(Mutex::new(rx));
        self.status = LinkStatus::Active;
    }

    /// Start the configured source and listen to it.
    /// Does nothing if a source is already attached.
    pub fn connect(&mut self, source: &GestureSource) -> Result<(), GestureError> {
        if self.is_active() {
            return Ok(());
        }
        let (tx, rx) = mpsc::channel();
        let started = match *source {
            GestureSource::Stdin => self.stdin.route_to(tx),
            GestureSource::Sweep { hz } => spawn_sweep(hz, tx),
        };
        match started {
            Ok(()) => {
                self.attach(rx);
                info!("Gesture link connected ({source:?})");
                Ok(())
            }
            Err(e) => {
                self.status = LinkStatus::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Stop listening. A sweep thread exits on its next send; the stdin
    /// reader keeps running and drops lines until reconnected.
    pub fn disconnect(&mut self) {
        self.stdin.unroute();
        if self.rx.take().is_some() {
            info!("Gesture link disconnected");
        }
        self.status = LinkStatus::Offline;
    }

    /// Next pending update, if any. Never blocks.
    pub fn try_next(&mut self) -> Option<GestureUpdate> {
        let result = match self.rx.as_mut()?.get_mut() {
            Ok(rx) => rx.try_recv(),
            Err(poisoned) => poisoned.into_inner().try_recv(),
        };
        match result {
            Ok(update) => {
                self.updates_received += 1;
                Some(update)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                info!("Gesture source closed after {} updates", self.updates_received);
                self.rx = None;
                self.status = LinkStatus::Offline;
                None
            }
        }
    }
}

fn spawn_sweep(hz: f32, tx: Sender<GestureUpdate>) -> Result<(), GestureError> {
    if !SWEEP_RATE_RANGE.contains(&hz) {
        return Err(GestureError::SweepRate(hz));
    }
    thread::Builder::new()
        .name("gesture-sweep".into())
        .spawn(move || run_sweep(hz, &tx))?;
    Ok(())
}

/// Forward parseable lines to whatever target is routed, until input ends.
/// Lines read while nothing is routed are dropped. At end of input the
/// target is cleared so the receiver sees the source close.
pub fn relay_lines(reader: impl BufRead, target: &Mutex<Option<Sender<GestureUpdate>>>) -> usize {
    let mut sent = 0;
    for update in parsed_updates(reader) {
        let Ok(mut slot) = target.lock() else {
            break;
        };
        let Some(tx) = slot.as_ref() else {
            continue;
        };
        if tx.send(update).is_ok() {
            sent += 1;
        } else {
            *slot = None;
        }
    }
    set_target(target, None);
    sent
}

fn parsed_updates(reader: impl BufRead) -> impl Iterator<Item = GestureUpdate> {
    reader
        .lines()
        .map_while(|line| match line {
            Ok(line) => Some(line),
            Err(e) => {
                warn!("Gesture input closed: {e}");
                None
            }
        })
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match parse_gesture_message(&line) {
            Ok(update) => update,
            Err(e) => {
                warn!("Dropping gesture message: {e}");
                None
            }
        })
}

/// Synthetic hand reading at `t` seconds: opens and closes with a ~8 s period
pub fn sweep_sample(t: f32) -> GestureUpdate {
    GestureUpdate {
        openness: 0.5 + 0.5 * (t * 0.8).sin(),
        hand_detected: true,
    }
}

fn run_sweep(hz: f32, tx: &Sender<GestureUpdate>) {
    let period = Duration::from_secs_f32(1.0 / hz);
    let start = Instant::now();
    while tx.send(sweep_sample(start.elapsed().as_secs_f32())).is_ok() {
        thread::sleep(period);
    }
}
