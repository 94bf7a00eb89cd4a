//! Comparison metrics using metrics-rs.
//!
//! Library code records through the `metrics` facade; the CLI installs an
//! in-memory recorder and prints what was collected once the run is over.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::io::{self, Write};
use std::sync::Arc;

use metrics::{
    Counter, CounterFn, Gauge, GaugeFn, Histogram, Key, KeyName, Metadata, Recorder, SharedString,
    Unit, describe_counter, describe_gauge,
};
use parking_lot::RwLock;

// ============================================================================
// Metric descriptions
// ============================================================================

/// Register metric descriptions. Call once at startup.
pub fn init() {
    describe_counter!(
        "rvtrace_records_total",
        Unit::Count,
        "Trace records decoded, including skipped jumps"
    );
    describe_counter!(
        "rvtrace_jumps_skipped_total",
        Unit::Count,
        "Jump-class records dropped by the decoder"
    );
    describe_counter!(
        "rvtrace_disasm_failures_total",
        Unit::Count,
        "Instruction words that could not be disassembled"
    );
    describe_counter!(
        "rvtrace_mismatches_total",
        Unit::Count,
        "Event pairs that compared unequal"
    );
    describe_gauge!("rvtrace_steps", Unit::Count, "Event pairs compared");
}

// ============================================================================
// CLI Recorder for terminal output
// ============================================================================

/// Counter and gauge values keyed by rendered metric key.
///
/// `BTreeMap` keeps the summary sorted.
#[derive(Default)]
struct Store {
    counters: RwLock<BTreeMap<String, u64>>,
    gauges: RwLock<BTreeMap<String, f64>>,
}

/// One registered metric; acts as either a counter or a gauge.
struct Slot {
    key: String,
    store: Arc<Store>,
}

impl CounterFn for Slot {
    fn increment(&self, value: u64) {
        *self.store.counters.write().entry(self.key.clone()).or_default() += value;
    }

    fn absolute(&self, value: u64) {
        self.store.counters.write().insert(self.key.clone(), value);
    }
}

impl GaugeFn for Slot {
    fn increment(&self, value: f64) {
        *self.store.gauges.write().entry(self.key.clone()).or_default() += value;
    }

    fn decrement(&self, value: f64) {
        *self.store.gauges.write().entry(self.key.clone()).or_default() -= value;
    }

    fn set(&self, value: f64) {
        self.store.gauges.write().insert(self.key.clone(), value);
    }
}

/// Recorder that keeps counters and gauges in memory.
///
/// Histograms are not used by the comparator and are discarded.
#[derive(Default)]
pub struct CliRecorder {
    store: Arc<Store>,
}

impl CliRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle sharing this recorder's storage.
    pub fn handle(&self) -> CliRecorderHandle {
        CliRecorderHandle {
            store: Arc::clone(&self.store),
        }
    }

    /// Install as the global recorder.
    ///
    /// Returns `None` if a global recorder was already set.
    pub fn install(self) -> Option<CliRecorderHandle> {
        let handle = self.handle();
        metrics::set_global_recorder(self).ok()?;
        Some(handle)
    }

    fn slot(&self, key: &Key) -> Arc<Slot> {
        Arc::new(Slot {
            key: render_key(key),
            store: Arc::clone(&self.store),
        })
    }
}

/// `name` or `name{k=v,...}`.
fn render_key(key: &Key) -> String {
    let labels: Vec<String> = key
        .labels()
        .map(|label| format!("{}={}", label.key(), label.value()))
        .collect();
    if labels.is_empty() {
        key.name().to_string()
    } else {
        format!("{}{{{}}}", key.name(), labels.join(","))
    }
}

impl Recorder for CliRecorder {
    fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
    fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
    fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

    fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
        Counter::from_arc(self.slot(key))
    }

    fn register_gauge(&self, key: &Key, _: &Metadata<'_>) -> Gauge {
        Gauge::from_arc(self.slot(key))
    }

    fn register_histogram(&self, _: &Key, _: &Metadata<'_>) -> Histogram {
        Histogram::noop()
    }
}

/// Read access to metrics collected by a [`CliRecorder`].
pub struct CliRecorderHandle {
    store: Arc<Store>,
}

impl CliRecorderHandle {
    /// Counter value by rendered key, e.g. `rvtrace_records_total{stream=emu}`.
    pub fn get_counter(&self, key: &str) -> Option<u64> {
        self.store.counters.read().get(key).copied()
    }

    pub fn get_gauge(&self, key: &str) -> Option<f64> {
        self.store.gauges.read().get(key).copied()
    }

    /// Write all collected metrics, sorted by key.
    pub fn write_summary<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let counters = self.store.counters.read();
        let gauges = self.store.gauges.read();

        if counters.is_empty() && gauges.is_empty() {
            return writeln!(out, "No metrics collected.");
        }

        writeln!(out, "\n## Metrics Summary\n")?;
        write_section(out, "Counters", &counters)?;
        write_section(out, "Gauges", &gauges)
    }

    /// Print the summary to stderr.
    pub fn print_summary(&self) {
        let _ = self.write_summary(&mut io::stderr().lock());
    }
}

fn write_section<W: Write, V: Display>(
    out: &mut W,
    title: &str,
    values: &BTreeMap<String, V>,
) -> io::Result<()> {
    if values.is_empty() {
        return Ok(());
    }
    writeln!(out, "### {title}")?;
    for (key, value) in values {
        writeln!(out, "  {key}: {value}")?;
    }
    writeln!(out)
}
