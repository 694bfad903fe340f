//! Build context providing logging and per-phase timing
//!
//! Messages are recorded in the context and forwarded to the `log` facade, so a
//! host that installs a logger sees them as they happen while tests can inspect
//! the recorded entries afterwards.

use std::collections::HashMap;
use std::time::Duration;
use web_time::Instant;

/// Log level for context messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Debug level messages
    Debug = 0,
    /// Informational messages
    Info = 1,
    /// Warning messages
    Warning = 2,
    /// Error messages
    Error = 3,
}

impl LogLevel {
    fn to_log(self) -> log::Level {
        match self {
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warning => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }
}

/// Phases of navigation mesh construction that are timed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildPhase {
    /// Whole build
    Total,
    /// Vertex welding
    Weld,
    /// T-junction splitting
    SplitEdges,
    /// Polygon triangulation
    Triangulate,
    /// Face adjacency
    Adjacency,
    /// Connectivity grouping
    Groups,
}

/// Log entry containing message and metadata
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub timestamp: Instant,
    pub message: String,
}

/// Accumulated timing for one phase
#[derive(Debug, Clone, Copy)]
pub struct TimerEntry {
    pub duration: Duration,
    pub count: usize,
}

/// Context for navigation mesh construction
#[derive(Debug)]
pub struct BuildContext {
    logs: Vec<LogEntry>,
    active_timers: HashMap<BuildPhase, Instant>,
    timers: HashMap<BuildPhase, TimerEntry>,
    min_log_level: LogLevel,
    enable_timing: bool,
    max_log_entries: usize,
}

impl Default for BuildContext {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildContext {
    /// Creates a new context with default settings
    pub fn new() -> Self {
        Self {
            logs: Vec::new(),
            active_timers: HashMap::new(),
            timers: HashMap::new(),
            min_log_level: LogLevel::Info,
            enable_timing: true,
            max_log_entries: 1000,
        }
    }

    /// Sets the minimum log level that is recorded
    pub fn set_log_level(&mut self, level: LogLevel) {
        self.min_log_level = level;
    }

    /// Enables or disables phase timing
    pub fn set_timing_enabled(&mut self, enabled: bool) {
        self.enable_timing = enabled;
    }

    pub fn log_debug(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    pub fn log_info(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    pub fn log_warning(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    pub fn log_error(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        let message = message.into();
        log::log!(target: "wayfind_mesh", level.to_log(), "{}", message);

        if level >= self.min_log_level {
            self.logs.push(LogEntry {
                level,
                timestamp: Instant::now(),
                message,
            });

            if self.logs.len() > self.max_log_entries {
                self.logs.remove(0);
            }
        }
    }

    /// Starts timing a phase
    pub fn start_timer(&mut self, phase: BuildPhase) {
        if self.enable_timing {
            self.active_timers.insert(phase, Instant::now());
        }
    }

    /// Stops timing a phase and accumulates the duration
    pub fn stop_timer(&mut self, phase: BuildPhase) {
        if !self.enable_timing {
            return;
        }
        if let Some(start_time) = self.active_timers.remove(&phase) {
            let duration = start_time.elapsed();
            let entry = self.timers.entry(phase).or_insert(TimerEntry {
                duration: Duration::ZERO,
                count: 0,
            });
            entry.duration += duration;
            entry.count += 1;
        }
    }

    /// Total duration recorded for a phase
    pub fn get_timer_duration(&self, phase: BuildPhase) -> Option<Duration> {
        self.timers.get(&phase).map(|entry| entry.duration)
    }

    /// How many times a phase was timed
    pub fn get_timer_count(&self, phase: BuildPhase) -> usize {
        self.timers.get(&phase).map(|entry| entry.count).unwrap_or(0)
    }

    pub fn get_logs(&self) -> &[LogEntry] {
        &self.logs
    }

    /// Gets log entries for a specific level
    pub fn get_logs_by_level(&self, level: LogLevel) -> Vec<&LogEntry> {
        self.logs
            .iter()
            .filter(|entry| entry.level == level)
            .collect()
    }

    /// Clears logs and timers
    pub fn reset(&mut self) {
        self.logs.clear();
        self.active_timers.clear();
        self.timers.clear();
    }

    /// Writes a summary of phase timers to the `log` facade
    pub fn log_timer_summary(&self) {
        let mut sorted: Vec<_> = self.timers.iter().collect();
        sorted.sort_by(|a, b| b.1.duration.cmp(&a.1.duration));

        for (phase, entry) in sorted {
            log::info!(
                target: "wayfind_mesh",
                "{:12} {:8.3}ms ({} calls)",
                format!("{:?}", phase),
                entry.duration.as_secs_f64() * 1000.0,
                entry.count
            );
        }
    }
}

/// Timer scope for one build phase
///
/// The guard does not hold the context borrow; call [`TimerGuard::stop`] to record
/// the duration.
#[must_use = "a phase timer records nothing unless stopped"]
pub struct TimerGuard {
    phase: BuildPhase,
}

impl TimerGuard {
    /// Starts timing `phase`
    pub fn new(context: &mut BuildContext, phase: BuildPhase) -> Self {
        context.start_timer(phase);
        Self { phase }
    }

    /// Stops the timer and records the duration
    pub fn stop(self, context: &mut BuildContext) {
        context.stop_timer(self.phase);
    }

    pub fn phase(&self) -> BuildPhase {
        self.phase
    }
}
