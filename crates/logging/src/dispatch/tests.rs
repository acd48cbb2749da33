use super::*;
use std::sync::Mutex;
use std::time::Duration;

use logging_sink::{MemoryConsole, MemorySystemLog, SyslogPriority};

const HERE: Location = Location::new("nvme.rs", 17, "nvme::attach");

struct Harness {
    ctx: Arc<LogContext>,
    console: MemoryConsole,
    system_log: MemorySystemLog,
}

fn hook<F>(f: F) -> Arc<dyn LogHook>
where
    F: Fn(&Record<'_>) + Send + Sync + 'static,
{
    Arc::new(f)
}

fn harness() -> Harness {
    let console = MemoryConsole::new();
    let system_log = MemorySystemLog::new();
    let ctx = LogContext::builder()
        .console(console.clone())
        .system_log(system_log.clone())
        .utc_offset(UtcOffset::UTC)
        .build();
    ctx.enable_timestamps(false);
    Harness {
        ctx,
        console,
        system_log,
    }
}

#[test]
fn defaults_gate_at_error_for_both_sinks() {
    let h = harness();
    assert_eq!(h.ctx.level(), Level::Error);
    assert_eq!(h.ctx.print_level(), Level::Error);
    assert_eq!(h.ctx.ratelimit_interval(), 10);
    assert_eq!(h.ctx.ratelimit_burst(), 5000);

    h.ctx.log(Level::Warn, Some(HERE), format_args!("ignored"));
    h.ctx.log(Level::Error, Some(HERE), format_args!("kept"));

    assert_eq!(
        h.console.lines(),
        vec!["nvme.rs:  17:nvme::attach: *ERROR*: kept"]
    );
    assert_eq!(h.system_log.texts(), vec!["nvme.rs:  17:nvme::attach: *ERROR*: kept"]);
}

#[test]
fn zero_interval_silences_admitted_messages() {
    let h = harness();
    h.ctx.set_print_level(Level::Warn);
    h.ctx.set_level(Level::Disabled);
    h.ctx.set_ratelimit_interval(0);

    h.ctx.log(Level::Error, Some(HERE), format_args!("lost"));

    assert!(h.console.is_empty());
    assert!(h.system_log.entries().is_empty());
    assert_eq!(h.ctx.ratelimit_stats(), RateLimitStats::default());
}

#[test]
fn burst_caps_lines_per_window() {
    let h = harness();
    h.ctx.set_print_level(Level::Debug);
    h.ctx.set_level(Level::Disabled);
    h.ctx.set_ratelimit_interval(60);
    h.ctx.set_ratelimit_burst(2);

    let start = Instant::now();
    for n in 0..3 {
        h.ctx
            .dispatch(start, Level::Debug, Some(HERE), format_args!("tick {n}"));
    }

    assert_eq!(h.console.lines().len(), 2);
    assert_eq!(
        h.ctx.ratelimit_stats(),
        RateLimitStats {
            printed: 2,
            missed: 1
        }
    );
    assert!(h.system_log.entries().is_empty());
}

#[test]
fn rollover_summary_precedes_next_line() {
    let h = harness();
    h.ctx.set_print_level(Level::Info);
    h.ctx.set_ratelimit_interval(5);
    h.ctx.set_ratelimit_burst(1);

    let start = Instant::now();
    h.ctx.dispatch(start, Level::Info, None, format_args!("first"));
    h.ctx.dispatch(start, Level::Info, None, format_args!("dropped"));
    h.ctx.dispatch(start, Level::Info, None, format_args!("dropped"));
    h.ctx.dispatch(
        start + Duration::from_secs(6),
        Level::Info,
        None,
        format_args!("after"),
    );

    assert_eq!(
        h.console.lines(),
        vec![
            "first",
            ": 2 log messages suppressed, 1 printed",
            "after"
        ]
    );
}

#[test]
fn summary_is_written_even_when_message_is_denied() {
    let h = harness();
    h.ctx.set_print_level(Level::Info);
    h.ctx.set_ratelimit_interval(5);
    h.ctx.set_ratelimit_burst(1);

    let start = Instant::now();
    h.ctx.dispatch(start, Level::Info, None, format_args!("one"));
    h.ctx.dispatch(start, Level::Info, None, format_args!("two"));
    h.ctx.set_ratelimit_burst(0);
    h.ctx.dispatch(
        start + Duration::from_secs(10),
        Level::Info,
        None,
        format_args!("three"),
    );

    assert_eq!(
        h.console.lines(),
        vec!["one", ": 1 log messages suppressed, 1 printed"]
    );
}

#[test]
fn console_and_system_log_thresholds_are_independent() {
    let h = harness();
    h.ctx.set_print_level(Level::Error);
    h.ctx.set_level(Level::Notice);

    h.ctx.log(Level::Notice, Some(HERE), format_args!("to syslog only"));
    h.ctx.log(Level::Info, Some(HERE), format_args!("nowhere"));

    assert!(h.console.is_empty());
    assert_eq!(
        h.system_log.entries(),
        vec![logging_sink::SystemLogEntry {
            priority: SyslogPriority::Notice,
            text: "nvme.rs:  17:nvme::attach: *NOTICE*: to syslog only".to_owned(),
        }]
    );
}

#[test]
fn system_log_priorities_follow_level() {
    let h = harness();
    h.ctx.set_level(Level::Debug);

    for level in [Level::Error, Level::Warn, Level::Notice, Level::Info, Level::Debug] {
        h.ctx.log(level, None, format_args!("{level}"));
    }

    let priorities: Vec<_> = h
        .system_log
        .entries()
        .into_iter()
        .map(|entry| entry.priority)
        .collect();
    assert_eq!(
        priorities,
        vec![
            SyslogPriority::Error,
            SyslogPriority::Warning,
            SyslogPriority::Notice,
            SyslogPriority::Info,
            SyslogPriority::Info,
        ]
    );
}

#[test]
fn disabled_level_is_never_emitted() {
    let h = harness();
    h.ctx.set_level(Level::Debug);
    h.ctx.set_print_level(Level::Debug);

    h.ctx.log(Level::Disabled, Some(HERE), format_args!("never"));

    assert!(h.console.is_empty());
    assert!(h.system_log.entries().is_empty());
    assert_eq!(h.ctx.ratelimit_stats(), RateLimitStats::default());
}

#[test]
fn timestamp_prefix_only_reaches_console() {
    let h = harness();
    h.ctx.enable_timestamps(true);
    h.ctx.set_level(Level::Error);

    h.ctx.log(Level::Error, Some(HERE), format_args!("stamped"));

    let line = h.console.contents();
    assert!(line.starts_with('['));
    assert!(line.ends_with("] nvme.rs:  17:nvme::attach: *ERROR*: stamped\n"));
    assert_eq!(
        h.system_log.texts(),
        vec!["nvme.rs:  17:nvme::attach: *ERROR*: stamped"]
    );
}

#[test]
fn hook_receives_every_call_unfiltered() {
    let h = harness();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    h.ctx
        .install_hook(hook(move |record| {
            sink.lock()
                .expect("hook capture")
                .push((record.level(), record.location(), record.args().to_string()));
        }))
        .expect("first install succeeds");

    h.ctx.set_ratelimit_interval(0);
    h.ctx.log(Level::Debug, Some(HERE), format_args!("verbose {}", 1));
    h.ctx.log(Level::Disabled, None, format_args!("even this"));

    let seen = seen.lock().expect("hook capture");
    assert_eq!(
        *seen,
        vec![
            (Level::Debug, Some(HERE), "verbose 1".to_owned()),
            (Level::Disabled, None, "even this".to_owned()),
        ]
    );
    assert!(h.console.is_empty());
    assert!(h.system_log.entries().is_empty());
}

#[test]
fn second_hook_is_rejected() {
    let h = harness();
    let first = hook(|_| {});
    let second = hook(|_| {});

    assert_eq!(h.ctx.install_hook(first), Ok(()));
    assert_eq!(h.ctx.install_hook(second), Err(HookError::AlreadyInstalled));
    assert!(h.ctx.has_hook());
}

#[test]
fn builder_hook_skips_system_log_open() {
    let system_log = MemorySystemLog::new();
    let ctx = LogContext::builder()
        .console(MemoryConsole::new())
        .system_log(system_log.clone())
        .hook(hook(|_| {}))
        .build();

    ctx.initialize();
    assert!(!system_log.is_open());
    ctx.shutdown();
    assert_eq!(system_log.close_count(), 0);
}

#[test]
fn lifecycle_calls_are_idempotent() {
    let h = harness();
    h.ctx.initialize();
    h.ctx.initialize();
    assert!(h.system_log.is_open());
    assert_eq!(h.system_log.open_count(), 1);

    h.ctx.shutdown();
    h.ctx.shutdown();
    assert!(!h.system_log.is_open());
    assert_eq!(h.system_log.close_count(), 1);
}

#[test]
fn shutdown_without_initialize_leaves_sink_alone() {
    let h = harness();
    h.ctx.shutdown();
    assert_eq!(h.system_log.close_count(), 0);
}

#[test]
fn dump_to_console_bypasses_gating() {
    let h = harness();
    h.ctx.set_print_level(Level::Disabled);
    h.ctx.set_ratelimit_interval(0);

    h.ctx.dump_to_console("hdr", b"AB");

    let output = h.console.contents();
    assert!(output.starts_with("hdr\n00000000  41 42"));
    assert!(output.ends_with("  AB\n"));
}

#[test]
fn oversized_messages_are_truncated() {
    let h = harness();
    let long = "z".repeat(4096);
    h.ctx.log(Level::Error, None, format_args!("{long}"));

    let lines = h.console.lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].len(), render::MESSAGE_BUFFER_LEN - 1);
}

#[test]
fn config_seeds_builder_state() {
    let mut config = LogConfig::default();
    config.level = Level::Info;
    config.print_level = Level::Warn;
    config.ratelimit.interval_secs = 3;
    config.ratelimit.burst = 9;
    config.timestamps = false;

    let ctx = LogContext::builder()
        .config(config)
        .console(MemoryConsole::new())
        .system_log(MemorySystemLog::new())
        .build();

    assert_eq!(ctx.level(), Level::Info);
    assert_eq!(ctx.print_level(), Level::Warn);
    assert_eq!(ctx.ratelimit_interval(), 3);
    assert_eq!(ctx.ratelimit_burst(), 9);
    assert!(!ctx.timestamps_enabled());
}

#[test]
fn debug_output_reports_hook_presence() {
    let h = harness();
    let rendered = format!("{:?}", h.ctx);
    assert!(rendered.starts_with("LogContext"));
    assert!(rendered.contains("hook: false"));
}
