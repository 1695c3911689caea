//! LogStream gating and the LogContext facade

mod common;

use std::fmt::Write as _;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use common::Collector;
use logbuf_core::config::{FactoryKind, PoolConfig};
use logbuf_core::factory::MessageFactory;
use logbuf_core::level::LogLevel;
use logbuf_mem::{MessageSource, SimpleFactory};
use logbuf_stream::{LogContext, LogStream};

#[test]
fn test_disabled_stream_never_obtains() {
    let factory = Arc::new(SimpleFactory::new(16, 64));
    let sink = Collector::new(Arc::clone(&factory));
    {
        let mut s = LogStream::new(&*factory, &sink, "off", LogLevel::Trace, false);
        for _ in 0..100 {
            write!(s, "discarded {}", 7).unwrap();
        }
        assert_eq!(s.write_bytes(&[0u8; 4096]).unwrap(), 4096);
    }
    assert_eq!(factory.peak_active(), 0);
    assert_eq!(sink.count(), 0);
}

#[test]
fn test_one_message_per_statement() {
    let factory = Arc::new(SimpleFactory::new(64, 256));
    let sink = Arc::new(Collector::new(Arc::clone(&factory)));
    let ctx = LogContext::new(Arc::clone(&factory), Arc::clone(&sink), LogLevel::Debug);
    let log = ctx.logger("app");

    write!(log.info(), "first").unwrap();
    write!(log.trace(), "suppressed").unwrap();
    log.error().display("second").display(" and more");

    assert_eq!(sink.joined(), b"firstsecond and more".to_vec());
    assert_eq!(
        sink.tags(),
        vec![
            ("app".to_string(), LogLevel::Info),
            ("app".to_string(), LogLevel::Error)
        ]
    );
}

#[test]
fn test_levels_are_per_destination() {
    let factory = Arc::new(SimpleFactory::new(16, 16));
    let sink = Arc::new(Collector::new(Arc::clone(&factory)));
    let ctx = LogContext::new(factory, sink, LogLevel::Warn);

    ctx.set_level("chatty", LogLevel::Trace);
    let chatty = ctx.logger("chatty");
    let quiet = ctx.logger("quiet");
    assert!(chatty.is_enabled(LogLevel::Trace));
    assert!(!quiet.is_enabled(LogLevel::Info));
    assert!(quiet.is_enabled(LogLevel::Warn));
    assert_eq!(ctx.default_level(), LogLevel::Warn);
}

#[test]
fn test_stream_decision_fixed_at_open() {
    let factory = Arc::new(SimpleFactory::new(16, 16));
    let sink = Arc::new(Collector::new(Arc::clone(&factory)));
    let ctx = LogContext::new(Arc::clone(&factory), Arc::clone(&sink), LogLevel::Info);
    let log = ctx.logger("svc");

    let mut s = log.debug();
    assert!(!s.is_enabled());
    ctx.set_level("svc", LogLevel::Debug);
    write!(s, "still dropped").unwrap();
    drop(s);
    assert_eq!(sink.count(), 0);

    write!(log.debug(), "now visible").unwrap();
    assert_eq!(sink.joined(), b"now visible".to_vec());
}

#[test]
fn test_threads_share_context_and_drain_on_shutdown() {
    let cfg = PoolConfig {
        kind: FactoryKind::Pool,
        initial_message_size: 16,
        max_message_size: 128,
        max_returned_message_size: 128,
        initial_pool_size: 4,
        max_pool_size: 16,
    };
    let source = Arc::new(MessageSource::from_config(&cfg).unwrap());
    let sink = Arc::new(Collector::new(Arc::clone(&source)));
    let ctx = Arc::new(LogContext::new(
        Arc::clone(&source),
        Arc::clone(&sink),
        LogLevel::Info,
    ));

    let mut handles = Vec::new();
    for t in 0..4 {
        let log = ctx.logger(&format!("worker.{t}"));
        handles.push(thread::spawn(move || {
            for i in 0..50 {
                write!(log.info(), "worker {t} line {i}").unwrap();
            }
        }));
    }
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(sink.count(), 200);
    assert_eq!(source.active_count(), 200);
    assert!(!ctx.shutdown(Some(Instant::now() + Duration::from_millis(20))));

    let releaser = {
        let sink = Arc::clone(&sink);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            sink.release_all();
        })
    };
    assert!(ctx.shutdown(Some(Instant::now() + Duration::from_secs(10))));
    releaser.join().unwrap();
    assert!(source.idle_count() <= 16);
    assert!(source.wait_until_drained(Some(Instant::now())));
}
