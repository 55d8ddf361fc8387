use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use job_log::{LineLoggingSink, RecordSink, TeeWriter};

#[derive(Clone, Default)]
struct CollectingSink {
    records: Arc<Mutex<Vec<String>>>,
}

impl CollectingSink {
    fn records(&self) -> Vec<String> {
        self.records.lock().unwrap().clone()
    }
}

impl RecordSink for CollectingSink {
    fn append(&mut self, record: &str) -> io::Result<()> {
        self.records.lock().unwrap().push(record.to_string());
        Ok(())
    }
}

#[derive(Clone, Copy)]
struct FailingSink;

impl RecordSink for FailingSink {
    fn append(&mut self, _record: &str) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "backend down"))
    }
}

#[derive(Clone, Copy)]
struct DisabledSink;

impl RecordSink for DisabledSink {
    fn append(&mut self, _record: &str) -> io::Result<()> {
        panic!("append must not be called while disabled");
    }

    fn enabled(&self) -> bool {
        false
    }
}

#[test]
fn chunk_is_trimmed_and_prefixed() {
    let records = CollectingSink::default();
    let mut sink = LineLoggingSink::new("build#42", records.clone());
    sink.write_all(b"  hello world  \n").unwrap();
    assert_eq!(records.records(), ["build#42: hello world"]);
}

#[test]
fn whitespace_chunk_is_suppressed_by_default() {
    let records = CollectingSink::default();
    let mut sink = LineLoggingSink::new("build#42", records.clone());
    sink.write_all(b"   \n").unwrap();
    assert!(records.records().is_empty());
}

#[test]
fn whitespace_chunk_logs_bare_prefix_when_not_suppressed() {
    let records = CollectingSink::default();
    let mut sink = LineLoggingSink::with_suppress_empty("build#42", false, records.clone());
    sink.write_all(b"   \n").unwrap();
    assert_eq!(records.records(), ["build#42: "]);
}

#[test]
fn single_byte_renders_as_signed_integer() {
    let records = CollectingSink::default();
    let mut sink = LineLoggingSink::new("b", records.clone());
    sink.write_byte(65).unwrap();
    assert_eq!(records.records(), ["b: 65"]);
}

#[test]
fn single_byte_ignores_suppression_and_wraps_negative() {
    let records = CollectingSink::default();
    let mut sink = LineLoggingSink::new("b", records.clone());
    sink.write_byte(200).unwrap();
    sink.write_byte(b'\n').unwrap();
    assert_eq!(records.records(), ["b: -56", "b: 10"]);
}

#[test]
fn each_write_call_is_one_record() {
    let records = CollectingSink::default();
    let mut sink = LineLoggingSink::new("job#1", records.clone());
    sink.write_all(b"first").unwrap();
    sink.write_all(b"sec").unwrap();
    sink.write_all(b"ond\n").unwrap();
    assert_eq!(records.records(), ["job#1: first", "job#1: sec", "job#1: ond"]);
}

#[test]
fn identical_inputs_produce_identical_records() {
    let input: &[&[u8]] = &[b"alpha\n", b"  \n", b"beta  ", &[0xff, b'x']];
    let run = || {
        let records = CollectingSink::default();
        let mut sink = LineLoggingSink::new("build#42", records.clone());
        for chunk in input {
            sink.write_all(chunk).unwrap();
        }
        records.records()
    };
    assert_eq!(run(), run());
}

#[test]
fn invalid_utf8_decodes_lossily() {
    let records = CollectingSink::default();
    let mut sink = LineLoggingSink::new("j#1", records.clone());
    sink.write_all(&[b'o', b'k', 0xff, b'\n']).unwrap();
    assert_eq!(records.records(), ["j#1: ok\u{fffd}"]);
}

#[test]
fn backend_failure_propagates_as_io_error() {
    let mut sink = LineLoggingSink::new("job#1", FailingSink);
    let err = sink.write_all(b"boom").unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    let err = sink.write_byte(1).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
}

#[test]
fn disabled_sink_accepts_and_drops_writes() {
    let mut sink = LineLoggingSink::new("job#1", DisabledSink);
    sink.write_all(b"dropped").unwrap();
    sink.write_byte(65).unwrap();
    sink.flush().unwrap();
}

#[test]
fn flush_is_a_noop() {
    let records = CollectingSink::default();
    let mut sink = LineLoggingSink::new("job#1", records.clone());
    sink.flush().unwrap();
    assert!(records.records().is_empty());
}

#[test]
fn tee_duplicates_bytes_to_both_branches() {
    let mut tee = TeeWriter::new(Vec::new(), Vec::new());
    tee.write_all(b"one").unwrap();
    tee.write_all(b"two").unwrap();
    tee.flush().unwrap();
    let (primary, mirror) = tee.into_inner();
    assert_eq!(primary, b"onetwo");
    assert_eq!(mirror, b"onetwo");
}

#[test]
fn tee_propagates_mirror_errors() {
    struct Broken;
    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::WriteZero, "gone"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let mut tee = TeeWriter::new(Vec::new(), Broken);
    let err = tee.write_all(b"x").unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::WriteZero);
}

#[test]
fn tee_feeds_a_line_logging_sink() {
    let records = CollectingSink::default();
    let sink = LineLoggingSink::new("deploy#7", records.clone());
    let mut tee = TeeWriter::new(Vec::new(), sink);
    tee.write_all(b"compiling 3 crates\n").unwrap();
    tee.write_all(b"\n").unwrap();
    let (primary, _) = tee.into_inner();
    assert_eq!(primary, b"compiling 3 crates\n\n");
    assert_eq!(records.records(), ["deploy#7: compiling 3 crates"]);
}
