//! End-to-end comparison of trace files.

mod common;

use rvtrace::{
    CompareConfig, Config, DecodeError, DecoderConfig, Error, EventPayload, Exhausted, IsaMode,
    Record, Report, SessionSummary, StopReason, compare_files,
};

use common::{program, write_compressed_trace, write_trace};

fn compare(emu: &[Record], rtl: &[Record], config: &Config) -> (rvtrace::Result<SessionSummary>, String) {
    let dir = tempfile::tempdir().expect("tempdir");
    let emu = write_trace(dir.path(), "emu.bin", emu);
    let rtl = write_trace(dir.path(), "rtl.bin", rtl);
    let mut report = Report::new(Vec::new(), false);
    let result = compare_files(&emu, &rtl, config, &mut report);
    (result, String::from_utf8(report.into_inner()).expect("utf-8 report"))
}

#[test]
fn test_identical_traces() {
    let records = program();
    let (result, out) = compare(&records, &records, &Config::default());
    let summary = result.unwrap();

    // The jalr record is filtered on both sides.
    assert_eq!(summary.steps, 5);
    assert!(summary.is_clean());
    assert_eq!(summary.stop, StopReason::EndOfStream(Exhausted::Both));
    assert!(out.ends_with("--- Instruction 5 ---\nEnd of file reached.\n"));
    assert!(!out.contains("Mismatch"));
}

#[test]
fn test_store_value_mismatch() {
    let emu = program();
    let mut rtl = program();
    rtl[2].payload = EventPayload::MemWrite {
        addr: 0x0000_000A,
        value: 0x1234_5679,
    };

    let (result, out) = compare(&emu, &rtl, &Config::default());
    let summary = result.unwrap();
    assert_eq!(summary.mismatches, 1);
    assert_eq!(summary.stop, StopReason::EndOfStream(Exhausted::Both));

    let lines: Vec<&str> = out.lines().collect();
    let at = lines
        .iter()
        .position(|l| *l == "Mismatch detected!")
        .expect("mismatch block");
    assert_eq!(lines[at - 1], "--- Instruction 2 ---");
    assert_eq!(
        lines[at + 1],
        "EMU: 3: sw a1, 0(a0) \t + MemWrite: PC=0x80000008, Opcode=0x00B52023, \
         Addr=0x0000000A, Value=0x12345678"
    );
    assert_eq!(
        lines[at + 2],
        "RTL: 3: sw a1, 0(a0) \t + MemWrite: PC=0x80000008, Opcode=0x00B52023, \
         Addr=0x0000000A, Value=0x12345679"
    );
}

#[test]
fn test_jumps_compared_when_kept() {
    let emu = program();
    let mut rtl = program();
    // The RTL logs the return from a different address; only visible with
    // jumps kept.
    rtl[4].pc = 0x8000_0018;

    let (result, _) = compare(&emu, &rtl, &Config::default());
    assert!(result.unwrap().is_clean());

    let config = Config {
        decoder: DecoderConfig { skip_jumps: false },
        ..Config::default()
    };
    let (result, out) = compare(&emu, &rtl, &config);
    let summary = result.unwrap();
    assert_eq!(summary.mismatches, 1);
    assert_eq!(summary.steps, 6);
    assert!(out.contains("--- Instruction 4 ---\nMismatch detected!\n"));
    assert!(out.contains("RTL: 5: jalr zero, 0(ra)"));
}

#[test]
fn test_rtl_trace_stops_early() {
    let emu = program();
    let rtl = &program()[..2];
    let (result, out) = compare(&emu, rtl, &Config::default());
    let summary = result.unwrap();
    assert_eq!(summary.steps, 2);
    assert_eq!(summary.stop, StopReason::EndOfStream(Exhausted::Rtl));
    assert!(out.ends_with("End of file reached.\n"));
}

#[test]
fn test_diverged_traces_hit_mismatch_limit() {
    let emu = program();
    let rtl: Vec<Record> = program()
        .into_iter()
        .map(|mut r| {
            r.pc ^= 0x100;
            r
        })
        .collect();

    let (result, out) = compare(&emu, &rtl, &Config::default());
    let summary = result.unwrap();
    assert_eq!(summary.mismatches, 2);
    assert_eq!(summary.stop, StopReason::MismatchLimit);
    assert!(out.ends_with("Too many mismatches, stopping analysis.\n"));

    let config = Config {
        compare: CompareConfig {
            max_mismatches: 10,
            ..CompareConfig::default()
        },
        ..Config::default()
    };
    let (result, _) = compare(&emu, &rtl, &config);
    let summary = result.unwrap();
    assert_eq!(summary.mismatches, 5);
    assert_eq!(summary.stop, StopReason::EndOfStream(Exhausted::Both));
}

#[test]
fn test_compressed_trace_matches_raw() {
    let records = program();
    let dir = tempfile::tempdir().expect("tempdir");
    let raw = write_trace(dir.path(), "emu.bin", &records);
    let packed = write_compressed_trace(dir.path(), "rtl.bin.zst", &records);

    let mut report = Report::new(Vec::new(), false);
    let summary = compare_files(&raw, &packed, &Config::default(), &mut report).unwrap();
    assert!(summary.is_clean());
    assert_eq!(summary.steps, 5);
}

#[test]
fn test_truncated_trace_is_fatal() {
    let records = program();
    let dir = tempfile::tempdir().expect("tempdir");
    let emu = write_trace(dir.path(), "emu.bin", &records);
    let rtl = dir.path().join("rtl.bin");
    let mut bytes = rvtrace::record::encode(&records);
    bytes.truncate(bytes.len() - 2);
    std::fs::write(&rtl, bytes).unwrap();

    let mut report = Report::new(Vec::new(), false);
    let err = compare_files(&emu, &rtl, &Config::default(), &mut report).unwrap_err();
    match err {
        Error::Decode(DecodeError::CorruptRecord { stream, field, .. }) => {
            assert_eq!(stream, rvtrace::Stream::Rtl);
            assert_eq!(field, "value");
        }
        other => panic!("expected corrupt record, got {other}"),
    }
}

#[test]
fn test_missing_trace_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let emu = write_trace(dir.path(), "emu.bin", &program());
    let missing = dir.path().join("missing.bin");

    let mut report = Report::new(Vec::new(), false);
    let err = compare_files(&emu, &missing, &Config::default(), &mut report).unwrap_err();
    assert!(matches!(err, Error::Open { ref path, .. } if *path == missing));
}

#[test]
fn test_without_compressed_extension() {
    // c.li a0, 1 (0x4505) is only readable with the C extension.
    let records = [Record::new(
        0x100,
        0x0000_4505,
        EventPayload::RegWrite { reg: 10, value: 1 },
    )];
    let config = Config {
        isa: IsaMode::RV32,
        compare: CompareConfig {
            echo_events: true,
            ..CompareConfig::default()
        },
        ..Config::default()
    };
    let (result, out) = compare(&records, &records, &config);
    assert!(result.unwrap().is_clean());
    assert!(out.contains("EMU: 1: <invalid 0x00004505> \t + RegWrite"));

    let config = Config {
        compare: config.compare,
        ..Config::default()
    };
    let (_, out) = compare(&records, &records, &config);
    assert!(out.contains("EMU: 1: c.li a0, 1 \t + RegWrite"));
}

#[test]
fn test_raw_trace_with_zstd_magic_pc() {
    let records = [Record::new(
        0xFD2F_B528,
        0x0000_0013,
        EventPayload::RegWrite {
            reg: 5,
            value: 0x2A,
        },
    )];
    let (result, out) = compare(&records, &records, &Config::default());
    let summary = result.unwrap();
    assert!(summary.is_clean());
    assert_eq!(summary.steps, 1);
    assert!(out.ends_with("End of file reached.\n"));
}
