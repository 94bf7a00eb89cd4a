#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use rvtrace::{EventPayload, Record, record};

/// Records of a short RV32 program: a load, a store, a call and its return.
pub fn program() -> Vec<Record> {
    vec![
        Record::new(
            0x8000_0000,
            0x00A0_0513, // addi a0, zero, 10
            EventPayload::RegWrite { reg: 10, value: 10 },
        ),
        Record::new(
            0x8000_0004,
            0x0005_2583, // lw a1, 0(a0)
            EventPayload::MemRead {
                addr: 0x0000_000A,
                value: 0x1234_5678,
            },
        ),
        Record::new(
            0x8000_0008,
            0x00B5_2023, // sw a1, 0(a0)
            EventPayload::MemWrite {
                addr: 0x0000_000A,
                value: 0x1234_5678,
            },
        ),
        Record::new(
            0x8000_000C,
            0x0080_00EF, // jal ra, 8
            EventPayload::FlowLink {
                new_pc: 0x8000_0014,
                register: 1,
            },
        ),
        Record::new(
            0x8000_0014,
            0x0000_8067, // jalr zero, 0(ra)
            EventPayload::FlowChange {
                new_pc: 0x8000_0010,
            },
        ),
        Record::new(
            0x8000_0010,
            0x0000_0513, // addi a0, zero, 0
            EventPayload::RegWrite { reg: 10, value: 0 },
        ),
    ]
}

pub fn write_trace(dir: &Path, name: &str, records: &[Record]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, record::encode(records)).expect("write trace");
    path
}

pub fn write_compressed_trace(dir: &Path, name: &str, records: &[Record]) -> PathBuf {
    let path = dir.join(name);
    let compressed = zstd::encode_all(&record::encode(records)[..], 3).expect("compress trace");
    fs::write(&path, compressed).expect("write trace");
    path
}
