//! 32-bit encodings: RV32I, M, Zicsr and Zifencei.

use crate::InstrArgs;
use crate::fields::{
    b_imm, csr, funct3, funct7, i_imm, j_imm, opcode, rd, rs1, rs2, s_imm, target, u_imm,
};

pub(crate) fn decode_32bit(instr: u32, pc: u32) -> Option<(&'static str, InstrArgs)> {
    let funct3 = funct3(instr);
    let funct7 = funct7(instr);
    let rd = rd(instr);
    let rs1 = rs1(instr);
    let rs2 = rs2(instr);

    match opcode(instr) {
        0x37 => Some(("lui", InstrArgs::U { rd, imm: u_imm(instr) })),
        0x17 => Some(("auipc", InstrArgs::U { rd, imm: u_imm(instr) })),
        0x6F => Some((
            "jal",
            InstrArgs::J {
                rd,
                target: target(pc, j_imm(instr)),
            },
        )),
        0x67 if funct3 == 0 => Some((
            "jalr",
            InstrArgs::Mem {
                reg: rd,
                base: rs1,
                offset: i_imm(instr),
            },
        )),
        0x63 => decode_branch(funct3, rs1, rs2, target(pc, b_imm(instr))),
        0x03 => decode_load(funct3, rd, rs1, i_imm(instr)),
        0x23 => decode_store(funct3, rs1, rs2, s_imm(instr)),
        0x13 => decode_op_imm(funct3, funct7, rd, rs1, instr),
        0x33 if funct7 == 0x01 => decode_mul(funct3, rd, rs1, rs2),
        0x33 => decode_op(funct3, funct7, rd, rs1, rs2),
        0x0F => decode_misc_mem(funct3, instr),
        0x73 => decode_system(funct3, rd, rs1, instr),
        _ => None,
    }
}

const fn decode_branch(funct3: u8, rs1: u8, rs2: u8, target: u32) -> Option<(&'static str, InstrArgs)> {
    let op = match funct3 {
        0 => "beq",
        1 => "bne",
        4 => "blt",
        5 => "bge",
        6 => "bltu",
        7 => "bgeu",
        _ => return None,
    };
    Some((op, InstrArgs::B { rs1, rs2, target }))
}

const fn decode_load(funct3: u8, rd: u8, rs1: u8, offset: i32) -> Option<(&'static str, InstrArgs)> {
    let op = match funct3 {
        0 => "lb",
        1 => "lh",
        2 => "lw",
        4 => "lbu",
        5 => "lhu",
        _ => return None,
    };
    Some((
        op,
        InstrArgs::Mem {
            reg: rd,
            base: rs1,
            offset,
        },
    ))
}

const fn decode_store(funct3: u8, rs1: u8, rs2: u8, offset: i32) -> Option<(&'static str, InstrArgs)> {
    let op = match funct3 {
        0 => "sb",
        1 => "sh",
        2 => "sw",
        _ => return None,
    };
    Some((
        op,
        InstrArgs::Mem {
            reg: rs2,
            base: rs1,
            offset,
        },
    ))
}

const fn decode_op_imm(
    funct3: u8,
    funct7: u8,
    rd: u8,
    rs1: u8,
    instr: u32,
) -> Option<(&'static str, InstrArgs)> {
    // RV32 shifts only have a 5-bit shamt, so funct7 must be exact.
    let shamt = ((instr >> 20) & 0x1F) as i32;
    let (op, imm) = match funct3 {
        0 => ("addi", i_imm(instr)),
        1 if funct7 == 0 => ("slli", shamt),
        2 => ("slti", i_imm(instr)),
        3 => ("sltiu", i_imm(instr)),
        4 => ("xori", i_imm(instr)),
        5 if funct7 == 0 => ("srli", shamt),
        5 if funct7 == 0x20 => ("srai", shamt),
        6 => ("ori", i_imm(instr)),
        7 => ("andi", i_imm(instr)),
        _ => return None,
    };
    Some((op, InstrArgs::I { rd, rs1, imm }))
}

const fn decode_op(funct3: u8, funct7: u8, rd: u8, rs1: u8, rs2: u8) -> Option<(&'static str, InstrArgs)> {
    let op = match (funct7, funct3) {
        (0x00, 0) => "add",
        (0x20, 0) => "sub",
        (0x00, 1) => "sll",
        (0x00, 2) => "slt",
        (0x00, 3) => "sltu",
        (0x00, 4) => "xor",
        (0x00, 5) => "srl",
        (0x20, 5) => "sra",
        (0x00, 6) => "or",
        (0x00, 7) => "and",
        _ => return None,
    };
    Some((op, InstrArgs::R { rd, rs1, rs2 }))
}

const fn decode_mul(funct3: u8, rd: u8, rs1: u8, rs2: u8) -> Option<(&'static str, InstrArgs)> {
    let op = match funct3 {
        0 => "mul",
        1 => "mulh",
        2 => "mulhsu",
        3 => "mulhu",
        4 => "div",
        5 => "divu",
        6 => "rem",
        _ => "remu",
    };
    Some((op, InstrArgs::R { rd, rs1, rs2 }))
}

const fn decode_misc_mem(funct3: u8, instr: u32) -> Option<(&'static str, InstrArgs)> {
    match funct3 {
        0 => Some((
            "fence",
            InstrArgs::Fence {
                pred: ((instr >> 24) & 0xF) as u8,
                succ: ((instr >> 20) & 0xF) as u8,
            },
        )),
        1 => Some(("fence.i", InstrArgs::None)),
        _ => None,
    }
}

const fn decode_system(funct3: u8, rd: u8, rs1: u8, instr: u32) -> Option<(&'static str, InstrArgs)> {
    let csr = csr(instr);
    let op = match funct3 {
        0 => {
            return match instr {
                0x0000_0073 => Some(("ecall", InstrArgs::None)),
                0x0010_0073 => Some(("ebreak", InstrArgs::None)),
                0x3020_0073 => Some(("mret", InstrArgs::None)),
                0x1050_0073 => Some(("wfi", InstrArgs::None)),
                _ => None,
            };
        }
        1 => "csrrw",
        2 => "csrrs",
        3 => "csrrc",
        5 => "csrrwi",
        6 => "csrrsi",
        7 => "csrrci",
        _ => return None,
    };
    if funct3 & 0x4 == 0 {
        Some((op, InstrArgs::Csr { rd, rs1, csr }))
    } else {
        Some((op, InstrArgs::CsrImm { rd, zimm: rs1, csr }))
    }
}
