//! 16-bit encodings of the C extension (RV32 subset, no floating point).

use crate::InstrArgs;
use crate::fields::{
    addi4spn_imm, c_rd, c_reg, c_rs2, cb_imm, ci16sp_imm, ci_imm, ci_lui_imm, ci_lwsp_offset,
    ci_shamt, cj_imm, cl_lw_offset, css_swsp_offset, target,
};

pub(crate) fn decode_16bit(instr: u16, pc: u32) -> Option<(&'static str, InstrArgs)> {
    let funct3 = ((instr >> 13) & 0x7) as u8;
    match instr & 0x3 {
        0b00 => decode_q0(instr, funct3),
        0b01 => decode_q1(instr, funct3, pc),
        0b10 => decode_q2(instr, funct3),
        _ => None,
    }
}

fn decode_q0(instr: u16, funct3: u8) -> Option<(&'static str, InstrArgs)> {
    match funct3 {
        0b000 => {
            let nzuimm = addi4spn_imm(instr);
            if nzuimm == 0 {
                // Also covers the all-zero illegal instruction.
                return None;
            }
            Some((
                "c.addi4spn",
                InstrArgs::I {
                    rd: c_reg(instr, 2),
                    rs1: 2,
                    imm: i32::from(nzuimm),
                },
            ))
        }
        0b010 => Some((
            "c.lw",
            InstrArgs::Mem {
                reg: c_reg(instr, 2),
                base: c_reg(instr, 7),
                offset: i32::from(cl_lw_offset(instr)),
            },
        )),
        0b110 => Some((
            "c.sw",
            InstrArgs::Mem {
                reg: c_reg(instr, 2),
                base: c_reg(instr, 7),
                offset: i32::from(cl_lw_offset(instr)),
            },
        )),
        _ => None,
    }
}

fn decode_q1(instr: u16, funct3: u8, pc: u32) -> Option<(&'static str, InstrArgs)> {
    let rd = c_rd(instr);
    match funct3 {
        0b000 => {
            let imm = i32::from(ci_imm(instr));
            if rd == 0 && imm == 0 {
                return Some(("c.nop", InstrArgs::None));
            }
            Some(("c.addi", InstrArgs::RegImm { rd, imm }))
        }
        0b001 => Some((
            "c.jal",
            InstrArgs::Target {
                target: target(pc, i32::from(cj_imm(instr))),
            },
        )),
        0b010 => Some((
            "c.li",
            InstrArgs::RegImm {
                rd,
                imm: i32::from(ci_imm(instr)),
            },
        )),
        0b011 if rd == 2 => {
            let imm = i32::from(ci16sp_imm(instr));
            if imm == 0 {
                return None;
            }
            Some(("c.addi16sp", InstrArgs::RegImm { rd: 2, imm }))
        }
        0b011 => {
            let imm = ci_lui_imm(instr);
            if imm == 0 || rd == 0 {
                return None;
            }
            Some(("c.lui", InstrArgs::U { rd, imm }))
        }
        0b100 => decode_misc_alu(instr),
        0b101 => Some((
            "c.j",
            InstrArgs::Target {
                target: target(pc, i32::from(cj_imm(instr))),
            },
        )),
        0b110 | 0b111 => {
            let op = if funct3 == 0b110 { "c.beqz" } else { "c.bnez" };
            Some((
                op,
                InstrArgs::RegTarget {
                    rs1: c_reg(instr, 7),
                    target: target(pc, i32::from(cb_imm(instr))),
                },
            ))
        }
        _ => None,
    }
}

fn decode_misc_alu(instr: u16) -> Option<(&'static str, InstrArgs)> {
    let funct2 = ((instr >> 10) & 0x3) as u8;
    let rd = c_reg(instr, 7);

    match funct2 {
        0b00 | 0b01 => {
            // shamt[5] must be zero on RV32.
            let shamt = ci_shamt(instr);
            if shamt & 0x20 != 0 {
                return None;
            }
            let op = if funct2 == 0b00 { "c.srli" } else { "c.srai" };
            Some((
                op,
                InstrArgs::RegImm {
                    rd,
                    imm: i32::from(shamt),
                },
            ))
        }
        0b10 => Some((
            "c.andi",
            InstrArgs::RegImm {
                rd,
                imm: i32::from(ci_imm(instr)),
            },
        )),
        _ => {
            if (instr >> 12) & 0x1 != 0 {
                // subw/addw are RV64 only
                return None;
            }
            let op = match (instr >> 5) & 0x3 {
                0b00 => "c.sub",
                0b01 => "c.xor",
                0b10 => "c.or",
                _ => "c.and",
            };
            Some((
                op,
                InstrArgs::RegReg {
                    rd,
                    rs2: c_reg(instr, 2),
                },
            ))
        }
    }
}

fn decode_q2(instr: u16, funct3: u8) -> Option<(&'static str, InstrArgs)> {
    let rd = c_rd(instr);
    let rs2 = c_rs2(instr);
    match funct3 {
        0b000 => {
            let shamt = ci_shamt(instr);
            if rd == 0 || shamt & 0x20 != 0 {
                return None;
            }
            Some((
                "c.slli",
                InstrArgs::RegImm {
                    rd,
                    imm: i32::from(shamt),
                },
            ))
        }
        0b010 => {
            if rd == 0 {
                return None;
            }
            Some((
                "c.lwsp",
                InstrArgs::Mem {
                    reg: rd,
                    base: 2,
                    offset: i32::from(ci_lwsp_offset(instr)),
                },
            ))
        }
        0b100 => {
            let bit12 = (instr >> 12) & 0x1;
            match (bit12, rd, rs2) {
                (0, 0, 0) => None,
                (0, rs1, 0) => Some(("c.jr", InstrArgs::Reg { rs1 })),
                (0, rd, rs2) => Some(("c.mv", InstrArgs::RegReg { rd, rs2 })),
                (_, 0, 0) => Some(("c.ebreak", InstrArgs::None)),
                (_, rs1, 0) => Some(("c.jalr", InstrArgs::Reg { rs1 })),
                (_, rd, rs2) => Some(("c.add", InstrArgs::RegReg { rd, rs2 })),
            }
        }
        0b110 => Some((
            "c.swsp",
            InstrArgs::Mem {
                reg: rs2,
                base: 2,
                offset: i32::from(css_swsp_offset(instr)),
            },
        )),
        _ => None,
    }
}
