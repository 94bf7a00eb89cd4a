//! Bitfield and immediate extraction for 32-bit and compressed encodings.

/// I-type immediate (bits [31:20] sign-extended).
#[inline]
pub const fn i_imm(instr: u32) -> i32 {
    (instr as i32) >> 20
}

/// S-type immediate (bits [31:25] | [11:7] sign-extended).
#[inline]
pub const fn s_imm(instr: u32) -> i32 {
    let imm11_5 = (instr >> 25) & 0x7F;
    let imm4_0 = (instr >> 7) & 0x1F;
    let imm = (imm11_5 << 5) | imm4_0;
    ((imm as i32) << 20) >> 20
}

/// B-type immediate (bits [31] | [7] | [30:25] | [11:8] sign-extended, << 1).
#[inline]
pub const fn b_imm(instr: u32) -> i32 {
    let imm12 = (instr >> 31) & 0x1;
    let imm11 = (instr >> 7) & 0x1;
    let imm10_5 = (instr >> 25) & 0x3F;
    let imm4_1 = (instr >> 8) & 0xF;
    let imm = (imm12 << 12) | (imm11 << 11) | (imm10_5 << 5) | (imm4_1 << 1);
    ((imm as i32) << 19) >> 19
}

/// U-type immediate, upper 20 bits in place.
#[inline]
pub const fn u_imm(instr: u32) -> u32 {
    instr >> 12
}

/// J-type immediate (bits [31] | [19:12] | [20] | [30:21] sign-extended, << 1).
#[inline]
pub const fn j_imm(instr: u32) -> i32 {
    let imm20 = (instr >> 31) & 0x1;
    let imm19_12 = (instr >> 12) & 0xFF;
    let imm11 = (instr >> 20) & 0x1;
    let imm10_1 = (instr >> 21) & 0x3FF;
    let imm = (imm20 << 20) | (imm19_12 << 12) | (imm11 << 11) | (imm10_1 << 1);
    ((imm as i32) << 11) >> 11
}

#[inline]
pub const fn rd(instr: u32) -> u8 {
    ((instr >> 7) & 0x1F) as u8
}

#[inline]
pub const fn rs1(instr: u32) -> u8 {
    ((instr >> 15) & 0x1F) as u8
}

#[inline]
pub const fn rs2(instr: u32) -> u8 {
    ((instr >> 20) & 0x1F) as u8
}

#[inline]
pub const fn funct3(instr: u32) -> u8 {
    ((instr >> 12) & 0x7) as u8
}

#[inline]
pub const fn funct7(instr: u32) -> u8 {
    ((instr >> 25) & 0x7F) as u8
}

/// Major opcode (bits [6:0]).
#[inline]
pub const fn opcode(instr: u32) -> u8 {
    (instr & 0x7F) as u8
}

/// CSR address (bits [31:20]).
#[inline]
pub const fn csr(instr: u32) -> u16 {
    (instr >> 20) as u16
}

/// PC-relative target with wrapping 32-bit arithmetic.
#[inline]
pub const fn target(pc: u32, offset: i32) -> u32 {
    pc.wrapping_add(offset as u32)
}

// ===== Compressed =====

/// Register from a 3-bit compressed field (x8..x15).
#[inline]
pub const fn c_reg(instr: u16, shift: u32) -> u8 {
    ((instr >> shift) & 0x7) as u8 + 8
}

/// Full 5-bit register field at bits [11:7].
#[inline]
pub const fn c_rd(instr: u16) -> u8 {
    ((instr >> 7) & 0x1F) as u8
}

/// Full 5-bit register field at bits [6:2].
#[inline]
pub const fn c_rs2(instr: u16) -> u8 {
    ((instr >> 2) & 0x1F) as u8
}

pub const fn addi4spn_imm(instr: u16) -> u16 {
    (((instr >> 6) & 0x1) << 2)
        | (((instr >> 5) & 0x1) << 3)
        | (((instr >> 11) & 0x3) << 4)
        | (((instr >> 7) & 0xF) << 6)
}

pub const fn cl_lw_offset(instr: u16) -> u8 {
    ((((instr >> 6) & 0x1) << 2) | (((instr >> 10) & 0x7) << 3) | (((instr >> 5) & 0x1) << 6)) as u8
}

pub const fn ci_imm(instr: u16) -> i8 {
    let imm = (((instr >> 2) & 0x1F) | (((instr >> 12) & 0x1) << 5)) as u8;
    ((imm as i8) << 2) >> 2
}

pub const fn cj_imm(instr: u16) -> i16 {
    let imm = (((instr >> 3) & 0x7) << 1)
        | (((instr >> 11) & 0x1) << 4)
        | (((instr >> 2) & 0x1) << 5)
        | (((instr >> 7) & 0x1) << 6)
        | (((instr >> 6) & 0x1) << 7)
        | (((instr >> 9) & 0x3) << 8)
        | (((instr >> 8) & 0x1) << 10)
        | (((instr >> 12) & 0x1) << 11);
    ((imm as i16) << 4) >> 4
}

pub const fn ci16sp_imm(instr: u16) -> i16 {
    let imm = (((instr >> 6) & 0x1) << 4)
        | (((instr >> 2) & 0x1) << 5)
        | (((instr >> 5) & 0x1) << 6)
        | (((instr >> 3) & 0x3) << 7)
        | (((instr >> 12) & 0x1) << 9);
    ((imm as i16) << 6) >> 6
}

/// C.LUI immediate as a sign-extended 20-bit upper value.
pub const fn ci_lui_imm(instr: u16) -> u32 {
    let imm = (((instr >> 2) & 0x1F) | (((instr >> 12) & 0x1) << 5)) as u32;
    let imm = ((imm << 26) as i32 >> 26) as u32;
    imm & 0xF_FFFF
}

pub const fn ci_shamt(instr: u16) -> u8 {
    (((instr >> 2) & 0x1F) | (((instr >> 12) & 0x1) << 5)) as u8
}

pub const fn cb_imm(instr: u16) -> i16 {
    let imm = (((instr >> 3) & 0x3) << 1)
        | (((instr >> 10) & 0x3) << 3)
        | (((instr >> 2) & 0x1) << 5)
        | (((instr >> 5) & 0x3) << 6)
        | (((instr >> 12) & 0x1) << 8);
    ((imm as i16) << 7) >> 7
}

pub const fn ci_lwsp_offset(instr: u16) -> u8 {
    ((((instr >> 4) & 0x7) << 2) | (((instr >> 12) & 0x1) << 5) | (((instr >> 2) & 0x3) << 6)) as u8
}

pub const fn css_swsp_offset(instr: u16) -> u8 {
    ((((instr >> 9) & 0xF) << 2) | (((instr >> 7) & 0x3) << 6)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_i_imm_sign_extends() {
        // addi a0, a0, -1
        assert_eq!(i_imm(0xFFF5_0513), -1);
        assert_eq!(i_imm(0x00A0_0513), 10);
    }

    #[test]
    fn test_branch_and_jump_offsets() {
        // beq a0, a1, +16
        assert_eq!(b_imm(0x00B5_0863), 16);
        // jal ra, +8
        assert_eq!(j_imm(0x0080_00EF), 8);
        // jal zero, -4
        assert_eq!(j_imm(0xFFDF_F06F), -4);
    }

    #[test]
    fn test_store_offset() {
        // sw a1, 12(sp)
        assert_eq!(s_imm(0x00B1_2623), 12);
    }

    #[test]
    fn test_target_wraps() {
        assert_eq!(target(0x8000_0000, 8), 0x8000_0008);
        assert_eq!(target(0, -4), 0xFFFF_FFFC);
    }

    #[test]
    fn test_compressed_lui_is_sign_extended() {
        // c.lui a0, 0xfffff (imm bits all set)
        assert_eq!(ci_lui_imm(0x757D), 0xF_FFFF);
        // c.lui a0, 1
        assert_eq!(ci_lui_imm(0x6505), 0x1);
    }
}
