//! Opcode constants, grouped by the dispatch table that decodes them.

/// Primary opcodes (bits 31-26), indexing the 64-entry main table.
#[allow(missing_docs)]
pub mod primary {
    pub const SPECIAL: u32 = 0x00;
    pub const REGIMM: u32 = 0x01;
    pub const J: u32 = 0x02;
    pub const JAL: u32 = 0x03;
    pub const BEQ: u32 = 0x04;
    pub const BNE: u32 = 0x05;
    pub const BLEZ: u32 = 0x06;
    pub const BGTZ: u32 = 0x07;
    pub const ADDI: u32 = 0x08;
    pub const ADDIU: u32 = 0x09;
    pub const SLTI: u32 = 0x0A;
    pub const SLTIU: u32 = 0x0B;
    pub const ANDI: u32 = 0x0C;
    pub const ORI: u32 = 0x0D;
    pub const XORI: u32 = 0x0E;
    pub const LUI: u32 = 0x0F;
    pub const COP0: u32 = 0x10;
    pub const COP1: u32 = 0x11;
    pub const COP2: u32 = 0x12;
    pub const BEQL: u32 = 0x14;
    pub const BNEL: u32 = 0x15;
    pub const BLEZL: u32 = 0x16;
    pub const BGTZL: u32 = 0x17;
    pub const DADDI: u32 = 0x18;
    pub const DADDIU: u32 = 0x19;
    pub const LDL: u32 = 0x1A;
    pub const LDR: u32 = 0x1B;
    pub const LB: u32 = 0x20;
    pub const LH: u32 = 0x21;
    pub const LWL: u32 = 0x22;
    pub const LW: u32 = 0x23;
    pub const LBU: u32 = 0x24;
    pub const LHU: u32 = 0x25;
    pub const LWR: u32 = 0x26;
    pub const LWU: u32 = 0x27;
    pub const SB: u32 = 0x28;
    pub const SH: u32 = 0x29;
    pub const SWL: u32 = 0x2A;
    pub const SW: u32 = 0x2B;
    pub const SDL: u32 = 0x2C;
    pub const SDR: u32 = 0x2D;
    pub const SWR: u32 = 0x2E;
    pub const CACHE: u32 = 0x2F;
    pub const LL: u32 = 0x30;
    pub const LWC1: u32 = 0x31;
    pub const LWC2: u32 = 0x32;
    pub const LLD: u32 = 0x34;
    pub const LDC1: u32 = 0x35;
    pub const LDC2: u32 = 0x36;
    pub const LD: u32 = 0x37;
    pub const SC: u32 = 0x38;
    pub const SWC1: u32 = 0x39;
    pub const SWC2: u32 = 0x3A;
    pub const SCD: u32 = 0x3C;
    pub const SDC1: u32 = 0x3D;
    pub const SDC2: u32 = 0x3E;
    pub const SD: u32 = 0x3F;

    /// Main-table slots whose handler depends on Status.CU1.
    pub const COP1_GATED: [u32; 5] = [COP1, LWC1, LDC1, SWC1, SDC1];
}

/// SPECIAL function codes (bits 5-0).
#[allow(missing_docs)]
pub mod special {
    pub const SLL: u32 = 0x00;
    pub const SRL: u32 = 0x02;
    pub const SRA: u32 = 0x03;
    pub const SLLV: u32 = 0x04;
    pub const SRLV: u32 = 0x06;
    pub const SRAV: u32 = 0x07;
    pub const JR: u32 = 0x08;
    pub const JALR: u32 = 0x09;
    pub const SYSCALL: u32 = 0x0C;
    pub const BREAK: u32 = 0x0D;
    pub const SYNC: u32 = 0x0F;
    pub const MFHI: u32 = 0x10;
    pub const MTHI: u32 = 0x11;
    pub const MFLO: u32 = 0x12;
    pub const MTLO: u32 = 0x13;
    pub const DSLLV: u32 = 0x14;
    pub const DSRLV: u32 = 0x16;
    pub const DSRAV: u32 = 0x17;
    pub const MULT: u32 = 0x18;
    pub const MULTU: u32 = 0x19;
    pub const DIV: u32 = 0x1A;
    pub const DIVU: u32 = 0x1B;
    pub const DMULT: u32 = 0x1C;
    pub const DMULTU: u32 = 0x1D;
    pub const DDIV: u32 = 0x1E;
    pub const DDIVU: u32 = 0x1F;
    pub const ADD: u32 = 0x20;
    pub const ADDU: u32 = 0x21;
    pub const SUB: u32 = 0x22;
    pub const SUBU: u32 = 0x23;
    pub const AND: u32 = 0x24;
    pub const OR: u32 = 0x25;
    pub const XOR: u32 = 0x26;
    pub const NOR: u32 = 0x27;
    pub const SLT: u32 = 0x2A;
    pub const SLTU: u32 = 0x2B;
    pub const DADD: u32 = 0x2C;
    pub const DADDU: u32 = 0x2D;
    pub const DSUB: u32 = 0x2E;
    pub const DSUBU: u32 = 0x2F;
    pub const TGE: u32 = 0x30;
    pub const TGEU: u32 = 0x31;
    pub const TLT: u32 = 0x32;
    pub const TLTU: u32 = 0x33;
    pub const TEQ: u32 = 0x34;
    pub const TNE: u32 = 0x36;
    pub const DSLL: u32 = 0x38;
    pub const DSRL: u32 = 0x3A;
    pub const DSRA: u32 = 0x3B;
    pub const DSLL32: u32 = 0x3C;
    pub const DSRL32: u32 = 0x3E;
    pub const DSRA32: u32 = 0x3F;
}

/// REGIMM selectors (bits 20-16).
#[allow(missing_docs)]
pub mod regimm {
    pub const BLTZ: u32 = 0x00;
    pub const BGEZ: u32 = 0x01;
    pub const BLTZL: u32 = 0x02;
    pub const BGEZL: u32 = 0x03;
    pub const TGEI: u32 = 0x08;
    pub const TGEIU: u32 = 0x09;
    pub const TLTI: u32 = 0x0A;
    pub const TLTIU: u32 = 0x0B;
    pub const TEQI: u32 = 0x0C;
    pub const TNEI: u32 = 0x0E;
    pub const BLTZAL: u32 = 0x10;
    pub const BGEZAL: u32 = 0x11;
    pub const BLTZALL: u32 = 0x12;
    pub const BGEZALL: u32 = 0x13;
}

/// Coprocessor sub-operations (bits 25-21), shared by COP0/1/2.
#[allow(missing_docs)]
pub mod cop {
    pub const MF: u32 = 0x00;
    pub const DMF: u32 = 0x01;
    pub const CF: u32 = 0x02;
    pub const MT: u32 = 0x04;
    pub const DMT: u32 = 0x05;
    pub const CT: u32 = 0x06;
    pub const BC: u32 = 0x08;
    /// First `rs` value of the CO (coprocessor operation) range.
    pub const CO: u32 = 0x10;

    /// COP0 CO function codes.
    pub const TLBR: u32 = 0x01;
    pub const TLBWI: u32 = 0x02;
    pub const TLBWR: u32 = 0x06;
    pub const TLBP: u32 = 0x08;
    pub const ERET: u32 = 0x18;
}

/// COP1 formats and function codes.
#[allow(missing_docs)]
pub mod fpu {
    pub const FMT_S: u32 = 0x10;
    pub const FMT_D: u32 = 0x11;
    pub const FMT_W: u32 = 0x14;
    pub const FMT_L: u32 = 0x15;

    pub const ADD: u32 = 0x00;
    pub const SUB: u32 = 0x01;
    pub const MUL: u32 = 0x02;
    pub const DIV: u32 = 0x03;
    pub const SQRT: u32 = 0x04;
    pub const ABS: u32 = 0x05;
    pub const MOV: u32 = 0x06;
    pub const NEG: u32 = 0x07;
    pub const ROUND_L: u32 = 0x08;
    pub const TRUNC_L: u32 = 0x09;
    pub const CEIL_L: u32 = 0x0A;
    pub const FLOOR_L: u32 = 0x0B;
    pub const ROUND_W: u32 = 0x0C;
    pub const TRUNC_W: u32 = 0x0D;
    pub const CEIL_W: u32 = 0x0E;
    pub const FLOOR_W: u32 = 0x0F;
    pub const CVT_S: u32 = 0x20;
    pub const CVT_D: u32 = 0x21;
    pub const CVT_W: u32 = 0x24;
    pub const CVT_L: u32 = 0x25;
    /// `C.cond` occupies function codes `0x30..=0x3F`; the low 4 bits are the condition.
    pub const C_BASE: u32 = 0x30;
}
