use super::builder::asm::*;
use super::harness::{PROGRAM_VADDR, TestContext};

#[test]
fn encoders_match_reference_words() {
    assert_eq!(addiu(1, 1, 1), 0x2421_0001);
    assert_eq!(add(1, 1, 2), 0x0022_0820);
    assert_eq!(jr(RA), 0x03E0_0008);
    assert_eq!(lw(2, 1, 0), 0x8C22_0000);
    assert_eq!(mtc0(1, 12), 0x4081_6000);
    assert_eq!(bc1t(2), 0x4501_0002);
    assert_eq!(eret(), 0x4200_0018);
}

#[test]
fn harness_places_pc_at_program() {
    let ctx = TestContext::new().load_program(&[nop()]);
    assert_eq!(ctx.machine.pc(), PROGRAM_VADDR);
    assert_eq!(TestContext::addr(2), PROGRAM_VADDR + 8);
}
