use micro16_rs::isa::{STATUS, ZERO};
use micro16_rs::{assemble, Cpu};

fn cpu_for(src: &str) -> Cpu {
    Cpu::new(assemble(src).unwrap())
}

fn run_steps(cpu: &mut Cpu, n: usize) {
    for _ in 0..n {
        cpu.step().unwrap();
    }
}

#[test]
fn set_copies_a_register_and_advances_pc() {
    let mut cpu = cpu_for("IST 7 r1\nSET r1 r0");
    run_steps(&mut cpu, 2);
    assert_eq!(cpu.regs[0], 7);
    assert_eq!(cpu.regs[STATUS], 0); // flags from raw 7
    assert_eq!(cpu.pc, 2);
}

#[test]
fn ist_loads_an_eight_bit_immediate() {
    let mut cpu = cpu_for("IST 255 r0");
    run_steps(&mut cpu, 1);
    assert_eq!(cpu.regs[0], 255);
    assert_eq!(cpu.regs[STATUS], 0);
}

#[test]
fn add_wrap_sets_only_the_overflow_flag() {
    let mut cpu = cpu_for("IST 255 r1\nIST 1 r2\nADD r1 r2 r0");
    run_steps(&mut cpu, 3);
    // raw 256: not zero, not negative, overflow
    assert_eq!(cpu.regs[0], 0);
    assert_eq!(cpu.regs[STATUS], 0b100);
}

#[test]
fn sub_below_zero_sets_negative_and_overflow() {
    let mut cpu = cpu_for("IST 0 r1\nIST 1 r2\nSUB r1 r2 r0");
    run_steps(&mut cpu, 3);
    assert_eq!(cpu.regs[0], 255);
    assert_eq!(cpu.regs[STATUS], 0b110);
}

#[test]
fn zero_result_sets_the_zero_flag() {
    let mut cpu = cpu_for("IST 0 r1\nSET r1 r0");
    run_steps(&mut cpu, 2);
    assert_eq!(cpu.regs[STATUS], 0b001);
}

#[test]
fn logic_ops_compute_from_register_values() {
    let mut cpu = cpu_for("IST 12 r1\nIST 10 r2\nAND r1 r2 r3\nOR r1 r2 r4\nXOR r1 r2 r5");
    run_steps(&mut cpu, 5);
    assert_eq!(cpu.regs[3], 12 & 10);
    assert_eq!(cpu.regs[4], 12 | 10);
    assert_eq!(cpu.regs[5], 12 ^ 10);
}

#[test]
fn not_is_a_32_bit_complement_truncated_to_a_byte() {
    let mut cpu = cpu_for("IST 5 r1\nNOT r1 r0");
    run_steps(&mut cpu, 2);
    assert_eq!(cpu.regs[0], 250);
    // raw -6: negative and overflow
    assert_eq!(cpu.regs[STATUS], 0b110);
}

#[test]
fn status_reads_as_a_source_register() {
    let mut cpu = cpu_for("IST 0 r1\nIST 1 r2\nSUB r1 r2 r3\nNOT status r0");
    run_steps(&mut cpu, 4);
    // status was 0b110 after SUB; NOT stores its complement
    assert_eq!(cpu.regs[0], !6u8);
}

#[test]
fn shifts_use_the_low_five_bits_of_the_count() {
    let mut cpu = cpu_for("IST 1 r1\nIST 3 r2\nSHL r1 r2 r0\nIST 8 r3\nIST 2 r4\nSHR r3 r4 r5");
    run_steps(&mut cpu, 6);
    assert_eq!(cpu.regs[0], 8);
    assert_eq!(cpu.regs[5], 2);
}

#[test]
fn shl_flags_come_from_the_untruncated_result() {
    let mut cpu = cpu_for("IST 255 r1\nIST 1 r2\nSHL r1 r2 r0");
    run_steps(&mut cpu, 3);
    // raw 510 truncates to 254
    assert_eq!(cpu.regs[0], 254);
    assert_eq!(cpu.regs[STATUS], 0b100);
}

#[test]
fn jmp_through_a_register_loops_back() {
    let mut cpu = cpu_for("loop: NOP\nJMP r0");
    run_steps(&mut cpu, 2);
    assert_eq!(cpu.pc, 0);
    run_steps(&mut cpu, 2);
    assert_eq!(cpu.pc, 0);
}

#[test]
fn jip_jumps_only_on_non_zero_condition() {
    // r1 = 0: fall through
    let mut cpu = cpu_for("IST 3 r2\nJIP r2 r1\nHALT");
    run_steps(&mut cpu, 2);
    assert_eq!(cpu.pc, 2);

    // r1 = 1: taken
    let mut cpu = cpu_for("IST 3 r2\nIST 1 r1\nJIP r2 r1\nHALT");
    run_steps(&mut cpu, 3);
    assert_eq!(cpu.pc, 3);
}

#[test]
fn control_flow_ops_clear_the_status_register() {
    let mut cpu = cpu_for("IST 0 r1\nIST 1 r2\nSUB r1 r2 r3\nNOP");
    run_steps(&mut cpu, 3);
    assert_eq!(cpu.regs[STATUS], 0b110);
    run_steps(&mut cpu, 1);
    // NOP computes no flags yet still rewrites status
    assert_eq!(cpu.regs[STATUS], 0);
}

#[test]
fn zero_register_is_forced_back_every_step() {
    let mut cpu = cpu_for("NOP\nNOP");
    cpu.regs[ZERO] = 9;
    run_steps(&mut cpu, 1);
    assert_eq!(cpu.regs[ZERO], 0);
}

#[test]
fn sto_then_lod_round_trips_through_memory() {
    let mut cpu = cpu_for("IST 10 r1\nIST 42 r2\nSTO r1 r2\nLOD r1 r3");
    run_steps(&mut cpu, 3);
    assert_eq!(cpu.mem[10], 42);
    run_steps(&mut cpu, 1);
    assert_eq!(cpu.regs[3], 42);
}

#[test]
fn halt_sticks_until_reset() {
    let mut cpu = cpu_for("IST 5 r0\nHALT");
    run_steps(&mut cpu, 2);
    assert!(cpu.terminated);
    let before = cpu.clone();
    run_steps(&mut cpu, 10);
    assert!(cpu.terminated);
    assert_eq!(cpu.regs, before.regs);
    assert_eq!(cpu.pc, before.pc);

    cpu.reset();
    assert!(!cpu.terminated);
    assert_eq!(cpu.pc, 0);
    assert_eq!(cpu.regs, [0; 16]);
    assert!(cpu.mem.iter().all(|&b| b == 0));
}

#[test]
fn halting_step_does_not_touch_flags_or_pc() {
    let mut cpu = cpu_for("IST 0 r1\nSET r1 r0\nHALT");
    run_steps(&mut cpu, 3);
    assert_eq!(cpu.regs[STATUS], 0b001); // still the SET flags
    assert_eq!(cpu.pc, 2);
}

#[test]
fn out_of_bounds_step_fails_without_side_effects() {
    let mut cpu = Cpu::new(vec![]);
    let err = cpu.step().unwrap_err();
    assert!(err.to_string().contains("out of bounds"));
    assert_eq!(cpu.pc, 0);
    assert_eq!(cpu.regs, [0; 16]);
    assert!(!cpu.terminated);

    let mut cpu = cpu_for("NOP");
    run_steps(&mut cpu, 1);
    assert!(cpu.step().is_err());
    assert_eq!(cpu.pc, 1);
}

#[test]
fn instances_do_not_share_state() {
    let mut a = cpu_for("IST 9 r0");
    let b = cpu_for("IST 9 r0");
    run_steps(&mut a, 1);
    assert_eq!(a.regs[0], 9);
    assert_eq!(b.regs[0], 0);
}
