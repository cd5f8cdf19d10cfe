use vrsim_core::common::CpuError;
use vrsim_core::common::constants::KSEG0_BASE;
use vrsim_core::config::Config;
use vrsim_core::core::Cpu;
use vrsim_core::core::cpu::execution::Retired;
use vrsim_core::{Machine, RunExit};

/// Physical address programs are loaded at.
pub const PROGRAM_BASE: u64 = 0x1000;

/// kseg0 address of [`PROGRAM_BASE`]; the reset `pc` of every test machine.
pub const PROGRAM_VADDR: u64 = KSEG0_BASE + PROGRAM_BASE;

/// Scratch data area, kseg0 view.
pub const DATA_VADDR: u64 = KSEG0_BASE + 0x8000;

/// Machine wrapper for instruction-level tests.
pub struct TestContext {
    pub machine: Machine,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    /// Configuration shared by all tests: 1 MiB of RDRAM, `pc` at the
    /// program, recompiler off.
    pub fn config() -> Config {
        let mut config = Config::default();
        config.general.start_pc = PROGRAM_VADDR;
        config.memory.ram_size = 1 << 20;
        config.dynarec.enabled = false;
        config
    }

    pub fn new() -> Self {
        Self::with_config(&Self::config())
    }

    pub fn with_config(config: &Config) -> Self {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
        let machine = Machine::new(config).unwrap();
        Self { machine }
    }

    /// Machine with the recompiler on and a small hot threshold.
    pub fn with_dynarec(hot_threshold: u32) -> Self {
        let mut config = Self::config();
        config.dynarec.enabled = true;
        config.dynarec.hot_threshold = hot_threshold;
        Self::with_config(&config)
    }

    /// Loads `words` at [`PROGRAM_BASE`]; `pc` stays at the reset value.
    pub fn load_program(mut self, words: &[u32]) -> Self {
        self.machine.load_program(PROGRAM_BASE as usize, words);
        self
    }

    pub fn cpu(&self) -> &Cpu {
        self.machine.cpu()
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        self.machine.cpu_mut()
    }

    pub fn set_reg(&mut self, reg: usize, val: u64) {
        self.machine.set_gpr(reg, val);
    }

    pub fn get_reg(&self, reg: usize) -> u64 {
        self.machine.gpr(reg)
    }

    /// Executes `n` instructions through the interpreter.
    pub fn step_n(&mut self, n: usize) -> Result<Vec<Retired>, CpuError> {
        (0..n).map(|_| self.machine.step()).collect()
    }

    /// Executes one instruction, panicking on a fatal error.
    pub fn step(&mut self) -> Retired {
        self.machine.step().unwrap()
    }

    pub fn run(&mut self, budget: u64) -> RunExit {
        self.machine.run(budget).unwrap()
    }

    /// Address of instruction `index` of the loaded program.
    pub const fn addr(index: u64) -> u64 {
        PROGRAM_VADDR + index * 4
    }
}
