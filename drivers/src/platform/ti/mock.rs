//! In-memory stand-ins for the hardware and the host, used by the tests.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::string::{String, ToString};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::vec::Vec;

use super::chip::{Chip, ChipProfile};
use super::controller::TiGpio;
use crate::hal::gpio::PinFlags;
use crate::hal::interrupt::InterruptEvent;
use crate::hal::resource::{GpioResources, PadConfig, PadError, RegisterWindow, ResourceError};
use crate::hw::ti::gpio::Register;

const ALL_REGISTERS: [Register; 18] = [
    Register::Revision,
    Register::IrqStatusRaw0,
    Register::IrqStatusRaw1,
    Register::IrqStatus0,
    Register::IrqStatus1,
    Register::IrqStatusSet0,
    Register::IrqStatusSet1,
    Register::IrqStatusClr0,
    Register::IrqStatusClr1,
    Register::Oe,
    Register::DataIn,
    Register::DataOut,
    Register::LevelDetect0,
    Register::LevelDetect1,
    Register::RisingDetect,
    Register::FallingDetect,
    Register::ClearDataOut,
    Register::SetDataOut,
];

/// Register state of one bank, with the hardware's write side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankModel {
    pub revision: u32,
    pub oe: u32,
    pub datain: u32,
    pub dataout: u32,
    /// Indexed like [`Register::DETECT`].
    pub detect: [u32; 4],
    pub enable: [u32; 2],
    pub status: [u32; 2],
    /// Detect registers after every detect register write.
    pub detect_history: Vec<[u32; 4]>,
    pub writes: Vec<(Register, u32)>,
}

impl BankModel {
    pub fn new(revision: u32) -> Self {
        Self {
            revision,
            oe: u32::MAX,
            datain: 0,
            dataout: 0,
            detect: [0; 4],
            enable: [0; 2],
            status: [0; 2],
            detect_history: Vec::new(),
            writes: Vec::new(),
        }
    }

    pub fn new_window(revision: u32) -> (Arc<Mutex<BankModel>>, MockWindow) {
        let model = Arc::new(Mutex::new(Self::new(revision)));
        let window = MockWindow {
            model: Arc::clone(&model),
        };
        (model, window)
    }

    /// Hardware-visible registers only, without the recorded history.
    pub fn registers(&self) -> (u32, u32, [u32; 4], [u32; 2], [u32; 2]) {
        (self.oe, self.dataout, self.detect, self.enable, self.status)
    }

    fn detect_index(reg: Register) -> Option<usize> {
        Register::DETECT.iter().position(|&r| r == reg)
    }
}

pub struct MockWindow {
    model: Arc<Mutex<BankModel>>,
}

fn register_at(offset: usize) -> Register {
    ALL_REGISTERS
        .into_iter()
        .find(|reg| reg.offset() == offset)
        .unwrap_or_else(|| panic!("access to unmodelled offset {offset:#x}"))
}

impl RegisterWindow for MockWindow {
    fn read(&self, offset: usize) -> u32 {
        let m = self.model.lock().unwrap();
        let reg = register_at(offset);
        if let Some(i) = BankModel::detect_index(reg) {
            return m.detect[i];
        }
        match reg {
            Register::Revision => m.revision,
            Register::IrqStatusRaw0 | Register::IrqStatus0 => m.status[0],
            Register::IrqStatusRaw1 | Register::IrqStatus1 => m.status[1],
            Register::IrqStatusSet0 | Register::IrqStatusClr0 => m.enable[0],
            Register::IrqStatusSet1 | Register::IrqStatusClr1 => m.enable[1],
            Register::Oe => m.oe,
            Register::DataIn => m.datain,
            Register::DataOut => m.dataout,
            _ => 0,
        }
    }

    fn write(&mut self, offset: usize, value: u32) {
        let mut m = self.model.lock().unwrap();
        let reg = register_at(offset);
        m.writes.push((reg, value));
        if let Some(i) = BankModel::detect_index(reg) {
            m.detect[i] = value;
            let snapshot = m.detect;
            m.detect_history.push(snapshot);
            return;
        }
        match reg {
            Register::IrqStatus0 => m.status[0] &= !value,
            Register::IrqStatus1 => m.status[1] &= !value,
            Register::IrqStatusSet0 => m.enable[0] |= value,
            Register::IrqStatusSet1 => m.enable[1] |= value,
            Register::IrqStatusClr0 => m.enable[0] &= !value,
            Register::IrqStatusClr1 => m.enable[1] &= !value,
            Register::Oe => m.oe = value,
            Register::DataOut => m.dataout = value,
            Register::SetDataOut => m.dataout |= value,
            Register::ClearDataOut => m.dataout &= !value,
            _ => {}
        }
    }
}

pub struct MockPads {
    flags: Vec<PinFlags>,
    refused: PinFlags,
}

impl MockPads {
    /// Every pad starts as an input.
    pub fn new(pins: u32) -> Self {
        Self {
            flags: std::vec![PinFlags::INPUT; pins as usize],
            refused: PinFlags::empty(),
        }
    }

    pub fn set(&mut self, pin: u32, flags: PinFlags) {
        self.flags[pin as usize] = flags;
    }

    /// Make `set_pad_flags` fail for any request containing `flags`.
    pub fn refuse(&mut self, flags: PinFlags) {
        self.refused = flags;
    }
}

impl PadConfig for MockPads {
    fn pad_flags(&self, pin: u32) -> PinFlags {
        self.flags[pin as usize]
    }

    fn set_pad_flags(&mut self, pin: u32, flags: PinFlags) -> Result<(), PadError> {
        if flags.intersects(self.refused) {
            return Err(PadError);
        }
        self.flags[pin as usize] = flags;
        Ok(())
    }
}

pub type Handler = Arc<dyn Fn() + Send + Sync>;

static REFUSED_SOURCES: Mutex<Vec<u32>> = Mutex::new(Vec::new());

/// Handler chain that runs its handlers outside its own lock.
pub struct MockEvent {
    next: AtomicU32,
    handlers: Mutex<Vec<(u32, Handler)>>,
}

impl MockEvent {
    /// Make `create` fail for `source`.
    pub fn refuse_source(source: u32) {
        REFUSED_SOURCES.lock().unwrap().push(source);
    }
}

impl InterruptEvent for MockEvent {
    type Handler = Handler;
    type Cookie = u32;

    fn create(source: u32) -> Option<Self> {
        if REFUSED_SOURCES.lock().unwrap().contains(&source) {
            return None;
        }
        Some(Self {
            next: AtomicU32::new(1),
            handlers: Mutex::new(Vec::new()),
        })
    }

    fn add_handler(&self, handler: Handler) -> u32 {
        let cookie = self.next.fetch_add(1, Ordering::Relaxed);
        self.handlers.lock().unwrap().push((cookie, handler));
        cookie
    }

    fn remove_handler(&self, cookie: u32) -> bool {
        let mut handlers = self.handlers.lock().unwrap();
        match handlers.iter().position(|(c, _)| *c == cookie) {
            Some(i) => {
                handlers.remove(i);
                true
            }
            None => false,
        }
    }

    fn has_handlers(&self) -> bool {
        !self.handlers.lock().unwrap().is_empty()
    }

    fn handle(&self) {
        let snapshot: Vec<Handler> = self
            .handlers
            .lock()
            .unwrap()
            .iter()
            .map(|(_, h)| Arc::clone(h))
            .collect();
        for handler in snapshot {
            handler();
        }
    }
}

/// Counts handler invocations.
#[derive(Default, Clone)]
pub struct Counter(Arc<AtomicU32>);

impl Counter {
    pub fn handler(&self) -> Handler {
        let count = Arc::clone(&self.0);
        Arc::new(move || {
            count.fetch_add(1, Ordering::SeqCst);
        })
    }

    pub fn get(&self) -> u32 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Records the order pins were dispatched in.
#[derive(Default, Clone)]
pub struct Order(Arc<Mutex<Vec<u32>>>);

impl Order {
    pub fn handler(&self, pin: u32) -> Handler {
        let seen = Arc::clone(&self.0);
        Arc::new(move || seen.lock().unwrap().push(pin))
    }

    pub fn take(&self) -> Vec<u32> {
        core::mem::take(&mut *self.0.lock().unwrap())
    }
}

/// What the mock resource layer currently has handed out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceLog {
    pub windows: BTreeSet<usize>,
    pub lines: BTreeSet<usize>,
    pub routed: BTreeSet<usize>,
    pub clocks: BTreeSet<usize>,
    pub released_windows: Vec<usize>,
    pub torn_down: Vec<usize>,
    pub clocks_disabled: Vec<usize>,
    /// Per-bank enabled interrupts at each `setup_interrupt` call.
    pub enable_at_setup: Vec<(usize, Vec<u32>)>,
}

impl ResourceLog {
    /// Nothing is held any more.
    pub fn is_clean(&self) -> bool {
        self.windows.is_empty()
            && self.lines.is_empty()
            && self.routed.is_empty()
            && self.clocks.is_empty()
    }
}

#[derive(Debug)]
pub struct MockLine(usize);

pub struct MockResources {
    models: Vec<Option<Arc<Mutex<BankModel>>>>,
    lines: Vec<bool>,
    failing_setup: Option<usize>,
    pub log: Arc<Mutex<ResourceLog>>,
}

impl MockResources {
    pub fn new(profile: &ChipProfile) -> Self {
        Self {
            models: (0..profile.bank_count)
                .map(|_| Some(Arc::new(Mutex::new(BankModel::new(profile.expected_revision)))))
                .collect(),
            lines: std::vec![true; profile.interrupt_line_count()],
            failing_setup: None,
            log: Arc::default(),
        }
    }

    pub fn am335x() -> Self {
        Self::new(&ChipProfile::AM335X)
    }

    pub fn omap4() -> Self {
        Self::new(&ChipProfile::OMAP4)
    }

    pub fn without_banks(mut self, banks: &[usize]) -> Self {
        for &bank in banks {
            self.models[bank] = None;
        }
        self
    }

    pub fn without_lines(mut self, lines: &[usize]) -> Self {
        for &line in lines {
            self.lines[line] = false;
        }
        self
    }

    pub fn with_revision(self, bank: usize, revision: u32) -> Self {
        if let Some(model) = &self.models[bank] {
            model.lock().unwrap().revision = revision;
        }
        self
    }

    /// Leave `mask` enabled and pending on `bank`, as a bootloader might.
    pub fn with_pending(self, bank: usize, mask: u32) -> Self {
        if let Some(model) = &self.models[bank] {
            let mut model = model.lock().unwrap();
            model.enable[0] |= mask;
            model.status[0] |= mask;
        }
        self
    }

    pub fn failing_setup(mut self, line: usize) -> Self {
        self.failing_setup = Some(line);
        self
    }
}

impl GpioResources for MockResources {
    type Window = MockWindow;
    type Line = MockLine;

    fn allocate_memory_window(&mut self, bank: usize) -> Option<MockWindow> {
        let model = self.models.get(bank)?.as_ref()?;
        self.log.lock().unwrap().windows.insert(bank);
        Some(MockWindow {
            model: Arc::clone(model),
        })
    }

    fn release_memory_window(&mut self, bank: usize, _window: MockWindow) {
        let mut log = self.log.lock().unwrap();
        assert!(log.windows.remove(&bank), "window {bank} released twice");
        log.released_windows.push(bank);
    }

    fn allocate_interrupt_line(&mut self, index: usize) -> Option<MockLine> {
        if !self.lines.get(index).copied().unwrap_or(false) {
            return None;
        }
        self.log.lock().unwrap().lines.insert(index);
        Some(MockLine(index))
    }

    fn release_interrupt_line(&mut self, index: usize, line: MockLine) {
        assert_eq!(line.0, index);
        assert!(self.log.lock().unwrap().lines.remove(&index), "line {index} released twice");
    }

    fn setup_interrupt(&mut self, index: usize, line: &MockLine) -> Result<(), ResourceError> {
        assert_eq!(line.0, index);
        let enabled = self
            .models
            .iter()
            .map(|model| match model {
                Some(model) => {
                    let model = model.lock().unwrap();
                    model.enable[0] | model.enable[1]
                }
                None => 0,
            })
            .collect();
        self.log.lock().unwrap().enable_at_setup.push((index, enabled));
        if self.failing_setup == Some(index) {
            return Err(ResourceError);
        }
        self.log.lock().unwrap().routed.insert(index);
        Ok(())
    }

    fn teardown_interrupt(&mut self, index: usize, _line: &MockLine) {
        let mut log = self.log.lock().unwrap();
        assert!(log.routed.remove(&index), "line {index} torn down twice");
        log.torn_down.push(index);
    }

    fn enable_clock(&mut self, module: usize) -> Result<(), ResourceError> {
        self.log.lock().unwrap().clocks.insert(module);
        Ok(())
    }

    fn disable_clock(&mut self, module: usize) {
        let mut log = self.log.lock().unwrap();
        assert!(log.clocks.remove(&module), "clock {module} disabled twice");
        log.clocks_disabled.push(module);
    }
}

pub type MockGpio = TiGpio<MockResources, MockPads, MockEvent>;

/// An attached controller plus handles on its mock hardware.
pub struct Rig<G = MockGpio> {
    pub gpio: G,
    models: Vec<Option<Arc<Mutex<BankModel>>>>,
    log: Arc<Mutex<ResourceLog>>,
}

impl<G> Rig<G> {
    pub fn model(&self, bank: usize) -> &Arc<Mutex<BankModel>> {
        self.models[bank].as_ref().expect("bank not present")
    }

    /// Snapshot of a bank's registers.
    pub fn bank(&self, bank: usize) -> BankModel {
        self.model(bank).lock().unwrap().clone()
    }

    pub fn log(&self) -> MutexGuard<'_, ResourceLog> {
        self.log.lock().unwrap()
    }

    pub fn resource_log(&self) -> Arc<Mutex<ResourceLog>> {
        Arc::clone(&self.log)
    }
}

pub fn attach(chip: Chip) -> Rig {
    let profile = ChipProfile::for_chip(chip);
    attach_with(chip, MockResources::new(&profile), MockPads::new(profile.total_pins()))
}

pub fn attach_with(chip: Chip, resources: MockResources, pads: MockPads) -> Rig {
    let models = resources.models.clone();
    let log = Arc::clone(&resources.log);
    let gpio = MockGpio::attach(chip, resources, pads).expect("attach failed");
    Rig { gpio, models, log }
}

/// Like [`attach`], with the controller behind an `Arc` so handlers can
/// hold on to it.
pub fn attach_shared(chip: Chip) -> Rig<Arc<MockGpio>> {
    let Rig { gpio, models, log } = attach(chip);
    Rig {
        gpio: Arc::new(gpio),
        models,
        log,
    }
}

thread_local! {
    static CAPTURED: RefCell<Vec<(log::Level, String)>> = const { RefCell::new(Vec::new()) };
}

/// Records log output per thread, so parallel tests do not see each other.
struct CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        let message = record.args().to_string();
        CAPTURED.with(|captured| captured.borrow_mut().push((record.level(), message)));
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;

/// Start capturing this thread's log output.
pub fn capture_logs() {
    // Another test may have installed the logger already.
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(log::LevelFilter::Trace);
    CAPTURED.with(|captured| captured.borrow_mut().clear());
}

/// Messages logged at `level` on this thread since `capture_logs`.
pub fn logged(level: log::Level) -> Vec<String> {
    CAPTURED.with(|captured| {
        captured
            .borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message.clone())
            .collect()
    })
}
