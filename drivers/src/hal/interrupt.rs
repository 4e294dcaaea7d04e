//! GPIO interrupt Hardware Abstraction Layer.
//!
//! Pin interrupts are delivered through a per-pin handler chain owned by
//! the host environment ([`InterruptEvent`]). A controller only creates the
//! chain, adds and removes handlers, and runs it when the pin fires.

/// Interrupt trigger mode.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// No preference; the bus default. Not accepted by controllers that
    /// have no default.
    Conform,
    /// Interrupt is asserted while the signal is at the active level.
    Level,
    /// Interrupt is asserted on a transition towards the active level.
    Edge,
}

/// Interrupt polarity.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Polarity {
    /// No preference; the bus default.
    Conform,
    /// Active low / falling.
    Low,
    /// Active high / rising.
    High,
}

/// Per-pin handler chain supplied by the host.
///
/// Implementations must tolerate [`InterruptEvent::handle`] running in
/// interrupt context concurrently with handler removal from thread context.
pub trait InterruptEvent: Send + Sync {
    /// A consumer callback.
    type Handler;

    /// Identifies one registered handler.
    type Cookie: Copy + Eq + core::fmt::Debug;

    /// Create an empty chain for the interrupt source `source`.
    ///
    /// Returns `None` when the host cannot allocate one.
    fn create(source: u32) -> Option<Self>
    where
        Self: Sized;

    /// Append a handler and return its cookie.
    fn add_handler(&self, handler: Self::Handler) -> Self::Cookie;

    /// Remove a handler. Returns `false` if the cookie is unknown.
    fn remove_handler(&self, cookie: Self::Cookie) -> bool;

    /// Whether any handler is still registered.
    fn has_handlers(&self) -> bool;

    /// Run every registered handler once.
    fn handle(&self);
}

/// A registered pin interrupt handler, returned by
/// [`GpioInterrupts::add_interrupt_handler`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct IrqHandle<C> {
    pub(crate) pin: u32,
    pub(crate) cookie: C,
}

impl<C: Copy> IrqHandle<C> {
    /// Pin the handler is attached to.
    pub fn pin(&self) -> u32 {
        self.pin
    }

    /// The handler chain's cookie for this handler.
    pub fn cookie(&self) -> C {
        self.cookie
    }
}

/// Extension trait for GPIO controllers that deliver pin interrupts.
pub trait GpioInterrupts: super::gpio::GpioController {
    /// Consumer callback type.
    type Handler;

    /// Handler cookie type.
    type Cookie: Copy;

    /// Select how the pin's interrupt is detected.
    fn configure_interrupt(
        &self,
        pin: u32,
        trigger: Trigger,
        polarity: Polarity,
    ) -> Result<(), Self::Error>;

    /// Stop the pin from raising interrupts.
    fn mask_interrupt(&self, pin: u32) -> Result<(), Self::Error>;

    /// Let the pin raise interrupts again.
    fn unmask_interrupt(&self, pin: u32) -> Result<(), Self::Error>;

    /// Configure the pin's interrupt and attach `handler` to it.
    fn add_interrupt_handler(
        &self,
        pin: u32,
        trigger: Trigger,
        polarity: Polarity,
        handler: Self::Handler,
    ) -> Result<IrqHandle<Self::Cookie>, Self::Error>;

    /// Detach a handler previously returned by `add_interrupt_handler`.
    fn remove_interrupt_handler(&self, handle: IrqHandle<Self::Cookie>)
    -> Result<(), Self::Error>;
}
