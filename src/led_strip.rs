//! The 12-LED feedback strip: key colors, the frame buffer, and its transport.
//!
//! The game never writes a single LED to hardware. It edits a [`FrameBuffer`] and calls
//! [`FrameBuffer::flush`], which hands all 12 colors to the [`LedTransport`] in one call.
//!
//! # Example
//!
//! ```
//! # use keypad_game::Result;
//! use keypad_game::keymap::KeySlot;
//! use keypad_game::led_strip::{FrameBuffer, KeyColor, LedTransport, RGB8};
//! use keypad_game::keymap::KEY_COUNT;
//!
//! struct Recorder(Vec<[RGB8; KEY_COUNT]>);
//!
//! impl LedTransport for Recorder {
//!     async fn transmit(&mut self, colors: &[RGB8; KEY_COUNT]) -> Result<()> {
//!         self.0.push(*colors);
//!         Ok(())
//!     }
//! }
//!
//! # embassy_futures::block_on(async {
//! let mut frame_buffer = FrameBuffer::new(Recorder(Vec::new()));
//! frame_buffer.set_key(KeySlot::new(6)?, KeyColor::Armed);
//! frame_buffer.flush().await;
//! assert_eq!(frame_buffer.transport().0.len(), 1);
//! # Ok::<(), keypad_game::Error>(())
//! # }).unwrap();
//! ```

/// Predefined RGB color constants from the `smart_leds` crate.
#[doc(inline)]
pub use smart_leds::colors;

/// RGB color type sent to the strip.
pub use smart_leds::RGB8;

use core::ops::{Deref, DerefMut};

use crate::Result;
use crate::fmt::{error, trace};
use crate::keymap::{KEY_COUNT, KeySlot, LedIndex, to_led_index};

// ============================================================================
// KeyColor
// ============================================================================

/// What an LED under a key is showing.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, defmt::Format)]
pub enum KeyColor {
    /// The key is a target: press it.
    Armed,
    /// The key is not a target (or has been cleared).
    #[default]
    Idle,
}

impl KeyColor {
    /// Strip color for this state: red when armed, white when idle.
    #[must_use]
    pub const fn rgb(self) -> RGB8 {
        match self {
            Self::Armed => colors::RED,
            Self::Idle => colors::WHITE,
        }
    }

    /// The 32-bit raw strip word for this state, as written by GRB-ordered drivers that take
    /// packed words.
    #[must_use]
    pub const fn packed(self) -> u32 {
        match self {
            Self::Armed => 0x00FF_00FF,
            Self::Idle => 0xFFFF_FFFF,
        }
    }
}

// ============================================================================
// Frame
// ============================================================================

/// One [`KeyColor`] per LED, indexed by strip position.
///
/// The length is always 12. Frames deref to `[KeyColor; 12]`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, defmt::Format)]
pub struct Frame(pub [KeyColor; KEY_COUNT]);

impl Frame {
    /// Number of LEDs in a frame.
    pub const LEN: usize = KEY_COUNT;

    /// A frame with every LED idle.
    #[must_use]
    pub const fn new() -> Self {
        Self::filled(KeyColor::Idle)
    }

    /// A frame with every LED set to `color`.
    #[must_use]
    pub const fn filled(color: KeyColor) -> Self {
        Self([color; KEY_COUNT])
    }

    /// The color of the LED at strip position `led`.
    #[must_use]
    #[allow(clippy::indexing_slicing, reason = "an LedIndex is always below KEY_COUNT")]
    pub const fn led(&self, led: LedIndex) -> KeyColor {
        self.0[led.index()]
    }

    /// Sets the color of the LED at strip position `led`.
    #[allow(clippy::indexing_slicing, reason = "an LedIndex is always below KEY_COUNT")]
    pub const fn set_led(&mut self, led: LedIndex, color: KeyColor) {
        self.0[led.index()] = color;
    }

    /// The color shown under `key`.
    #[must_use]
    pub const fn key(&self, key: KeySlot) -> KeyColor {
        self.led(to_led_index(key))
    }

    /// Sets the color shown under `key`.
    pub const fn set_key(&mut self, key: KeySlot, color: KeyColor) {
        self.set_led(to_led_index(key), color);
    }

    /// Whether every LED is idle.
    #[must_use]
    pub fn is_all_idle(&self) -> bool {
        self.0.iter().all(|color| *color == KeyColor::Idle)
    }

    /// The strip colors for this frame, in strip order.
    #[must_use]
    pub fn to_rgb(&self) -> [RGB8; KEY_COUNT] {
        self.0.map(KeyColor::rgb)
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for Frame {
    type Target = [KeyColor; KEY_COUNT];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Frame {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<[KeyColor; KEY_COUNT]> for Frame {
    fn from(array: [KeyColor; KEY_COUNT]) -> Self {
        Self(array)
    }
}

// ============================================================================
// Transport
// ============================================================================

/// Sends one whole frame of colors to the LED strip.
///
/// Implementations must not keep a reference to `colors` past the call: if the hardware
/// transfer outlives the call, copy the frame first (see the device `SignalTransport`).
pub trait LedTransport {
    /// Transmits all 12 colors in strip order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LedTransmit`](crate::Error::LedTransmit) if the strip rejected the frame.
    async fn transmit(&mut self, colors: &[RGB8; KEY_COUNT]) -> Result<()>;
}

impl<T: LedTransport + ?Sized> LedTransport for &mut T {
    async fn transmit(&mut self, colors: &[RGB8; KEY_COUNT]) -> Result<()> {
        (**self).transmit(colors).await
    }
}

// ============================================================================
// FrameBuffer
// ============================================================================

/// The current color of each LED plus the transport that shows it.
///
/// Edits (`set*`) only touch memory; [`flush`](Self::flush) is the single point where colors
/// reach the strip, always all 12 at once.
pub struct FrameBuffer<T> {
    frame: Frame,
    transport: T,
}

impl<T: LedTransport> FrameBuffer<T> {
    /// Creates an all-idle buffer. Nothing is sent until [`flush`](Self::flush).
    #[must_use]
    pub const fn new(transport: T) -> Self {
        Self {
            frame: Frame::new(),
            transport,
        }
    }

    /// The colors as last set.
    #[must_use]
    pub const fn frame(&self) -> &Frame {
        &self.frame
    }

    /// The color under `key`.
    #[must_use]
    pub const fn key(&self, key: KeySlot) -> KeyColor {
        self.frame.key(key)
    }

    /// Sets one LED by strip position.
    pub const fn set(&mut self, led: LedIndex, color: KeyColor) {
        self.frame.set_led(led, color);
    }

    /// Sets the LED under `key`.
    pub const fn set_key(&mut self, key: KeySlot, color: KeyColor) {
        self.frame.set_key(key, color);
    }

    /// Replaces every LED color, in strip order.
    pub const fn set_all(&mut self, colors: [KeyColor; KEY_COUNT]) {
        self.frame = Frame(colors);
    }

    /// Sets every LED to `color`.
    pub const fn fill(&mut self, color: KeyColor) {
        self.frame = Frame::filled(color);
    }

    /// Sends all 12 colors to the strip.
    ///
    /// A failed transmission is logged and otherwise ignored; losing one frame of feedback
    /// does not change the game.
    pub async fn flush(&mut self) {
        trace!("led_strip: flush");
        if let Err(err) = self.transport.transmit(&self.frame.to_rgb()).await {
            error!("led_strip: transmit failed: {}", err);
        }
    }

    /// The underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Consumes the buffer and returns the transport.
    pub fn into_transport(self) -> T {
        self.transport
    }
}

// ============================================================================
// Current budget
// ============================================================================

/// Current budget for the strip, used to cap brightness.
#[derive(Clone, Copy, Debug, Eq, PartialEq, defmt::Format)]
pub enum Current {
    /// Limit brightness so that all 12 LEDs at full white stay within this many milliamps.
    Milliamps(u16),
    /// No limit.
    Unlimited,
}

/// Worst-case draw of one WS2812 LED at full white.
pub const MILLIAMPS_PER_LED: u32 = 60;

const STRIP_MILLIAMPS: u32 = MILLIAMPS_PER_LED * KEY_COUNT as u32;

impl Current {
    /// Brightness cap `0..=255` for a 12-LED strip under this budget.
    #[must_use]
    pub const fn max_brightness(self) -> u8 {
        match self {
            Self::Milliamps(ma) => {
                let scaled = (ma as u32).saturating_mul(255);
                match scaled.checked_div(STRIP_MILLIAMPS) {
                    Some(scale) if scale < 255 => scale as u8,
                    _ => 255,
                }
            }
            Self::Unlimited => 255,
        }
    }
}

impl Default for Current {
    fn default() -> Self {
        Self::Milliamps(500)
    }
}

/// Scales every channel of `colors` by `max_brightness / 255`.
pub fn apply_brightness(colors: &mut [RGB8; KEY_COUNT], max_brightness: u8) {
    let scale = |value: u8| {
        let scaled = u16::from(value).saturating_mul(u16::from(max_brightness));
        u8::try_from(scaled.checked_div(255).unwrap_or(0)).unwrap_or(u8::MAX)
    };
    for color in colors.iter_mut() {
        *color = RGB8::new(scale(color.r), scale(color.g), scale(color.b));
    }
}

// ============================================================================
// Device transport
// ============================================================================

#[cfg(not(feature = "host"))]
pub use device::{LedStripStatic, SignalTransport, led_strip_task};

#[cfg(not(feature = "host"))]
mod device {
    use embassy_rp::peripherals::PIO0;
    use embassy_rp::pio_programs::ws2812::{Grb, PioWs2812};
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
    use embassy_sync::signal::Signal;

    use super::{LedTransport, RGB8, apply_brightness};
    use crate::Result;
    use crate::fmt::{debug, info};
    use crate::keymap::KEY_COUNT;

    type FrameSignal = Signal<CriticalSectionRawMutex, [RGB8; KEY_COUNT]>;

    /// Static resources shared between [`SignalTransport`] and [`led_strip_task`].
    pub struct LedStripStatic {
        frames: FrameSignal,
    }

    impl LedStripStatic {
        /// Creates the static resources.
        #[must_use]
        pub const fn new_static() -> Self {
            Self {
                frames: Signal::new(),
            }
        }
    }

    /// [`LedTransport`] that copies each frame into a signal for [`led_strip_task`].
    ///
    /// `transmit` returns as soon as the frame is copied; the DMA transfer runs in the
    /// background task on its own copy, so the game may edit its buffer right away. If the
    /// game flushes faster than the strip can be written, only the newest frame is sent.
    pub struct SignalTransport {
        frames: &'static FrameSignal,
    }

    impl SignalTransport {
        /// Binds a transport to its static resources.
        #[must_use]
        pub const fn new(led_strip_static: &'static LedStripStatic) -> Self {
            Self {
                frames: &led_strip_static.frames,
            }
        }
    }

    impl LedTransport for SignalTransport {
        async fn transmit(&mut self, colors: &[RGB8; KEY_COUNT]) -> Result<()> {
            self.frames.signal(*colors);
            Ok(())
        }
    }

    /// Background task that writes signaled frames to a WS2812 strip on PIO0.
    #[embassy_executor::task]
    pub async fn led_strip_task(
        mut driver: PioWs2812<'static, PIO0, 0, KEY_COUNT, Grb>,
        led_strip_static: &'static LedStripStatic,
        max_brightness: u8,
    ) -> ! {
        info!("led_strip_task: started, max brightness {}", max_brightness);
        loop {
            let mut colors = led_strip_static.frames.wait().await;
            apply_brightness(&mut colors, max_brightness);
            driver.write(&colors).await;
            debug!("led_strip_task: frame written");
        }
    }
}
