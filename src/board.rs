//! Pico wiring for the keypad board: key matrix on GPIO, WS2812 strip on PIO0.
//!
//! ```text
//! columns  GPIO5  GPIO6  GPIO7  GPIO8   (outputs, driven high one at a time)
//! rows     GPIO9  GPIO10 GPIO11         (inputs, pulled down)
//! strip    GPIO1                        (PIO0 state machine 0, DMA_CH0)
//! ```

use embassy_executor::Spawner;
use embassy_rp::Peri;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{AnyPin, Input, Level, Output, Pull};
use embassy_rp::peripherals::{DMA_CH0, PIO0};
use embassy_rp::pio::{Common, InterruptHandler, Pio, PioPin};
use embassy_rp::pio_programs::ws2812::{PioWs2812, PioWs2812Program};
use embassy_time::{Delay, Duration, Instant};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use static_cell::StaticCell;

use crate::fmt::info;
use crate::led_strip::{Current, LedStripStatic, SignalTransport, led_strip_task};
use crate::matrix::MatrixScanner;
use crate::{Error, Result};

bind_interrupts!(struct Pio0Irqs {
    PIO0_IRQ_0 => InterruptHandler<PIO0>;
});

/// Scanner type used on the Pico.
pub type KeypadScanner = MatrixScanner<Output<'static>, Input<'static>, Delay>;

/// Builds the key-matrix scanner.
///
/// Column pins start low. Row pins get internal pull-downs.
///
/// ```rust,no_run
/// # #![no_std]
/// # #![no_main]
/// # use panic_probe as _;
/// use embassy_time::Duration;
/// use keypad_game::board::keypad_scanner;
///
/// async fn example(p: embassy_rp::Peripherals) {
///     let mut scanner = keypad_scanner(
///         [p.PIN_5.into(), p.PIN_6.into(), p.PIN_7.into(), p.PIN_8.into()],
///         [p.PIN_9.into(), p.PIN_10.into(), p.PIN_11.into()],
///         Duration::from_millis(1),
///     );
///     let _ = scanner.poll_press().await;
/// }
/// ```
#[must_use]
pub fn keypad_scanner(
    columns: [Peri<'static, AnyPin>; 4],
    rows: [Peri<'static, AnyPin>; 3],
    settle_delay: Duration,
) -> KeypadScanner {
    let columns = columns.map(|pin| Output::new(pin, Level::Low));
    let rows = rows.map(|pin| Input::new(pin, Pull::Down));
    MatrixScanner::new(columns, rows, Delay, settle_delay)
}

/// Starts the WS2812 strip on PIO0 and returns the transport the game writes to.
///
/// Call once; the PIO block and its static resources are claimed for the life of the program.
///
/// # Errors
///
/// Returns [`Error::TaskSpawn`] if the strip task cannot be spawned.
///
/// # Panics
///
/// Panics if called a second time.
pub fn spawn_led_strip(
    pio: Peri<'static, PIO0>,
    dma: Peri<'static, DMA_CH0>,
    pin: Peri<'static, impl PioPin>,
    current: Current,
    spawner: Spawner,
) -> Result<SignalTransport> {
    static LED_STRIP_STATIC: LedStripStatic = LedStripStatic::new_static();
    static PIO_COMMON: StaticCell<Common<'static, PIO0>> = StaticCell::new();

    let Pio {
        mut common, sm0, ..
    } = Pio::new(pio, Pio0Irqs);
    let program = PioWs2812Program::new(&mut common);
    let driver = PioWs2812::new(&mut common, sm0, dma, pin, &program);
    PIO_COMMON.init(common);

    let max_brightness = current.max_brightness();
    info!("board: LED strip on PIO0, max brightness {}", max_brightness);
    let token = led_strip_task(driver, &LED_STRIP_STATIC, max_brightness);
    spawner.spawn(token).map_err(Error::TaskSpawn)?;
    Ok(SignalTransport::new(&LED_STRIP_STATIC))
}

/// Random source for the speed-push draw, seeded from the time since boot.
#[must_use]
pub fn seeded_rng() -> SmallRng {
    let seed = Instant::now().as_ticks();
    info!("board: rng seed {}", seed);
    SmallRng::seed_from_u64(seed)
}
