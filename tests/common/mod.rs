//! Simulated keypad board for host tests.
//!
//! Time is virtual: it moves only when the game sleeps through [`SimDelay`]. The key matrix is
//! modeled electrically, so the real [`MatrixScanner`] runs unchanged against [`SimColumn`] and
//! [`SimRow`] pins. A [`Player`] watches every frame the game flushes and schedules presses in
//! response.
#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

use embassy_time::{Duration, Instant};
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs;
use keypad_game::clock::Clock;
use keypad_game::config::GameConfig;
use keypad_game::display::{Display, TextPosition, TextStyle};
use keypad_game::game::Board;
use keypad_game::keymap::{COLUMN_COUNT, KEY_COUNT, KeySet, KeySlot, to_matrix};
use keypad_game::led_strip::{Frame, KeyColor, LedTransport, RGB8, colors};
use keypad_game::matrix::MatrixScanner;

/// Decides what to press after each flushed frame.
pub type Player = Box<dyn FnMut(&Frame) -> Option<KeySlot>>;

/// A press scheduled by the player: `key` is down during `[start, end)`.
#[derive(Clone, Copy, Debug)]
struct Press {
    key: KeySlot,
    start: Instant,
    end: Instant,
}

struct SimState {
    now_ns: u64,
    driven: [bool; COLUMN_COUNT],
    presses: Vec<Press>,
    player: Player,
    reaction: Duration,
    hold: Duration,
    frames: Vec<(Instant, Frame)>,
    screens: Vec<Vec<String>>,
    pending_screen: Vec<String>,
}

impl SimState {
    fn now(&self) -> Instant {
        Instant::from_micros(self.now_ns / 1_000)
    }

    fn is_down(&self, key: KeySlot) -> bool {
        let now = self.now();
        self.presses
            .iter()
            .any(|press| press.key == key && press.start <= now && now < press.end)
    }
}

/// Shared handle to the simulated board.
#[derive(Clone)]
pub struct Sim(Rc<RefCell<SimState>>);

impl Sim {
    /// A board whose player reacts `reaction` after each frame and holds the key for `hold`.
    pub fn new(reaction: Duration, hold: Duration, player: Player) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        Self(Rc::new(RefCell::new(SimState {
            now_ns: 0,
            driven: [false; COLUMN_COUNT],
            presses: Vec::new(),
            player,
            reaction,
            hold,
            frames: Vec::new(),
            screens: Vec::new(),
            pending_screen: Vec::new(),
        })))
    }

    /// Builds the game board: real scanner on simulated pins.
    pub fn board(&self, config: &GameConfig) -> SimBoard {
        let columns = [0, 1, 2, 3].map(|column| SimColumn {
            sim: self.clone(),
            column,
        });
        let rows = [0, 1, 2].map(|row| SimRow {
            sim: self.clone(),
            row,
        });
        let scanner = MatrixScanner::new(columns, rows, self.delay(), config.settle_delay);
        Board::new(
            scanner,
            SimTransport(self.clone()),
            SimDisplay(self.clone()),
            self.delay(),
            SimClock(self.clone()),
        )
    }

    /// A delay that advances virtual time.
    pub fn delay(&self) -> SimDelay {
        SimDelay(self.clone())
    }

    /// Current virtual time.
    pub fn now(&self) -> Instant {
        self.0.borrow().now()
    }

    /// Every frame flushed so far, with the time it was flushed.
    pub fn frames(&self) -> Vec<(Instant, Frame)> {
        self.0.borrow().frames.clone()
    }

    /// Frames that had at least one armed key.
    pub fn armed_frames(&self) -> Vec<Frame> {
        self.frames()
            .into_iter()
            .map(|(_, frame)| frame)
            .filter(|frame| !frame.is_all_idle())
            .collect()
    }

    /// Every presented screen, one entry per line of text.
    pub fn screens(&self) -> Vec<Vec<String>> {
        self.0.borrow().screens.clone()
    }

    /// The first line of every presented screen.
    pub fn headlines(&self) -> Vec<String> {
        self.screens()
            .into_iter()
            .filter_map(|lines| lines.into_iter().next())
            .collect()
    }
}

/// Board type produced by [`Sim::board`].
pub type SimBoard = Board<
    MatrixScanner<SimColumn, SimRow, SimDelay>,
    SimTransport,
    SimDisplay,
    SimDelay,
    SimClock,
>;

/// Keys shown armed in `frame`.
pub fn armed_keys(frame: &Frame) -> KeySet {
    KeySlot::ALL
        .into_iter()
        .filter(|&key| frame.key(key) == KeyColor::Armed)
        .collect()
}

pub fn key(slot: u8) -> KeySlot {
    KeySlot::new(slot).expect("on grid")
}

// ============================================================================
// Time
// ============================================================================

pub struct SimDelay(Sim);

impl DelayNs for SimDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.0.0.borrow_mut().now_ns += u64::from(ns);
    }
}

pub struct SimClock(Sim);

impl Clock for SimClock {
    fn now(&self) -> Instant {
        self.0.now()
    }
}

// ============================================================================
// Matrix pins
// ============================================================================

pub struct SimColumn {
    sim: Sim,
    column: usize,
}

impl ErrorType for SimColumn {
    type Error = Infallible;
}

impl OutputPin for SimColumn {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.sim.0.borrow_mut().driven[self.column] = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.sim.0.borrow_mut().driven[self.column] = true;
        Ok(())
    }
}

pub struct SimRow {
    sim: Sim,
    row: usize,
}

impl ErrorType for SimRow {
    type Error = Infallible;
}

impl InputPin for SimRow {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let state = self.sim.0.borrow();
        let high = KeySlot::ALL.into_iter().any(|key| {
            let (column, row) = to_matrix(key);
            usize::from(row) == self.row
                && state.driven[usize::from(column)]
                && state.is_down(key)
        });
        Ok(high)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

// ============================================================================
// LED strip and display
// ============================================================================

pub struct SimTransport(Sim);

impl LedTransport for SimTransport {
    async fn transmit(&mut self, strip: &[RGB8; KEY_COUNT]) -> keypad_game::Result<()> {
        let frame = Frame(strip.map(|color| {
            if color == colors::RED {
                KeyColor::Armed
            } else {
                assert_eq!(color, colors::WHITE, "only red and white are shown");
                KeyColor::Idle
            }
        }));

        let mut state = self.0.0.borrow_mut();
        let now = state.now();
        state.frames.push((now, frame));
        // A new frame means the player lifts every finger and looks again.
        for press in &mut state.presses {
            if press.end > now {
                press.end = now;
            }
        }
        if let Some(key) = (state.player)(&frame) {
            let start = now + state.reaction;
            let end = start + state.hold;
            state.presses.push(Press { key, start, end });
        }
        Ok(())
    }
}

pub struct SimDisplay(Sim);

impl Display for SimDisplay {
    async fn clear(&mut self) -> keypad_game::Result<()> {
        self.0.0.borrow_mut().pending_screen.clear();
        Ok(())
    }

    async fn show_text(
        &mut self,
        text: &str,
        _position: TextPosition,
        _style: TextStyle,
    ) -> keypad_game::Result<()> {
        self.0.0.borrow_mut().pending_screen.push(text.to_owned());
        Ok(())
    }

    async fn present(&mut self) -> keypad_game::Result<()> {
        let mut state = self.0.0.borrow_mut();
        let screen = std::mem::take(&mut state.pending_screen);
        state.screens.push(screen);
        Ok(())
    }
}

// ============================================================================
// Players
// ============================================================================

/// Presses whichever key is armed.
pub fn follow_armed() -> Player {
    Box::new(|frame| armed_keys(frame).iter().next())
}

/// Presses whichever key is armed, except on the `bad_step`-th armed frame (0-based), where it
/// presses `wrong` instead.
pub fn follow_armed_but(bad_step: usize, wrong: KeySlot) -> Player {
    let mut armed_frames = 0;
    Box::new(move |frame| {
        let armed = armed_keys(frame).iter().next()?;
        let step = armed_frames;
        armed_frames += 1;
        Some(if step == bad_step { wrong } else { armed })
    })
}

/// Presses the armed key for the first `count` armed frames, then stops playing.
pub fn follow_armed_for(count: usize) -> Player {
    let mut armed_frames = 0;
    Box::new(move |frame| {
        let armed = armed_keys(frame).iter().next()?;
        armed_frames += 1;
        (armed_frames <= count).then_some(armed)
    })
}

/// Never presses anything.
pub fn idle_player() -> Player {
    Box::new(|_| None)
}

/// Presses the scripted keys in order, one per frame with anything armed.
pub fn scripted(keys: Vec<KeySlot>) -> Player {
    let mut keys = keys.into_iter();
    Box::new(move |frame| {
        if frame.is_all_idle() {
            None
        } else {
            keys.next()
        }
    })
}
