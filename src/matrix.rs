//! A device abstraction for the 4×3 key matrix.
//!
//! See [`MatrixScanner`] for usage.
//!
//! # Theory of operation
//!
//! Each key joins one column line to one row line. The scanner drives one column high at a
//! time (the others low), waits for the line to settle, then samples the rows, which are
//! pulled down. A row that reads high while its column is driven means that key is down.
//!
//! There is no debounce beyond the settle delay: one read per column/row pair is trusted.
//! [`MatrixScanner::poll_press`] adds edge detection so a key held across scans is reported
//! only once.

use embassy_time::Duration;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs;

use crate::clock::sleep;
use crate::fmt::{trace, warn};
use crate::keymap::{COLUMN_COUNT, KeySlot, ROW_COUNT, to_key_slot};

/// Scans a 4-column × 3-row key matrix.
///
/// `C` are the column output lines, `R` the row input lines (pulled down), and `D` the delay
/// used for the settle wait.
///
/// On the Pico, `board::keypad_scanner` builds one from GPIO pins.
///
/// # Example
///
/// ```
/// use embassy_time::Duration;
/// use embedded_hal::digital::{InputPin, OutputPin};
/// use embedded_hal_async::delay::DelayNs;
/// use keypad_game::keymap::KeySlot;
/// use keypad_game::matrix::MatrixScanner;
///
/// async fn wait_for_key<C, R, D>(columns: [C; 4], rows: [R; 3], delay: D) -> KeySlot
/// where
///     C: OutputPin,
///     R: InputPin,
///     D: DelayNs,
/// {
///     let mut scanner = MatrixScanner::new(columns, rows, delay, Duration::from_millis(1));
///     loop {
///         if let Some(key) = scanner.poll_press().await {
///             return key;
///         }
///     }
/// }
/// ```
pub struct MatrixScanner<C, R, D> {
    columns: [C; COLUMN_COUNT],
    rows: [R; ROW_COUNT],
    delay: D,
    settle_delay: Duration,
    held: Option<KeySlot>,
}

impl<C, R, D> MatrixScanner<C, R, D>
where
    C: OutputPin,
    R: InputPin,
    D: DelayNs,
{
    /// Creates a scanner from its column lines, row lines, and delay.
    #[must_use]
    pub const fn new(
        columns: [C; COLUMN_COUNT],
        rows: [R; ROW_COUNT],
        delay: D,
        settle_delay: Duration,
    ) -> Self {
        Self {
            columns,
            rows,
            delay,
            settle_delay,
            held: None,
        }
    }

    /// Sweeps all four columns once and returns the first `(column, row)` found down.
    ///
    /// Columns are visited in order 0..4 and rows in order 0..3 within each column. Returns
    /// `None` if nothing is down during the whole sweep.
    pub async fn scan_once(&mut self) -> Option<(u8, u8)> {
        for column in 0..COLUMN_COUNT as u8 {
            self.drive_only(usize::from(column));
            sleep(&mut self.delay, self.settle_delay).await;

            for (row, row_line) in (0_u8..).zip(self.rows.iter_mut()) {
                match row_line.is_high() {
                    Ok(true) => {
                        trace!("matrix: hit at column {} row {}", column, row);
                        return Some((column, row));
                    }
                    Ok(false) => {}
                    Err(_) => warn!("matrix: row {} read failed", row),
                }
            }
        }
        None
    }

    /// The key currently held down, if any.
    pub async fn scan_key(&mut self) -> Option<KeySlot> {
        self.scan_once()
            .await
            .map(|(column, row)| to_key_slot(column, row))
    }

    /// Scans once and returns a key only if it was not already down on the previous poll.
    pub async fn poll_press(&mut self) -> Option<KeySlot> {
        let key = self.scan_key().await;
        let newly_pressed = match key {
            Some(key) if self.held != Some(key) => Some(key),
            _ => None,
        };
        self.held = key;
        newly_pressed
    }

    /// Scans once and takes whatever is down now as the held key.
    ///
    /// A key already down is not reported by the next [`poll_press`](Self::poll_press); a key
    /// released since the last poll is forgotten, so pressing it again is reported.
    pub async fn prime_edges(&mut self) {
        self.held = self.scan_key().await;
        trace!("matrix: edges primed");
    }

    /// Forgets which key was held, so the next poll reports any key that is down.
    pub const fn reset_edges(&mut self) {
        self.held = None;
    }

    /// Returns the column lines, row lines, and delay.
    pub fn into_parts(self) -> ([C; COLUMN_COUNT], [R; ROW_COUNT], D) {
        (self.columns, self.rows, self.delay)
    }

    fn drive_only(&mut self, active: usize) {
        for (column, column_line) in self.columns.iter_mut().enumerate() {
            let result = if column == active {
                column_line.set_high()
            } else {
                column_line.set_low()
            };
            if result.is_err() {
                warn!("matrix: column {} drive failed", column);
            }
        }
    }
}
