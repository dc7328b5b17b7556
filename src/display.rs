//! Presentation adapter: banners, countdown digits, and end-of-game screens.
//!
//! The game talks to a [`Display`] only at phase boundaries and never reads anything back.
//! [`Presenter`] holds the screen layouts of the shipped games; [`GraphicsDisplay`] puts
//! them on any `embedded-graphics` monochrome target, such as a 128×64 OLED.

use core::fmt::Write as _;

use embassy_time::Duration;
use embedded_graphics::{
    mono_font::{
        MonoFont, MonoTextStyle,
        ascii::{FONT_6X10, FONT_9X15_BOLD, FONT_10X20},
    },
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text},
};
use heapless::String;

use crate::fmt::{error, info, warn};
use crate::{Error, Result};

// ============================================================================
// Display trait
// ============================================================================

/// Where a line of text starts, in pixels from the top-left corner.
#[derive(Clone, Copy, Debug, Eq, PartialEq, defmt::Format)]
pub struct TextPosition {
    /// Pixels from the left edge.
    pub x: i32,
    /// Pixels from the top edge.
    pub y: i32,
}

impl TextPosition {
    /// A position `x` pixels right and `y` pixels down.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Typeface for a line of text.
#[derive(Clone, Copy, Debug, Eq, PartialEq, defmt::Format)]
pub enum TextStyle {
    /// Large intro banner.
    Title,
    /// Level banner.
    Heading,
    /// End-of-game messages and the elapsed time.
    Body,
    /// Countdown digits and `Go!!!`.
    Countdown,
}

/// A text screen the game can draw on.
///
/// Calls are buffered until [`present`](Self::present).
pub trait Display {
    /// Blanks the screen buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Display`] if the screen rejected the call.
    async fn clear(&mut self) -> Result<()>;

    /// Draws one line of text into the screen buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Display`] if the screen rejected the call.
    async fn show_text(&mut self, text: &str, position: TextPosition, style: TextStyle)
    -> Result<()>;

    /// Shows the screen buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Display`] if the screen rejected the call.
    async fn present(&mut self) -> Result<()>;
}

impl<D: Display + ?Sized> Display for &mut D {
    async fn clear(&mut self) -> Result<()> {
        (**self).clear().await
    }

    async fn show_text(
        &mut self,
        text: &str,
        position: TextPosition,
        style: TextStyle,
    ) -> Result<()> {
        (**self).show_text(text, position, style).await
    }

    async fn present(&mut self) -> Result<()> {
        (**self).present().await
    }
}

// ============================================================================
// Presenter
// ============================================================================

/// Text shown when a round is lost.
pub const GAME_OVER_TEXT: &str = "GameOver...";

/// Text shown when the game is won.
pub const GAME_CLEAR_TEXT: &str = "GameClear!!";

/// Text shown when the speed-push countdown ends.
pub const GO_TEXT: &str = "Go!!!";

const TITLE_POSITION: TextPosition = TextPosition::new(5, 18);
const HEADING_POSITION: TextPosition = TextPosition::new(5, 36);
const MESSAGE_POSITION: TextPosition = TextPosition::new(5, 33);
const ELAPSED_POSITION: TextPosition = TextPosition::new(5, 3);
const DIGIT_POSITION: TextPosition = TextPosition::new(50, 22);
const GO_POSITION: TextPosition = TextPosition::new(35, 22);

/// Screen layouts for every phase boundary.
///
/// Display failures are logged and ignored; the game continues without the screen.
pub struct Presenter<D> {
    display: D,
}

impl<D: Display> Presenter<D> {
    /// Wraps a display.
    #[must_use]
    pub const fn new(display: D) -> Self {
        Self { display }
    }

    /// The wrapped display.
    #[must_use]
    pub const fn display(&self) -> &D {
        &self.display
    }

    /// Consumes the presenter and returns the display.
    pub fn into_display(self) -> D {
        self.display
    }

    /// Intro banner.
    pub async fn intro(&mut self, text: &str) {
        self.screen(&[(text, TITLE_POSITION, TextStyle::Title)]).await;
    }

    /// `Level: N` banner.
    pub async fn level(&mut self, level: u8) {
        let mut text: String<16> = String::new();
        if write!(text, "Level: {level}").is_err() {
            warn!("display: level text overflow");
        }
        self.screen(&[(text.as_str(), HEADING_POSITION, TextStyle::Heading)]).await;
    }

    /// One countdown number.
    pub async fn countdown_digit(&mut self, digit: u8) {
        let mut text: String<4> = String::new();
        if write!(text, "{digit}").is_err() {
            warn!("display: countdown text overflow");
        }
        self.screen(&[(text.as_str(), DIGIT_POSITION, TextStyle::Countdown)]).await;
    }

    /// `Go!!!`, shown as play starts.
    pub async fn go(&mut self) {
        self.screen(&[(GO_TEXT, GO_POSITION, TextStyle::Countdown)]).await;
    }

    /// Losing screen.
    pub async fn game_over(&mut self) {
        self.screen(&[(GAME_OVER_TEXT, MESSAGE_POSITION, TextStyle::Body)]).await;
    }

    /// Winning screen without a time.
    pub async fn game_clear(&mut self) {
        self.screen(&[(GAME_CLEAR_TEXT, MESSAGE_POSITION, TextStyle::Body)]).await;
    }

    /// Winning screen with the elapsed time.
    pub async fn game_clear_with_time(&mut self, elapsed: Duration) {
        let mut text: String<24> = String::new();
        if format_elapsed(&mut text, elapsed).is_err() {
            warn!("display: elapsed text overflow");
        }
        self.screen(&[
            (GAME_CLEAR_TEXT, MESSAGE_POSITION, TextStyle::Body),
            (text.as_str(), ELAPSED_POSITION, TextStyle::Body),
        ])
        .await;
    }

    async fn screen(&mut self, lines: &[(&str, TextPosition, TextStyle)]) {
        if let Err(err) = self.try_screen(lines).await {
            error!("display: {}", err);
        }
    }

    async fn try_screen(&mut self, lines: &[(&str, TextPosition, TextStyle)]) -> Result<()> {
        self.display.clear().await?;
        for &(text, position, style) in lines {
            info!("display: {}", text);
            self.display.show_text(text, position, style).await?;
        }
        self.display.present().await
    }
}

/// Writes `elapsed` as seconds with three decimals, e.g. `12.034s`.
///
/// # Errors
///
/// Returns [`Error::TextOverflow`] if `out` is too small.
pub fn format_elapsed<const N: usize>(out: &mut String<N>, elapsed: Duration) -> Result<()> {
    let seconds = elapsed.as_secs();
    let millis = elapsed
        .as_millis()
        .saturating_sub(seconds.saturating_mul(1000));
    write!(out, "{seconds}.{millis:03}s").map_err(|_| Error::TextOverflow)
}

// ============================================================================
// embedded-graphics adapter
// ============================================================================

/// [`Display`] for a monochrome `embedded-graphics` target.
///
/// `present` calls `flush` so drivers with an off-screen buffer (such as SSD1306 OLEDs in
/// buffered mode) can push it to the panel.
pub struct GraphicsDisplay<T, F> {
    target: T,
    flush: F,
}

impl<T, F> GraphicsDisplay<T, F>
where
    T: DrawTarget<Color = BinaryColor>,
    F: FnMut(&mut T) -> core::result::Result<(), T::Error>,
{
    /// Wraps a draw target and the function that shows its buffer.
    #[must_use]
    pub const fn new(target: T, flush: F) -> Self {
        Self { target, flush }
    }

    /// The wrapped target.
    #[must_use]
    pub const fn target(&self) -> &T {
        &self.target
    }

    fn font(style: TextStyle) -> &'static MonoFont<'static> {
        match style {
            TextStyle::Title | TextStyle::Countdown => &FONT_10X20,
            TextStyle::Heading => &FONT_9X15_BOLD,
            TextStyle::Body => &FONT_6X10,
        }
    }
}

impl<T, F> Display for GraphicsDisplay<T, F>
where
    T: DrawTarget<Color = BinaryColor>,
    F: FnMut(&mut T) -> core::result::Result<(), T::Error>,
{
    async fn clear(&mut self) -> Result<()> {
        self.target
            .clear(BinaryColor::Off)
            .map_err(|_| Error::Display)
    }

    async fn show_text(
        &mut self,
        text: &str,
        position: TextPosition,
        style: TextStyle,
    ) -> Result<()> {
        let character_style = MonoTextStyle::new(Self::font(style), BinaryColor::On);
        Text::with_baseline(
            text,
            Point::new(position.x, position.y),
            character_style,
            Baseline::Top,
        )
        .draw(&mut self.target)
        .map(|_| ())
        .map_err(|_| Error::Display)
    }

    async fn present(&mut self) -> Result<()> {
        (self.flush)(&mut self.target).map_err(|_| Error::Display)
    }
}

// ============================================================================
// Log-only display
// ============================================================================

/// [`Display`] for boards without a screen: every line goes to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogDisplay;

impl Display for LogDisplay {
    async fn clear(&mut self) -> Result<()> {
        Ok(())
    }

    async fn show_text(
        &mut self,
        text: &str,
        _position: TextPosition,
        _style: TextStyle,
    ) -> Result<()> {
        info!("screen: {}", text);
        Ok(())
    }

    async fn present(&mut self) -> Result<()> {
        Ok(())
    }
}
