#![allow(missing_docs)]
#![no_std]
#![no_main]
#![cfg(not(feature = "host"))]

use core::{convert::Infallible, panic};

use embassy_executor::Spawner;
use embassy_time::{Delay, Duration, Timer};
use keypad_game::{
    Result,
    board::{keypad_scanner, spawn_led_strip},
    clock::EmbassyClock,
    config::GameConfig,
    display::LogDisplay,
    game::{Board, SequenceGame},
    led_strip::Current,
};
use {defmt_rtt as _, panic_probe as _};

const CONFIG: GameConfig = GameConfig::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) -> ! {
    let err = inner_main(spawner).await.unwrap_err();
    panic!("{err}");
}

async fn inner_main(spawner: Spawner) -> Result<Infallible> {
    let p = embassy_rp::init(Default::default());

    let scanner = keypad_scanner(
        [p.PIN_5.into(), p.PIN_6.into(), p.PIN_7.into(), p.PIN_8.into()],
        [p.PIN_9.into(), p.PIN_10.into(), p.PIN_11.into()],
        CONFIG.settle_delay,
    );
    let transport = spawn_led_strip(p.PIO0, p.DMA_CH0, p.PIN_1, Current::default(), spawner)?;

    let board = Board::new(scanner, transport, LogDisplay, Delay, EmbassyClock);
    let mut game = SequenceGame::new(board, CONFIG);

    loop {
        let result = game.run().await;
        defmt::info!("sequence recall: {} at level {}", result.outcome, result.level);
        Timer::after(Duration::from_secs(5)).await;
    }
}
