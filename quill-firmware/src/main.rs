//! Quill - CoreXY Pen Plotter Firmware
//!
//! Main firmware binary for RP2040-based plotter controllers. Coordinate
//! records stream in over UART0, are planned into straight-line CoreXY moves
//! and stepped out with a trapezoidal speed ramp. A servo lifts the pen, a
//! 16x2 LCD shows the status and a hard kill switch stops everything.
//!
//! # Executors
//!
//! - Thread mode: serial listener, planner, motion executor, status, flow control
//! - `SWI_IRQ_1` (high priority): step-pulse generator, kill switch

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{Config as I2cConfig, I2c, InterruptHandler as I2cInterruptHandler};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::peripherals::{I2C0, UART0};
use embassy_rp::uart::{BufferedInterruptHandler, BufferedUart, Config as UartConfig};
use embassy_time::Delay;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use quill_core::state::Status;
use quill_core::traits::PenActuator;
use quill_drivers::display::{Lcd1602, PCF8574_ADDR};
use quill_drivers::pen::ServoPen;
use quill_drivers::stepper::{DirLines, StepLines};
use quill_hal_rp2040::servo_output;

use crate::channels::{install_pen, STATUS_SIGNAL};
use crate::config::load_config;

mod channels;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    I2C0_IRQ => I2cInterruptHandler<I2C0>;
});

/// Host link baud rate
const UART_BAUD: u32 = 115_200;

/// LCD backpack bus speed
const I2C_FREQUENCY_HZ: u32 = 100_000;

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// High-priority executor for the step generator and kill switch
static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_HIGH.on_interrupt()
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Quill firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();
    info!(
        "Bed {}x{} mm at {} steps/mm",
        config.kinematics.x_max_mm, config.kinematics.y_max_mm, config.kinematics.steps_per_mm
    );

    // Pin assignments:
    //   UART0 TX/RX  GPIO0/1    host link
    //   STEP/DIR A   GPIO2/3
    //   STEP/DIR B   GPIO4/5
    //   SERVO        GPIO6      PWM slice 3 A
    //   I2C0 SDA/SCL GPIO8/9    LCD backpack
    //   KILL         GPIO10     active low
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = UART_BAUD;
    let tx_buf = TX_BUF.init([0u8; 64]);
    let rx_buf = RX_BUF.init([0u8; 256]);
    let uart = BufferedUart::new(p.UART0, p.PIN_0, p.PIN_1, Irqs, tx_buf, rx_buf, uart_config);
    let (tx, rx) = uart.split();
    info!("UART initialized at {} baud", UART_BAUD);

    let steps = StepLines::new(
        Output::new(p.PIN_2, Level::Low),
        Output::new(p.PIN_4, Level::Low),
        Delay,
        config.stepper.pulse_width_ns,
    );
    let dirs = DirLines::new(
        Output::new(p.PIN_3, Level::Low),
        Output::new(p.PIN_5, Level::Low),
    );
    info!("Step/dir lines initialized");

    match servo_output(p.PWM_SLICE3, p.PIN_6) {
        Some(pwm) => {
            let pen = ServoPen::new(pwm, config.pen.up_angle);
            info!("Pen raised to {} deg", pen.angle());
            install_pen(pen);
        }
        None => error!("Servo PWM channel unavailable, pen disabled"),
    }

    let mut i2c_config = I2cConfig::default();
    i2c_config.frequency = I2C_FREQUENCY_HZ;
    let i2c = I2c::new_async(p.I2C0, p.PIN_9, p.PIN_8, Irqs, i2c_config);
    let lcd = Lcd1602::new(i2c, Delay, PCF8574_ADDR);

    let kill_input = Input::new(p.PIN_10, Pull::Up);

    // High-priority tasks
    interrupt::SWI_IRQ_1.set_priority(Priority::P1);
    let high_spawner = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);
    high_spawner.spawn(tasks::stepgen_task(steps).unwrap());
    high_spawner.spawn(tasks::kill_switch_task(kill_input, config).unwrap());

    // Thread-mode tasks
    spawner.spawn(tasks::status_task(lcd).unwrap());
    spawner.spawn(tasks::flow_task(tx).unwrap());
    spawner.spawn(tasks::executor_task(dirs, config).unwrap());
    spawner.spawn(tasks::planner_task(config).unwrap());
    spawner.spawn(tasks::listener_task(rx).unwrap());

    STATUS_SIGNAL.signal(Status::Ready);
    info!("All tasks spawned, ready for commands");
}
