//! servo-tester-hw-interface
//!
//! Firmware for the handheld servo tester on a Raspberry Pi Pico 2. Wires
//! the three library crates into the running instrument:
//!
//! 1. The encoder task runs on an interrupt-priority executor. Every edge
//!    on CLK or DT is sampled and fed to the shared [`QuadratureDecoder`].
//! 2. The main loop runs in thread mode. Every 50 ms it polls the two
//!    buttons and the decoder, feeds the menu state machine and applies
//!    the resulting commands to the servo PWM, relay, RGB indicator and
//!    OLED display.

#![no_std]
#![no_main]

mod servo_pwm;

use cortex_m_rt::entry;
use defmt::*;
use embassy_executor::InterruptExecutor;
use embassy_rp::block::ImageDef;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::pwm::{self, Pwm};
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use quadrature_encoder::{watch_edges, Direction, QuadratureDecoder};
use servo_tester::config::{RunnerConfig, POWER_LED_DUTY};
use servo_tester::outputs::OutputBank;
use servo_tester::{Inputs, Runner, ServoTester, Settings};
use servo_tester_oled_display_rs::OledDriver;

use crate::servo_pwm::RpServoPwm;

// ---------------------------------------------------------------------------
// Boot block
// ---------------------------------------------------------------------------

/// Tell the RP2350 Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = embassy_rp::block::ImageDef::secure_exe();

// ---------------------------------------------------------------------------
// Static storage
// ---------------------------------------------------------------------------

/// Detent count written by the encoder task, read by the main loop.
///
/// `Reversed` so that turning the knob clockwise moves menus down and
/// values up with this board's CLK/DT wiring.
static ENCODER: QuadratureDecoder = QuadratureDecoder::new(Direction::Reversed);

static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

/// OLED display at the standard SSD1306 I2C address.
const OLED_ADDRESS: u8 = 0x3C;

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_HIGH.on_interrupt()
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Feeds every CLK/DT edge into [`ENCODER`]. Only returns if a pin read
/// fails, which the RP2350 GPIO never reports.
#[embassy_executor::task]
async fn encoder_task(mut clk: Input<'static>, mut dt: Input<'static>) {
    info!("Encoder task started");
    if let Err(e) = watch_edges(&mut clk, &mut dt, &ENCODER).await {
        error!("Encoder stopped: {}", e);
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[entry]
fn main() -> ! {
    let p = embassy_rp::init(Default::default());
    info!("servo-tester-hw-interface starting");

    // —— Pin assignments ————————————————————————————————————————————————————
    // ENC_DT   → GP2   pull-up
    // ENC_CLK  → GP3   pull-up
    // I2C_SDA  → GP4   OLED
    // I2C_SCL  → GP5   OLED
    // RELAY    → GP16  high = servo disconnected
    // LED_G    → GP18  PWM1 A
    // LED_B    → GP19  PWM1 B
    // LED_PWR  → GP21  PWM2 B
    // BTN_YEL  → GP26  cancel, pull-up, active-low
    // BTN_BLU  → GP27  confirm, pull-up, active-low
    // SERVO    → GP28  PWM6 A
    // ———————————————————————————————————————————————————————————————————————

    // Power LED: lit once at boot and never touched again.
    let mut power_cfg = pwm::Config::default();
    power_cfg.compare_b = POWER_LED_DUTY;
    let _power_led = Pwm::new_output_b(p.PWM_SLICE2, p.PIN_21, power_cfg);

    // Relay starts disconnected before anything else can drive it.
    let relay = Output::new(p.PIN_16, Level::High);

    let settings = Settings::default();
    let servo = RpServoPwm::new(
        Pwm::new_output_a(p.PWM_SLICE6, p.PIN_28, pwm::Config::default()),
        settings.frequency_hz(),
    );

    let rgb = Pwm::new_output_ab(p.PWM_SLICE1, p.PIN_18, p.PIN_19, pwm::Config::default());
    let (green, blue) = rgb.split();
    let green = unwrap!(green);
    let blue = unwrap!(blue);

    let cancel = Input::new(p.PIN_26, Pull::Up);
    let confirm = Input::new(p.PIN_27, Pull::Up);

    // —— Encoder on the high-priority executor ——————————————————————————————

    let clk = Input::new(p.PIN_3, Pull::Up);
    let dt = Input::new(p.PIN_2, Pull::Up);

    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let spawner = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);
    spawner.spawn(unwrap!(encoder_task(clk, dt)));

    // —— Display ————————————————————————————————————————————————————————————

    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c::Config::default());
    let mut oled = OledDriver::new(i2c, OLED_ADDRESS);
    if let Err(e) = oled.init() {
        // Keep running: the servo can still be driven blind.
        error!("OLED init failed: {}", e);
    }

    // —— Main loop ——————————————————————————————————————————————————————————

    let runner = Runner::new(
        ServoTester::new(settings),
        Inputs {
            encoder: &ENCODER,
            cancel,
            confirm,
        },
        OutputBank::new(servo, relay, blue, green),
        oled,
        Delay,
        RunnerConfig::default(),
    );

    info!("Entering main loop");
    runner.run()
}
