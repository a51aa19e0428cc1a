//! Servo PWM on one RP2350 slice, with run-time frequency changes.

use core::convert::Infallible;

use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::pwm::{Config, Pwm};
use servo_tester::outputs::ServoPwm;

/// Servo output on channel A of a PWM slice.
///
/// Duty is taken on the 16-bit scale and rescaled to the slice's current
/// `top`, so the same duty value keeps the same pulse fraction across
/// frequency changes.
pub struct RpServoPwm<'d> {
    pwm: Pwm<'d>,
    // Kept so reconfiguring the compare register does not reset the divider.
    cfg: Config,
    duty: u16,
}

impl<'d> RpServoPwm<'d> {
    /// Take a slice created with [`Pwm::new_output_a`] and start it at
    /// `hz` with the output held low.
    pub fn new(pwm: Pwm<'d>, hz: u32) -> Self {
        let mut servo = Self {
            pwm,
            cfg: Config::default(),
            duty: 0,
        };
        servo.apply_frequency(hz);
        servo
    }

    fn apply_frequency(&mut self, hz: u32) {
        let clk = clk_sys_freq();
        let (div, top) = timing(clk, hz);
        self.cfg.divider = div.into();
        self.cfg.top = top;
        self.cfg.compare_a = compare(self.duty, top);
        self.cfg.enable = true;
        self.pwm.set_config(&self.cfg);
        defmt::info!("servo pwm {}Hz clk={}Hz div={} top={}", hz, clk, div, top);
    }
}

impl ServoPwm for RpServoPwm<'_> {
    type Error = Infallible;

    fn set_frequency(&mut self, hz: u32) -> Result<(), Infallible> {
        self.apply_frequency(hz);
        Ok(())
    }

    fn set_duty_u16(&mut self, duty: u16) -> Result<(), Infallible> {
        self.duty = duty;
        self.cfg.compare_a = compare(duty, self.cfg.top);
        self.pwm.set_config(&self.cfg);
        Ok(())
    }
}

/// Integer divider and counter top giving `hz` from `clk`.
///
/// The divider is the smallest that keeps `top` within 16 bits, which
/// maximises duty resolution.
fn timing(clk: u32, hz: u32) -> (u8, u16) {
    let hz = u64::from(hz.max(1));
    let clk = u64::from(clk);
    let div = clk.div_ceil(hz * 65_536).clamp(1, 255);
    let top = (clk / (div * hz)).saturating_sub(1).min(u64::from(u16::MAX));
    (div as u8, top as u16)
}

/// Compare value for a 16-bit duty on a counter that wraps at `top`.
fn compare(duty: u16, top: u16) -> u16 {
    ((u32::from(duty) * (u32::from(top) + 1)) / 65_536) as u16
}
