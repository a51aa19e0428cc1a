//! Edge-driven feed loop for [`QuadratureDecoder`].

use core::convert::Infallible;

use embassy_futures::select::{select, Either};
use embedded_hal::digital::{ErrorType, InputPin};
use embedded_hal_async::digital::Wait;

use crate::decoder::{PinLevels, QuadratureDecoder};
use crate::error::EncoderError;

/// Wait for an edge on either encoder pin, sample both, feed the decoder.
/// Repeats forever.
///
/// This is a regular `async fn`, not an Embassy `#[task]`. Spawn it from a
/// thin concrete wrapper on an `InterruptExecutor` so that it runs at
/// interrupt priority and preempts the main poll loop:
///
/// ```ignore
/// #[embassy_executor::task]
/// async fn encoder_task(mut clk: Input<'static>, mut dt: Input<'static>) {
///     if let Err(e) = watch_edges(&mut clk, &mut dt, &ENCODER).await {
///         defmt::error!("encoder stopped: {}", e);
///     }
/// }
/// ```
///
/// Both pin waits are re-armed on every pass. An edge that lands while the
/// previous one is being processed is still seen through the level sample;
/// the transition table treats any skipped step as noise.
///
/// # Errors
///
/// Returns [`EncoderError::Pin`] as soon as a pin read or edge wait fails.
pub async fn watch_edges<CLK, DT, E>(
    clk: &mut CLK,
    dt: &mut DT,
    decoder: &QuadratureDecoder,
) -> Result<Infallible, EncoderError<E>>
where
    CLK: InputPin + Wait + ErrorType<Error = E>,
    DT: InputPin + Wait + ErrorType<Error = E>,
{
    // Prime the phase with the levels present at startup.
    decoder.on_edge(sample(clk, dt)?);

    loop {
        match select(clk.wait_for_any_edge(), dt.wait_for_any_edge()).await {
            Either::First(result) | Either::Second(result) => result?,
        }
        decoder.on_edge(sample(clk, dt)?);
    }
}

fn sample<CLK, DT, E>(clk: &mut CLK, dt: &mut DT) -> Result<PinLevels, E>
where
    CLK: InputPin + ErrorType<Error = E>,
    DT: InputPin + ErrorType<Error = E>,
{
    Ok(PinLevels::new(clk.is_high()?, dt.is_high()?))
}

// ── Tests ────────────────────────────────────────────────────────────────
