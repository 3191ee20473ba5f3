//! Progress display of a search run.

use crate::parameters::SchemeParameters;
use crate::search::SearchControl;
use indicatif::{ProgressBar, ProgressStyle};
use lss_util::binomial;
use std::thread;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Rough estimate of the number of leaves of the search tree.
///
/// With `P = Σπ` and `x_i` the share size of the minimal set `X_i`, this is
/// `q^{k·Σx_i}` when `P >= r·k` and `C(r·k, P)·q^{P·max x_i}` otherwise,
/// saturating at `u128::MAX`.
pub fn estimate_leaf_number(parameters: &SchemeParameters) -> u128 {
    let q = parameters.field().order() as u128;
    let k = parameters.secret_size() as u128;
    let total = parameters.total_share_size() as u128;
    let height = parameters.height() as u128;
    let sizes = (1..=parameters.access_structure().gamma_min().len())
        .map(|i| parameters.share_size_of_minimal_set(i) as u128)
        .collect::<Vec<_>>();

    let power = |exponent: u128| {
        u32::try_from(exponent)
            .ok()
            .and_then(|e| q.checked_pow(e))
            .unwrap_or(u128::MAX)
    };
    if total >= height {
        power(k.saturating_mul(sizes.iter().sum()))
    } else {
        let max = sizes.iter().copied().max().unwrap_or(0);
        binomial(height as u64, total as u64).saturating_mul(power(total * max))
    }
}

/// Draws a progress bar of the leaves accounted for in `control`, until the
/// run is terminated.
pub fn track(control: &SearchControl, estimate: u128) {
    let bar = ProgressBar::new(u64::try_from(estimate).unwrap_or(u64::MAX));
    match ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
    {
        Ok(style) => bar.set_style(style.progress_chars("#>-")),
        Err(e) => tracing::debug!("Default progress style: {}", e),
    }

    while !control.is_terminated() {
        bar.set_position(control.leaves().min(bar.length().unwrap_or(u64::MAX)));
        thread::sleep(POLL_INTERVAL);
    }
    bar.finish_and_clear();
}
