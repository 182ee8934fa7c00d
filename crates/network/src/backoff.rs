// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2026 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Exponential backoff with jitter for reconnection delays.

use std::time::Duration;

use rand::Rng;

/// Computes successive reconnection delays growing by a constant factor up to a maximum.
#[derive(Clone, Debug)]
pub struct ExponentialBackoff {
    delay_initial: Duration,
    delay_max: Duration,
    delay_current: Duration,
    factor: f64,
    jitter_ms: u64,
}

impl ExponentialBackoff {
    /// Creates a new [`ExponentialBackoff`] instance.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `delay_initial` is zero.
    /// - `delay_max` is less than `delay_initial`.
    /// - `factor` is not within `[1.0, 100.0]`.
    pub fn new(
        delay_initial: Duration,
        delay_max: Duration,
        factor: f64,
        jitter_ms: u64,
    ) -> anyhow::Result<Self> {
        if delay_initial.is_zero() {
            anyhow::bail!("delay_initial must be non-zero");
        }
        if delay_max < delay_initial {
            anyhow::bail!("delay_max must be greater than or equal to delay_initial");
        }
        if !factor.is_finite() || !(1.0..=100.0).contains(&factor) {
            anyhow::bail!("factor must be within [1.0, 100.0], was {factor}");
        }

        Ok(Self {
            delay_initial,
            delay_max,
            delay_current: delay_initial,
            factor,
            jitter_ms,
        })
    }

    /// Returns the next delay (including jitter) and advances the backoff.
    pub fn next_duration(&mut self) -> Duration {
        let jitter = if self.jitter_ms > 0 {
            rand::rng().random_range(0..=self.jitter_ms)
        } else {
            0
        };
        let delay = self.delay_current + Duration::from_millis(jitter);

        let next = self.delay_current.as_secs_f64() * self.factor;
        self.delay_current = Duration::from_secs_f64(next).min(self.delay_max);

        delay
    }

    /// Resets the backoff to its initial delay.
    pub fn reset(&mut self) {
        self.delay_current = self.delay_initial;
    }

    /// Returns the delay which will be used next (without jitter).
    #[must_use]
    pub fn current_delay(&self) -> Duration {
        self.delay_current
    }
}
