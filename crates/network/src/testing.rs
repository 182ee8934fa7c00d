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

//! Test helpers shared by the workspace crates.

use std::{future::Future, time::Duration};

/// Repeatedly evaluates an async `condition` until it returns `true` or `timeout` elapses.
///
/// # Panics
///
/// Panics if the condition is not met within `timeout`.
pub async fn wait_until_async<F, Fut>(mut condition: F, timeout: Duration)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let start = tokio::time::Instant::now();

    loop {
        if condition().await {
            return;
        }

        assert!(
            start.elapsed() <= timeout,
            "Timeout waiting for condition after {timeout:?}"
        );

        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn test_wait_until_async_condition_met() {
        let counter = Arc::new(AtomicUsize::new(0));

        wait_until_async(
            || {
                let counter = counter.clone();
                async move { counter.fetch_add(1, Ordering::SeqCst) >= 3 }
            },
            Duration::from_secs(1),
        )
        .await;

        assert!(counter.load(Ordering::SeqCst) >= 4);
    }

    #[rstest]
    #[tokio::test]
    #[should_panic(expected = "Timeout waiting for condition")]
    async fn test_wait_until_async_timeout() {
        wait_until_async(|| async { false }, Duration::from_millis(50)).await;
    }
}
