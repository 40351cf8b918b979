use crate::domain::model::Stabilization;
use crate::domain::ports::BrowserPage;
use crate::utils::error::Result;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StabilizeOptions {
    /// Wait after each scroll for the next batch to arrive.
    pub pause: Duration,
    pub max_iterations: usize,
    pub max_duration: Duration,
}

impl Default for StabilizeOptions {
    fn default() -> Self {
        Self {
            pause: Duration::from_secs(2),
            max_iterations: 500,
            max_duration: Duration::from_secs(600),
        }
    }
}

#[derive(Debug)]
pub struct Stabilized<E> {
    pub elements: Vec<E>,
    pub outcome: Stabilization,
    pub iterations: usize,
}

/// Scrolls the last item of `selector` into view until the item count stops
/// growing, then returns the full matched set.
///
/// An empty collection returns immediately. When the iteration or time bound
/// runs out first, the current set is returned as [`Stabilization::TimedOut`].
pub async fn stabilize<P: BrowserPage>(
    page: &P,
    selector: &str,
    options: &StabilizeOptions,
) -> Result<Stabilized<P::Element>> {
    let started = Instant::now();
    let mut iterations = 0;

    let mut current = page.query_all(selector).await?;
    loop {
        let old_count = current.len();
        if old_count == 0 {
            tracing::debug!("No elements match {}, nothing to load", selector);
            return Ok(Stabilized {
                elements: current,
                outcome: Stabilization::Settled,
                iterations,
            });
        }

        if iterations >= options.max_iterations || started.elapsed() >= options.max_duration {
            tracing::warn!(
                "⏱️ Stabilization timed out after {} scrolls ({:?}), returning {} partial results",
                iterations,
                started.elapsed(),
                old_count
            );
            return Ok(Stabilized {
                elements: current,
                outcome: Stabilization::TimedOut,
                iterations,
            });
        }

        // 滾動到最後一筆，觸發下一批載入
        if let Some(last) = current.last() {
            page.scroll_into_view(last).await?;
        }
        iterations += 1;
        tokio::time::sleep(options.pause).await;

        current = page.query_all(selector).await?;
        tracing::debug!(
            "Scroll {}: {} -> {} elements",
            iterations,
            old_count,
            current.len()
        );
        if current.len() == old_count {
            return Ok(Stabilized {
                elements: current,
                outcome: Stabilization::Settled,
                iterations,
            });
        }
    }
}
