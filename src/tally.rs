use std::future::Future;

use anyhow::Result;
use tracing::warn;

/// Success/failure counts for a per-record loop.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub ok: usize,
    pub failed: usize,
}

impl Tally {
    pub fn total(&self) -> usize {
        self.ok + self.failed
    }
}

/// Run `op` over every item in sequence. A failing item is logged under
/// its label and counted; the loop always continues to the next item.
/// No retries: every failure is terminal for that item only.
pub async fn try_each<I, T, L, F, Fut>(items: I, label: L, mut op: F) -> Tally
where
    I: IntoIterator<Item = T>,
    L: Fn(&T) -> String,
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let mut tally = Tally::default();
    for item in items {
        let name = label(&item);
        match op(item).await {
            Ok(()) => {
                println!("Success: {}", name);
                tally.ok += 1;
            }
            Err(e) => {
                warn!("Failed {}: {:#}", name, e);
                tally.failed += 1;
            }
        }
    }
    tally
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn partitions_successes_and_failures() {
        let items = vec![1, 2, 3, 4, 5];
        let tally = try_each(
            items,
            |n| format!("item {}", n),
            |n| async move {
                if n % 2 == 0 {
                    anyhow::bail!("even");
                }
                Ok(())
            },
        )
        .await;
        assert_eq!(tally.ok, 3);
        assert_eq!(tally.failed, 2);
        assert_eq!(tally.total(), 5);
    }

    #[tokio::test]
    async fn failure_does_not_halt_the_loop() {
        let mut seen = Vec::new();
        let tally = try_each(
            vec!["a", "b", "c"],
            |s| s.to_string(),
            |s| {
                seen.push(s);
                async move {
                    if s == "a" {
                        anyhow::bail!("boom");
                    }
                    Ok(())
                }
            },
        )
        .await;
        assert_eq!(seen, vec!["a", "b", "c"]);
        assert_eq!(tally, Tally { ok: 2, failed: 1 });
    }

    #[tokio::test]
    async fn empty_input() {
        let tally = try_each(Vec::<i32>::new(), |_| String::new(), |_| async { Ok(()) }).await;
        assert_eq!(tally, Tally::default());
    }
}
