#[cfg(test)]
mod tests {
    use crate::tools::batch::staggered;
    use std::time::{Duration, Instant};

    #[tokio::test]
    async fn results_come_back_in_item_order() {
        let items = vec![30u64, 10, 20];
        // Later items sleep less, so completion order differs from item order.
        let results = staggered(items, Duration::from_millis(0), |n| async move {
            tokio::time::sleep(Duration::from_millis(n)).await;
            n
        })
        .await;
        assert_eq!(results, vec![30, 10, 20]);
    }

    #[tokio::test]
    async fn starts_are_staggered_by_index() {
        let start = Instant::now();
        let offsets = staggered(vec![(), (), ()], Duration::from_millis(40), |_| {
            let start = start;
            async move { start.elapsed() }
        })
        .await;

        assert!(offsets[0] < Duration::from_millis(30));
        assert!(offsets[1] >= Duration::from_millis(40));
        assert!(offsets[2] >= Duration::from_millis(80));
    }

    #[tokio::test]
    async fn empty_batch_settles_immediately() {
        let results: Vec<u32> = staggered(vec![], Duration::from_millis(200), |n| async move { n }).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn operations_run_interleaved_not_sequentially() {
        let start = Instant::now();
        staggered(vec![(), (), ()], Duration::from_millis(10), |_| async {
            tokio::time::sleep(Duration::from_millis(50)).await;
        })
        .await;
        // Sequential execution would take ~150ms + stagger; interleaved is
        // bounded by the last start plus one operation.
        assert!(start.elapsed() < Duration::from_millis(140));
    }
}
