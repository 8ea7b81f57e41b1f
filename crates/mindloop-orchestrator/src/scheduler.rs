use mindloop_core::Task;

/// Orders a cycle's task set for dispatch: priority descending, with
/// equal-priority ties preserving generation order (stable sort).
///
/// Eligibility is deliberately not evaluated here — the engine makes a
/// single linear pass over this order and checks each task's dependencies
/// against the live registry at its turn, so a completion earlier in the
/// pass can enable a later task. Tasks that are ineligible at their turn
/// are skipped for the remainder of the cycle; there is no re-queueing
/// within a cycle.
pub fn dispatch_order(tasks: &[Task]) -> Vec<String> {
    let mut order: Vec<usize> = (0..tasks.len()).collect();
    order.sort_by_key(|&i| std::cmp::Reverse(tasks[i].priority));
    order.into_iter().map(|i| tasks[i].id.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_descending() {
        let tasks = vec![
            Task::new("low", "l", 1),
            Task::new("high", "h", 9),
            Task::new("mid", "m", 5),
        ];
        assert_eq!(dispatch_order(&tasks), vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_ties_preserve_generation_order() {
        let tasks = vec![
            Task::new("first", "f", 5),
            Task::new("second", "s", 5),
            Task::new("third", "t", 5),
        ];
        assert_eq!(dispatch_order(&tasks), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_mixed_priorities_and_ties() {
        let tasks = vec![
            Task::new("a", "", 3),
            Task::new("b", "", 7),
            Task::new("c", "", 3),
            Task::new("d", "", 7),
        ];
        assert_eq!(dispatch_order(&tasks), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_empty_set() {
        assert!(dispatch_order(&[]).is_empty());
    }
}
