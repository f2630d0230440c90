//! Benchmark Planner
//!
//! Builds the execution plan by flattening the suite tree and filtering
//! leaves by a regex on their dotted path.
//!
//! Ordering: leaves run in declaration order (depth-first).

use crate::tree::BenchTree;
use gauge_core::Runnable;
use regex::Regex;

/// A selected leaf
pub struct PlannedBenchmark<'a> {
    /// Dotted path from the root
    pub path: String,
    /// The leaf to run
    pub runnable: &'a mut dyn Runnable,
}

/// Execution plan for benchmarks
pub struct ExecutionPlan<'a> {
    /// Ordered list of benchmarks to run
    pub benchmarks: Vec<PlannedBenchmark<'a>>,
}

impl ExecutionPlan<'_> {
    /// Dotted paths in execution order
    pub fn paths(&self) -> Vec<&str> {
        self.benchmarks.iter().map(|b| b.path.as_str()).collect()
    }

    /// Whether nothing was selected
    pub fn is_empty(&self) -> bool {
        self.benchmarks.is_empty()
    }
}

/// Join a parent path and a node name
pub fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

/// Build execution plan from the suite
///
/// Leaves whose dotted path does not match `filter` are skipped.
pub fn build_plan<'a>(suite: &'a mut [BenchTree], filter: Option<&Regex>) -> ExecutionPlan<'a> {
    let mut benchmarks = Vec::new();
    collect(suite, "", filter, &mut benchmarks);

    let mut seen = std::collections::HashSet::new();
    for b in &benchmarks {
        if !seen.insert(b.path.as_str()) {
            tracing::warn!(path = %b.path, "duplicate benchmark path");
        }
    }

    ExecutionPlan { benchmarks }
}

fn collect<'a>(
    nodes: &'a mut [BenchTree],
    prefix: &str,
    filter: Option<&Regex>,
    out: &mut Vec<PlannedBenchmark<'a>>,
) {
    for node in nodes {
        match node {
            BenchTree::Leaf { name, runnable } => {
                let path = join_path(prefix, name);
                if filter.is_none_or(|re| re.is_match(&path)) {
                    out.push(PlannedBenchmark {
                        path,
                        runnable: runnable.as_mut(),
                    });
                }
            }
            BenchTree::Group { name, children } => {
                let path = join_path(prefix, name);
                collect(children, &path, filter, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{bench, bgroup};
    use gauge_core::workload::iter;

    fn suite() -> Vec<BenchTree> {
        vec![
            bgroup(
                "sort",
                vec![
                    bench("small", iter(|| 1)),
                    bgroup("vec", vec![bench("1000", iter(|| 2))]),
                ],
            ),
            bench("alloc", iter(|| 3)),
            bgroup("hash", vec![bench("small", iter(|| 4))]),
        ]
    }

    #[test]
    fn test_no_filter_keeps_declaration_order() {
        let mut suite = suite();
        let plan = build_plan(&mut suite, None);

        assert_eq!(
            plan.paths(),
            ["sort.small", "sort.vec.1000", "alloc", "hash.small"]
        );
    }

    #[test]
    fn test_regex_filter_on_dotted_path() {
        let mut suite = suite();
        let re = Regex::new(r"small$").unwrap();
        let plan = build_plan(&mut suite, Some(&re));

        assert_eq!(plan.paths(), ["sort.small", "hash.small"]);
    }

    #[test]
    fn test_group_prefix_filter() {
        let mut suite = suite();
        let re = Regex::new(r"^sort\.").unwrap();
        let plan = build_plan(&mut suite, Some(&re));

        assert_eq!(plan.paths(), ["sort.small", "sort.vec.1000"]);
    }

    #[test]
    fn test_filter_matching_nothing() {
        let mut suite = suite();
        let re = Regex::new("nope").unwrap();
        assert!(build_plan(&mut suite, Some(&re)).is_empty());
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("", "a"), "a");
        assert_eq!(join_path("a.b", "c"), "a.b.c");
    }
}
