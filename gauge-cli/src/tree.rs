//! Benchmark Tree
//!
//! Suites are declared as a tree of named groups with runnable leaves. A
//! leaf is addressed by the dotted path of names from the root, e.g.
//! `sort.vec.1000`.

use gauge_core::{Benchmark, Runnable, Workload};

/// A node in a benchmark suite
pub enum BenchTree {
    /// A runnable leaf
    Leaf {
        /// Leaf name, the last segment of its dotted path
        name: String,
        /// What to run
        runnable: Box<dyn Runnable>,
    },
    /// A named group of nodes
    Group {
        /// Group name, a segment of its children's dotted paths
        name: String,
        /// Nested nodes in declaration order
        children: Vec<BenchTree>,
    },
}

impl BenchTree {
    /// Node name
    pub fn name(&self) -> &str {
        match self {
            BenchTree::Leaf { name, .. } | BenchTree::Group { name, .. } => name,
        }
    }

    /// Number of leaves under this node
    pub fn leaf_count(&self) -> usize {
        match self {
            BenchTree::Leaf { .. } => 1,
            BenchTree::Group { children, .. } => children.iter().map(BenchTree::leaf_count).sum(),
        }
    }
}

impl std::fmt::Debug for BenchTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BenchTree::Leaf { name, .. } => f.debug_struct("Leaf").field("name", name).finish(),
            BenchTree::Group { name, children } => f
                .debug_struct("Group")
                .field("name", name)
                .field("children", children)
                .finish(),
        }
    }
}

/// Declare a benchmark measuring `workload`.
///
/// ```
/// use gauge_cli::{bench, bgroup};
/// use gauge_core::workload::iter;
///
/// let suite = bgroup("math", vec![bench("add", iter(|| 2 + 2))]);
/// assert_eq!(suite.leaf_count(), 1);
/// ```
pub fn bench(name: impl Into<String>, workload: impl Workload + 'static) -> BenchTree {
    bench_with(name, Benchmark::new(workload))
}

/// Declare a leaf backed by any [`Runnable`], e.g. a [`Benchmark`] with an
/// injected clock.
pub fn bench_with(name: impl Into<String>, runnable: impl Runnable + 'static) -> BenchTree {
    BenchTree::Leaf {
        name: name.into(),
        runnable: Box::new(runnable),
    }
}

/// Declare a group of benchmarks.
pub fn bgroup(name: impl Into<String>, children: Vec<BenchTree>) -> BenchTree {
    BenchTree::Group {
        name: name.into(),
        children,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gauge_core::workload::iter;

    #[test]
    fn test_nested_counts() {
        let suite = bgroup(
            "root",
            vec![
                bench("a", iter(|| 1)),
                bgroup("inner", vec![bench("b", iter(|| 2)), bench("c", iter(|| 3))]),
                bgroup("empty", vec![]),
            ],
        );
        assert_eq!(suite.name(), "root");
        assert_eq!(suite.leaf_count(), 3);
    }

    #[test]
    fn test_debug_omits_runnable() {
        let leaf = bench("a", iter(|| 1));
        assert_eq!(format!("{leaf:?}"), "Leaf { name: \"a\" }");
    }
}
