//! Workload Executors
//!
//! A workload runs the operation under test `n` times in a counting loop.
//! Every result is passed through [`black_box`] and dropped inside the
//! iteration that produced it, so no iteration can defer work to a later one
//! and the optimizer cannot fold repeated calls.

use std::future::Future;
use std::hint::black_box;

/// Something that can be run for a given number of iterations.
pub trait Workload {
    /// Perform the operation `iterations` times. `exec(0)` does nothing.
    fn exec(&mut self, iterations: u64);
}

impl<W: Workload + ?Sized> Workload for Box<W> {
    #[inline]
    fn exec(&mut self, iterations: u64) {
        (**self).exec(iterations)
    }
}

impl<W: Workload + ?Sized> Workload for &mut W {
    #[inline]
    fn exec(&mut self, iterations: u64) {
        (**self).exec(iterations)
    }
}

// ─── Raw executor ────────────────────────────────────────────────────────────

/// Workload backed by a caller-supplied counting loop
pub struct FromFn<F>(F);

/// Wrap a closure that receives the iteration count and runs the loop itself.
///
/// The closure is responsible for forcing its own results.
pub fn from_fn<F>(f: F) -> FromFn<F>
where
    F: FnMut(u64),
{
    FromFn(f)
}

impl<F> Workload for FromFn<F>
where
    F: FnMut(u64),
{
    #[inline]
    fn exec(&mut self, iterations: u64) {
        if iterations > 0 {
            (self.0)(iterations)
        }
    }
}

// ─── Closures ────────────────────────────────────────────────────────────────

/// Workload calling a closure once per iteration
pub struct Iter<F>(F);

/// Call `f` once per iteration, forcing each result.
pub fn iter<T, F>(f: F) -> Iter<F>
where
    F: FnMut() -> T,
{
    Iter(f)
}

impl<T, F> Workload for Iter<F>
where
    F: FnMut() -> T,
{
    #[inline]
    fn exec(&mut self, iterations: u64) {
        for _ in 0..iterations {
            black_box((self.0)());
        }
    }
}

/// Workload applying a pure function to a fixed argument
pub struct Apply<F, A> {
    f: F,
    arg: A,
}

/// Apply `f` to `arg` once per iteration.
///
/// The argument is hidden behind [`black_box`] on every call so the
/// computation cannot be hoisted out of the loop.
pub fn apply<A, T, F>(f: F, arg: A) -> Apply<F, A>
where
    F: Fn(&A) -> T,
{
    Apply { f, arg }
}

impl<A, T, F> Workload for Apply<F, A>
where
    F: Fn(&A) -> T,
{
    #[inline]
    fn exec(&mut self, iterations: u64) {
        for _ in 0..iterations {
            black_box((self.f)(black_box(&self.arg)));
        }
    }
}

/// Workload feeding a fresh input into every call
pub struct IterWithInput<S, R> {
    setup: S,
    routine: R,
}

/// Build a fresh input with `setup` and pass it by value to `routine`,
/// once per iteration.
///
/// For effectful workloads that must not see the same input twice. The cost
/// of `setup` is part of the measurement.
pub fn iter_with_input<I, T, S, R>(setup: S, routine: R) -> IterWithInput<S, R>
where
    S: FnMut() -> I,
    R: FnMut(I) -> T,
{
    IterWithInput { setup, routine }
}

impl<I, T, S, R> Workload for IterWithInput<S, R>
where
    S: FnMut() -> I,
    R: FnMut(I) -> T,
{
    #[inline]
    fn exec(&mut self, iterations: u64) {
        for _ in 0..iterations {
            let input = (self.setup)();
            black_box((self.routine)(input));
        }
    }
}

// ─── Async ───────────────────────────────────────────────────────────────────

/// Workload awaiting a future per iteration on a dedicated runtime
pub struct IterAsync<F> {
    f: F,
    runtime: tokio::runtime::Runtime,
}

/// Await the future returned by `f` to completion once per iteration.
///
/// A current-thread runtime is built up front and reused across trials so
/// its construction cost never lands inside a measurement.
pub fn iter_async<T, Fut, F>(f: F) -> std::io::Result<IterAsync<F>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = T>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(IterAsync { f, runtime })
}

impl<Fut, F> Workload for IterAsync<F>
where
    F: FnMut() -> Fut,
    Fut: Future,
{
    fn exec(&mut self, iterations: u64) {
        for _ in 0..iterations {
            black_box(self.runtime.block_on((self.f)()));
        }
    }
}
