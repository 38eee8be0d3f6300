//! Rules built out of other rules.
//!
//! - [`Sequence`]: every child must pass (AND), children ordered by dependency
//! - [`Any`]: the first passing child wins (OR), children in the given order
//! - [`Either`]: a primary rule with a single fallback
//!
//! Combinators own their children and are rules themselves, so they nest.

mod any;
mod either;
mod sequence;

pub use any::Any;
pub use either::Either;
pub use sequence::Sequence;

/// Collect dependency names from any iterable of string-like items.
fn collect_names<I, D>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = D>,
    D: Into<String>,
{
    names.into_iter().map(Into::into).collect()
}
