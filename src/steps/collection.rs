//! Ordered step collection.

use super::PipelineStep;

/// An ordered sequence of steps.
///
/// Every operation returns a new collection; the receiver is never mutated.
/// Ordering operations are stable, so declaration order is the tie-break
/// between steps sharing a priority.
#[derive(Debug, Clone, PartialEq)]
pub struct StepCollection<T> {
    steps: Vec<T>,
}

impl<T> Default for StepCollection<T> {
    fn default() -> Self {
        Self { steps: Vec::new() }
    }
}

impl<T: PipelineStep> StepCollection<T> {
    /// Collection owning `steps` in the given order.
    pub fn new(steps: Vec<T>) -> Self {
        Self { steps }
    }

    /// Collection of copies of `steps`.
    pub fn from_slice(steps: &[T]) -> Self {
        Self::new(steps.to_vec())
    }

    /// Steps for which `predicate` holds, in their current relative order.
    pub fn filter<P>(&self, mut predicate: P) -> Self
    where
        P: FnMut(&T) -> bool,
    {
        Self::new(self.steps.iter().filter(|s| predicate(s)).cloned().collect())
    }

    /// Steps grouped by ascending priority.
    pub fn group_by_priority_ascending(&self) -> Self {
        let mut steps = self.steps.clone();
        steps.sort_by_key(|s| s.meta().priority);
        Self::new(steps)
    }

    /// Steps grouped by descending priority.
    pub fn group_by_priority_descending(&self) -> Self {
        let mut steps = self.steps.clone();
        steps.sort_by_key(|s| std::cmp::Reverse(s.meta().priority));
        Self::new(steps)
    }

    /// Steps eligible in `environment`.
    pub fn for_environment(&self, environment: &str) -> Self {
        self.filter(|s| s.meta().runs_in(environment))
    }

    /// Enabled steps only.
    pub fn enabled(&self) -> Self {
        self.filter(|s| s.meta().enabled)
    }

    /// Number of steps.
    pub fn count(&self) -> usize {
        self.steps.len()
    }

    /// Whether the collection has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Iterate in collection order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.steps.iter()
    }
}

impl<T: PipelineStep> FromIterator<T> for StepCollection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<T> IntoIterator for StepCollection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a StepCollection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
