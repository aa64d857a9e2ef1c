/// Restores a snapshot of `target` when dropped, unless committed.
///
/// Covers both a failed persistence step and a caller that drops the
/// operation's future half way.
pub(crate) struct Rollback<'a, T> {
    target: &'a mut T,
    snapshot: Option<T>,
}

impl<'a, T: Clone> Rollback<'a, T> {
    /// Snapshot `target`, then apply `change` to it.
    pub fn apply<R>(
        target: &'a mut T,
        change: impl FnOnce(&mut T) -> R,
    ) -> (Self, R) {
        let snapshot = Some(target.clone());
        let result = change(&mut *target);
        (Self { target, snapshot }, result)
    }

    pub fn current(&self) -> &T {
        &*self.target
    }

    pub fn commit(mut self) {
        self.snapshot = None;
    }
}

impl<T> Drop for Rollback<'_, T> {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            *self.target = snapshot;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropped_without_commit_restores() {
        let mut value = vec![1, 2];
        let (guard, _) = Rollback::apply(&mut value, |v| v.push(3));
        assert_eq!(guard.current(), &vec![1, 2, 3]);
        drop(guard);
        assert_eq!(value, vec![1, 2]);
    }

    #[test]
    fn commit_keeps_change() {
        let mut value = vec![1, 2];
        let (guard, popped) = Rollback::apply(&mut value, |v| v.pop());
        guard.commit();
        assert_eq!(popped, Some(2));
        assert_eq!(value, vec![1]);
    }
}
