// src/driver/interrupt.rs

use crate::common::hal_traits::InterruptLock;

/// Keeps interrupts masked for as long as it lives.
///
/// Created right before the timing critical section; dropping it (including on
/// every `?` early return) restores the previous interrupt state.
#[must_use = "interrupts are restored as soon as the guard is dropped"]
pub struct InterruptGuard<'a, L: InterruptLock> {
    lock: &'a mut L,
}

impl<'a, L: InterruptLock> InterruptGuard<'a, L> {
    pub fn new(lock: &'a mut L) -> Self {
        lock.disable();
        Self { lock }
    }
}

impl<L: InterruptLock> Drop for InterruptGuard<'_, L> {
    fn drop(&mut self) {
        self.lock.restore();
    }
}

/// Lock that does nothing, for hosts where nothing can preempt the read.
#[derive(Debug, Default, Copy, Clone)]
pub struct NoopInterruptLock;

impl InterruptLock for NoopInterruptLock {
    fn disable(&mut self) {}
    fn restore(&mut self) {}
}

/// Lock backed by the global `critical-section` implementation.
#[cfg(feature = "critical-section")]
#[derive(Default)]
pub struct CriticalSectionLock {
    state: Option<critical_section::RestoreState>,
}

#[cfg(feature = "critical-section")]
impl CriticalSectionLock {
    pub const fn new() -> Self {
        Self { state: None }
    }
}

#[cfg(feature = "critical-section")]
impl InterruptLock for CriticalSectionLock {
    fn disable(&mut self) {
        if self.state.is_none() {
            // SAFETY: released exactly once in `restore`, and `InterruptGuard`
            // guarantees the pair is properly nested.
            self.state = Some(unsafe { critical_section::acquire() });
        }
    }

    fn restore(&mut self) {
        if let Some(state) = self.state.take() {
            // SAFETY: `state` came from the matching `acquire` above.
            unsafe { critical_section::release(state) };
        }
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::mocks::MockLock;

    fn early_exit(lock: &mut MockLock, bail: bool) -> Result<(), ()> {
        let _guard = InterruptGuard::new(lock);
        if bail {
            return Err(());
        }
        Ok(())
    }

    #[test]
    fn test_guard_masks_and_restores() {
        let lock = MockLock::new();
        let mut handle = lock.clone();
        {
            let _guard = InterruptGuard::new(&mut handle);
            assert!(lock.is_masked());
        }
        assert!(!lock.is_masked());
        assert_eq!(lock.disables(), 1);
        assert_eq!(lock.restores(), 1);
    }

    #[test]
    fn test_guard_restores_on_early_return() {
        let lock = MockLock::new();
        let mut handle = lock.clone();
        assert!(early_exit(&mut handle, true).is_err());
        assert!(!lock.is_masked());
        assert!(early_exit(&mut handle, false).is_ok());
        assert_eq!(lock.disables(), 2);
        assert_eq!(lock.restores(), 2);
    }

    #[test]
    fn test_noop_lock() {
        let mut lock = NoopInterruptLock;
        let _guard = InterruptGuard::new(&mut lock);
    }

    #[cfg(feature = "critical-section")]
    #[test]
    fn test_critical_section_lock_pairs() {
        let mut lock = CriticalSectionLock::new();
        {
            let _guard = InterruptGuard::new(&mut lock);
        }
        assert!(lock.state.is_none());
        // a second round must acquire again
        {
            let _guard = InterruptGuard::new(&mut lock);
        }
        assert!(lock.state.is_none());
    }
}
