//! Spin lock guarding per-node statistics.
//!
//! Critical sections on tree nodes are a handful of loads and stores, so a
//! spinning lock beats parking the thread.

use std::{
    hint::spin_loop,
    sync::atomic::{AtomicBool, Ordering},
};

use lock_api::{GuardSend, RawMutex};

/// Spins this many times before yielding the time slice.
const SPINS_BEFORE_YIELD: u32 = 1_000;

/// Raw test-and-test-and-set lock with bounded exponential backoff.
#[repr(align(64))]
pub struct RawSpinLock {
    locked: AtomicBool,
}

/// Mutex over `T` backed by [`RawSpinLock`].
pub type SpinMutex<T> = lock_api::Mutex<RawSpinLock, T>;

/// Guard returned by [`SpinMutex::lock`].
pub type SpinMutexGuard<'a, T> = lock_api::MutexGuard<'a, RawSpinLock, T>;

unsafe impl RawMutex for RawSpinLock {
    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: Self = RawSpinLock {
        locked: AtomicBool::new(false),
    };

    type GuardMarker = GuardSend;

    #[inline]
    fn lock(&self) {
        if !self.try_lock() {
            self.lock_contended();
        }
    }

    #[inline]
    fn try_lock(&self) -> bool {
        self.locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    #[inline]
    unsafe fn unlock(&self) {
        self.locked.store(false, Ordering::Release);
    }

    #[inline]
    fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }
}

impl RawSpinLock {
    #[cold]
    fn lock_contended(&self) {
        let mut spins: u32 = 0;
        let mut backoff: u32 = 0;

        loop {
            while self.locked.load(Ordering::Relaxed) {
                spin_loop();
                spins += 1;
                if spins >= SPINS_BEFORE_YIELD {
                    std::thread::yield_now();
                    spins = 0;
                    backoff = 0;
                }
            }

            if self
                .locked
                .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
                .is_ok()
            {
                return;
            }

            for _ in 0..(1u32 << backoff) {
                spin_loop();
            }
            backoff = (backoff + 1).min(6);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn test_try_lock() {
        let mutex = SpinMutex::new(0u32);
        let guard = mutex.lock();
        assert!(mutex.is_locked());
        assert!(mutex.try_lock().is_none());
        drop(guard);
        assert!(mutex.try_lock().is_some());
    }

    #[test]
    fn test_concurrent_increments() {
        let counter = Arc::new(SpinMutex::new(0u64));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let counter = Arc::clone(&counter);
                thread::spawn(move || {
                    for _ in 0..10_000 {
                        *counter.lock() += 1;
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(*counter.lock(), 40_000);
    }
}
