//! Multi-threaded tests for the interruptible mutex.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use sync::{InterruptFlag, Interrupted, Mutex, NeverInterrupted};

#[test]
fn test_concurrent_increments_are_serialized() {
    let lock = Mutex::new(0usize);

    thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..1000 {
                    let mut guard = lock.lock_interruptible(&NeverInterrupted).unwrap();
                    *guard += 1;
                }
            });
        }
    });

    assert_eq!(lock.into_inner(), 4000);
}

#[test]
fn test_waiter_aborts_when_interrupted() {
    let lock = Mutex::new(0u32);
    let flag = InterruptFlag::new();
    let holding = AtomicBool::new(false);
    let release = AtomicBool::new(false);

    thread::scope(|s| {
        s.spawn(|| {
            let mut guard = lock.lock();
            holding.store(true, Ordering::Release);
            while !release.load(Ordering::Acquire) {
                std::hint::spin_loop();
            }
            *guard = 1;
        });

        while !holding.load(Ordering::Acquire) {
            std::hint::spin_loop();
        }

        let waiter = s.spawn(|| lock.lock_interruptible(&flag).map(|_| ()));
        flag.raise();
        assert_eq!(waiter.join().unwrap(), Err(Interrupted));

        release.store(true, Ordering::Release);
    });

    // The interrupted waiter never touched the data.
    assert_eq!(lock.into_inner(), 1);
}

#[test]
fn test_cleared_flag_allows_retry() {
    let lock = Mutex::new(());
    let flag = InterruptFlag::new();

    let held = lock.lock();
    flag.raise();
    assert!(lock.lock_interruptible(&flag).is_err());
    drop(held);

    flag.clear();
    assert!(lock.lock_interruptible(&flag).is_ok());
}
