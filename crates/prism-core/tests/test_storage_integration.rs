//! Integration tests for the buffer storage core
//!
//! Exercises the allocation path, external-pointer wrapping, deep-copy
//! independence, and the late-rebind surface end to end.

use prism_core::{Allocation, Error, Ownership, Rebind, Storage};
use prism_shape::Extent;
use std::sync::Arc;

#[test]
fn test_alloc_write_read_then_wrap_same_memory() -> prism_core::Result<()> {
    prism_tracing::init_for_tests();

    // Allocator path: 5 f64 elements, write index 3.
    let mut owned: Storage<f64> = Storage::new(Extent::d1(5))?;
    *owned.get_mut(3)? = 9.5;
    assert_eq!(*owned.get(3)?, 9.5);

    // External-pointer path over the same memory: no copy occurred.
    let wrapped: Storage<f64> = unsafe { Storage::from_raw(owned.as_ptr(), Extent::d1(5)) };
    assert_eq!(*wrapped.get(3)?, 9.5);
    assert_eq!(wrapped.as_ptr(), owned.as_ptr());
    assert_eq!(wrapped.ownership(), Ownership::Borrowed);

    Ok(())
}

#[test]
fn test_size_and_count_follow_extent() -> prism_core::Result<()> {
    for extent in [Extent::d1(7), Extent::d2(3, 9), Extent::d3(2, 3, 4)] {
        let s: Storage<i32> = Storage::new(extent)?;
        assert_eq!(s.count(), extent.count());
        assert_eq!(s.size_bytes(), std::mem::size_of::<i32>() * extent.count());
    }
    Ok(())
}

#[test]
fn test_deep_copy_independence() -> prism_core::Result<()> {
    let mut original: Storage<i32> = Storage::new(Extent::d1(8))?;
    original.copy_from_slice(&[10, 20, 30, 40, 50, 60, 70, 80])?;

    let mut copy = original.try_clone()?;
    assert!(copy.as_ptr() != original.as_ptr());

    // Write distinct patterns on both sides.
    for i in 0..8 {
        *original.get_mut(i)? = -(i as i32);
        *copy.get_mut(i)? = 1000 + i as i32;
    }

    // No cross-contamination in either direction.
    for i in 0..8 {
        assert_eq!(*original.get(i)?, -(i as i32));
        assert_eq!(*copy.get(i)?, 1000 + i as i32);
    }
    Ok(())
}

#[test]
fn test_copy_preserves_contents_bitwise() -> prism_core::Result<()> {
    let mut original: Storage<f32> = Storage::new(Extent::d2(2, 3))?;
    original.copy_from_slice(&[0.5, -1.5, 2.5, -3.5, 4.5, -5.5])?;

    let copy = original.try_clone()?;
    assert_eq!(copy.to_vec()?, original.to_vec()?);
    assert_eq!(copy.extent(), original.extent());
    Ok(())
}

#[test]
fn test_rebind_with_live_weak_reference_changes_pointer() -> prism_core::Result<()> {
    let mut s: Storage<i32> = Storage::new(Extent::d1(4))?;
    let before = s.as_ptr();

    let shared = Arc::new(Allocation::from_slice(s.allocator(), &[4, 3, 2, 1])?);
    let outcome = s.rebind_shared(&Arc::downgrade(&shared))?;

    assert_eq!(outcome, Rebind::Rebound);
    assert!(s.as_ptr() != before);
    assert_eq!(s.as_ptr(), shared.as_ptr());
    assert_eq!(s.to_vec()?, vec![4, 3, 2, 1]);
    Ok(())
}

#[test]
fn test_rebind_with_expired_weak_reference_is_reported_no_op() -> prism_core::Result<()> {
    let mut s: Storage<i32> = Storage::new(Extent::d1(4))?;

    // Construct a shared allocation, then drop every strong reference.
    let shared = Arc::new(Allocation::new(s.allocator(), 4)?);
    let weak = Arc::downgrade(&shared);
    drop(shared);

    let before = s.as_ptr();
    let outcome = s.rebind_shared(&weak)?;

    assert_eq!(outcome, Rebind::Expired);
    assert_eq!(s.as_ptr(), before);
    assert_eq!(s.ownership(), Ownership::Owned);
    Ok(())
}

#[test]
fn test_detach_discards_target() -> prism_core::Result<()> {
    let mut s: Storage<u8> = Storage::new(Extent::d1(16))?;
    s.detach();

    assert_eq!(s.ownership(), Ownership::Detached);
    assert!(matches!(s.get(0), Err(Error::Detached)));
    assert!(matches!(s.flatten(), Err(Error::Detached)));
    Ok(())
}

#[test]
fn test_rebind_raw_redirects_writes_to_caller_memory() -> prism_core::Result<()> {
    let mut landing = vec![0.0f64; 6];
    let mut s: Storage<f64> = Storage::new(Extent::d1(6))?;

    unsafe { s.rebind_raw(landing.as_mut_ptr()) };
    for i in 0..6 {
        *s.get_mut(i)? = i as f64 * 1.5;
    }
    drop(s);

    // Finalized data landed in the caller's memory, which was never freed.
    assert_eq!(landing, vec![0.0, 1.5, 3.0, 4.5, 6.0, 7.5]);
    Ok(())
}

#[test]
fn test_wrapped_storage_shares_without_copy() -> prism_core::Result<()> {
    let mut host = vec![1i64, 2, 3, 4];
    let wrapped: Storage<i64> = unsafe { Storage::from_raw(host.as_mut_ptr(), Extent::d1(4)) };

    // Writes through the wrapper are visible in the host vector.
    let acc = wrapped.flatten()?;
    acc.write_linear(2, 33)?;
    drop(acc);
    drop(wrapped);
    assert_eq!(host, vec![1, 2, 33, 4]);
    Ok(())
}
