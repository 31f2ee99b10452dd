//! Integration tests for kernel-dispatch records
//!
//! Builds invocation records the way a queue front-end would - buffers
//! flattened into accessor arguments, a launch shape, scalars - and checks
//! what a backend sees across the dispatcher boundary.

use prism_core::{
    DispatchRecord, Dispatcher, KernelArg, KernelId, Scalar, Storage,
};
use prism_shape::{Coord, Extent, LaunchShape};

/// Test double standing in for a backend executor.
#[derive(Default)]
struct RecordingDispatcher {
    submitted: Vec<(String, Option<LaunchShape>, Vec<(usize, String)>)>,
}

impl Dispatcher for RecordingDispatcher {
    fn submit(&mut self, record: &DispatchRecord) -> prism_core::Result<()> {
        self.submitted.push((
            record.kernel().as_str().to_string(),
            record.launch_shape().copied(),
            record
                .args()
                .map(|(i, a)| (i, a.kind().to_string()))
                .collect(),
        ));
        Ok(())
    }
}

#[test]
fn test_argument_accumulation_is_order_independent() -> prism_core::Result<()> {
    prism_tracing::init_for_tests();

    let mut record = DispatchRecord::new(KernelId::new("gather")?);
    record.set_arg(2, 111u64); // x
    record.set_arg(0, 222u64); // y
    record.set_arg(1, 333u64); // z

    let bound: Vec<(usize, u64)> = record
        .args()
        .map(|(i, a)| match a {
            KernelArg::Scalar(Scalar::U64(v)) => (i, *v),
            other => panic!("unexpected argument {other:?}"),
        })
        .collect();
    assert_eq!(bound, vec![(0, 222), (1, 333), (2, 111)]);
    Ok(())
}

#[test]
fn test_full_invocation_crosses_the_boundary() -> prism_core::Result<()> {
    let mut input: Storage<f32> = Storage::new(Extent::d1(256))?;
    let output: Storage<f32> = Storage::new(Extent::d1(256))?;
    input.copy_from_slice(&vec![0.25f32; 256])?;

    let mut record = DispatchRecord::new(KernelId::new("saxpy")?);
    record.record_launch_shape(LaunchShape::Range {
        global: input.extent(),
    })?;
    record.set_arg(0, input.flatten()?.erase());
    record.set_arg(1, output.flatten()?.erase());
    record.set_arg(2, 2.0f32);

    let mut backend = RecordingDispatcher::default();
    backend.submit(&record)?;

    let (kernel, shape, args) = &backend.submitted[0];
    assert_eq!(kernel, "saxpy");
    assert_eq!(
        shape,
        &Some(LaunchShape::Range {
            global: Extent::d1(256)
        })
    );
    assert_eq!(
        args,
        &vec![
            (0, "view".to_string()),
            (1, "view".to_string()),
            (2, "scalar".to_string())
        ]
    );
    Ok(())
}

#[test]
fn test_view_arguments_reference_live_buffers() -> prism_core::Result<()> {
    let mut buffer: Storage<i32> = Storage::new(Extent::d2(2, 4))?;
    buffer.copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8])?;

    let mut record = DispatchRecord::new(KernelId::new("transpose")?);
    record.set_arg(0, buffer.flatten()?.erase());

    // The backend side reconstitutes the typed accessor and reads the
    // same elements the host sees.
    let Some(KernelArg::View(raw)) = record.arg(0) else {
        panic!("argument 0 must be a view");
    };
    assert_eq!(raw.elem_size(), 4);
    assert_eq!(raw.region(), Extent::d2(2, 4));

    let acc: prism_core::DeviceView<'_, i32> = unsafe { raw.assume_typed() };
    assert_eq!(acc.get_coord(Coord::d2(1, 3))?, 8);
    assert_eq!(acc.get_coord(Coord::d2(0, 0))?, *buffer.get(0)?);
    Ok(())
}

#[test]
fn test_each_launch_form_is_recordable() -> prism_core::Result<()> {
    let shapes = [
        LaunchShape::SingleTask,
        LaunchShape::Range {
            global: Extent::d2(8, 8),
        },
        LaunchShape::RangeWithOffset {
            global: Extent::d1(64),
            offset: Coord::d1(16),
        },
        LaunchShape::NdRange {
            global: Extent::d2(64, 64),
            local: Extent::d2(8, 8),
        },
        LaunchShape::WorkGroups {
            count: Extent::d1(12),
            size: None,
        },
        LaunchShape::WorkGroups {
            count: Extent::d1(12),
            size: Some(Extent::d1(32)),
        },
    ];

    for shape in shapes {
        let mut record = DispatchRecord::new(KernelId::new("probe")?);
        record.record_launch_shape(shape)?;
        assert_eq!(record.launch_shape(), Some(&shape));
    }
    Ok(())
}

#[test]
fn test_resubmission_pattern_overwrites_stale_arguments() -> prism_core::Result<()> {
    let mut record = DispatchRecord::new(KernelId::new("reduce")?);
    record.set_args([10i32, 20, 30]);

    // Rebinding one index for resubmission reports the stale value.
    let previous = record.set_arg(1, 99i32);
    assert!(matches!(
        previous,
        Some(KernelArg::Scalar(Scalar::I32(20)))
    ));

    let bound: Vec<i32> = record
        .args()
        .map(|(_, a)| match a {
            KernelArg::Scalar(Scalar::I32(v)) => *v,
            other => panic!("unexpected argument {other:?}"),
        })
        .collect();
    assert_eq!(bound, vec![10, 99, 30]);
    Ok(())
}

#[test]
fn test_bytes_arguments_pass_through_opaque() -> prism_core::Result<()> {
    let mut record = DispatchRecord::new(KernelId::new("custom")?);
    record.set_arg(0, vec![0xde, 0xad, 0xbe, 0xef]);

    match record.arg(0) {
        Some(KernelArg::Bytes(b)) => assert_eq!(b, &vec![0xde, 0xad, 0xbe, 0xef]),
        other => panic!("expected bytes argument, got {other:?}"),
    }
    Ok(())
}
