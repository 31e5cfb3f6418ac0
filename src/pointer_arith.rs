//! Manual pointer arithmetic over arrays, and the layout of a mixed record.

use std::fmt;
use std::mem;

use log::trace;

use crate::error::TourError;
use crate::field_info;
use crate::layout::{FieldInfo, Introspect, RecordLayout};

pub const SAMPLE: [i64; 3] = [10, 20, 30];

/// One element read back through a computed address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementProbe<T> {
    pub index: usize,
    pub address: usize,
    pub value: T,
}

/// `base + index * size_of::<T>()` as an integer.
pub fn element_address<T>(base: *const T, index: usize) -> usize {
    base as usize + index * mem::size_of::<T>()
}

/// # Safety
///
/// `index` must be in bounds of the allocation `base` points into.
unsafe fn read_element<T: Copy>(base: *const T, index: usize) -> ElementProbe<T> {
    let element = base
        .cast::<u8>()
        .add(index * mem::size_of::<T>())
        .cast::<T>();
    ElementProbe {
        index,
        address: element as usize,
        value: element.read(),
    }
}

/// Reads every element of `array` via byte offsets from its base pointer.
pub fn walk_array<T: Copy, const N: usize>(array: &[T; N]) -> Vec<ElementProbe<T>> {
    let base = array.as_ptr();
    (0..N)
        .map(|index| {
            // SAFETY: index < N.
            let probe = unsafe { read_element(base, index) };
            trace!("element {} at {:#x}", probe.index, probe.address);
            probe
        })
        .collect()
}

/// Same arithmetic as [`walk_array`] for one index, with a bounds check.
pub fn element_at<T: Copy>(items: &[T], index: usize) -> Result<ElementProbe<T>, TourError> {
    if index >= items.len() {
        return Err(TourError::IndexOutOfBounds {
            index,
            len: items.len(),
        });
    }
    // SAFETY: bounds checked above.
    Ok(unsafe { read_element(items.as_ptr(), index) })
}

/// Byte, wide integer, float, in that declared order with C layout.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
pub struct MixedFields {
    a: u8,
    b: i64,
    c: f64,
}

unsafe impl Introspect for MixedFields {
    const NAME: &'static str = "MixedFields";

    fn fields() -> Vec<FieldInfo> {
        vec![
            field_info!(MixedFields, a),
            field_info!(MixedFields, b),
            field_info!(MixedFields, c),
        ]
    }
}

/// The same fields with the default representation. The compiler may
/// reorder them.
#[derive(Debug, Default, Clone, Copy)]
pub struct RustOrderFields {
    a: u8,
    b: i64,
    c: f64,
}

unsafe impl Introspect for RustOrderFields {
    const NAME: &'static str = "RustOrderFields";

    fn fields() -> Vec<FieldInfo> {
        vec![
            field_info!(RustOrderFields, a),
            field_info!(RustOrderFields, b),
            field_info!(RustOrderFields, c),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MixedLayoutReport {
    pub size: usize,
    pub align_b: usize,
    pub offset_c: usize,
}

impl fmt::Display for MixedLayoutReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Size: {}, Align(b): {}, Offset(c): {}",
            self.size, self.align_b, self.offset_c
        )
    }
}

pub fn mixed_layout_report() -> MixedLayoutReport {
    let record = MixedFields::default();
    MixedLayoutReport {
        size: mem::size_of_val(&record),
        align_b: mem::align_of_val(&record.b),
        offset_c: mem::offset_of!(MixedFields, c),
    }
}

/// Layouts of the C-ordered and compiler-ordered records, in that order.
pub fn compare_layouts() -> (RecordLayout, RecordLayout) {
    (MixedFields::layout(), RustOrderFields::layout())
}
