//! Layout introspection.
//!
//! Every number here comes from `size_of`, `align_of` and `offset_of!`.
//! Nothing is hardcoded, because field order and padding belong to the
//! compiler and the target, not to the source code.

use std::any::TypeId;
use std::fmt;
use std::mem;

use crate::error::TourError;

/// Position and shape of one field inside a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    pub name: &'static str,
    pub offset: usize,
    pub size: usize,
    pub align: usize,
    pub type_name: &'static str,
    pub type_id: TypeId,
}

impl FieldInfo {
    /// Builds the info from the field's offset and a projection closure.
    ///
    /// The closure is never called; it only lets the compiler infer the
    /// field's type so size and alignment cannot drift from the declaration.
    /// Use [`field_info!`](crate::field_info) rather than calling this directly.
    pub fn of<R, T: 'static>(
        name: &'static str,
        offset: usize,
        _project: impl for<'a> Fn(&'a R) -> &'a T,
    ) -> Self {
        Self {
            name,
            offset,
            size: mem::size_of::<T>(),
            align: mem::align_of::<T>(),
            type_name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
        }
    }

    pub fn end(&self) -> usize {
        self.offset + self.size
    }

    pub fn holds<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

/// Describes `$record.$field` using `offset_of!`.
///
/// Must be expanded where the field is visible, i.e. inside the module that
/// owns the record.
#[macro_export]
macro_rules! field_info {
    ($record:ty, $field:ident) => {
        $crate::layout::FieldInfo::of(
            stringify!($field),
            ::core::mem::offset_of!($record, $field),
            |record: &$record| &record.$field,
        )
    };
}

/// Records that publish their own field table.
///
/// # Safety
///
/// `fields()` must list real fields of `Self` with their true offsets and
/// types. Code such as [`FieldHandle`](crate::field_access::FieldHandle)
/// reads and writes memory on the strength of this table. Building the table
/// with [`field_info!`](crate::field_info) upholds this.
pub unsafe trait Introspect: Sized {
    const NAME: &'static str;

    fn fields() -> Vec<FieldInfo>;

    fn layout() -> RecordLayout {
        RecordLayout::of::<Self>()
    }
}

/// Size, alignment and field table of a record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLayout {
    pub name: &'static str,
    pub size: usize,
    pub align: usize,
    pub fields: Vec<FieldInfo>,
}

impl RecordLayout {
    pub fn of<R: Introspect>() -> Self {
        Self {
            name: R::NAME,
            size: mem::size_of::<R>(),
            align: mem::align_of::<R>(),
            fields: R::fields(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Fields in memory order, which need not match declaration order.
    pub fn fields_by_offset(&self) -> Vec<&FieldInfo> {
        let mut fields: Vec<&FieldInfo> = self.fields.iter().collect();
        fields.sort_by_key(|field| field.offset);
        fields
    }

    /// Bytes of the record not covered by any field.
    pub fn padding(&self) -> usize {
        let used: usize = self.fields.iter().map(|field| field.size).sum();
        self.size.saturating_sub(used)
    }

    /// Checks that the field table describes a well-formed record.
    pub fn validate(&self) -> Result<(), TourError> {
        for field in &self.fields {
            if field.end() > self.size {
                return Err(TourError::FieldOutOfBounds {
                    record: self.name,
                    field: field.name,
                    offset: field.offset,
                    size: field.size,
                    record_size: self.size,
                });
            }
            if field.offset % field.align != 0 {
                return Err(TourError::Misaligned {
                    field: field.name,
                    offset: field.offset,
                    align: field.align,
                });
            }
        }

        let ordered = self.fields_by_offset();
        for pair in ordered.windows(2) {
            if pair[0].end() > pair[1].offset {
                return Err(TourError::Overlap {
                    record: self.name,
                    first: pair[0].name,
                    second: pair[1].name,
                });
            }
        }

        if self.size % self.align != 0 {
            return Err(TourError::Misaligned {
                field: self.name,
                offset: self.size,
                align: self.align,
            });
        }

        Ok(())
    }
}

impl fmt::Display for RecordLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: size {}, align {}, padding {}",
            self.name,
            self.size,
            self.align,
            self.padding()
        )?;
        for field in self.fields_by_offset() {
            writeln!(
                f,
                "  +{:<3} {:<14} {:<4} size {}, align {}",
                field.offset, field.name, field.type_name, field.size, field.align
            )?;
        }
        Ok(())
    }
}
