//! Field access by raw offset, ignoring visibility.
//!
//! A [`FieldHandle`] is resolved once from a record's published layout and
//! then reads or writes `base + offset` directly. The compiler's privacy
//! check never sees these accesses; only the layout table does.

use std::fmt;
use std::marker::PhantomData;
use std::mem;

use log::debug;

use crate::error::TourError;
use crate::layout::{FieldInfo, Introspect};

/// Typed offset of a field of type `F` inside record `R`.
pub struct FieldHandle<R, F> {
    info: FieldInfo,
    _marker: PhantomData<fn(&R) -> F>,
}

impl<R: Introspect, F: Copy + 'static> FieldHandle<R, F> {
    /// Looks up `name` in the layout of `R` and checks it can hold an `F`.
    pub fn resolve(name: &str) -> Result<Self, TourError> {
        let layout = R::layout();
        let info = *layout
            .field(name)
            .ok_or_else(|| TourError::unknown_field(R::NAME, name))?;

        if !info.holds::<F>() {
            return Err(TourError::TypeMismatch {
                field: info.name,
                actual: info.type_name,
                requested: std::any::type_name::<F>(),
            });
        }
        if info.offset + mem::size_of::<F>() > layout.size {
            return Err(TourError::FieldOutOfBounds {
                record: R::NAME,
                field: info.name,
                offset: info.offset,
                size: mem::size_of::<F>(),
                record_size: layout.size,
            });
        }
        if info.offset % mem::align_of::<F>() != 0 {
            return Err(TourError::Misaligned {
                field: info.name,
                offset: info.offset,
                align: mem::align_of::<F>(),
            });
        }

        debug!("resolved {}.{} at offset {}", R::NAME, info.name, info.offset);
        Ok(Self {
            info,
            _marker: PhantomData,
        })
    }

    pub fn info(&self) -> &FieldInfo {
        &self.info
    }

    pub fn offset(&self) -> usize {
        self.info.offset
    }

    /// Base address of `record` plus the field offset, as a plain integer.
    pub fn address(&self, record: &R) -> usize {
        record as *const R as usize + self.info.offset
    }

    pub fn read(&self, record: &R) -> F {
        let base = (record as *const R).cast::<u8>();
        // SAFETY: resolve() checked that an aligned F lives at this offset
        // inside R, and Introspect guarantees the table is truthful.
        unsafe { base.add(self.info.offset).cast::<F>().read() }
    }

    pub fn write(&self, record: &mut R, value: F) {
        let base = (record as *mut R).cast::<u8>();
        // SAFETY: as in read(); the exclusive borrow rules out aliasing.
        unsafe { base.add(self.info.offset).cast::<F>().write(value) }
    }
}

impl<R: Introspect, F> fmt::Debug for FieldHandle<R, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldHandle")
            .field("record", &R::NAME)
            .field("field", &self.info.name)
            .field("offset", &self.info.offset)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{MixedRecord, SealedRecord};

    #[test]
    fn test_bypass_write_is_visible_through_getter() {
        let mut record = MixedRecord::new(100, 200);
        let private = FieldHandle::<MixedRecord, i64>::resolve("private_field").unwrap();

        assert_eq!(private.read(&record), 200);
        private.write(&mut record, 300);

        assert_eq!(record.private_field(), 300);
        assert_eq!(record.public_field, 100);
    }

    #[test]
    fn test_public_field_through_handle() {
        let mut record = MixedRecord::new(100, 200);
        let public = FieldHandle::<MixedRecord, i64>::resolve("public_field").unwrap();
        public.write(&mut record, -1);
        assert_eq!(record.public_field, -1);
        assert_eq!(record.private_field(), 200);
    }

    #[test]
    fn test_sealed_record_read() {
        let record = SealedRecord::new(42);
        let hidden = FieldHandle::<SealedRecord, i64>::resolve("hidden_field").unwrap();
        assert_eq!(hidden.read(&record), 42);
        assert_eq!(hidden.address(&record), &record as *const SealedRecord as usize);
    }

    #[test]
    fn test_address_is_base_plus_offset() {
        let record = MixedRecord::new(1, 2);
        let private = FieldHandle::<MixedRecord, i64>::resolve("private_field").unwrap();
        let base = &record as *const MixedRecord as usize;
        assert_eq!(private.address(&record), base + private.offset());
        let public_offset = MixedRecord::layout().field("public_field").unwrap().offset;
        assert_ne!(private.address(&record), base + public_offset);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = FieldHandle::<MixedRecord, i64>::resolve("secret").unwrap_err();
        assert_eq!(err, TourError::unknown_field("MixedRecord", "secret"));
    }

    #[test]
    fn test_wrong_type_rejected() {
        let err = FieldHandle::<MixedRecord, f64>::resolve("private_field").unwrap_err();
        assert!(matches!(
            err,
            TourError::TypeMismatch {
                field: "private_field",
                actual: "i64",
                requested: "f64",
            }
        ));
    }

    #[test]
    fn test_debug_names_record_and_field() {
        let handle = FieldHandle::<SealedRecord, i64>::resolve("hidden_field").unwrap();
        let rendered = format!("{handle:?}");
        assert!(rendered.contains("SealedRecord"));
        assert!(rendered.contains("hidden_field"));
    }
}
