use thiserror::Error;

/// Errors raised by the checked helpers.
///
/// The unchecked paths (`reinterpret_unchecked`, `RawAddress::read`) never
/// produce these; they either work or corrupt memory.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TourError {
    #[error("cannot reinterpret {from} ({from_size} bytes) as {to} ({to_size} bytes)")]
    SizeMismatch {
        from: &'static str,
        from_size: usize,
        to: &'static str,
        to_size: usize,
    },

    #[error("record {record} has no field named '{field}'")]
    UnknownField { record: &'static str, field: String },

    #[error("field '{field}' holds {actual}, not {requested}")]
    TypeMismatch {
        field: &'static str,
        actual: &'static str,
        requested: &'static str,
    },

    #[error("field '{field}' at offset {offset} ({size} bytes) overruns {record} ({record_size} bytes)")]
    FieldOutOfBounds {
        record: &'static str,
        field: &'static str,
        offset: usize,
        size: usize,
        record_size: usize,
    },

    #[error("offset {offset} of field '{field}' is not aligned to {align}")]
    Misaligned {
        field: &'static str,
        offset: usize,
        align: usize,
    },

    #[error("fields '{first}' and '{second}' overlap in {record}")]
    Overlap {
        record: &'static str,
        first: &'static str,
        second: &'static str,
    },

    #[error("index {index} is out of bounds for array of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}

impl TourError {
    pub fn size_mismatch<T, U>() -> Self {
        Self::SizeMismatch {
            from: std::any::type_name::<T>(),
            from_size: std::mem::size_of::<T>(),
            to: std::any::type_name::<U>(),
            to_size: std::mem::size_of::<U>(),
        }
    }

    pub fn unknown_field(record: &'static str, field: impl Into<String>) -> Self {
        Self::UnknownField {
            record,
            field: field.into(),
        }
    }
}
