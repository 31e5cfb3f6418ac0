//! Records with fields the rest of the crate cannot name.
//!
//! Privacy in Rust stops at the module boundary, so the records live here on
//! their own. Their layout tables are built here too, since `offset_of!`
//! obeys the same privacy rules as field access.

use crate::field_info;
use crate::layout::{FieldInfo, Introspect};

/// One public field and one private field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixedRecord {
    pub public_field: i64,
    private_field: i64,
}

impl MixedRecord {
    pub fn new(public_field: i64, private_field: i64) -> Self {
        Self {
            public_field,
            private_field,
        }
    }

    pub fn private_field(&self) -> i64 {
        self.private_field
    }
}

unsafe impl Introspect for MixedRecord {
    const NAME: &'static str = "MixedRecord";

    fn fields() -> Vec<FieldInfo> {
        vec![
            field_info!(MixedRecord, public_field),
            field_info!(MixedRecord, private_field),
        ]
    }
}

/// Nothing public at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedRecord {
    hidden_field: i64,
}

impl SealedRecord {
    pub fn new(hidden_field: i64) -> Self {
        Self { hidden_field }
    }

    pub fn hidden_field(&self) -> i64 {
        self.hidden_field
    }
}

unsafe impl Introspect for SealedRecord {
    const NAME: &'static str = "SealedRecord";

    fn fields() -> Vec<FieldInfo> {
        vec![field_info!(SealedRecord, hidden_field)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_record_layout() {
        let layout = MixedRecord::layout();
        assert_eq!(layout.fields.len(), 2);
        assert!(layout.validate().is_ok());
        assert_eq!(layout.padding(), 0);

        let private = layout.field("private_field").unwrap();
        assert!(private.holds::<i64>());
        assert_eq!(private.offset, std::mem::offset_of!(MixedRecord, private_field));
    }

    #[test]
    fn test_sealed_record_layout() {
        let layout = SealedRecord::layout();
        assert_eq!(layout.size, std::mem::size_of::<i64>());
        assert_eq!(layout.field("hidden_field").unwrap().offset, 0);
    }
}
