//! The transcript: four demonstrations, always in the same order.

use std::io::{self, Write};

use colored::Colorize;
use log::info;

use crate::config::TourConfig;
use crate::dangling::dangling_read;
use crate::error::TourError;
use crate::field_access::FieldHandle;
use crate::pointer_arith::{compare_layouts, element_at, mixed_layout_report, walk_array, SAMPLE};
use crate::records::{MixedRecord, SealedRecord};
use crate::reinterpret::{byte_view, reinterpret, reinterpret_unchecked};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    BasicConversions,
    PrivateFieldAccess,
    PointerArithmetic,
    DanglingAddress,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::BasicConversions,
        Section::PrivateFieldAccess,
        Section::PointerArithmetic,
        Section::DanglingAddress,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Section::BasicConversions => "Basic Conversions",
            Section::PrivateFieldAccess => "Private Field Access",
            Section::PointerArithmetic => "Pointer Arithmetic",
            Section::DanglingAddress => "uintptr GC Danger",
        }
    }

    pub fn header(self) -> String {
        format!("=== {} ===", self.title())
    }
}

fn to_io(err: TourError) -> io::Error {
    io::Error::other(err)
}

/// Runs every section into `out`.
pub fn run_tour<W: Write>(out: &mut W, config: &TourConfig) -> io::Result<()> {
    for section in Section::ALL {
        run_section(out, section, config)?;
    }
    Ok(())
}

/// Header, body, blank line.
pub fn run_section<W: Write>(out: &mut W, section: Section, config: &TourConfig) -> io::Result<()> {
    info!("running section '{}'", section.title());
    let header = section.header();
    if config.color {
        writeln!(out, "{}", header.bold().cyan())?;
    } else {
        writeln!(out, "{header}")?;
    }

    match section {
        Section::BasicConversions => basic_conversions(out, config)?,
        Section::PrivateFieldAccess => private_field_access(out)?,
        Section::PointerArithmetic => pointer_arithmetic(out)?,
        Section::DanglingAddress => dangling_address(out, config)?,
    }

    writeln!(out)
}

fn basic_conversions<W: Write>(out: &mut W, config: &TourConfig) -> io::Result<()> {
    let i: i64 = 42;
    writeln!(out, "Original i64: {i}")?;
    if config.show_bytes {
        writeln!(out, "Bytes in memory: {:02x?}", byte_view(&i))?;
    }

    let f: f64 = reinterpret(&i).map_err(to_io)?;
    writeln!(out, "As f64: {f:.6} ({f:e})")?;

    let pi: f64 = 3.1415;
    // SAFETY: i64 and f64 are both 8 bytes and any bit pattern is an i64.
    let back: i64 = unsafe { reinterpret_unchecked(&pi) };
    writeln!(out, "Float {pi} as i64: {back}")?;
    if config.show_bytes {
        writeln!(out, "Bytes in memory: {:02x?}", byte_view(&pi))?;
    }
    Ok(())
}

fn private_field_access<W: Write>(out: &mut W) -> io::Result<()> {
    let mut record = MixedRecord::new(100, 200);
    writeln!(
        out,
        "Before: public={}, private={}",
        record.public_field,
        record.private_field()
    )?;

    let private = FieldHandle::<MixedRecord, i64>::resolve("private_field").map_err(to_io)?;
    let info = private.info();
    writeln!(
        out,
        "{}: {}, {} bytes, align {}",
        info.name, info.type_name, info.size, info.align
    )?;
    writeln!(
        out,
        "private_field at base {:#x} + offset {} = {:#x}",
        &record as *const MixedRecord as usize,
        private.offset(),
        private.address(&record)
    )?;
    private.write(&mut record, 300);
    writeln!(
        out,
        "After: public={}, private={}",
        record.public_field,
        record.private_field()
    )?;

    let sealed = SealedRecord::new(42);
    let hidden = FieldHandle::<SealedRecord, i64>::resolve("hidden_field").map_err(to_io)?;
    writeln!(out, "Accessed hidden field: {}", hidden.read(&sealed))
}

fn pointer_arithmetic<W: Write>(out: &mut W) -> io::Result<()> {
    let array = SAMPLE;
    for probe in walk_array(&array) {
        writeln!(
            out,
            "arr[{}] = {} (at {:#x})",
            probe.index, probe.value, probe.address
        )?;
    }

    match element_at(&array, array.len()) {
        Ok(probe) => writeln!(out, "arr[{}] = {}", probe.index, probe.value)?,
        Err(err) => writeln!(out, "Checked read refused: {err}")?,
    }

    writeln!(out, "{}", mixed_layout_report())?;

    let (c_layout, rust_layout) = compare_layouts();
    for layout in [&c_layout, &rust_layout] {
        write!(out, "{layout}")?;
        match layout.validate() {
            Ok(()) => writeln!(out, "  layout check: ok")?,
            Err(err) => writeln!(out, "  layout check: {err}")?,
        }
    }
    Ok(())
}

fn dangling_address<W: Write>(out: &mut W, config: &TourConfig) -> io::Result<()> {
    let outcome = dangling_read(config.churn_rounds);
    writeln!(
        out,
        "Value at dangling address {}: {} (may be garbage)",
        outcome.address, outcome.value
    )?;
    writeln!(
        out,
        "Allocator reused the freed block: {}",
        if outcome.reused { "yes" } else { "no" }
    )?;
    writeln!(
        out,
        "The block was freed, not collected: a usize keeps nothing alive, the result is unpredictable!"
    )
}
