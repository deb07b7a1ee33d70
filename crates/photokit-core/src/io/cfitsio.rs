//! Header-record access that the safe `fitsio` API does not cover:
//! enumerating every card, `HISTORY` records and full-precision floats.

use std::ffi::CString;
use std::os::raw::{c_char, c_int};
use std::ptr;

use fitsio::{sys, FitsFile};

use crate::consts::{FITS_CARD_SIZE, FITS_FLOAT_DECIMALS};
use crate::error::{PhotoError, Result};

/// Large enough for any keyword, value or comment field plus the nul.
const FIELD_BUF: usize = FITS_CARD_SIZE + 1;

/// One header record split into its fields, value still in card text form.
#[derive(Debug)]
pub(crate) struct RawKeyword {
    pub name: String,
    pub value: String,
    pub comment: String,
}

/// Kind of a card value as classified by cfitsio.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ValueKind {
    Text,
    Logical,
    Integer,
    Float,
    Other,
}

fn c_text(buf: &[c_char]) -> String {
    let bytes: Vec<u8> = buf
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).trim().to_string()
}

fn c_string(text: &str) -> Result<CString> {
    CString::new(text)
        .map_err(|_| PhotoError::InvalidFits(format!("Header text contains a nul byte: {text:?}")))
}

fn check_status(status: c_int) -> Result<()> {
    if status == 0 {
        return Ok(());
    }
    let mut text = [0 as c_char; FIELD_BUF];
    unsafe { sys::ffgerr(status, text.as_mut_ptr()) };
    Err(PhotoError::InvalidFits(format!(
        "cfitsio status {status}: {}",
        c_text(&text)
    )))
}

/// Number of records in the current header, `END` excluded.
pub(crate) fn keyword_count(fptr: &mut FitsFile) -> Result<usize> {
    let mut existing: c_int = 0;
    let mut more: c_int = 0;
    let mut status: c_int = 0;
    unsafe { sys::ffghsp(fptr.as_raw(), &mut existing, &mut more, &mut status) };
    check_status(status)?;
    Ok(existing.max(0) as usize)
}

/// Record `n` (1-based) of the current header.
pub(crate) fn keyword_at(fptr: &mut FitsFile, n: usize) -> Result<RawKeyword> {
    let mut name = [0 as c_char; FIELD_BUF];
    let mut value = [0 as c_char; FIELD_BUF];
    let mut comment = [0 as c_char; FIELD_BUF];
    let mut status: c_int = 0;
    unsafe {
        sys::ffgkyn(
            fptr.as_raw(),
            n as c_int,
            name.as_mut_ptr(),
            value.as_mut_ptr(),
            comment.as_mut_ptr(),
            &mut status,
        )
    };
    check_status(status)?;
    Ok(RawKeyword {
        name: c_text(&name).to_ascii_uppercase(),
        value: c_text(&value),
        comment: c_text(&comment),
    })
}

pub(crate) fn value_kind(value: &str) -> Result<ValueKind> {
    let cval = c_string(value)?;
    let mut dtype: c_char = 0;
    let mut status: c_int = 0;
    unsafe { sys::ffdtyp(cval.as_ptr(), &mut dtype, &mut status) };
    check_status(status)?;
    Ok(match dtype as u8 {
        b'C' => ValueKind::Text,
        b'L' => ValueKind::Logical,
        b'I' => ValueKind::Integer,
        b'F' => ValueKind::Float,
        _ => ValueKind::Other,
    })
}

pub(crate) fn write_history(fptr: &mut FitsFile, text: &str) -> Result<()> {
    let text = c_string(text)?;
    let mut status: c_int = 0;
    unsafe { sys::ffphis(fptr.as_raw(), text.as_ptr(), &mut status) };
    check_status(status)
}

/// `fitsio` writes doubles with nine decimals, too few for Julian dates.
pub(crate) fn write_float(fptr: &mut FitsFile, keyword: &str, value: f64) -> Result<()> {
    let keyword = c_string(keyword)?;
    let mut status: c_int = 0;
    unsafe {
        sys::ffpkyd(
            fptr.as_raw(),
            keyword.as_ptr(),
            value,
            FITS_FLOAT_DECIMALS,
            ptr::null(),
            &mut status,
        )
    };
    check_status(status)
}

pub(crate) fn write_logical(fptr: &mut FitsFile, keyword: &str, value: bool) -> Result<()> {
    let keyword = c_string(keyword)?;
    let mut status: c_int = 0;
    unsafe {
        sys::ffpkyl(
            fptr.as_raw(),
            keyword.as_ptr(),
            c_int::from(value),
            ptr::null(),
            &mut status,
        )
    };
    check_status(status)
}
