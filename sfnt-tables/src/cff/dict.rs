//! CFF DICT data.
//!
//! A DICT is a sequence of operands, each run terminated by an operator.
//! See <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf#page=9>

use sfnt_data::{ReadError, ReadableData, WritableData, WriteError};

use super::index::IndexElement;
use crate::table::SerializedSize;

/// Operator values, with two-byte operators as `0x0c00 | second byte`.
pub mod operators {
    pub const VERSION: u16 = 0;
    pub const NOTICE: u16 = 1;
    pub const FULL_NAME: u16 = 2;
    pub const FAMILY_NAME: u16 = 3;
    pub const WEIGHT: u16 = 4;
    pub const FONT_BBOX: u16 = 5;
    pub const UNIQUE_ID: u16 = 13;
    pub const XUID: u16 = 14;
    pub const CHARSET: u16 = 15;
    pub const ENCODING: u16 = 16;
    pub const CHAR_STRINGS: u16 = 17;
    pub const PRIVATE: u16 = 18;
    pub const SUBRS: u16 = 19;
    pub const COPYRIGHT: u16 = 0x0c00;
    pub const IS_FIXED_PITCH: u16 = 0x0c01;
    pub const ITALIC_ANGLE: u16 = 0x0c02;
    pub const UNDERLINE_POSITION: u16 = 0x0c03;
    pub const UNDERLINE_THICKNESS: u16 = 0x0c04;
    pub const FONT_MATRIX: u16 = 0x0c07;
    pub const FD_ARRAY: u16 = 0x0c24;
    pub const FD_SELECT: u16 = 0x0c25;
}

const ESCAPE: u8 = 12;
const SHORT_INT: u8 = 28;
const LONG_INT: u8 = 29;
const REAL: u8 = 30;
const REAL_END: u8 = 0xf;
/// An operand written with the fixed-width five byte encoding.
const LONG_INT_LEN: usize = 5;

/// A DICT operand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operand {
    Integer(i32),
    /// A real number, as its packed nibbles including the end nibble.
    Real(Vec<u8>),
    /// An offset to another structure, always written as a five byte
    /// integer so that its width does not depend on its value.
    ///
    /// `None` means the target has not been placed yet.
    Offset(Option<u32>),
}

impl Operand {
    /// Encode a real number.
    ///
    /// Returns `None` for values that are not finite.
    pub fn real(value: f64) -> Option<Operand> {
        if !value.is_finite() {
            return None;
        }
        let text = format!("{value}");
        let mut nibbles = Vec::with_capacity(text.len() + 1);
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            let nibble = match c {
                '0'..='9' => c as u8 - b'0',
                '.' => 0xa,
                'e' | 'E' if chars.peek() == Some(&'-') => {
                    chars.next();
                    0xc
                }
                'e' | 'E' => 0xb,
                '-' => 0xe,
                _ => continue,
            };
            nibbles.push(nibble);
        }
        nibbles.push(REAL_END);
        if nibbles.len() % 2 == 1 {
            nibbles.push(REAL_END);
        }
        Some(Operand::Real(
            nibbles
                .chunks(2)
                .map(|pair| (pair[0] << 4) | pair[1])
                .collect(),
        ))
    }

    /// The numeric value of an integer or real operand.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Operand::Integer(value) => Some(*value as f64),
            Operand::Real(bytes) => {
                let mut text = String::new();
                for nibble in bytes.iter().flat_map(|b| [b >> 4, b & 0xf]) {
                    match nibble {
                        0..=9 => text.push((b'0' + nibble) as char),
                        0xa => text.push('.'),
                        0xb => text.push('E'),
                        0xc => text.push_str("E-"),
                        0xe => text.push('-'),
                        0xf => break,
                        _ => return None,
                    }
                }
                text.parse().ok()
            }
            Operand::Offset(_) => None,
        }
    }

    fn encoded_len(&self) -> usize {
        match self {
            Operand::Integer(value) => match value {
                -107..=107 => 1,
                -1131..=1131 => 2,
                -32768..=32767 => 3,
                _ => LONG_INT_LEN,
            },
            Operand::Real(bytes) => 1 + bytes.len(),
            Operand::Offset(_) => LONG_INT_LEN,
        }
    }

    fn encode(&self, out: &mut Vec<u8>) {
        match self {
            Operand::Integer(value) => encode_int(*value, out),
            Operand::Real(bytes) => {
                out.push(REAL);
                out.extend_from_slice(bytes);
            }
            Operand::Offset(offset) => {
                out.push(LONG_INT);
                out.extend_from_slice(&offset.unwrap_or(0).to_be_bytes());
            }
        }
    }
}

fn encode_int(value: i32, out: &mut Vec<u8>) {
    match value {
        -107..=107 => out.push((value + 139) as u8),
        108..=1131 => {
            let v = value - 108;
            out.extend([(v >> 8) as u8 + 247, v as u8]);
        }
        -1131..=-108 => {
            let v = -value - 108;
            out.extend([(v >> 8) as u8 + 251, v as u8]);
        }
        -32768..=32767 => {
            out.push(SHORT_INT);
            out.extend_from_slice(&(value as i16).to_be_bytes());
        }
        _ => {
            out.push(LONG_INT);
            out.extend_from_slice(&value.to_be_bytes());
        }
    }
}

/// An operator and its operands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DictEntry {
    pub operator: u16,
    pub operands: Vec<Operand>,
}

/// A parsed, editable DICT.
///
/// A dict that has not been modified is written back exactly as it was
/// read, whatever encodings its operands used.
#[derive(Clone, Debug, Default)]
pub struct CffDict {
    source: ReadableData,
    entries: Vec<DictEntry>,
    dirty: bool,
}

impl CffDict {
    /// An empty dict.
    pub fn new() -> Self {
        CffDict {
            dirty: true,
            ..Default::default()
        }
    }

    pub fn read(data: ReadableData) -> Result<Self, ReadError> {
        let bytes = data.as_bytes();
        let mut entries = Vec::new();
        let mut operands = Vec::new();
        let mut pos = 0;
        let byte_at = |pos: usize| bytes.get(pos).copied().ok_or(ReadError::OutOfBounds);
        while pos < bytes.len() {
            let b0 = bytes[pos];
            pos += 1;
            match b0 {
                0..=21 => {
                    let operator = if b0 == ESCAPE {
                        pos += 1;
                        0x0c00 | byte_at(pos - 1)? as u16
                    } else {
                        b0 as u16
                    };
                    entries.push(DictEntry {
                        operator,
                        operands: std::mem::take(&mut operands),
                    });
                }
                SHORT_INT => {
                    let value = i16::from_be_bytes([byte_at(pos)?, byte_at(pos + 1)?]);
                    operands.push(Operand::Integer(value as i32));
                    pos += 2;
                }
                LONG_INT => {
                    let value = data.read_at::<i32>(pos)?;
                    operands.push(Operand::Integer(value));
                    pos += 4;
                }
                REAL => {
                    let start = pos;
                    loop {
                        let b = byte_at(pos)?;
                        pos += 1;
                        if b >> 4 == REAL_END || b & 0xf == REAL_END {
                            break;
                        }
                    }
                    operands.push(Operand::Real(bytes[start..pos].to_vec()));
                }
                32..=246 => operands.push(Operand::Integer(b0 as i32 - 139)),
                247..=250 => {
                    let b1 = byte_at(pos)? as i32;
                    operands.push(Operand::Integer((b0 as i32 - 247) * 256 + b1 + 108));
                    pos += 1;
                }
                251..=254 => {
                    let b1 = byte_at(pos)? as i32;
                    operands.push(Operand::Integer(-(b0 as i32 - 251) * 256 - b1 - 108));
                    pos += 1;
                }
                _ => return Err(ReadError::MalformedData("reserved byte in DICT")),
            }
        }
        if !operands.is_empty() {
            return Err(ReadError::MalformedData("DICT operands without an operator"));
        }
        Ok(CffDict {
            source: data,
            entries,
            dirty: false,
        })
    }

    pub fn entries(&self) -> &[DictEntry] {
        &self.entries
    }

    /// The operands of the first entry with this operator.
    pub fn get(&self, operator: u16) -> Option<&[Operand]> {
        self.entries
            .iter()
            .find(|entry| entry.operator == operator)
            .map(|entry| entry.operands.as_slice())
    }

    /// The value of an operator with a single integer operand.
    pub fn integer(&self, operator: u16) -> Option<i32> {
        match self.get(operator)? {
            [Operand::Integer(value)] => Some(*value),
            _ => None,
        }
    }

    /// Set the operands of an operator, replacing any existing entry.
    ///
    /// New operators are added at the end.
    pub fn set(&mut self, operator: u16, operands: Vec<Operand>) {
        self.dirty = true;
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.operator == operator)
        {
            Some(entry) => entry.operands = operands,
            None => self.entries.push(DictEntry { operator, operands }),
        }
    }

    /// Remove an operator, returning its operands.
    pub fn remove(&mut self, operator: u16) -> Option<Vec<Operand>> {
        let pos = self
            .entries
            .iter()
            .position(|entry| entry.operator == operator)?;
        self.dirty = true;
        Some(self.entries.remove(pos).operands)
    }

    /// Mark the last operand of `operator` as an offset that will be
    /// resolved later, adding the operator if it is missing.
    pub fn set_pending_offset(&mut self, operator: u16) {
        self.dirty = true;
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.operator == operator)
        {
            Some(entry) => match entry.operands.last_mut() {
                Some(last) => *last = Operand::Offset(None),
                None => entry.operands.push(Operand::Offset(None)),
            },
            None => self.entries.push(DictEntry {
                operator,
                operands: vec![Operand::Offset(None)],
            }),
        }
    }

    /// Give a value to the pending offset of `operator`.
    ///
    /// Returns `false` if the operator has no offset operand.
    pub fn resolve_offset(&mut self, operator: u16, offset: u32) -> bool {
        let target = self
            .entries
            .iter_mut()
            .filter(|entry| entry.operator == operator)
            .flat_map(|entry| entry.operands.iter_mut())
            .find(|operand| matches!(operand, Operand::Offset(_)));
        match target {
            Some(operand) => {
                *operand = Operand::Offset(Some(offset));
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    /// `true` if any offset operand has not been resolved.
    pub fn has_pending_offsets(&self) -> bool {
        self.entries
            .iter()
            .flat_map(|entry| &entry.operands)
            .any(|operand| *operand == Operand::Offset(None))
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn encoded_len(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| {
                let op_len = if entry.operator >> 8 == ESCAPE as u16 { 2 } else { 1 };
                entry.operands.iter().map(Operand::encoded_len).sum::<usize>() + op_len
            })
            .sum()
    }

    /// Encode the current entries.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        for entry in &self.entries {
            entry.operands.iter().for_each(|operand| operand.encode(&mut out));
            if entry.operator >> 8 == ESCAPE as u16 {
                out.extend([ESCAPE, entry.operator as u8]);
            } else {
                out.push(entry.operator as u8);
            }
        }
        out
    }
}

impl IndexElement for CffDict {
    fn from_data(data: ReadableData) -> Result<Self, ReadError> {
        CffDict::read(data)
    }

    fn size(&self) -> SerializedSize {
        if !self.dirty {
            return SerializedSize::exact(self.source.len());
        }
        let len = self.encoded_len();
        if self.has_pending_offsets() {
            SerializedSize::provisional(len)
        } else {
            SerializedSize::exact(len)
        }
    }

    fn serialize(&self, data: &mut WritableData) -> Result<usize, WriteError> {
        if !self.dirty {
            return self.source.copy_to(data);
        }
        if self.has_pending_offsets() {
            log::debug!("writing DICT with unresolved offsets");
        }
        data.write_bytes(0, &self.encode())
    }
}
