//! Thrift Compact Protocol decoder.
//!
//! Operates directly on a borrowed byte slice so slice-mode decoding never
//! copies: every "give me the raw range of this struct" query is just a
//! skip-walk that returns the offsets it stopped at.

use crate::error::{Error, Result};
use crate::thrift::ttype::TType;

/// A field header: the field id and the value's Thrift type.
#[derive(Debug, Clone, Copy)]
pub struct FieldHeader {
    pub id: i16,
    pub ttype: TType,
}

/// A cursor over a borrowed Thrift Compact Protocol byte buffer.
pub struct Decoder<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(buf: &'a [u8], pos: usize) -> Self {
        Self { buf, pos }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    fn require(&self, n: usize) -> Result<()> {
        if self.remaining() < n {
            return Err(Error::Truncated {
                offset: self.pos,
                needed: n - self.remaining(),
            });
        }
        Ok(())
    }

    pub fn read_byte(&mut self) -> Result<u8> {
        self.require(1)?;
        let b = self.buf[self.pos];
        self.pos += 1;
        Ok(b)
    }

    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8]> {
        self.require(len)?;
        let s = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(s)
    }

    /// Unsigned LEB128 varint, up to 10 bytes (enough for a 64-bit value).
    pub fn read_varint_u64(&mut self) -> Result<u64> {
        let mut result: u64 = 0;
        let mut shift = 0;
        for _ in 0..10 {
            let b = self.read_byte()?;
            result |= u64::from(b & 0x7F) << shift;
            if b & 0x80 == 0 {
                return Ok(result);
            }
            shift += 7;
        }
        Err(Error::InvalidVarint(self.pos))
    }

    pub fn read_zigzag_i64(&mut self) -> Result<i64> {
        let n = self.read_varint_u64()?;
        Ok(((n >> 1) as i64) ^ -((n & 1) as i64))
    }

    pub fn read_zigzag_i32(&mut self) -> Result<i32> {
        Ok(self.read_zigzag_i64()? as i32)
    }

    pub fn read_zigzag_i16(&mut self) -> Result<i16> {
        Ok(self.read_zigzag_i64()? as i16)
    }

    pub fn read_double(&mut self) -> Result<f64> {
        let bytes = self.read_slice(8)?;
        let mut arr = [0u8; 8];
        arr.copy_from_slice(bytes);
        Ok(f64::from_le_bytes(arr))
    }

    pub fn read_binary(&mut self) -> Result<&'a [u8]> {
        let len = self.read_varint_u64()? as usize;
        self.read_slice(len)
    }

    pub fn read_string(&mut self) -> Result<&'a str> {
        let bytes = self.read_binary()?;
        std::str::from_utf8(bytes)
            .map_err(|e| Error::MalformedParquet(format!("invalid UTF-8 in string field: {e}")))
    }

    /// Reads the next field header, returning `None` on STOP.
    pub fn read_field_header(&mut self, last_field_id: &mut i16) -> Result<Option<FieldHeader>> {
        let header = self.read_byte()?;
        let type_nibble = header & 0x0F;
        if type_nibble == 0 {
            return Ok(None);
        }
        let delta = (header & 0xF0) >> 4;
        let id = if delta == 0 {
            self.read_zigzag_i16()?
        } else {
            *last_field_id + i16::from(delta)
        };
        let ttype = decode_field_ttype(type_nibble)?;
        *last_field_id = id;
        Ok(Some(FieldHeader { id, ttype }))
    }

    /// Reads a list or set header, returning `(size, element_type)`.
    pub fn read_list_header(&mut self) -> Result<(usize, TType)> {
        let header = self.read_byte()?;
        let size_nibble = (header & 0xF0) >> 4;
        let elem_type = decode_container_ttype(header & 0x0F)?;
        let size = if size_nibble == 0x0F {
            self.read_varint_u64()? as usize
        } else {
            size_nibble as usize
        };
        Ok((size, elem_type))
    }

    /// Reads a map header, returning `(size, key_type, value_type)`. Compact
    /// protocol writes a bare `0x00` for an empty map (no type byte).
    pub fn read_map_header(&mut self) -> Result<(usize, TType, TType)> {
        let size = self.read_varint_u64()? as usize;
        if size == 0 {
            return Ok((0, TType::Stop, TType::Stop));
        }
        let types = self.read_byte()?;
        let key_type = decode_container_ttype((types & 0xF0) >> 4)?;
        let value_type = decode_container_ttype(types & 0x0F)?;
        Ok((size, key_type, value_type))
    }

    /// Advances past a value of the given type without materializing it.
    pub fn skip(&mut self, ttype: TType) -> Result<()> {
        match ttype {
            TType::Stop | TType::BooleanTrue | TType::BooleanFalse => {}
            TType::Byte => {
                self.read_byte()?;
            }
            TType::I16 | TType::I32 | TType::I64 => {
                self.read_varint_u64()?;
            }
            TType::Double => {
                self.read_slice(8)?;
            }
            TType::Binary => {
                self.read_binary()?;
            }
            TType::Struct => self.skip_struct()?,
            TType::List | TType::Set => {
                let (size, elem_type) = self.read_list_header()?;
                for _ in 0..size {
                    self.skip_container_element(elem_type)?;
                }
            }
            TType::Map => {
                let (size, key_type, value_type) = self.read_map_header()?;
                for _ in 0..size {
                    self.skip_container_element(key_type)?;
                    self.skip_container_element(value_type)?;
                }
            }
        }
        Ok(())
    }

    /// Bools inside containers are not folded into a header nibble like
    /// struct fields — they're a standalone byte.
    fn skip_container_element(&mut self, ttype: TType) -> Result<()> {
        if ttype.is_bool() {
            self.read_byte()?;
            Ok(())
        } else {
            self.skip(ttype)
        }
    }

    /// Skips an entire struct (sequence of fields terminated by STOP).
    pub fn skip_struct(&mut self) -> Result<()> {
        let mut last_field_id = 0i16;
        while let Some(field) = self.read_field_header(&mut last_field_id)? {
            self.skip(field.ttype)?;
        }
        Ok(())
    }

    /// Skips a struct starting at `start` and returns the exclusive end
    /// offset (just past its STOP byte) — the struct's raw byte range is
    /// `[start, end)`.
    pub fn struct_range(&mut self, start: usize) -> Result<usize> {
        self.seek(start);
        self.skip_struct()?;
        Ok(self.position())
    }
}

fn decode_field_ttype(nibble: u8) -> Result<TType> {
    TType::from_u8(nibble)
        .filter(|t| !matches!(t, TType::Stop))
        .ok_or_else(|| Error::MalformedParquet(format!("unknown field type tag {nibble:#x}")))
}

fn decode_container_ttype(nibble: u8) -> Result<TType> {
    // In container headers, type id 1 (BOOLEAN_TRUE) is the generic "bool"
    // marker; id 2 never appears here.
    TType::from_u8(nibble)
        .ok_or_else(|| Error::MalformedParquet(format!("unknown element type tag {nibble:#x}")))
}
