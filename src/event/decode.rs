//! event/decode — курсор по payload'у и типизированный разбор событий.
//!
//! Примитивы курсора шагают целыми выровненными блоками, зеркально
//! энкодерам. Строки отдаются заимствованием (без копии); NUL-терминатор
//! проверяется, но в результат не входит.

use anyhow::{anyhow, Result};
use byteorder::{ByteOrder, LittleEndian};
use std::fmt;

use crate::event::{FuncId, Level};
use crate::page::aligned_size;

/// Курсор по payload'у одной записи.
pub struct Payload<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Payload<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn need(&self, n: usize) -> Result<()> {
        if self.pos + n > self.buf.len() {
            return Err(anyhow!(
                "payload truncated: need {} bytes at offset {}, have {}",
                n,
                self.pos,
                self.buf.len() - self.pos
            ));
        }
        Ok(())
    }

    pub fn take_i32(&mut self) -> Result<i32> {
        self.need(i32_aligned())?;
        let v = LittleEndian::read_i32(&self.buf[self.pos..self.pos + 4]);
        self.pos += i32_aligned();
        Ok(v)
    }

    pub fn take_i64(&mut self) -> Result<i64> {
        self.need(i64_aligned())?;
        let v = LittleEndian::read_i64(&self.buf[self.pos..self.pos + 8]);
        self.pos += i64_aligned();
        Ok(v)
    }

    /// Строковый блок: [len u16][bytes][NUL], шаг на выровненный размер.
    pub fn take_str(&mut self) -> Result<&'a str> {
        self.need(2)?;
        let n = LittleEndian::read_u16(&self.buf[self.pos..self.pos + 2]) as usize;
        let block = aligned_size(2 + n + 1);
        self.need(block)?;
        if self.buf[self.pos + 2 + n] != 0 {
            return Err(anyhow!("string block missing NUL terminator"));
        }
        let bytes = &self.buf[self.pos + 2..self.pos + 2 + n];
        let s = std::str::from_utf8(bytes)
            .map_err(|e| anyhow!("string block is not UTF-8: {}", e))?;
        self.pos += block;
        Ok(s)
    }
}

#[inline]
fn i32_aligned() -> usize {
    aligned_size(4)
}

#[inline]
fn i64_aligned() -> usize {
    aligned_size(8)
}

/// Одно декодированное событие кольца.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    ScopeBegin { name: String, at_ns: i64 },
    ScopeEnd { name: String, at_ns: i64 },
    Stamp { name: String, at_ns: i64 },
    Trace { text: String, level: Level },
    Valid { text: String, key: i32 },
    SetValueStr { name: String, value: String },
    SetValueInt { name: String, value: i32 },
    AddValue { name: String, delta: i32 },
}

impl Event {
    /// Разобрать payload записи с данным id юнита.
    pub fn decode(func_id: u16, payload: &[u8]) -> Result<Event> {
        let id = FuncId::from_u16(func_id)
            .ok_or_else(|| anyhow!("unknown event id {}", func_id))?;
        let mut p = Payload::new(payload);
        Ok(match id {
            FuncId::ScopeBegin => Event::ScopeBegin {
                name: p.take_str()?.to_string(),
                at_ns: p.take_i64()?,
            },
            FuncId::ScopeEnd => Event::ScopeEnd {
                name: p.take_str()?.to_string(),
                at_ns: p.take_i64()?,
            },
            FuncId::Stamp => Event::Stamp {
                name: p.take_str()?.to_string(),
                at_ns: p.take_i64()?,
            },
            FuncId::Trace => {
                let text = p.take_str()?.to_string();
                let raw = p.take_i32()?;
                let level = Level::from_i32(raw)
                    .ok_or_else(|| anyhow!("unknown trace level {}", raw))?;
                Event::Trace { text, level }
            }
            FuncId::Valid => Event::Valid {
                text: p.take_str()?.to_string(),
                key: p.take_i32()?,
            },
            FuncId::SetValueStr => Event::SetValueStr {
                name: p.take_str()?.to_string(),
                value: p.take_str()?.to_string(),
            },
            FuncId::SetValueInt => Event::SetValueInt {
                name: p.take_str()?.to_string(),
                value: p.take_i32()?,
            },
            FuncId::AddValue => Event::AddValue {
                name: p.take_str()?.to_string(),
                delta: p.take_i32()?,
            },
        })
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::ScopeBegin { name, at_ns } => write!(f, "[scope>] {} @{}", name, at_ns),
            Event::ScopeEnd { name, at_ns } => write!(f, "[<scope] {} @{}", name, at_ns),
            Event::Stamp { name, at_ns } => write!(f, "[stamp] {} @{}", name, at_ns),
            Event::Trace { text, level } => write!(f, "{} {}", level.prefix(), text),
            Event::Valid { text, key } => write!(f, "<valid:{}> {}", key, text),
            Event::SetValueStr { name, value } => write!(f, "[set] {} = {:?}", name, value),
            Event::SetValueInt { name, value } => write!(f, "[set] {} = {}", name, value),
            Event::AddValue { name, delta } => write!(f, "[add] {} += {}", name, delta),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::encode::{put_i64_block, put_str_block, str_block_len};

    #[test]
    fn cursor_parses_st_payload() {
        let n1 = str_block_len("worker").unwrap();
        let mut buf = vec![0u8; n1 + 8];
        let at = put_str_block(&mut buf, 0, "worker");
        put_i64_block(&mut buf, at, 12345);

        let mut p = Payload::new(&buf);
        assert_eq!(p.take_str().unwrap(), "worker");
        assert_eq!(p.take_i64().unwrap(), 12345);
        assert_eq!(p.remaining(), 0);
    }

    #[test]
    fn cursor_rejects_truncated_payload() {
        let mut buf = vec![0u8; 8];
        LittleEndian::write_u16(&mut buf, 200); // claims 200 bytes of string
        let mut p = Payload::new(&buf);
        assert!(p.take_str().is_err());
    }

    #[test]
    fn decode_rejects_unknown_id() {
        assert!(Event::decode(0, &[]).is_err());
        assert!(Event::decode(99, &[]).is_err());
    }
}
