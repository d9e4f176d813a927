//! event/encode — блочные энкодеры payload'ов.
//!
//! Payload записи собирается из блоков, каждый блок выровнен до юнита
//! независимо:
//! - string block: [len u16][bytes][NUL], padded to 4
//! - i32 block:    [value i32]
//! - i64 block:    [value i64]
//!
//! NUL после строки обязателен (читатель другой стороны может смотреть на
//! payload как на C-строку); байты паддинга за NUL не определены.

use anyhow::{anyhow, Result};
use byteorder::{ByteOrder, LittleEndian};

use crate::page::aligned_size;

/// Размер строкового блока. Err — строка не влезает в u16-префикс.
pub fn str_block_len(s: &str) -> Result<usize> {
    if s.len() > u16::MAX as usize {
        return Err(anyhow!(
            "string of {} bytes exceeds the u16 length prefix",
            s.len()
        ));
    }
    Ok(aligned_size(2 + s.len() + 1))
}

#[inline]
pub fn i32_block_len() -> usize {
    aligned_size(4)
}

#[inline]
pub fn i64_block_len() -> usize {
    aligned_size(8)
}

/// Записать строковый блок по смещению `at`; вернуть смещение за блоком.
/// Caller guarantees the destination was sized via `str_block_len`.
pub fn put_str_block(dst: &mut [u8], at: usize, s: &str) -> usize {
    let n = s.len();
    LittleEndian::write_u16(&mut dst[at..at + 2], n as u16);
    dst[at + 2..at + 2 + n].copy_from_slice(s.as_bytes());
    dst[at + 2 + n] = 0;
    at + aligned_size(2 + n + 1)
}

pub fn put_i32_block(dst: &mut [u8], at: usize, v: i32) -> usize {
    LittleEndian::write_i32(&mut dst[at..at + 4], v);
    at + i32_block_len()
}

pub fn put_i64_block(dst: &mut [u8], at: usize, v: i64) -> usize {
    LittleEndian::write_i64(&mut dst[at..at + 8], v);
    at + i64_block_len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn str_block_layout() {
        let mut buf = vec![0xAAu8; 16];
        let end = put_str_block(&mut buf, 0, "abc");
        // [03 00] 'a' 'b' 'c' 00 + padding
        assert_eq!(end, 8);
        assert_eq!(&buf[..6], &[3, 0, b'a', b'b', b'c', 0]);
    }

    #[test]
    fn empty_string_still_carries_nul() {
        let mut buf = vec![0xAAu8; 8];
        let end = put_str_block(&mut buf, 0, "");
        assert_eq!(end, 4);
        assert_eq!(&buf[..3], &[0, 0, 0]);
    }

    #[test]
    fn oversized_string_rejected() {
        let s = "x".repeat(u16::MAX as usize + 1);
        assert!(str_block_len(&s).is_err());
    }
}
