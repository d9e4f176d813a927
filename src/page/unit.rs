use byteorder::{ByteOrder, LittleEndian};

use crate::consts::{LOG_UNIT_PACKING, UNIT_HDR_SIZE, UNIT_OFF_FUNC, UNIT_OFF_PACKING};

/// Заголовок одной записи (unit): длина payload в юнитах + код события.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitHeader {
    pub packing_count: u16,
    pub func_id: u16,
}

impl UnitHeader {
    /// Прочитать заголовок по смещению `at`. Caller guarantees
    /// `at + UNIT_HDR_SIZE <= buf.len()`.
    pub fn read(buf: &[u8], at: usize) -> UnitHeader {
        UnitHeader {
            packing_count: LittleEndian::read_u16(&buf[at + UNIT_OFF_PACKING..at + UNIT_OFF_PACKING + 2]),
            func_id: LittleEndian::read_u16(&buf[at + UNIT_OFF_FUNC..at + UNIT_OFF_FUNC + 2]),
        }
    }

    pub fn write(&self, buf: &mut [u8], at: usize) {
        LittleEndian::write_u16(
            &mut buf[at + UNIT_OFF_PACKING..at + UNIT_OFF_PACKING + 2],
            self.packing_count,
        );
        LittleEndian::write_u16(&mut buf[at + UNIT_OFF_FUNC..at + UNIT_OFF_FUNC + 2], self.func_id);
    }

    /// Длина payload в байтах (всегда кратна юниту).
    #[inline]
    pub fn payload_len(&self) -> usize {
        self.packing_count as usize * LOG_UNIT_PACKING
    }

    /// Полная длина записи: заголовок + payload.
    #[inline]
    pub fn total_len(&self) -> usize {
        UNIT_HDR_SIZE + self.payload_len()
    }
}
