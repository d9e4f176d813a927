use byteorder::{ByteOrder, LittleEndian};

use crate::consts::{
    ACT_FINAL, ACT_LIVE, LOG_UNIT_PACKING, PAGE_CODE, PAGE_HDR_SIZE, PAGE_OFF_ACTIVITY,
    PAGE_OFF_CODE, PAGE_OFF_PACKING, PAGE_OFF_PAGE_ID,
};

/// Заголовок страницы. Поле `code` не хранится: его наличие ('#') и есть
/// признак инициализированной страницы.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageHeader {
    pub activity: u8,
    pub packing_count: u16,
    pub page_id: u32,
}

impl PageHeader {
    /// Прочитать заголовок. None — слот ещё не был записан в этом цикле
    /// кольца (чужой/нулевой байт вместо '#'); это штатная ситуация.
    pub fn read(page: &[u8]) -> Option<PageHeader> {
        if page.len() < PAGE_HDR_SIZE || page[PAGE_OFF_CODE] != PAGE_CODE {
            return None;
        }
        Some(PageHeader {
            activity: page[PAGE_OFF_ACTIVITY],
            packing_count: LittleEndian::read_u16(&page[PAGE_OFF_PACKING..PAGE_OFF_PACKING + 2]),
            page_id: LittleEndian::read_u32(&page[PAGE_OFF_PAGE_ID..PAGE_OFF_PAGE_ID + 4]),
        })
    }

    /// Записать заголовок вместе с кодом '#'.
    pub fn write(&self, page: &mut [u8]) {
        page[PAGE_OFF_CODE] = PAGE_CODE;
        page[PAGE_OFF_ACTIVITY] = self.activity;
        LittleEndian::write_u16(
            &mut page[PAGE_OFF_PACKING..PAGE_OFF_PACKING + 2],
            self.packing_count,
        );
        LittleEndian::write_u32(
            &mut page[PAGE_OFF_PAGE_ID..PAGE_OFF_PAGE_ID + 4],
            self.page_id,
        );
    }

    /// Конец опубликованных данных внутри страницы (байтовое смещение).
    #[inline]
    pub fn data_end(&self) -> usize {
        PAGE_HDR_SIZE + self.packing_count as usize * LOG_UNIT_PACKING
    }

    #[inline]
    pub fn is_live(&self) -> bool {
        self.activity == ACT_LIVE
    }

    #[inline]
    pub fn is_final(&self) -> bool {
        self.activity == ACT_FINAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{ACT_CLOSED, LOG_PAGE_SIZE};

    #[test]
    fn header_round_trip() {
        let mut page = vec![0u8; LOG_PAGE_SIZE];
        let h0 = PageHeader {
            activity: ACT_CLOSED,
            packing_count: 123,
            page_id: 0,
        };
        h0.write(&mut page);

        let h1 = PageHeader::read(&page).expect("page must be initialized");
        assert_eq!(h1, h0);
        assert_eq!(h1.data_end(), PAGE_HDR_SIZE + 123 * 4);
    }

    #[test]
    fn foreign_bytes_read_as_uninitialized() {
        let page = vec![0u8; LOG_PAGE_SIZE];
        assert!(PageHeader::read(&page).is_none());

        let mut stale = vec![0xFFu8; LOG_PAGE_SIZE];
        stale[0] = b'?';
        assert!(PageHeader::read(&stale).is_none());
    }
}
