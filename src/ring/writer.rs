//! ring/writer — producer половина кольца.
//!
//! Потоки одного процесса сериализуются на локальном мьютексе; межпроцессный
//! мьютекс не нужен, т.к. писатель единственный (см. lock.rs). Запись
//! публикуется только перепрошивкой watermark'а в заголовке страницы, после
//! байтов payload'а и release fence. Сорвавшийся на полпути append (паника
//! в fill) не успевает опубликовать заголовок, и частичная запись для
//! читателя не существует.
//!
//! Ротация: страница закрывается штампом '-', следующий слот кольца
//! перезатирается безусловно (старейшие данные теряются молча). В Drop
//! живая страница получает штамп '/' — явный сигнал читателю, что писатель
//! вышел.

use anyhow::{anyhow, Result};
use memmap2::MmapMut;
use std::sync::atomic::{fence, Ordering};
use std::sync::Mutex;

use crate::consts::{
    ACT_CLOSED, ACT_FINAL, ACT_LIVE, LOG_PAGE_COUNT, LOG_PAGE_SIZE, LOG_UNIT_PACKING,
    PAGE_HDR_SIZE, UNIT_HDR_SIZE,
};
use crate::filemap::FileMap;
use crate::metrics::{record_append, record_page_rotation, record_view_flush};
use crate::page::{aligned_size, PageHeader, UnitHeader};

#[derive(Default)]
struct WriterState {
    page: Option<MmapMut>,
    buffer_offset: usize,
    page_no: u32,
    page_id: u32,
}

pub struct PageWriter {
    state: Mutex<WriterState>,
    sync_flush: bool,
}

impl PageWriter {
    pub fn new() -> Self {
        Self::with_sync_flush(false)
    }

    pub fn with_sync_flush(sync_flush: bool) -> Self {
        Self {
            state: Mutex::new(WriterState::default()),
            sync_flush,
        }
    }

    /// Append one record. `fill` получает ровно выровненный payload-срез и
    /// обязан заполнить его целиком; выполняется до перепрошивки заголовка,
    /// так что раскрутка стека не публикует запись.
    pub fn append(
        &self,
        fm: &FileMap,
        func_id: u16,
        payload_len: usize,
        fill: impl FnOnce(&mut [u8]),
    ) -> Result<()> {
        let padded = aligned_size(payload_len);
        let total = UNIT_HDR_SIZE + padded;
        if PAGE_HDR_SIZE + total > LOG_PAGE_SIZE {
            return Err(anyhow!(
                "record payload of {} bytes cannot fit one page",
                payload_len
            ));
        }
        let unit = UnitHeader {
            packing_count: (padded / LOG_UNIT_PACKING) as u16,
            func_id,
        };

        let mut st = self.state.lock().unwrap();
        self.ensure_space(&mut st, fm, total)?;

        {
            let at = st.buffer_offset;
            let page = st
                .page
                .as_mut()
                .ok_or_else(|| anyhow!("no live page after rotation"))?;
            unit.write(page, at);
            fill(&mut page[at + UNIT_HDR_SIZE..at + total]);
        }

        // payload first, then the watermark
        fence(Ordering::Release);
        st.buffer_offset += total;
        self.publish(&mut st, ACT_LIVE)?;
        record_append(total);
        Ok(())
    }

    /// Обеспечить живую страницу с `total` свободными байтами, при
    /// необходимости провернув кольцо.
    fn ensure_space(&self, st: &mut WriterState, fm: &FileMap, total: usize) -> Result<()> {
        if st.page.is_some() && st.buffer_offset + total <= LOG_PAGE_SIZE {
            return Ok(());
        }

        if st.page.is_some() {
            // закрыть страницу, с которой уходим
            self.publish(st, ACT_CLOSED)?;
            st.page = None; // unmap
            st.buffer_offset = 0;
            let wrapped = st.page_no + 1 == LOG_PAGE_COUNT;
            st.page_no = (st.page_no + 1) % LOG_PAGE_COUNT;
            st.page_id = 0;
            record_page_rotation(wrapped);
            log::debug!("ring: rotated to page {}", st.page_no);
        }

        // занять следующий слот, перезатирая что бы там ни лежало
        st.page = Some(fm.map_page_rw(st.page_no)?);
        st.buffer_offset = PAGE_HDR_SIZE;
        self.publish(st, ACT_LIVE) // fresh page: packing_count = 0
    }

    /// Перепрошить заголовок текущей страницы (watermark из buffer_offset)
    /// и сбросить записанный префикс view (msync).
    fn publish(&self, st: &mut WriterState, activity: u8) -> Result<()> {
        let end = st.buffer_offset;
        let hdr = PageHeader {
            activity,
            packing_count: ((end - PAGE_HDR_SIZE) / LOG_UNIT_PACKING) as u16,
            page_id: st.page_id,
        };
        let page = match st.page.as_mut() {
            Some(p) => p,
            None => return Ok(()),
        };
        hdr.write(page);
        if self.sync_flush {
            page.flush_range(0, end)?;
        } else {
            page.flush_async_range(0, end)?;
        }
        record_view_flush();
        Ok(())
    }
}

impl Default for PageWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PageWriter {
    fn drop(&mut self) {
        if let Ok(mut st) = self.state.lock() {
            if st.page.is_some() {
                // финальный штамп: читатель отличит чистый выход от зависания
                let _ = self.publish(&mut st, ACT_FINAL);
                st.page = None;
                log::debug!("ring: writer exited, final stamp on page {}", st.page_no);
            }
        }
    }
}
