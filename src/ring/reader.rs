//! ring/reader — consumer половина кольца.
//!
//! Читатель никогда не пишет. Единственный источник правды — watermark в
//! заголовке страницы: байты за ним невидимы, а заголовок busy-страницы
//! перечитывается только после исчерпания ранее увиденного диапазона.
//! Недописанные записи писателя поэтому не наблюдаемы.
//!
//! Отличия от «наивного» прохода по кольцу:
//! - предыдущая страница размапливается при усыновлении новой;
//! - терминальная страница ('/') запоминается: после осушения читатель
//!   возвращает WriterExited, а не щупает кольцо дальше;
//! - заголовок или запись, вылезающие за границы страницы, трактуются как
//!   порча и превращаются в ошибку.

use anyhow::{anyhow, Result};
use memmap2::Mmap;
use std::sync::atomic::{fence, Ordering};

use crate::consts::{LOG_PAGE_COUNT, LOG_PAGE_SIZE, PAGE_HDR_SIZE, UNIT_HDR_SIZE};
use crate::filemap::FileMap;
use crate::metrics::{record_empty_poll, record_header_resample, record_read};
use crate::page::{PageHeader, UnitHeader};

use super::ReadResult;

#[derive(Default)]
pub struct PageReader {
    page: Option<Mmap>,
    buffer_offset: usize,
    page_no: u32,
    page_id: u32,
    page_busy: bool,
    page_final: bool,
    page_size: usize,
}

impl PageReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Текущая позиция в кольце.
    pub fn page_no(&self) -> u32 {
        self.page_no
    }

    /// Зарезервированный монотонный id усыновлённой страницы (пока всегда 0).
    pub fn page_id(&self) -> u32 {
        self.page_id
    }

    /// Доставить не более одной записи в `cb(func_id, payload)`.
    pub fn read_once(&mut self, fm: &FileMap, cb: &mut dyn FnMut(u16, &[u8])) -> Result<ReadResult> {
        if self.page.is_none() {
            // первое усыновление: остаёмся на текущем слоте
            if !self.load_page(fm)? {
                record_empty_poll();
                return Ok(ReadResult::NoData);
            }
        } else if self.buffer_offset == self.page_size {
            if self.page_busy {
                // страница могла дорасти; перечитать её заголовок
                record_header_resample();
                let hdr = self.sample_header()?;
                self.page_busy = hdr.is_live();
                self.page_final = hdr.is_final();
                self.page_size = Self::checked_data_end(&hdr, self.page_no)?;
                if self.page_final {
                    return Ok(ReadResult::WriterExited);
                }
                if self.buffer_offset == self.page_size {
                    record_empty_poll();
                    return Ok(ReadResult::NoData);
                }
            } else if self.page_final {
                // терминальная страница осушена; писателя больше нет
                return Ok(ReadResult::WriterExited);
            } else {
                // закрытая страница исчерпана: шаг по кольцу
                let prev = self.page_no;
                self.page_no = (self.page_no + 1) % LOG_PAGE_COUNT;
                if !self.load_page(fm)? {
                    self.page_no = prev;
                    record_empty_poll();
                    return Ok(ReadResult::NoData);
                }
            }
        }

        if self.buffer_offset >= self.page_size {
            // свежеусыновлённая страница, в которой ещё ничего не опубликовано
            record_empty_poll();
            return Ok(ReadResult::NoData);
        }
        self.read_record(cb)
    }

    /// Замапить страницу на текущей позиции и усыновить её, если она
    /// инициализирована. false — слот ещё не писался в этом цикле кольца.
    fn load_page(&mut self, fm: &FileMap) -> Result<bool> {
        let map = fm.map_page_ro(self.page_no)?;
        match PageHeader::read(&map) {
            Some(hdr) => {
                fence(Ordering::Acquire); // header before payload
                self.buffer_offset = PAGE_HDR_SIZE;
                self.page_id = hdr.page_id;
                self.page_busy = hdr.is_live();
                self.page_final = hdr.is_final();
                self.page_size = Self::checked_data_end(&hdr, self.page_no)?;
                self.page = Some(map); // предыдущее отображение освобождается здесь
                log::debug!(
                    "ring: reader adopted page {} ({} units, busy={})",
                    self.page_no,
                    hdr.packing_count,
                    self.page_busy
                );
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn sample_header(&self) -> Result<PageHeader> {
        let page = self
            .page
            .as_ref()
            .ok_or_else(|| anyhow!("no adopted page to resample"))?;
        let hdr = PageHeader::read(page)
            .ok_or_else(|| anyhow!("page {} header vanished while busy", self.page_no))?;
        fence(Ordering::Acquire);
        Ok(hdr)
    }

    fn checked_data_end(hdr: &PageHeader, page_no: u32) -> Result<usize> {
        let end = hdr.data_end();
        if end > LOG_PAGE_SIZE {
            return Err(anyhow!(
                "page {} watermark overruns the page ({} bytes)",
                page_no,
                end
            ));
        }
        Ok(end)
    }

    fn read_record(&mut self, cb: &mut dyn FnMut(u16, &[u8])) -> Result<ReadResult> {
        let page = self
            .page
            .as_ref()
            .ok_or_else(|| anyhow!("no adopted page to read"))?;
        let at = self.buffer_offset;
        if at + UNIT_HDR_SIZE > self.page_size {
            return Err(anyhow!(
                "unit header overruns page {} at offset {}",
                self.page_no,
                at
            ));
        }
        let unit = UnitHeader::read(page, at);
        let total = unit.total_len();
        if at + total > self.page_size {
            return Err(anyhow!(
                "record overruns page {} (offset {}, len {})",
                self.page_no,
                at,
                total
            ));
        }
        cb(unit.func_id, &page[at + UNIT_HDR_SIZE..at + total]);
        self.buffer_offset = at + total;
        record_read();
        Ok(ReadResult::Read)
    }
}
