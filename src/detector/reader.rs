//! detector/reader — потребитель лога.

use anyhow::Result;
use std::path::Path;

use crate::config::DetectorConfig;
use crate::event::Event;
use crate::filemap::FileMap;
use crate::ring::{PageReader, ReadResult};

pub struct DetectorReader {
    fm: FileMap,
    ring: PageReader,
}

impl DetectorReader {
    /// Открыть существующий лог. Ok(None) — ни один писатель его ещё не
    /// создавал (клиент может повторить попытку позже).
    pub fn open(cfg: &DetectorConfig) -> Result<Option<Self>> {
        let path = cfg.log_path();
        if !path.exists() {
            return Ok(None);
        }
        let fm = FileMap::open_ro(&path)?;
        Ok(Some(Self {
            fm,
            ring: PageReader::new(),
        }))
    }

    pub fn path(&self) -> &Path {
        self.fm.path()
    }

    /// Страница кольца, на которой стоит читатель.
    pub fn page_no(&self) -> u32 {
        self.ring.page_no()
    }

    /// Доставить не более одной записи в `cb(func_id, payload)`.
    pub fn read_once(&mut self, cb: &mut dyn FnMut(u16, &[u8])) -> Result<ReadResult> {
        self.ring.read_once(&self.fm, cb)
    }

    /// Прочитать и сразу декодировать одну запись.
    pub fn read_event(&mut self) -> Result<(ReadResult, Option<Event>)> {
        let mut decoded = None;
        let mut failed = None;
        let result = self.ring.read_once(&self.fm, &mut |func_id, payload| {
            match Event::decode(func_id, payload) {
                Ok(ev) => decoded = Some(ev),
                Err(e) => failed = Some(e),
            }
        })?;
        if let Some(e) = failed {
            return Err(e);
        }
        Ok((result, decoded))
    }
}
