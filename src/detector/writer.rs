//! detector/writer — производитель лога: файл, writer-lock, кольцо и
//! типизированные эмиттеры четырёх форм payload'а.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

use crate::config::DetectorConfig;
use crate::event::encode::{
    i32_block_len, i64_block_len, put_i32_block, put_i64_block, put_str_block, str_block_len,
};
use crate::event::FuncId;
use crate::filemap::FileMap;
use crate::lock::{try_acquire_writer_lock, LockGuard};
use crate::ring::PageWriter;

use super::scope::ScopeGuard;

pub struct DetectorWriter {
    ring: PageWriter,
    fm: FileMap,
    _lock: LockGuard,
}

impl DetectorWriter {
    /// Создать файл кольца (прежний лог перезатирается) и взять
    /// single-writer lock. Второй писатель на том же файле получает ошибку.
    pub fn create(cfg: &DetectorConfig) -> Result<Self> {
        let path = cfg.log_path();
        let lock = try_acquire_writer_lock(&path)
            .with_context(|| format!("another writer holds {}", path.display()))?;
        let fm = FileMap::create_rw(&path)?;
        log::debug!("detector: writer created {}", path.display());
        Ok(Self {
            ring: PageWriter::with_sync_flush(cfg.sync_flush),
            fm,
            _lock: lock,
        })
    }

    pub fn path(&self) -> &Path {
        self.fm.path()
    }

    /// S payload: одна строка.
    pub fn write_str(&self, id: FuncId, s: &str) -> Result<()> {
        let n1 = str_block_len(s)?;
        self.ring.append(&self.fm, id as u16, n1, |p| {
            put_str_block(p, 0, s);
        })
    }

    /// SS payload: две строки подряд, каждая выровнена независимо.
    pub fn write_str2(&self, id: FuncId, a: &str, b: &str) -> Result<()> {
        let n1 = str_block_len(a)?;
        let n2 = str_block_len(b)?;
        self.ring.append(&self.fm, id as u16, n1 + n2, |p| {
            let at = put_str_block(p, 0, a);
            put_str_block(p, at, b);
        })
    }

    /// T payload: одно 32-битное число.
    pub fn write_i32(&self, id: FuncId, v: i32) -> Result<()> {
        self.ring.append(&self.fm, id as u16, i32_block_len(), |p| {
            put_i32_block(p, 0, v);
        })
    }

    /// T payload: одно 64-битное число.
    pub fn write_i64(&self, id: FuncId, v: i64) -> Result<()> {
        self.ring.append(&self.fm, id as u16, i64_block_len(), |p| {
            put_i64_block(p, 0, v);
        })
    }

    /// ST payload: строка + i32.
    pub fn write_str_i32(&self, id: FuncId, s: &str, v: i32) -> Result<()> {
        let n1 = str_block_len(s)?;
        self.ring
            .append(&self.fm, id as u16, n1 + i32_block_len(), |p| {
                let at = put_str_block(p, 0, s);
                put_i32_block(p, at, v);
            })
    }

    /// ST payload: строка + i64.
    pub fn write_str_i64(&self, id: FuncId, s: &str, v: i64) -> Result<()> {
        let n1 = str_block_len(s)?;
        self.ring
            .append(&self.fm, id as u16, n1 + i64_block_len(), |p| {
                let at = put_str_block(p, 0, s);
                put_i64_block(p, at, v);
            })
    }

    /// Открыть именованный scope на этом писателе; конец скоупа уйдёт в лог
    /// при Drop стража.
    pub fn scope(self: &Arc<Self>, name: &str) -> Result<ScopeGuard> {
        ScopeGuard::begin(Some(self.clone()), name)
    }
}
