//! Страж скоупа: begin-событие при создании, end-событие ровно один раз
//! при Drop. Перемещение стража владение переносит, так что "moved-from"
//! экземпляров, способных продублировать end, в Rust не существует.

use anyhow::Result;
use std::sync::Arc;

use crate::event::FuncId;
use crate::util::now_nanos;

use super::writer::DetectorWriter;

pub struct ScopeGuard {
    writer: Option<Arc<DetectorWriter>>,
    name: String,
}

impl ScopeGuard {
    /// Эмитит begin и возвращает стража. writer == None даёт инертный страж
    /// (синглтон уже закрыт) — end при Drop тоже не эмитится.
    pub(crate) fn begin(writer: Option<Arc<DetectorWriter>>, name: &str) -> Result<ScopeGuard> {
        if let Some(w) = &writer {
            w.write_str_i64(FuncId::ScopeBegin, name, now_nanos())?;
        }
        Ok(ScopeGuard {
            writer,
            name: name.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        if let Some(w) = &self.writer {
            // сбой эмиттера не должен ронять раскручивающийся стек
            let _ = w.write_str_i64(FuncId::ScopeEnd, &self.name, now_nanos());
        }
    }
}
