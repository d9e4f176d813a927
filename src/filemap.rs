//! FileMap — файл кольца и его постраничные shared-отображения.
//!
//! Writer mode создаёт/обрезает файл ровно до LOG_FILE_SIZE (прежнее кольцо
//! перезатирается), reader mode открывает read-only. Обе стороны работают
//! не с целым файлом, а с view на одну страницу: MAP_SHARED отображения
//! одного inode когерентны между процессами, поэтому читатель видит
//! публикации писателя без дополнительных примитивов.

use anyhow::{anyhow, Context, Result};
use memmap2::{Mmap, MmapMut, MmapOptions};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::consts::{LOG_FILE_SIZE, LOG_PAGE_COUNT, LOG_PAGE_SIZE};

#[derive(Debug)]
pub struct FileMap {
    file: File,
    path: PathBuf,
    writable: bool,
}

impl FileMap {
    /// Writer mode: создать файл кольца нужного размера (существующий —
    /// перезаписать).
    pub fn create_rw(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("create log file {}", path.display()))?;
        file.set_len(LOG_FILE_SIZE)
            .with_context(|| format!("size log file {} to {}", path.display(), LOG_FILE_SIZE))?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
            writable: true,
        })
    }

    /// Reader mode: открыть существующий файл read-only.
    pub fn open_ro(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .open(path)
            .with_context(|| format!("open log file {}", path.display()))?;
        let len = file
            .metadata()
            .with_context(|| format!("stat log file {}", path.display()))?
            .len();
        if len < LOG_FILE_SIZE {
            return Err(anyhow!(
                "log file {} has size {} (expected {})",
                path.display(),
                len,
                LOG_FILE_SIZE
            ));
        }
        Ok(Self {
            file,
            path: path.to_path_buf(),
            writable: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_writable(&self) -> bool {
        self.writable
    }

    fn page_offset(&self, page_no: u32) -> Result<u64> {
        if page_no >= LOG_PAGE_COUNT {
            return Err(anyhow!(
                "page {} out of ring (0..{})",
                page_no,
                LOG_PAGE_COUNT
            ));
        }
        Ok(page_no as u64 * LOG_PAGE_SIZE as u64)
    }

    /// Shared read/write view на одну страницу.
    pub fn map_page_rw(&self, page_no: u32) -> Result<MmapMut> {
        if !self.writable {
            return Err(anyhow!("read-only map of {}", self.path.display()));
        }
        let off = self.page_offset(page_no)?;
        let map = unsafe {
            MmapOptions::new()
                .offset(off)
                .len(LOG_PAGE_SIZE)
                .map_mut(&self.file)
        }
        .with_context(|| format!("map page {} rw of {}", page_no, self.path.display()))?;
        Ok(map)
    }

    /// Shared read-only view на одну страницу.
    pub fn map_page_ro(&self, page_no: u32) -> Result<Mmap> {
        let off = self.page_offset(page_no)?;
        let map = unsafe {
            MmapOptions::new()
                .offset(off)
                .len(LOG_PAGE_SIZE)
                .map(&self.file)
        }
        .with_context(|| format!("map page {} ro of {}", page_no, self.path.display()))?;
        Ok(map)
    }
}
