use anyhow::Result;
use std::path::PathBuf;

use nablog::consts::{ACT_CLOSED, ACT_FINAL, ACT_LIVE, LOG_PAGE_COUNT, LOG_PAGE_SIZE, PAGE_HDR_SIZE};
use nablog::filemap::FileMap;
use nablog::page::PageHeader;

pub fn exec(path: PathBuf) -> Result<()> {
    let fm = FileMap::open_ro(&path)?;
    println!(
        "file: {} ({} pages x {} KiB)",
        path.display(),
        LOG_PAGE_COUNT,
        LOG_PAGE_SIZE / 1024
    );

    let mut live = 0u32;
    let mut closed = 0u32;
    let mut finals = 0u32;
    let mut blank = 0u32;
    let mut used_bytes = 0u64;

    println!("page  act  units  bytes");
    for page_no in 0..LOG_PAGE_COUNT {
        let map = fm.map_page_ro(page_no)?;
        match PageHeader::read(&map) {
            Some(h) => {
                match h.activity {
                    ACT_LIVE => live += 1,
                    ACT_CLOSED => closed += 1,
                    ACT_FINAL => finals += 1,
                    _ => {}
                }
                let bytes = h.data_end() - PAGE_HDR_SIZE;
                used_bytes += bytes as u64;
                println!(
                    "{:>4}  {}    {:>5}  {:>5}",
                    page_no, h.activity as char, h.packing_count, bytes
                );
            }
            None => blank += 1,
        }
    }

    println!(
        "summary: live={} closed={} final={} blank={} used={} bytes",
        live, closed, finals, blank, used_bytes
    );
    Ok(())
}
