//! Общие константы формата (file geometry, page/unit headers, sentinels).

// -------- File geometry --------
pub const LOG_FILE: &str = "nabang.blog";
pub const LOG_FILE_SIZE: u64 = 4096 * 256 * 5; // 5 MiB
pub const LOG_PAGE_SIZE: usize = 4096 * 16; // 64 KiB
pub const LOG_PAGE_COUNT: u32 = (LOG_FILE_SIZE / LOG_PAGE_SIZE as u64) as u32; // 80

/// Все длины записей и учёт занятости страницы считаются в юнитах по 4 байта.
pub const LOG_UNIT_PACKING: usize = 4;

// -------- Page header --------
// Layout (LE):
// [code u8]           -- '#' for an initialized page; any other byte = slot
//                        never written in this ring cycle
// [activity u8]       -- '+' writer is appending, '-' writer moved on,
//                        '/' writer exited cleanly
// [packing_count u16] -- 4-byte units occupied by records (header excluded);
//                        the published watermark readers trust
// [page_id u32]       -- reserved monotonic id (always 0 for now)
pub const PAGE_HDR_SIZE: usize = 8;
pub const PAGE_OFF_CODE: usize = 0;
pub const PAGE_OFF_ACTIVITY: usize = 1;
pub const PAGE_OFF_PACKING: usize = 2;
pub const PAGE_OFF_PAGE_ID: usize = 4;

pub const PAGE_CODE: u8 = b'#';
pub const ACT_LIVE: u8 = b'+';
pub const ACT_CLOSED: u8 = b'-';
pub const ACT_FINAL: u8 = b'/';

// -------- Unit header --------
// Layout (LE):
// [packing_count u16] -- payload length of this record in 4-byte units
// [func_id u16]       -- event kind (see event::FuncId)
pub const UNIT_HDR_SIZE: usize = 4;
pub const UNIT_OFF_PACKING: usize = 0;
pub const UNIT_OFF_FUNC: usize = 2;
