//! ring — producer/consumer половины страничного кольца.
//!
//! 80 страниц по 64 KiB в одном файле; писатель по кругу перезатирает
//! самые старые страницы, читатель догоняет его без единого общего лока.
//! Протокол публикации: payload -> release fence -> watermark в заголовке
//! страницы -> flush view. Читатель никогда не заглядывает за watermark.

pub mod reader;
pub mod writer;

pub use reader::PageReader;
pub use writer::PageWriter;

/// Outcome of a single reader step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadResult {
    /// Одна запись доставлена в callback.
    Read,
    /// Новых данных пока нет; опросить позже.
    NoData,
    /// Писатель завершился штатно (страница со штампом '/').
    WriterExited,
    /// Файл кольца ещё не создан ни одним писателем.
    NotFound,
}
