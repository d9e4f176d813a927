//! nablog — shared-memory telemetry ring.
//!
//! Один процесс-писатель отображает фиксированный 5 MiB файл как кольцо из
//! 80 страниц по 64 KiB и пишет туда типизированные события наблюдаемости
//! (scope enter/leave, отметки времени, key/value, трассы, валидационные
//! чекпоинты). Отдельно запущенный процесс-читатель отображает тот же файл
//! и осушает события почти в реальном времени. Межпроцессных локов нет:
//! протокол публикации построен на watermark'е в заголовке страницы.

// Базовые модули
pub mod config;
pub mod consts;
pub mod lock;
pub mod metrics;
pub mod util;

// Транспорт
pub mod filemap;
pub mod page;
pub mod ring;

// События и публичный фасад
pub mod detector;
pub mod event;

// Удобные реэкспорты
pub use config::DetectorConfig;
pub use detector::{DetectorReader, DetectorWriter, ScopeGuard};
pub use event::{Event, FuncId, Level};
pub use ring::ReadResult;
