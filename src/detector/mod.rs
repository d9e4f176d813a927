//! detector — публичная поверхность телеметрии.
//!
//! Процесс держит не более одного writer-синглтона (производитель лога) и
//! одного reader-синглтона (потребитель); оба создаются лениво при первом
//! обращении. Конфигурация берётся из `init()` или, если он не вызывался,
//! из окружения. `shutdown()` закрывает писателя явно — так сохраняется
//! финальный штамп '/' на текущей странице; эмиссия после shutdown
//! превращается в no-op.
//!
//! Для нескольких независимых логов (и для тестов) используйте
//! `DetectorWriter`/`DetectorReader` напрямую: синглтоны — только сахар
//! для обычного случая "один процесс, один лог".

pub mod client;
pub mod reader;
pub mod scope;
pub mod valid;
pub mod writer;

pub use client::{kill_client, run_client, ClientMode};
pub use reader::DetectorReader;
pub use scope::ScopeGuard;
pub use writer::DetectorWriter;

use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use crate::config::DetectorConfig;
use crate::event::{FuncId, Level};
use crate::ring::ReadResult;
use crate::util::now_nanos;

static CONFIG: OnceLock<DetectorConfig> = OnceLock::new();
static WRITER: Mutex<Option<Arc<DetectorWriter>>> = Mutex::new(None);
static WRITER_CLOSED: AtomicBool = AtomicBool::new(false);
static READER: Mutex<Option<DetectorReader>> = Mutex::new(None);

/// Зафиксировать конфигурацию синглтонов. Первый вызов побеждает; без
/// вызова используется окружение (NB_*).
pub fn init(cfg: DetectorConfig) {
    let _ = CONFIG.set(cfg);
}

fn config() -> &'static DetectorConfig {
    CONFIG.get_or_init(DetectorConfig::from_env)
}

/// Writer-синглтон: лениво создать, если ещё не закрыт.
pub(crate) fn writer_handle() -> Result<Option<Arc<DetectorWriter>>> {
    if WRITER_CLOSED.load(Ordering::Acquire) {
        return Ok(None);
    }
    let mut guard = WRITER.lock().unwrap();
    if guard.is_none() {
        *guard = Some(Arc::new(DetectorWriter::create(config())?));
    }
    Ok(guard.clone())
}

/// Закрыть writer-синглтон. Текущая страница получает штамп '/', все
/// последующие эмиссии — no-op. Стражи скоупов, пережившие shutdown,
/// дошлют end только пока живы их Arc-копии писателя.
pub fn shutdown() {
    WRITER_CLOSED.store(true, Ordering::Release);
    let writer = WRITER.lock().unwrap().take();
    drop(writer);
}

/// Точечная отметка: Stamp(name, now).
pub fn stamp(name: &str) -> Result<()> {
    if let Some(w) = writer_handle()? {
        w.write_str_i64(FuncId::Stamp, name, now_nanos())?;
    }
    Ok(())
}

/// Открыть именованный scope; страж эмитит конец при Drop (LIFO).
pub fn scope(name: &str) -> Result<ScopeGuard> {
    ScopeGuard::begin(writer_handle()?, name)
}

/// Напечатать строку с префиксом уровня и эмитить Trace(text, level).
/// Форматирование — забота вызывающего (`format!` на месте вызова).
pub fn trace(level: Level, text: &str) -> Result<()> {
    println!("{} {}", level.prefix(), text);
    if let Some(w) = writer_handle()? {
        w.write_str_i32(FuncId::Trace, text, level as i32)?;
    }
    Ok(())
}

/// Валидационный чекпоинт: на ложном условии эмитит Valid и блокируется до
/// вердикта viewer'а (см. detector::valid).
pub fn valid(condition: &mut bool, text: &str) -> Result<()> {
    valid::check(config(), condition, text)
}

/// SetValueStr(name, value).
pub fn set_value_str(name: &str, value: &str) -> Result<()> {
    if let Some(w) = writer_handle()? {
        w.write_str2(FuncId::SetValueStr, name, value)?;
    }
    Ok(())
}

/// SetValueInt(name, value).
pub fn set_value_int(name: &str, value: i32) -> Result<()> {
    if let Some(w) = writer_handle()? {
        w.write_str_i32(FuncId::SetValueInt, name, value)?;
    }
    Ok(())
}

/// AddValue(name, delta).
pub fn add_value(name: &str, delta: i32) -> Result<()> {
    if let Some(w) = writer_handle()? {
        w.write_str_i32(FuncId::AddValue, name, delta)?;
    }
    Ok(())
}

/// Reader-синглтон: доставить не более одной записи. Пока файла нет —
/// NotFound; попытка открытия повторяется при каждом вызове.
pub fn read_once(cb: &mut dyn FnMut(u16, &[u8])) -> Result<ReadResult> {
    let mut guard = READER.lock().unwrap();
    if guard.is_none() {
        match DetectorReader::open(config())? {
            Some(r) => *guard = Some(r),
            None => return Ok(ReadResult::NotFound),
        }
    }
    match guard.as_mut() {
        Some(r) => r.read_once(cb),
        None => Ok(ReadResult::NotFound),
    }
}
