//! Валидационные чекпоинты: эмиссия, блокировка до вердикта внешнего
//! viewer'а, диспетчеризация команды.
//!
//! Протокол: на провалившемся условии печатается `<valid:K> text`,
//! эмитится событие Valid(text, K), затем писатель блокируется, пока в
//! каталоге лога не появится командный файл `nabang-valid-<K>` c одним
//! LE i32. Файл удаляется после чтения. Команды:
//! - 0 break    -> аварийное завершение процесса (debug-break semantics)
//! - 1 continue -> продолжить как есть
//! - 2 ignore   -> условие считается выполненным (перевернуть флаг)

use anyhow::{Context, Result};
use byteorder::{ByteOrder, LittleEndian};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::atomic::{AtomicI32, Ordering};
use std::thread;
use std::time::Duration;

use crate::config::DetectorConfig;
use crate::event::FuncId;
use crate::metrics::record_valid_stop;

pub const CMD_BREAK: i32 = 0;
pub const CMD_CONTINUE: i32 = 1;
pub const CMD_IGNORE: i32 = 2;

/// Имя командного файла для ключа K.
pub fn gate_name(key: i32) -> String {
    format!("nabang-valid-{}", key)
}

// Ключи монотонно растут в рамках процесса писателя.
static NEXT_KEY: AtomicI32 = AtomicI32::new(0);

pub(crate) fn check(cfg: &DetectorConfig, condition: &mut bool, text: &str) -> Result<()> {
    if *condition {
        return Ok(());
    }

    let key = NEXT_KEY.fetch_add(1, Ordering::SeqCst);
    println!("<valid:{}> {}", key, text);
    if let Some(w) = super::writer_handle()? {
        w.write_str_i32(FuncId::Valid, text, key)?;
    }
    record_valid_stop();

    let gate = cfg.dir.join(gate_name(key));
    let command = wait_command(&gate, cfg.valid_poll_ms)?;
    match command {
        CMD_BREAK => std::process::abort(),
        CMD_IGNORE => *condition = true,
        _ => {} // continue; неизвестные коды трактуются так же
    }
    Ok(())
}

/// Дождаться командного файла, прочитать вердикт, удалить файл.
fn wait_command(path: &Path, poll_ms: u64) -> Result<i32> {
    loop {
        match fs::read(path) {
            Ok(bytes) if bytes.len() >= 4 => {
                let cmd = LittleEndian::read_i32(&bytes[..4]);
                fs::remove_file(path)
                    .with_context(|| format!("remove valid command {}", path.display()))?;
                return Ok(cmd);
            }
            Ok(_) => {} // viewer ещё дописывает файл
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("read valid command {}", path.display()))
            }
        }
        thread::sleep(Duration::from_millis(poll_ms.max(1)));
    }
}
