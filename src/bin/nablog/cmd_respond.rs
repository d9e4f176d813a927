use anyhow::{anyhow, Result};
use std::fs;
use std::path::PathBuf;

use nablog::detector::valid::{gate_name, CMD_BREAK, CMD_CONTINUE, CMD_IGNORE};

/// Ответить на висящий валидационный чекпоинт: записать командный файл,
/// который опрашивает заблокированный писатель.
pub fn exec(dir: PathBuf, key: i32, command: String) -> Result<()> {
    let code = match command.as_str() {
        "break" => CMD_BREAK,
        "continue" => CMD_CONTINUE,
        "ignore" => CMD_IGNORE,
        other => return Err(anyhow!("unknown command {:?} (break|continue|ignore)", other)),
    };

    let path = dir.join(gate_name(key));
    fs::write(&path, code.to_le_bytes())?;
    println!("answered <valid:{}> with {} ({})", key, command, code);
    Ok(())
}
