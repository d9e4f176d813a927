use anyhow::Result;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use nablog::{DetectorConfig, DetectorReader, ReadResult};

pub fn exec(path: PathBuf, follow: bool, poll_ms: u64) -> Result<()> {
    let cfg = DetectorConfig::for_log_path(&path);
    let poll = Duration::from_millis(poll_ms.max(1));

    let mut reader: Option<DetectorReader> = None;
    loop {
        if reader.is_none() {
            reader = DetectorReader::open(&cfg)?;
            if reader.is_none() {
                if !follow {
                    println!("log not found: {}", path.display());
                    return Ok(());
                }
                thread::sleep(poll);
                continue;
            }
        }

        let r = match reader.as_mut() {
            Some(r) => r,
            None => continue,
        };
        match r.read_event()? {
            (ReadResult::Read, Some(ev)) => println!("{}", ev),
            (ReadResult::Read, None) => {} // не бывает: Read всегда несёт событие
            (ReadResult::NoData, _) => {
                if !follow {
                    return Ok(());
                }
                thread::sleep(poll);
            }
            (ReadResult::WriterExited, _) => {
                println!("-- writer exited --");
                return Ok(());
            }
            (ReadResult::NotFound, _) => {
                reader = None;
                thread::sleep(poll);
            }
        }
    }
}
