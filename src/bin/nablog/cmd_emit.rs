use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

use nablog::event::FuncId;
use nablog::metrics::metrics_snapshot;
use nablog::util::now_nanos;
use nablog::{DetectorConfig, DetectorWriter, Level};

/// Демо-писатель для межпроцессной проверки: запустите в одном терминале
/// `nablog emit`, в другом `nablog tail --follow`.
pub fn exec(dir: PathBuf, traces: u32) -> Result<()> {
    let cfg = DetectorConfig::default().with_dir(dir);
    let writer = Arc::new(DetectorWriter::create(&cfg)?);
    println!("emitting into {}", writer.path().display());

    writer.write_str_i64(FuncId::Stamp, "emit-start", now_nanos())?;
    {
        let _outer = writer.scope("emit")?;
        for i in 0..traces {
            writer.write_str_i32(
                FuncId::Trace,
                &format!("demo trace {}", i),
                Level::Info as i32,
            )?;
        }
        writer.write_str2(FuncId::SetValueStr, "phase", "done")?;
        writer.write_str_i32(FuncId::SetValueInt, "traces", traces as i32)?;
        writer.write_str_i32(FuncId::AddValue, "runs", 1)?;
    }
    writer.write_str_i64(FuncId::Stamp, "emit-end", now_nanos())?;

    drop(writer); // финальный штамп '/'

    let m = metrics_snapshot();
    println!(
        "done: {} records, {} bytes, {} rotations ({} wraps)",
        m.records_appended, m.bytes_appended, m.page_rotations, m.ring_wraps
    );
    Ok(())
}
