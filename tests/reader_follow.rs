use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use nablog::event::FuncId;
use nablog::{DetectorConfig, DetectorReader, DetectorWriter, Event, Level, ReadResult};

#[test]
fn busy_page_watermark_growth() -> Result<()> {
    // живая страница дорастает между вызовами: читатель перечитывает
    // заголовок только после исчерпания ранее увиденного диапазона
    let root = unique_root("busy");
    fs::create_dir_all(&root)?;
    let cfg = DetectorConfig::default().with_dir(&root);

    let w = DetectorWriter::create(&cfg)?;
    w.write_str_i32(FuncId::Trace, "first", Level::Info as i32)?;

    let mut r = DetectorReader::open(&cfg)?.expect("log must exist");
    assert_eq!(r.read_event()?.0, ReadResult::Read);
    assert_eq!(r.read_event()?.0, ReadResult::NoData);
    assert_eq!(r.read_event()?.0, ReadResult::NoData);

    w.write_str_i32(FuncId::Trace, "second", Level::Info as i32)?;
    let (res, ev) = r.read_event()?;
    assert_eq!(res, ReadResult::Read);
    assert_eq!(
        ev,
        Some(Event::Trace {
            text: "second".into(),
            level: Level::Info
        })
    );
    assert_eq!(r.read_event()?.0, ReadResult::NoData);

    drop(w);
    assert_eq!(r.read_event()?.0, ReadResult::WriterExited);
    Ok(())
}

#[test]
fn concurrent_drain_preserves_submission_order() -> Result<()> {
    let root = unique_root("follow");
    fs::create_dir_all(&root)?;
    let cfg = DetectorConfig::default().with_dir(&root);

    const N: usize = 5000;
    let writer = Arc::new(DetectorWriter::create(&cfg)?);

    let producer = {
        let writer = writer.clone();
        thread::spawn(move || -> Result<()> {
            for i in 0..N {
                writer.write_str_i32(
                    FuncId::Trace,
                    &format!("msg {}", i),
                    Level::Info as i32,
                )?;
            }
            Ok(())
        })
    };

    // осушаем параллельно с производителем
    let mut r = DetectorReader::open(&cfg)?.expect("log must exist");
    let mut seen = Vec::with_capacity(N);
    while seen.len() < N {
        match r.read_event()? {
            (ReadResult::Read, Some(Event::Trace { text, .. })) => seen.push(text),
            (ReadResult::Read, other) => panic!("unexpected event: {:?}", other),
            (ReadResult::NoData, _) => thread::sleep(Duration::from_millis(1)),
            (other, _) => panic!("unexpected result: {:?}", other),
        }
    }
    producer.join().expect("producer panicked")?;

    // порядок подачи сохранён, ничего не потеряно и не обрезано
    for (i, text) in seen.iter().enumerate() {
        assert_eq!(text, &format!("msg {}", i));
    }

    drop(writer);
    loop {
        match r.read_event()?.0 {
            ReadResult::WriterExited => break,
            ReadResult::Read => {} // хвост, дописанный после основного цикла
            ReadResult::NoData => thread::sleep(Duration::from_millis(1)),
            other => panic!("unexpected result: {:?}", other),
        }
    }
    Ok(())
}

fn unique_root(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("nablog-{}-{}-{}", prefix, pid, t))
}
