//! Синглтоны фасада — процесс-глобальное состояние, поэтому весь сценарий
//! живёт в одном тесте: init -> эмиссия -> valid-чекпоинт -> shutdown ->
//! чтение через глобальный reader.

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use nablog::detector;
use nablog::event::FuncId;
use nablog::{DetectorConfig, Event, Level, ReadResult};

#[test]
fn facade_singletons_emit_validate_and_shutdown() -> Result<()> {
    let root = unique_root("facade");
    fs::create_dir_all(&root)?;
    detector::init(
        DetectorConfig::default()
            .with_dir(&root)
            .with_valid_poll_ms(5),
    );

    // 1) обычная эмиссия через фасад
    detector::stamp("boot")?;
    {
        let _outer = detector::scope("outer")?;
        detector::trace(Level::Info, "hello")?;
    }
    detector::set_value_str("phase", "ready")?;
    detector::set_value_int("phase.code", 2)?;
    detector::add_value("n", 3)?;

    // 2) выполненное условие не трогает ни лог, ни stdout
    let mut ok = true;
    detector::valid(&mut ok, "never printed")?;
    assert!(ok);

    // 3) провалившееся условие блокируется до вердикта viewer'а; ответ
    //    "ignore" (2) подложен заранее — первый ключ процесса равен 0
    fs::write(
        root.join("nabang-valid-0"),
        2i32.to_le_bytes(),
    )?;
    let mut cond = false;
    detector::valid(&mut cond, "checkpoint tripped")?;
    assert!(cond, "ignore verdict must flip the condition");
    assert!(
        !root.join("nabang-valid-0").exists(),
        "command file must be consumed"
    );

    // 4) shutdown ставит финальный штамп; эмиссия после него — no-op
    detector::shutdown();
    detector::stamp("after-shutdown")?;

    // 5) глобальный reader осушает ровно то, что было до shutdown
    let mut events = Vec::new();
    loop {
        let mut one = None;
        match detector::read_once(&mut |func_id, payload| {
            one = Some(Event::decode(func_id, payload).expect("payload must decode"));
        })? {
            ReadResult::Read => events.push(one.expect("callback must fire")),
            ReadResult::WriterExited => break,
            other => panic!("unexpected result: {:?}", other),
        }
    }

    let kinds: Vec<u16> = events
        .iter()
        .map(|ev| match ev {
            Event::ScopeBegin { .. } => FuncId::ScopeBegin as u16,
            Event::ScopeEnd { .. } => FuncId::ScopeEnd as u16,
            Event::Stamp { .. } => FuncId::Stamp as u16,
            Event::Trace { .. } => FuncId::Trace as u16,
            Event::Valid { .. } => FuncId::Valid as u16,
            Event::SetValueStr { .. } => FuncId::SetValueStr as u16,
            Event::SetValueInt { .. } => FuncId::SetValueInt as u16,
            Event::AddValue { .. } => FuncId::AddValue as u16,
        })
        .collect();
    assert_eq!(kinds, vec![3, 1, 4, 2, 6, 7, 8, 5]);

    assert_eq!(
        events[4],
        Event::SetValueStr {
            name: "phase".into(),
            value: "ready".into()
        }
    );
    match &events[7] {
        Event::Valid { text, key } => {
            assert_eq!(text, "checkpoint tripped");
            assert_eq!(*key, 0);
        }
        other => panic!("expected valid event, got {:?}", other),
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
