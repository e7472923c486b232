#![no_main]

use exclusions::{EntryKind, IgnoreOptions, PatternCompiler, parse_pattern};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|line: &str| {
    let parsed = parse_pattern(line);
    let compiler = PatternCompiler::new("/fuzz", IgnoreOptions::default()).unwrap();
    let compiled = compiler.compile_line(line, Some(1));
    if parsed.is_err() {
        assert!(compiled.is_err());
    }

    if let Ok(Some(rule)) = compiled {
        let _ = rule.matches(line, EntryKind::Unknown);
        let _ = rule.matches_path(line, EntryKind::File);
    }
});
