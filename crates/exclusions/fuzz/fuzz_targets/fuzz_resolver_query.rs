#![no_main]

use arbitrary::Arbitrary;
use exclusions::{EntryKind, ExclusionResolver, IgnoreOptions};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    scopes: Vec<(&'a str, Vec<&'a str>)>,
    queries: Vec<(&'a str, bool)>,
    case_insensitive: bool,
}

fuzz_target!(|input: Input<'_>| {
    let options = IgnoreOptions::new().with_case_sensitive(!input.case_insensitive);
    let mut resolver = ExclusionResolver::new();
    for (base, lines) in input.scopes.iter().take(8) {
        let _ = resolver.add_rules_from_lines(base, lines.iter().take(32), options);
    }

    for (path, is_dir) in input.queries.iter().take(32) {
        let kind = EntryKind::from_is_dir(*is_dir);
        let excluded = resolver.is_excluded_as(path, kind);
        let (with_details, details) = resolver.is_excluded_with_details(path, kind);
        assert_eq!(excluded, with_details);
        if let Some(details) = details {
            assert_eq!(details.is_excluded(), excluded);
        }
    }
});
