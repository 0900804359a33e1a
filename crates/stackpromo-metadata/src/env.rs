//! Environment definition parsing.
//!
//! Two layouts are accepted: an `env` file of `KEY=VALUE` lines, or an `env`
//! directory in envdir form where each file name is a key and its trimmed
//! contents the value.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

/// Environment variables of one image, ordered by name.
pub type EnvMap = BTreeMap<String, String>;

/// Parse a dotenv-style `KEY=VALUE` stream.
///
/// Comments, `export` prefixes, quoting, escapes and multi-line quoted
/// values follow `dotenvy`. Later definitions of a key win.
pub fn parse_env_file<R: Read>(reader: R) -> Result<EnvMap, dotenvy::Error> {
    dotenvy::from_read_iter(reader).collect()
}

/// Read an envdir: one file per variable.
pub fn parse_env_dir(dir: &Path) -> std::io::Result<EnvMap> {
    let mut env = EnvMap::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let key = entry.file_name().to_string_lossy().into_owned();
        let value = std::fs::read_to_string(entry.path())?;
        env.insert(key, value.trim().to_string());
    }
    Ok(env)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(contents: &str) -> EnvMap {
        parse_env_file(contents.as_bytes()).unwrap()
    }

    #[test]
    fn plain_pairs() {
        let env = parse("A=1\nB=2\n");
        assert_eq!(env.len(), 2);
        assert_eq!(env["A"], "1");
        assert_eq!(env["B"], "2");
    }

    #[test]
    fn comments_exports_and_quotes() {
        let env = parse(
            "# built by packer\n\nexport PACKER_TEMPLATES_SHA=\"abc123\"\nTRAVIS_COOKBOOKS_SHA='def'\nEMPTY=\n",
        );
        assert_eq!(env["PACKER_TEMPLATES_SHA"], "abc123");
        assert_eq!(env["TRAVIS_COOKBOOKS_SHA"], "def");
        assert_eq!(env["EMPTY"], "");
    }

    #[test]
    fn inline_comments_are_stripped() {
        let env = parse("A=1 # built by packer\nB='quoted' # note\n");
        assert_eq!(env["A"], "1");
        assert_eq!(env["B"], "quoted");
    }

    #[test]
    fn quoted_values_span_lines() {
        let env = parse("A=\"multi\nline\"\nB=2\n");
        assert_eq!(env["A"], "multi\nline");
        assert_eq!(env["B"], "2");
    }

    #[test]
    fn escapes_in_double_quotes() {
        let env = parse("A=\"one\\ntwo \\\"quoted\\\"\"\n");
        assert_eq!(env["A"], "one\ntwo \"quoted\"");
    }

    #[test]
    fn value_may_contain_equals() {
        assert_eq!(parse("OPTS=a=b=c\n")["OPTS"], "a=b=c");
    }

    #[test]
    fn later_definitions_win() {
        assert_eq!(parse("A=1\nA=2\n")["A"], "2");
    }

    #[test]
    fn line_without_equals_is_rejected() {
        let err = parse_env_file("A=1\nnot a pair\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            dotenvy::Error::LineParse(ref line, _) if line.contains("not a pair")
        ));
    }

    #[test]
    fn empty_key_is_rejected() {
        assert!(parse_env_file("=value\n".as_bytes()).is_err());
    }

    #[test]
    fn envdir_layout() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("PACKER_TEMPLATES_SHA"), "abc\n").unwrap();
        std::fs::write(dir.path().join("TRAVIS_UID"), "2000").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let env = parse_env_dir(dir.path()).unwrap();
        assert_eq!(env.len(), 2);
        assert_eq!(env["PACKER_TEMPLATES_SHA"], "abc");
        assert_eq!(env["TRAVIS_UID"], "2000");
    }
}
