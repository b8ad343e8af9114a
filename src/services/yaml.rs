//! Block YAML emitter that stays readable by YAML 1.1 resolvers.
//!
//! `serde_yaml` only quotes strings a YAML 1.2 reader would misread. A plain
//! `1:10:00` or `no` therefore comes back from a 1.1 reader (PyYAML and the
//! tools built on it) as the integer 4200 or `false`. This emitter lays out
//! the block structure itself and single-quotes every string a 1.1 resolver
//! would not keep as a string. Escaping of individual scalars is still left
//! to `serde_yaml`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_yaml::Value;

/// Plain scalars a YAML 1.1 resolver turns into something other than a string.
const YAML11_IMPLICIT: &[&str] = &[
    // bool and null
    r"y|Y|yes|Yes|YES|n|N|no|No|NO|true|True|TRUE|false|False|FALSE",
    r"on|On|ON|off|Off|OFF|~|null|Null|NULL",
    // int: binary, hex, octal/decimal, sexagesimal
    r"[-+]?0b[01_]+",
    r"[-+]?0x[0-9a-fA-F_]+",
    r"[-+]?[0-9][0-9_]*",
    r"[-+]?[0-9][0-9_]*(?::[0-5]?[0-9])+",
    // float, including sexagesimal and special values
    r"[-+]?(?:[0-9][0-9_]*)?\.[0-9_]*(?:[eE][-+]?[0-9]+)?",
    r"[-+]?[0-9][0-9_]*(?::[0-5]?[0-9])+\.[0-9_]*",
    r"[-+]?\.(?:inf|Inf|INF)",
    r"\.(?:nan|NaN|NAN)",
    // timestamp
    r"[0-9]{4}-[0-9]{1,2}-[0-9]{1,2}(?:(?:[Tt]|[\x20\t]+)[0-9]{1,2}:[0-9]{2}:[0-9]{2}.*)?",
    // merge and value keys
    r"<<|=",
];

static YAML11_IMPLICIT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^(?:{})$", YAML11_IMPLICIT.join("|")))
        .expect("valid YAML 1.1 scalar regex")
});

/// Returns true if a YAML 1.1 resolver reads the plain scalar `s` as a
/// non-string value.
pub fn is_yaml11_implicit(s: &str) -> bool {
    YAML11_IMPLICIT_RE.is_match(s)
}

/// Serializes `value` as block YAML.
///
/// Key order is kept, non-ASCII text is written literally, and every string
/// is emitted in a form both YAML 1.1 and 1.2 readers keep as a string.
pub fn to_string<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_yaml::Error> {
    let value = serde_yaml::to_value(value)?;
    let mut out = String::new();
    write_node(&value, 0, &mut out)?;
    Ok(out)
}

/// Writes `value` starting on a fresh line at column `indent`.
fn write_node(value: &Value, indent: usize, out: &mut String) -> Result<(), serde_yaml::Error> {
    match value {
        Value::Mapping(map) if !map.is_empty() => {
            for (key, entry) in map {
                pad(indent, out);
                out.push_str(&inline(key)?);
                out.push(':');
                write_entry_value(entry, indent, out)?;
            }
        }
        Value::Sequence(items) if !items.is_empty() => {
            for item in items {
                pad(indent, out);
                out.push('-');
                write_item(item, indent, out)?;
            }
        }
        other => {
            pad(indent, out);
            out.push_str(&inline(other)?);
            out.push('\n');
        }
    }
    Ok(())
}

fn write_entry_value(
    value: &Value,
    indent: usize,
    out: &mut String,
) -> Result<(), serde_yaml::Error> {
    match value {
        Value::Mapping(map) if !map.is_empty() => {
            out.push('\n');
            write_node(value, indent + 2, out)
        }
        // Sequences under a key sit at the key's column
        Value::Sequence(items) if !items.is_empty() => {
            out.push('\n');
            write_node(value, indent, out)
        }
        other => {
            out.push(' ');
            out.push_str(&inline(other)?);
            out.push('\n');
            Ok(())
        }
    }
}

fn write_item(value: &Value, indent: usize, out: &mut String) -> Result<(), serde_yaml::Error> {
    let nested = match value {
        Value::Mapping(map) => !map.is_empty(),
        Value::Sequence(items) => !items.is_empty(),
        _ => false,
    };

    if nested {
        // The first line of the nested block continues after the dash
        let mut block = String::new();
        write_node(value, indent + 2, &mut block)?;
        out.push(' ');
        out.push_str(&block[indent + 2..]);
    } else {
        out.push(' ');
        out.push_str(&inline(value)?);
        out.push('\n');
    }
    Ok(())
}

/// Single-line rendering of a scalar or an empty collection.
fn inline(value: &Value) -> Result<String, serde_yaml::Error> {
    match value {
        Value::String(s) => scalar(s),
        Value::Sequence(_) => Ok("[]".to_string()),
        Value::Mapping(_) => Ok("{}".to_string()),
        other => Ok(serde_yaml::to_string(other)?.trim_end().to_string()),
    }
}

fn scalar(s: &str) -> Result<String, serde_yaml::Error> {
    let emitted = serde_yaml::to_string(s)?;
    let emitted = emitted.trim_end_matches('\n');

    if emitted.contains('\n') {
        // Block and folded scalars would need re-indenting; a JSON string is
        // a valid double-quoted YAML scalar.
        return serde_json::to_string(s)
            .map_err(<serde_yaml::Error as serde::ser::Error>::custom);
    }
    if emitted == s && is_yaml11_implicit(s) {
        return Ok(format!("'{}'", s.replace('\'', "''")));
    }
    Ok(emitted.to_string())
}

fn pad(indent: usize, out: &mut String) {
    out.extend(std::iter::repeat(' ').take(indent));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_yaml11_implicit_scalars() {
        for s in [
            "no", "Yes", "ON", "off", "~", "42", "017", "0x1F", "1:10:00", "0:10:00",
            "-3:05", "1.5", ".inf", ".NaN", "2024-02-01", "2024-02-01 10:00:00", "<<",
        ] {
            assert!(is_yaml11_implicit(s), "{s} should be implicit");
        }
        for s in [
            "SN-1",
            "Widget",
            "none",
            "01-02-2024 10:00:00",
            "https://gateway.ipfs.io/ipfs/cidAAA",
            "Сборка",
            "1 day, 2:03:04",
        ] {
            assert!(!is_yaml11_implicit(s), "{s} should stay a string");
        }
    }

    #[test]
    fn test_ambiguous_strings_are_single_quoted() {
        let yaml = to_string(&json!({
            "serial": "no",
            "time": "1:10:00",
            "model": "Widget",
        }))
        .unwrap();

        assert!(yaml.contains("serial: 'no'\n"));
        assert!(yaml.contains("time: '1:10:00'\n"));
        assert!(yaml.contains("model: Widget\n"));
    }

    #[test]
    fn test_quotes_inside_forced_scalars_are_doubled() {
        assert_eq!(scalar("on").unwrap(), "'on'");

        let forced = scalar("2024-02-01 10:00:00 it's").unwrap();
        assert_eq!(forced, "'2024-02-01 10:00:00 it''s'");
        let value: String = serde_yaml::from_str(&forced).unwrap();
        assert_eq!(value, "2024-02-01 10:00:00 it's");
    }

    #[test]
    fn test_block_layout() {
        let yaml = to_string(&json!({
            "a": "x",
            "b": [{"c": "1", "d": []}, "e"],
            "f": {"g": {}},
        }))
        .unwrap();

        assert_eq!(
            yaml,
            "a: x\nb:\n- c: '1'\n  d: []\n- e\nf:\n  g: {}\n"
        );
    }

    #[test]
    fn test_nested_structure_round_trips() {
        let source = json!({
            "name": "Стойка",
            "notes": "line one\nline two: with colon",
            "flags": ["yes", "no", "2024-02-01"],
            "nested": [[{"k": "v"}, "w"], []],
            "end": null,
        });

        let yaml = to_string(&source).unwrap();
        let parsed: Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, serde_yaml::to_value(&source).unwrap());
    }
}
