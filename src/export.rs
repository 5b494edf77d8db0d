//! Artifact emission for the firmware build.
//!
//! Two output forms: the raw artifact file the interpreter loads from flash,
//! and a C translation unit declaring the same bytes as a static array for
//! direct linking. The C rendering is an external contract with the firmware
//! build; its formatting (uppercase hex, 12 tokens per line, `sizeof`-derived
//! length constant) must be reproduced byte-for-byte across runs.

use crate::error::{Neura9Error, Result};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Writes the raw artifact bytes verbatim.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the write fails.
pub fn write_binary(bytes: &[u8], path: &Path) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, bytes)?;
    Ok(())
}

/// Renders the C source declaring `symbol` as a byte array.
///
/// The include line names `header`, which is expected to sit next to the
/// generated file. The length constant is computed with `sizeof`, never
/// tracked independently, so the two cannot diverge.
#[must_use]
pub fn render_c_array(bytes: &[u8], symbol: &str, header: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#include \"{header}\"");
    out.push('\n');
    let _ = writeln!(out, "const unsigned char {symbol}[] = {{");
    for (i, b) in bytes.iter().enumerate() {
        if i % 12 == 0 {
            out.push_str("    ");
        }
        let _ = write!(out, "0x{b:02X}, ");
        if i % 12 == 11 {
            out.push('\n');
        }
    }
    if bytes.len() % 12 != 0 {
        out.push('\n');
    }
    out.push_str("};\n");
    let _ = writeln!(out, "const unsigned int {symbol}_len = sizeof({symbol});");
    out
}

/// Renders the companion header with the `extern` declarations.
#[must_use]
pub fn render_c_header(symbol: &str) -> String {
    let mut out = String::new();
    out.push_str("#pragma once\n");
    out.push('\n');
    out.push_str("#include <stdint.h>\n");
    out.push('\n');
    let _ = writeln!(out, "extern const unsigned char {symbol}[];");
    let _ = writeln!(out, "extern const unsigned int {symbol}_len;");
    out
}

/// Writes the C byte-array translation unit for `bytes`.
///
/// The include line is derived from the output file stem, so
/// `neura9_defense_model_data.cpp` includes `neura9_defense_model_data.h`.
///
/// # Errors
///
/// Returns an error if the path has no usable file stem or the write fails.
pub fn write_c_array(bytes: &[u8], path: &Path, symbol: &str) -> Result<()> {
    let header = header_name(path)?;
    ensure_parent(path)?;
    fs::write(path, render_c_array(bytes, symbol, &header))?;
    Ok(())
}

/// Writes the companion header next to the array's translation unit.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn write_c_header(path: &Path, symbol: &str) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, render_c_header(symbol))?;
    Ok(())
}

fn header_name(path: &Path) -> Result<String> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Neura9Error::Other(format!("output path has no file stem: {}", path.display())))?;
    Ok(format!("{stem}.h"))
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::tempdir;

    #[test]
    fn test_render_exact_small_array() {
        let out = render_c_array(&[0x54, 0x46, 0x4C, 0x33], "model_data", "model_data.h");
        let expected = "#include \"model_data.h\"\n\
                        \n\
                        const unsigned char model_data[] = {\n    \
                        0x54, 0x46, 0x4C, 0x33, \n\
                        };\n\
                        const unsigned int model_data_len = sizeof(model_data);\n";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_render_empty_array() {
        let out = render_c_array(&[], "empty", "empty.h");
        let expected = "#include \"empty.h\"\n\
                        \n\
                        const unsigned char empty[] = {\n\
                        };\n\
                        const unsigned int empty_len = sizeof(empty);\n";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_full_line_has_no_extra_newline() {
        let bytes: Vec<u8> = (0..24).collect();
        let out = render_c_array(&bytes, "m", "m.h");
        // Two full 12-token lines, no blank line before the brace.
        assert!(out.contains("0x0B, \n    0x0C"));
        assert!(!out.contains("\n\n};"));
        assert!(out.ends_with("};\nconst unsigned int m_len = sizeof(m);\n"));
    }

    #[test]
    fn test_partial_line_terminated() {
        let bytes: Vec<u8> = (0..13).collect();
        let out = render_c_array(&bytes, "m", "m.h");
        // The 13th byte sits alone on the second line, newline-terminated.
        assert!(out.contains("    0x0C, \n};\n"));
    }

    #[test]
    fn test_tokens_are_uppercase_hex() {
        let out = render_c_array(&[0xab, 0xcd], "m", "m.h");
        assert!(out.contains("0xAB, 0xCD, "));
        assert!(!out.contains("0xab"));
    }

    #[test]
    fn test_render_idempotent() {
        let bytes: Vec<u8> = (0..=255).collect();
        let a = render_c_array(&bytes, "model", "model.h");
        let b = render_c_array(&bytes, "model", "model.h");
        assert_eq!(a, b);
    }

    #[test]
    fn test_header_render() {
        let out = render_c_header("neura9_defense_model");
        assert!(out.starts_with("#pragma once\n"));
        assert!(out.contains("extern const unsigned char neura9_defense_model[];\n"));
        assert!(out.contains("extern const unsigned int neura9_defense_model_len;\n"));
    }

    #[test]
    fn test_write_c_array_derives_include() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("neura9_defense_model_data.cpp");
        write_c_array(&[1, 2, 3], &path, "neura9_defense_model").unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("#include \"neura9_defense_model_data.h\"\n"));
    }

    #[test]
    fn test_write_binary_verbatim() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out/model.n9m");
        let bytes: Vec<u8> = (0..100).collect();
        write_binary(&bytes, &path).unwrap();
        assert_eq!(fs::read(&path).unwrap(), bytes);
    }

    proptest! {
        #[test]
        fn prop_token_count_matches_length(bytes in proptest::collection::vec(any::<u8>(), 0..600)) {
            let out = render_c_array(&bytes, "m", "m.h");
            prop_assert_eq!(out.matches("0x").count(), bytes.len());
            // Every line inside the braces ends with a newline.
            prop_assert!(out.contains("};\n"), "expected array to end with a terminating brace");
        }

        #[test]
        fn prop_roundtrip_tokens(bytes in proptest::collection::vec(any::<u8>(), 1..200)) {
            let out = render_c_array(&bytes, "m", "m.h");
            let body = out
                .split("= {")
                .nth(1)
                .unwrap()
                .split("};")
                .next()
                .unwrap();
            let parsed: Vec<u8> = body
                .split(',')
                .map(str::trim)
                .filter(|t| t.starts_with("0x"))
                .map(|t| u8::from_str_radix(&t[2..], 16).unwrap())
                .collect();
            prop_assert_eq!(parsed, bytes);
        }
    }
}
