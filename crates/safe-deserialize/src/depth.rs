//! Bracket-depth pre-scan for JSON input.
//!
//! A single byte pass that runs before the real parser. It is deliberately
//! lenient: it never fails, it does not check that brackets match, and it
//! only looks at `{`, `[`, `}`, `]` outside of string literals.

/// Maximum bracket nesting depth reached anywhere in `data`.
///
/// - `{` and `[` open a level; `}` and `]` close one.
/// - Bytes inside `"..."` are ignored, and a backslash inside a string skips
///   the following byte.
/// - Unbalanced closers drive the running depth negative; later openers then
///   start counting from there, so `]][[[` reports 1.
pub fn measure_depth(data: &[u8]) -> usize {
    let mut max_depth: isize = 0;
    let mut current: isize = 0;
    let mut in_string = false;
    let mut escaped = false;

    for &byte in data {
        if escaped {
            escaped = false;
            continue;
        }

        match byte {
            b'\\' if in_string => escaped = true,
            b'"' => in_string = !in_string,
            _ if in_string => {}
            b'{' | b'[' => {
                current += 1;
                max_depth = max_depth.max(current);
            }
            b'}' | b']' => current -= 1,
            _ => {}
        }
    }

    max_depth as usize
}
